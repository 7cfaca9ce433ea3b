//! Derived view of the movie collections: which list is shown, which genres
//! it offers and what survives the genre filter.

use crate::omdb::MovieRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Genre value meaning "no filter".
pub const ALL_GENRES: &str = "Tutti";

/// The selected genre. Defaults to [`ALL_GENRES`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenreFilter(String);

impl GenreFilter {
    pub fn new(genre: impl Into<String>) -> Self {
        Self(genre.into())
    }

    pub fn is_all(&self) -> bool {
        self.0 == ALL_GENRES
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GenreFilter {
    fn default() -> Self {
        Self(ALL_GENRES.to_string())
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a selected genre is compared against a record's `Genre` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenreMatch {
    /// Whole comma-separated tokens only.
    #[default]
    Exact,
    /// Raw substring of the field. "War" also matches "Warfare".
    Substring,
}

impl GenreMatch {
    pub fn matches(self, record: &MovieRecord, filter: &GenreFilter) -> bool {
        if filter.is_all() {
            return true;
        }
        match self {
            GenreMatch::Exact => record.genres().any(|g| g == filter.as_str()),
            GenreMatch::Substring => record
                .genre
                .as_deref()
                .is_some_and(|g| g.contains(filter.as_str())),
        }
    }
}

/// Everything the renderer needs, borrowed from the owning collections.
#[derive(Debug)]
pub struct ViewState<'a> {
    /// Search results when there are any, otherwise the catalog.
    pub effective: &'a [MovieRecord],
    /// Sentinel first, then every genre token in first-seen order.
    pub genres: Vec<&'a str>,
    pub filtered: Vec<&'a MovieRecord>,
}

impl<'a> ViewState<'a> {
    pub fn derive(
        catalog: &'a [MovieRecord],
        search_results: &'a [MovieRecord],
        filter: &GenreFilter,
        mode: GenreMatch,
    ) -> Self {
        let effective = effective_list(catalog, search_results);
        Self {
            effective,
            genres: available_genres(effective),
            filtered: filtered_indices(effective, filter, mode)
                .into_iter()
                .map(|i| &effective[i])
                .collect(),
        }
    }
}

pub fn effective_list<'a>(
    catalog: &'a [MovieRecord],
    search_results: &'a [MovieRecord],
) -> &'a [MovieRecord] {
    if search_results.is_empty() {
        catalog
    } else {
        search_results
    }
}

/// Positions in `movies` of the records that pass the genre filter.
pub fn filtered_indices(movies: &[MovieRecord], filter: &GenreFilter, mode: GenreMatch) -> Vec<usize> {
    movies
        .iter()
        .enumerate()
        .filter(|(_, m)| mode.matches(m, filter))
        .map(|(i, _)| i)
        .collect()
}

pub fn available_genres(movies: &[MovieRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut genres = vec![ALL_GENRES];
    seen.insert(ALL_GENRES);
    for genre in movies.iter().flat_map(|m| m.genres()) {
        if seen.insert(genre) {
            genres.push(genre);
        }
    }
    genres
}
