use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator OMDb uses inside the `Genre` field.
pub const GENRE_SEPARATOR: &str = ", ";

/// A full detail record from the `?i=<id>` endpoint.
///
/// Only the fields the browser looks at are typed; everything else the API
/// returns is kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Year", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(rename = "Genre", default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "Director", default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(rename = "Actors", default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(rename = "Plot", default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(rename = "Runtime", default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(rename = "imdbRating", default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Poster", default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieRecord {
    /// A record counts as fetched unless the API explicitly said `"False"`.
    pub fn is_valid(&self) -> bool {
        self.response.as_deref() != Some("False")
    }

    /// Genre tokens in the order they appear in the raw field.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre
            .as_deref()
            .filter(|g| !g.is_empty())
            .into_iter()
            .flat_map(|g| g.split(GENRE_SEPARATOR))
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.imdb_id)
    }
}

/// Lightweight entry in a search response, hydrated with a detail fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStub {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

/// Response of the `?s=<term>` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQueryResult {
    #[serde(rename = "Response", default)]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<SearchStub>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl SearchQueryResult {
    pub fn succeeded(&self) -> bool {
        self.response == "True"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_record_keeps_unknown_fields() {
        let raw = r#"{
            "Title": "The Matrix",
            "Year": "1999",
            "Genre": "Action, Sci-Fi",
            "imdbID": "tt0133093",
            "Response": "True",
            "Rated": "R",
            "Ratings": [{"Source": "Internet Movie Database", "Value": "8.7/10"}]
        }"#;
        let record: MovieRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.imdb_id, "tt0133093");
        assert!(record.is_valid());
        assert_eq!(record.extra.get("Rated"), Some(&Value::String("R".into())));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["Ratings"][0]["Value"], "8.7/10");
        assert_eq!(back["Genre"], "Action, Sci-Fi");
    }

    #[test]
    fn test_failed_record_is_invalid() {
        let raw = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        let record: MovieRecord = serde_json::from_str(raw).unwrap();
        assert!(!record.is_valid());
        assert_eq!(record.error.as_deref(), Some("Incorrect IMDb ID."));
    }

    #[test]
    fn test_missing_response_flag_counts_as_valid() {
        let record: MovieRecord = serde_json::from_str(r#"{"imdbID":"tt1"}"#).unwrap();
        assert!(record.is_valid());
    }

    #[test]
    fn test_genres_split_on_comma_space() {
        let record = MovieRecord {
            genre: Some("Crime, Drama, Thriller".into()),
            ..Default::default()
        };
        assert_eq!(record.genres().collect::<Vec<_>>(), ["Crime", "Drama", "Thriller"]);

        let empty = MovieRecord {
            genre: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(empty.genres().count(), 0);
        assert_eq!(MovieRecord::default().genres().count(), 0);
    }

    #[test]
    fn test_search_result_parsing() {
        let raw = r#"{
            "Search": [
                {"Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie", "Poster": "N/A"},
                {"imdbID": "tt0096895"}
            ],
            "totalResults": "587",
            "Response": "True"
        }"#;
        let result: SearchQueryResult = serde_json::from_str(raw).unwrap();
        assert!(result.succeeded());
        assert_eq!(result.search.len(), 2);
        assert_eq!(result.search[1].imdb_id, "tt0096895");

        let none: SearchQueryResult =
            serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();
        assert!(!none.succeeded());
        assert!(none.search.is_empty());
    }
}
