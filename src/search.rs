use crate::catalog::retain_valid;
use crate::omdb::{FetchError, MovieRecord, MovieSource};
use futures_util::future::try_join_all;

/// How many search hits get a full detail fetch. The rest are dropped.
pub const SEARCH_HYDRATE_LIMIT: usize = 10;

/// Result of a search that reached the API.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The API reported no match for the term.
    NoResults,
    /// Hydrated records, in the order the API ranked them.
    Found(Vec<MovieRecord>),
}

/// The term to send, or `None` when there is nothing to search for.
pub fn normalize_term(raw: &str) -> Option<&str> {
    if raw.trim().is_empty() { None } else { Some(raw) }
}

/// Query the search endpoint and hydrate the top hits concurrently.
pub async fn search_movies<S>(source: &S, term: &str) -> Result<SearchOutcome, FetchError>
where
    S: MovieSource + ?Sized,
{
    let result = source.search(term).await?;
    if !result.succeeded() {
        tracing::info!(term, error = ?result.error, "search returned no results");
        return Ok(SearchOutcome::NoResults);
    }

    let hits = result.search.len();
    let details = try_join_all(
        result
            .search
            .iter()
            .take(SEARCH_HYDRATE_LIMIT)
            .map(|stub| source.fetch_detail(&stub.imdb_id)),
    )
    .await?;
    let records = retain_valid(details);
    tracing::info!(term, hits, hydrated = records.len(), "search completed");
    Ok(SearchOutcome::Found(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omdb::testing::{StaticSource, movie, stubs};

    fn batman_source() -> StaticSource {
        let ids: Vec<String> = (1..=12).map(|i| format!("tt{i:02}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        // tt03 and tt07 are left out so their detail fetch reports Response=False
        let movies = ids
            .iter()
            .filter(|id| *id != "tt03" && *id != "tt07")
            .map(|id| movie(id, &format!("Batman {id}"), "Action"))
            .collect();
        let mut source = StaticSource::with_movies(movies);
        source.searches.insert("batman".into(), stubs(&id_refs));
        source
    }

    #[test]
    fn test_blank_terms_are_rejected() {
        assert_eq!(normalize_term(""), None);
        assert_eq!(normalize_term("   \t"), None);
        assert_eq!(normalize_term(" matrix "), Some(" matrix "));
    }

    #[tokio::test]
    async fn test_only_first_ten_hits_are_hydrated() {
        let source = batman_source();
        let outcome = search_movies(&source, "batman").await.unwrap();
        let SearchOutcome::Found(records) = outcome else {
            panic!("expected results");
        };
        assert_eq!(records.len(), 8);
        // 1 search call + 10 detail calls
        assert_eq!(source.call_count(), 11);
        let requested = source.requested.lock().unwrap().clone();
        assert!(!requested.contains(&"tt11".to_string()));
        assert!(!requested.contains(&"tt12".to_string()));
    }

    #[tokio::test]
    async fn test_hydration_keeps_ranking_order() {
        let mut source = batman_source();
        source.delays_ms.insert("tt01".into(), 30);
        source.delays_ms.insert("tt02".into(), 10);
        let SearchOutcome::Found(records) = search_movies(&source, "batman").await.unwrap() else {
            panic!("expected results");
        };
        let got: Vec<_> = records.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(got, ["tt01", "tt02", "tt04", "tt05", "tt06", "tt08", "tt09", "tt10"]);
    }

    #[tokio::test]
    async fn test_unknown_term_is_no_results() {
        let source = batman_source();
        let outcome = search_movies(&source, "zzzz").await.unwrap();
        assert_eq!(outcome, SearchOutcome::NoResults);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_detail_transport_failure_aborts_search() {
        let mut source = batman_source();
        source.broken.push("tt05".into());
        assert!(search_movies(&source, "batman").await.is_err());
    }

    #[tokio::test]
    async fn test_search_endpoint_failure() {
        let source = StaticSource {
            fail_search: true,
            ..Default::default()
        };
        assert!(search_movies(&source, "matrix").await.is_err());
    }
}
