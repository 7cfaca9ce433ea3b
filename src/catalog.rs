use crate::omdb::{FetchError, MovieRecord, MovieSource};
use futures_util::future::try_join_all;

/// Identifiers of the movies shown before any search.
pub const DEFAULT_CATALOG_IDS: [&str; 25] = [
    "tt3896198", "tt0111161", "tt1375666", "tt0133093", "tt4154796", "tt0110912", "tt0068646",
    "tt0109830", "tt0114369", "tt0120737", "tt0167260", "tt0080684", "tt0137523", "tt6751668",
    "tt0102926", "tt0848228", "tt0816692", "tt4154756", "tt4633694", "tt0120815", "tt0468569",
    "tt1853728", "tt0266543", "tt0088763", "tt0172495",
];

/// Fetch every id concurrently and keep the records that resolved.
///
/// Results come back in the order of `ids`, whatever order the requests
/// finish in. A transport or decode failure on any id fails the batch.
pub async fn load_catalog<S>(source: &S, ids: &[String]) -> Result<Vec<MovieRecord>, FetchError>
where
    S: MovieSource + ?Sized,
{
    let records = try_join_all(ids.iter().map(|id| source.fetch_detail(id))).await?;
    let total = records.len();
    let valid = retain_valid(records);
    tracing::info!(requested = total, loaded = valid.len(), "catalog loaded");
    Ok(valid)
}

/// Drop records the API reported as not found.
pub(crate) fn retain_valid(records: Vec<MovieRecord>) -> Vec<MovieRecord> {
    records
        .into_iter()
        .filter(|r| {
            if !r.is_valid() {
                tracing::debug!(imdb_id = %r.imdb_id, error = ?r.error, "dropping unresolved record");
            }
            r.is_valid()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omdb::testing::{StaticSource, movie};

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_unresolved_records_are_dropped_in_order() {
        let source = StaticSource::with_movies(vec![
            movie("A", "Alpha", "Drama"),
            movie("C", "Gamma", "Comedy"),
        ]);
        let catalog = load_catalog(&source, &ids(&["A", "B", "C"])).await.unwrap();
        let got: Vec<_> = catalog.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(got, ["A", "C"]);
    }

    #[tokio::test]
    async fn test_order_follows_ids_not_completion() {
        let mut source = StaticSource::with_movies(vec![
            movie("A", "Alpha", "Drama"),
            movie("B", "Beta", "Action"),
            movie("C", "Gamma", "Comedy"),
        ]);
        source.delays_ms.insert("A".into(), 40);
        source.delays_ms.insert("B".into(), 20);
        let catalog = load_catalog(&source, &ids(&["A", "B", "C"])).await.unwrap();
        let got: Vec<_> = catalog.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(got, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_transport_failure_fails_batch() {
        let mut source = StaticSource::with_movies(vec![movie("A", "Alpha", "Drama")]);
        source.broken.push("B".into());
        let result = load_catalog(&source, &ids(&["A", "B"])).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_every_id_is_requested_once() {
        let source = StaticSource::default();
        let all: Vec<String> = DEFAULT_CATALOG_IDS.iter().map(|s| s.to_string()).collect();
        let catalog = load_catalog(&source, &all).await.unwrap();
        assert!(catalog.is_empty());
        assert_eq!(source.call_count(), 25);
    }
}
