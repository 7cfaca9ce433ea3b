mod record;

pub use record::{MovieRecord, SearchQueryResult, SearchStub};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the movie API.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Http(e) if e.is_timeout() => "The movie API timed out".to_string(),
            FetchError::Http(e) => format!("Network error: {}", e),
            FetchError::Status { status, .. } => format!("Movie API error (HTTP {})", status),
            FetchError::Decode(e) => format!("Data format error: {}", e),
        }
    }
}

/// Where movie records come from.
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Full detail record for one IMDb identifier.
    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieRecord, FetchError>;

    /// Free-text title search.
    async fn search(&self, term: &str) -> Result<SearchQueryResult, FetchError>;
}

/// OMDb HTTP client.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("movie-explorer/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn detail_request(&self, imdb_id: &str) -> reqwest::RequestBuilder {
        self.http
            .get(&self.base_url)
            .query(&[("i", imdb_id), ("apikey", self.api_key.as_str())])
    }

    fn search_request(&self, term: &str) -> reqwest::RequestBuilder {
        self.http
            .get(&self.base_url)
            .query(&[("s", term), ("apikey", self.api_key.as_str())])
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        let url = strip_api_key(response.url());
        let body = response.bytes().await?;
        // OMDb reports bad keys and rate limits as 401 with a normal
        // `Response: "False"` body, which callers handle per record.
        match serde_json::from_slice(&body) {
            Ok(value) => {
                if !status.is_success() {
                    tracing::warn!(status = status.as_u16(), url, "API replied with an error body");
                }
                Ok(value)
            }
            Err(_) if !status.is_success() => Err(FetchError::Status {
                status: status.as_u16(),
                url,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieRecord, FetchError> {
        tracing::debug!(imdb_id, "fetching movie detail");
        Self::get_json(self.detail_request(imdb_id)).await
    }

    async fn search(&self, term: &str) -> Result<SearchQueryResult, FetchError> {
        tracing::debug!(term, "searching movies");
        Self::get_json(self.search_request(term)).await
    }
}

/// URL without the `apikey` parameter, safe for logs and error messages.
fn strip_api_key(url: &reqwest::Url) -> String {
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "apikey")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    clean.query_pairs_mut().clear().extend_pairs(pairs);
    clean.to_string()
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source; ids missing from `details` come back as `Response=False`.
    #[derive(Default)]
    pub struct StaticSource {
        pub details: HashMap<String, MovieRecord>,
        pub searches: HashMap<String, SearchQueryResult>,
        /// Per-id artificial latency, to shuffle completion order.
        pub delays_ms: HashMap<String, u64>,
        /// Ids whose fetch fails at the transport level.
        pub broken: Vec<String>,
        pub fail_search: bool,
        pub calls: AtomicUsize,
        pub requested: Mutex<Vec<String>>,
    }

    pub fn movie(id: &str, title: &str, genre: &str) -> MovieRecord {
        MovieRecord {
            imdb_id: id.to_string(),
            response: Some("True".to_string()),
            title: Some(title.to_string()),
            genre: Some(genre.to_string()),
            ..Default::default()
        }
    }

    pub fn stubs(ids: &[&str]) -> SearchQueryResult {
        SearchQueryResult {
            response: "True".to_string(),
            search: ids
                .iter()
                .map(|id| SearchStub {
                    imdb_id: id.to_string(),
                    title: None,
                    year: None,
                    kind: None,
                    poster: None,
                })
                .collect(),
            total_results: Some(ids.len().to_string()),
            error: None,
        }
    }

    impl StaticSource {
        pub fn with_movies(movies: Vec<MovieRecord>) -> Self {
            Self {
                details: movies.into_iter().map(|m| (m.imdb_id.clone(), m)).collect(),
                ..Default::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MovieSource for StaticSource {
        async fn fetch_detail(&self, imdb_id: &str) -> Result<MovieRecord, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(imdb_id.to_string());
            if let Some(ms) = self.delays_ms.get(imdb_id) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.broken.iter().any(|b| b == imdb_id) {
                return Err(FetchError::Status {
                    status: 503,
                    url: format!("test://detail/{imdb_id}"),
                });
            }
            Ok(self.details.get(imdb_id).cloned().unwrap_or_else(|| MovieRecord {
                response: Some("False".to_string()),
                error: Some("Incorrect IMDb ID.".to_string()),
                ..Default::default()
            }))
        }

        async fn search(&self, term: &str) -> Result<SearchQueryResult, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_search {
                return Err(FetchError::Status {
                    status: 503,
                    url: "test://search".to_string(),
                });
            }
            Ok(self.searches.get(term).cloned().unwrap_or_else(|| SearchQueryResult {
                response: "False".to_string(),
                error: Some("Movie not found!".to_string()),
                ..Default::default()
            }))
        }
    }
}
