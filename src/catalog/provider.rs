use std::fmt;

use async_trait::async_trait;

use super::types::{Movie, MovieDetails, MovieId, MovieQuery};

/// Errors that can occur while talking to a catalog.
/// Unlike storage errors these always reach the caller, which shows them to the user.
#[derive(Debug)]
pub enum CatalogError {
    /// Provider misconfigured (missing API key, bad URL). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// API returned an error response. Retryable if status >= 500 or 429.
    Api { status: u16, message: String },
    /// Failed to parse the catalog's response. Not retryable.
    Parse(String),
    /// The request itself was invalid (e.g. page 0). Not retryable.
    InvalidRequest(String),
}

impl CatalogError {
    /// Whether repeating the same request could succeed. Nothing retries automatically;
    /// this only tells the caller whether offering a retry makes sense.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Network(_) => true,
            CatalogError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Config(msg) => write!(f, "config error: {msg}"),
            CatalogError::Network(msg) => write!(f, "network error: {msg}"),
            CatalogError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            CatalogError::Parse(msg) => write!(f, "parse error: {msg}"),
            CatalogError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Fetches one page of movies. A blank query lists popular movies.
    /// An empty result means there are no more pages.
    async fn fetch_movies(&self, query: MovieQuery<'_>) -> Result<Vec<Movie>, CatalogError>;

    /// Fetches the full record for a single movie.
    async fn fetch_movie_details(&self, id: MovieId) -> Result<MovieDetails, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(CatalogError::Network("timeout".into()).is_retryable());
        assert!(CatalogError::Api { status: 503, message: String::new() }.is_retryable());
        assert!(CatalogError::Api { status: 429, message: String::new() }.is_retryable());
        assert!(!CatalogError::Api { status: 401, message: String::new() }.is_retryable());
        assert!(!CatalogError::Parse("bad json".into()).is_retryable());
        assert!(!CatalogError::Config("no key".into()).is_retryable());
    }

    #[test]
    fn test_display_messages() {
        let err = CatalogError::Api { status: 404, message: "not found".into() };
        assert_eq!(err.to_string(), "API error (HTTP 404): not found");
        assert_eq!(
            CatalogError::InvalidRequest("page must be >= 1".into()).to_string(),
            "invalid request: page must be >= 1"
        );
    }
}
