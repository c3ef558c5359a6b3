//! TMDB catalog provider (API v3, bearer-token auth).
//!
//! Endpoints used:
//! - `/discover/movie?sort_by=popularity.desc` for the popular listing
//! - `/search/movie?query=...` for text search
//! - `/movie/{id}` for details
//!
//! Listings come back wrapped in a page envelope; only `results` is surfaced.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::catalog::{CatalogError, CatalogProvider, Movie, MovieDetails, MovieId, MovieQuery};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

// ============================================================================
// TMDB Response Types
// ============================================================================

/// Page envelope around listing results.
#[derive(Deserialize, Debug)]
struct MoviePage {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    results: Vec<Movie>,
    #[serde(default)]
    total_pages: u32,
}

/// Error body TMDB sends alongside non-2xx statuses.
#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    status_message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct TmdbProvider {
    api_key: String,
    base_url: String,
    language: Option<String>,
    client: reqwest::Client,
}

impl TmdbProvider {
    /// Creates a new TMDB provider.
    ///
    /// # Arguments
    /// * `api_key` - TMDB API read access token (sent as a bearer token)
    /// * `base_url` - Optional custom base URL (defaults to TMDB's v3 API)
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            api_key,
            base_url,
            language: None,
            client: reqwest::Client::new(),
        }
    }

    /// Sets the `language` parameter sent with every request (e.g. `en-US`).
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.trim().is_empty());
        self
    }

    /// Resolves a listing query to its endpoint and query parameters.
    fn listing_request(&self, query: &MovieQuery<'_>) -> (String, Vec<(&'static str, String)>) {
        let page = query.page.to_string();
        let mut params = if query.is_popular() {
            vec![("sort_by", "popularity.desc".to_string()), ("page", page)]
        } else {
            vec![("query", query.query.trim().to_string()), ("page", page)]
        };
        if let Some(lang) = &self.language {
            params.push(("language", lang.clone()));
        }

        let endpoint = if query.is_popular() {
            "discover/movie"
        } else {
            "search/movie"
        };
        (format!("{}/{}", self.base_url, endpoint), params)
    }

    fn details_request(&self, id: MovieId) -> (String, Vec<(&'static str, String)>) {
        let params = self
            .language
            .iter()
            .map(|lang| ("language", lang.clone()))
            .collect();
        (format!("{}/movie/{}", self.base_url, id), params)
    }

    /// Sends a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, CatalogError> {
        debug!("TMDB request: GET {} {:?}", url, params);

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        debug!("TMDB response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("TMDB API error: {} - {}", status, err_body);
            let message = serde_json::from_str::<ApiErrorBody>(&err_body)
                .map(|b| b.status_message)
                .unwrap_or(err_body);
            return Err(CatalogError::Api { status, message });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogProvider for TmdbProvider {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn fetch_movies(&self, query: MovieQuery<'_>) -> Result<Vec<Movie>, CatalogError> {
        if query.page == 0 {
            return Err(CatalogError::InvalidRequest(
                "pages are numbered from 1".to_string(),
            ));
        }

        let (url, params) = self.listing_request(&query);
        let page: MoviePage = self.get_json(&url, &params).await?;

        info!(
            "TMDB listing: query={:?}, page={}/{}, results={}",
            query.query,
            page.page,
            page.total_pages,
            page.results.len()
        );
        Ok(page.results)
    }

    async fn fetch_movie_details(&self, id: MovieId) -> Result<MovieDetails, CatalogError> {
        let (url, params) = self.details_request(id);
        let details: MovieDetails = self.get_json(&url, &params).await?;
        info!("TMDB details: id={}, title={:?}", details.id, details.title);
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> TmdbProvider {
        TmdbProvider::new("token".to_string(), Some("http://tmdb.test/3/".to_string()))
    }

    #[test]
    fn test_blank_query_uses_discover_endpoint() {
        let (url, params) = provider().listing_request(&MovieQuery::search("  ", 3));
        assert_eq!(url, "http://tmdb.test/3/discover/movie");
        assert!(params.contains(&("sort_by", "popularity.desc".to_string())));
        assert!(params.contains(&("page", "3".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "query"));
    }

    #[test]
    fn test_search_query_is_trimmed() {
        let (url, params) = provider().listing_request(&MovieQuery::search(" blade runner ", 1));
        assert_eq!(url, "http://tmdb.test/3/search/movie");
        assert!(params.contains(&("query", "blade runner".to_string())));
    }

    #[test]
    fn test_language_is_appended_when_set() {
        let p = provider().with_language(Some("de-DE".to_string()));
        let (_, params) = p.listing_request(&MovieQuery::popular(1));
        assert!(params.contains(&("language", "de-DE".to_string())));

        let (url, params) = p.details_request(42);
        assert_eq!(url, "http://tmdb.test/3/movie/42");
        assert_eq!(params, vec![("language", "de-DE".to_string())]);
    }

    #[test]
    fn test_blank_language_is_ignored() {
        let p = provider().with_language(Some("  ".to_string()));
        let (_, params) = p.details_request(1);
        assert!(params.is_empty());
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected_without_a_request() {
        let result = provider().fetch_movies(MovieQuery::popular(0)).await;
        assert!(matches!(result, Err(CatalogError::InvalidRequest(_))));
    }

    #[test]
    fn test_movie_page_deserialization() {
        let json = r#"{
            "page": 2,
            "results": [{"id": 1, "title": "A"}],
            "total_pages": 9,
            "total_results": 170
        }"#;
        let page: MoviePage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 9);
        assert_eq!(page.results.len(), 1);
    }
}
