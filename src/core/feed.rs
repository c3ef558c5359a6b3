//! # Feed
//!
//! Page-by-page accumulation of a catalog listing (infinite scroll).
//!
//! The next page is `pages.len() + 1` as long as the last page came back
//! non-empty; the first empty page ends the feed. A search feed with a blank
//! query is disabled and never fetches.

use log::debug;

use crate::catalog::{CatalogError, CatalogProvider, Movie, MovieQuery};

/// How many movies the trending strip shows.
pub const DEFAULT_TRENDING_COUNT: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    query: String,
    enabled: bool,
    pages: Vec<Vec<Movie>>,
}

impl Feed {
    /// The popular listing.
    pub fn popular() -> Self {
        Self {
            query: String::new(),
            enabled: true,
            pages: Vec::new(),
        }
    }

    /// A search listing. Disabled while the query is blank.
    pub fn search(query: &str) -> Self {
        let query = query.trim().to_string();
        Self {
            enabled: !query.is_empty(),
            query,
            pages: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of pages fetched so far, including a trailing empty one.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The page `load_more` would fetch, or `None` when the feed is done.
    pub fn next_page(&self) -> Option<u32> {
        if !self.enabled {
            return None;
        }
        match self.pages.last() {
            None => Some(1),
            Some(last) if last.is_empty() => None,
            Some(_) => u32::try_from(self.pages.len() + 1).ok(),
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page().is_some()
    }

    /// Fetches the next page and appends it. Returns how many movies it added
    /// (0 when the feed is done or disabled). On error the feed is unchanged.
    pub async fn load_more(
        &mut self,
        catalog: &dyn CatalogProvider,
    ) -> Result<usize, CatalogError> {
        let Some(page) = self.next_page() else {
            return Ok(0);
        };

        let movies = catalog
            .fetch_movies(MovieQuery::search(&self.query, page))
            .await?;
        let added = movies.len();
        debug!(
            "Feed {:?} page {} from {}: {} movies",
            self.query,
            page,
            catalog.name(),
            added
        );
        self.pages.push(movies);
        Ok(added)
    }

    /// All fetched movies, in page order.
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.pages.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first `count` movies, shown as the trending strip.
    pub fn trending(&self, count: usize) -> Vec<&Movie> {
        self.movies().take(count).collect()
    }
}
