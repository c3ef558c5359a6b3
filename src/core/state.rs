//! # Application State
//!
//! Everything a front end needs, in one place:
//!
//! ```text
//! App
//! ├── catalog: Arc<dyn CatalogProvider>  // remote listings + details
//! ├── library: MovieLibrary              // saved / watched collections
//! └── image_base_url: String             // prefix for poster paths
//! ```
//!
//! Catalog errors pass straight through to the caller. Library operations
//! never fail from the caller's point of view.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::catalog::{
    CatalogError, CatalogProvider, Movie, MovieDetails, MovieId, MovieQuery, TmdbProvider,
};
use crate::core::config::ResolvedConfig;
use crate::core::feed::Feed;
use crate::core::library::{Collection, MoveOutcome, MovieLibrary};
use crate::core::storage::{FileStore, KeyValueStore, MemoryStore};

/// Details plus where the movie currently sits locally.
#[derive(Debug, Clone)]
pub struct MovieDetailsView {
    pub details: MovieDetails,
    pub membership: Option<Collection>,
}

pub struct App {
    pub catalog: Arc<dyn CatalogProvider>,
    pub library: MovieLibrary,
    pub image_base_url: String,
}

impl App {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        library: MovieLibrary,
        image_base_url: String,
    ) -> Self {
        Self {
            catalog,
            library,
            image_base_url,
        }
    }

    /// Builds the app from resolved config. `ephemeral` keeps the library in memory.
    ///
    /// A missing API key is not an error here: library-only commands still
    /// work, and catalog calls fail with `CatalogError::Config`.
    pub fn from_config(config: &ResolvedConfig, ephemeral: bool) -> Self {
        let catalog: Arc<dyn CatalogProvider> = match &config.tmdb_api_key {
            Some(key) => Arc::new(
                TmdbProvider::new(key.clone(), Some(config.tmdb_base_url.clone()))
                    .with_language(config.language.clone()),
            ),
            None => Arc::new(UnconfiguredCatalog),
        };

        let store: Arc<dyn KeyValueStore> = if ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(FileStore::new(config.library_dir()))
        };

        info!(
            "App ready: catalog={}, library={}",
            catalog.name(),
            if ephemeral {
                "memory".to_string()
            } else {
                config.library_dir().display().to_string()
            }
        );

        Self::new(catalog, MovieLibrary::new(store), config.image_base_url.clone())
    }

    /// Loads the first `pages` pages of a listing. A blank query means popular.
    pub async fn feed(&self, query: &str, pages: u32) -> Result<Feed, CatalogError> {
        let mut feed = if query.trim().is_empty() {
            Feed::popular()
        } else {
            Feed::search(query)
        };
        for _ in 0..pages {
            if !feed.has_next_page() {
                break;
            }
            feed.load_more(self.catalog.as_ref()).await?;
        }
        Ok(feed)
    }

    pub async fn details(&self, id: MovieId) -> Result<MovieDetailsView, CatalogError> {
        let details = self.catalog.fetch_movie_details(id).await?;
        let membership = self.library.membership(id).await;
        Ok(MovieDetailsView {
            details,
            membership,
        })
    }

    /// Adds a movie to `collection`, fetching its record from the catalog.
    /// Movies already in `collection` are not fetched again.
    pub async fn add(
        &self,
        collection: Collection,
        id: MovieId,
    ) -> Result<MoveOutcome, CatalogError> {
        if self.library.contains(collection, id).await {
            return Ok(MoveOutcome::AlreadyPresent);
        }
        let movie = self.catalog.fetch_movie_details(id).await?.to_movie();
        Ok(self.library.move_to(&movie, collection).await)
    }

    pub async fn remove(&self, collection: Collection, id: MovieId) {
        self.library.remove(collection, id).await
    }

    /// Flips membership of `id` in `collection`. Removal needs no catalog call.
    /// Returns whether the movie is in `collection` afterwards.
    pub async fn toggle(&self, collection: Collection, id: MovieId) -> Result<bool, CatalogError> {
        if self.library.contains(collection, id).await {
            self.library.remove(collection, id).await;
            return Ok(self.library.contains(collection, id).await);
        }
        let movie = self.catalog.fetch_movie_details(id).await?.to_movie();
        Ok(self.library.toggle(collection, &movie).await)
    }

    pub async fn toggle_saved(&self, id: MovieId) -> Result<bool, CatalogError> {
        self.toggle(Collection::Saved, id).await
    }

    pub async fn toggle_watched(&self, id: MovieId) -> Result<bool, CatalogError> {
        self.toggle(Collection::Watched, id).await
    }
}

/// Stands in for the catalog when no API key is configured.
struct UnconfiguredCatalog;

const MISSING_KEY: &str = "TMDB API key not set (use TMDB_API_KEY or [tmdb] api_key)";

#[async_trait]
impl CatalogProvider for UnconfiguredCatalog {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn fetch_movies(&self, _query: MovieQuery<'_>) -> Result<Vec<Movie>, CatalogError> {
        Err(CatalogError::Config(MISSING_KEY.to_string()))
    }

    async fn fetch_movie_details(&self, _id: MovieId) -> Result<MovieDetails, CatalogError> {
        Err(CatalogError::Config(MISSING_KEY.to_string()))
    }
}
