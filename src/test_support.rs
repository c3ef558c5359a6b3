//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::catalog::{
    CatalogError, CatalogProvider, Genre, Movie, MovieDetails, MovieId, MovieQuery,
};
use crate::core::library::MovieLibrary;
use crate::core::state::App;
use crate::core::storage::{KeyValueStore, MemoryStore, StorageError};

/// A minimal movie with a predictable title.
pub fn movie(id: MovieId) -> Movie {
    Movie {
        id,
        title: format!("Movie {id}"),
        poster_path: Some(format!("/poster-{id}.jpg")),
        backdrop_path: None,
        overview: format!("Overview of movie {id}."),
        release_date: "2020-01-01".to_string(),
        vote_average: 7.0,
        vote_count: 100,
        popularity: 10.0,
        original_language: "en".to_string(),
        original_title: format!("Movie {id}"),
        genre_ids: vec![18],
        adult: false,
        video: false,
    }
}

pub fn details(id: MovieId) -> MovieDetails {
    MovieDetails {
        id,
        title: format!("Movie {id}"),
        poster_path: Some(format!("/poster-{id}.jpg")),
        backdrop_path: None,
        overview: Some(format!("Overview of movie {id}.")),
        release_date: "2020-01-01".to_string(),
        vote_average: 7.4,
        vote_count: 100,
        popularity: 10.0,
        original_language: "en".to_string(),
        original_title: format!("Movie {id}"),
        adult: false,
        video: false,
        runtime: Some(120),
        budget: 25_000_000,
        revenue: 90_400_000,
        genres: vec![Genre { id: 18, name: "Drama".to_string() }],
        production_companies: Vec::new(),
        tagline: None,
        status: "Released".to_string(),
        homepage: None,
        imdb_id: None,
    }
}

/// Memory-backed store that records write order and can be told to fail.
#[derive(Default)]
pub struct TestStore {
    inner: MemoryStore,
    failing_reads: Mutex<HashSet<String>>,
    failing_writes: Mutex<HashSet<String>>,
    writes: Mutex<Vec<String>>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads_for(&self, key: &str) {
        self.failing_reads.lock().unwrap().insert(key.to_string());
    }

    pub fn fail_writes_for(&self, key: &str) {
        self.failing_writes.lock().unwrap().insert(key.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing_reads.lock().unwrap().clear();
        self.failing_writes.lock().unwrap().clear();
    }

    /// Keys of successful writes, in order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }
}

#[async_trait]
impl KeyValueStore for TestStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.failing_reads.lock().unwrap().contains(key) {
            return Err(StorageError::Io(io::Error::other("read failed")));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.failing_writes.lock().unwrap().contains(key) {
            return Err(StorageError::Io(io::Error::other("disk full")));
        }
        self.inner.set(key, value).await?;
        self.writes.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

/// Catalog serving fixed pages and details from memory.
#[derive(Default)]
pub struct StubCatalog {
    /// Pages keyed by (trimmed query, page number). Missing pages are empty.
    pub pages: HashMap<(String, u32), Vec<Movie>>,
    pub details: HashMap<MovieId, MovieDetails>,
    /// When set, every call fails with this HTTP status.
    pub fail_with: Option<u16>,
    pub calls: Mutex<Vec<(String, u32)>>,
}

impl StubCatalog {
    pub fn with_page(mut self, query: &str, page: u32, movies: Vec<Movie>) -> Self {
        self.pages.insert((query.to_string(), page), movies);
        self
    }

    pub fn with_details(mut self, details: MovieDetails) -> Self {
        self.details.insert(details.id, details);
        self
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), CatalogError> {
        match self.fail_with {
            Some(status) => Err(CatalogError::Api {
                status,
                message: "stub failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogProvider for StubCatalog {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_movies(&self, query: MovieQuery<'_>) -> Result<Vec<Movie>, CatalogError> {
        let key = (query.query.trim().to_string(), query.page);
        self.calls.lock().unwrap().push(key.clone());
        self.check_failure()?;
        Ok(self.pages.get(&key).cloned().unwrap_or_default())
    }

    async fn fetch_movie_details(&self, id: MovieId) -> Result<MovieDetails, CatalogError> {
        self.check_failure()?;
        self.details.get(&id).cloned().ok_or(CatalogError::Api {
            status: 404,
            message: "The resource you requested could not be found.".to_string(),
        })
    }
}

/// Creates a test App over the given catalog and an in-memory library.
pub fn test_app(catalog: StubCatalog) -> App {
    App::new(
        Arc::new(catalog),
        MovieLibrary::new(Arc::new(MemoryStore::new())),
        "https://image.test/w500".to_string(),
    )
}
