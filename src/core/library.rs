//! # Movie Library
//!
//! The two local collections, `saved` and `watched`, persisted through a
//! [`KeyValueStore`]. Each collection is one JSON array under a fixed key,
//! newest entry first.
//!
//! ```text
//!              move_to(saved)              move_to(watched)
//!   absent ───────────────────► in_saved ◄──────────────────► in_watched
//!     ▲                            │        (either direction)     │
//!     └───── remove(saved) ────────┘                               │
//!     └───────────────────────────── remove(watched) ──────────────┘
//! ```
//!
//! A movie id is in at most one collection. [`MovieLibrary::move_to`] is the
//! only place that enforces it: insert into the target, then drop the id from
//! the other collection, but only when the insert changed and persisted state.
//!
//! Persistence failures never reach the caller. Unreadable collections read as
//! empty, failed writes are logged and the previous value stays on disk.
//! Every operation is read-modify-write without locking, so two mutations of
//! the same collection issued concurrently can lose one of them. Callers
//! serialize user-triggered mutations.

use std::fmt;
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::catalog::{Movie, MovieId};
use crate::core::storage::{KeyValueStore, StorageError};

/// Page size for [`MovieLibrary::page`].
pub const PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Saved,
    Watched,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Saved, Collection::Watched];

    /// Storage key holding this collection.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Saved => "saved_movies",
            Collection::Watched => "watched_movies",
        }
    }

    /// The collection this one excludes.
    pub fn other(self) -> Collection {
        match self {
            Collection::Saved => Collection::Watched,
            Collection::Watched => Collection::Saved,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Saved => write!(f, "saved"),
            Collection::Watched => write!(f, "watched"),
        }
    }
}

/// Result of reading a collection, keeping "never stored" apart from "unreadable".
#[derive(Debug)]
pub enum Snapshot {
    Stored(Vec<Movie>),
    Empty,
    Unreadable(StorageError),
}

impl Snapshot {
    /// Collapses to the caller-facing view: anything but `Stored` is empty.
    pub fn into_movies(self) -> Vec<Movie> {
        match self {
            Snapshot::Stored(movies) => movies,
            Snapshot::Empty | Snapshot::Unreadable(_) => Vec::new(),
        }
    }
}

/// What [`MovieLibrary::move_to`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Prepended to the target and removed from the other collection.
    Inserted,
    /// Already in the target; nothing changed.
    AlreadyPresent,
    /// The target could not be written; nothing changed.
    WriteFailed,
}

#[derive(Clone)]
pub struct MovieLibrary {
    store: Arc<dyn KeyValueStore>,
}

impl MovieLibrary {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads a collection without collapsing failures.
    pub async fn read(&self, collection: Collection) -> Snapshot {
        match self.store.get(collection.key()).await {
            Ok(None) => Snapshot::Empty,
            Ok(Some(json)) => match serde_json::from_str::<Vec<Movie>>(&json) {
                Ok(movies) => Snapshot::Stored(movies),
                Err(e) => Snapshot::Unreadable(StorageError::Parse(e)),
            },
            Err(e) => Snapshot::Unreadable(e),
        }
    }

    /// Current contents of a collection, newest first. Empty on any failure.
    pub async fn get(&self, collection: Collection) -> Vec<Movie> {
        let snapshot = self.read(collection).await;
        if let Snapshot::Unreadable(e) = &snapshot {
            warn!("Error reading {} movies, treating as empty: {}", collection, e);
        }
        snapshot.into_movies()
    }

    async fn write(&self, collection: Collection, movies: &[Movie]) -> Result<(), StorageError> {
        let json = serde_json::to_string(movies)?;
        self.store.set(collection.key(), json).await
    }

    /// Puts `movie` at the front of `target` and takes it out of the other collection.
    ///
    /// No-op if `target` already holds the id. If writing `target` fails, the
    /// other collection is left alone.
    pub async fn move_to(&self, movie: &Movie, target: Collection) -> MoveOutcome {
        let current = self.get(target).await;
        if current.iter().any(|m| m.id == movie.id) {
            debug!("Movie {} already in {}", movie.id, target);
            return MoveOutcome::AlreadyPresent;
        }

        let mut updated = Vec::with_capacity(current.len() + 1);
        updated.push(movie.clone());
        updated.extend(current);

        if let Err(e) = self.write(target, &updated).await {
            error!("Error adding movie {} to {}: {}", movie.id, target, e);
            return MoveOutcome::WriteFailed;
        }
        info!("Added movie {} ({:?}) to {}", movie.id, movie.title, target);

        // A failed removal here leaves the movie in both collections until the next move.
        self.remove(target.other(), movie.id).await;
        MoveOutcome::Inserted
    }

    /// Drops `id` from `collection`. Always rewrites the collection, so it is
    /// safe to call for ids that are not there.
    pub async fn remove(&self, collection: Collection, id: MovieId) {
        let updated: Vec<Movie> = self
            .get(collection)
            .await
            .into_iter()
            .filter(|m| m.id != id)
            .collect();

        match self.write(collection, &updated).await {
            Ok(()) => debug!("Removed movie {} from {}", id, collection),
            Err(e) => error!("Error removing movie {} from {}: {}", id, collection, e),
        }
    }

    pub async fn contains(&self, collection: Collection, id: MovieId) -> bool {
        self.get(collection).await.iter().any(|m| m.id == id)
    }

    /// Which collection holds `id`, if any.
    pub async fn membership(&self, id: MovieId) -> Option<Collection> {
        for collection in Collection::ALL {
            if self.contains(collection, id).await {
                return Some(collection);
            }
        }
        None
    }

    /// Removes `movie` from `collection` if present, otherwise moves it there.
    /// Returns whether the movie is in `collection` afterwards.
    pub async fn toggle(&self, collection: Collection, movie: &Movie) -> bool {
        if self.contains(collection, movie.id).await {
            self.remove(collection, movie.id).await;
        } else {
            self.move_to(movie, collection).await;
        }
        self.contains(collection, movie.id).await
    }

    /// 1-indexed page of [`PAGE_SIZE`] movies. Page 0 or past the end is empty.
    pub async fn page(&self, collection: Collection, page: usize) -> Vec<Movie> {
        if page == 0 {
            return Vec::new();
        }
        self.get(collection)
            .await
            .into_iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Named operations per collection
    // ------------------------------------------------------------------------

    pub async fn get_saved(&self) -> Vec<Movie> {
        self.get(Collection::Saved).await
    }

    pub async fn get_watched(&self) -> Vec<Movie> {
        self.get(Collection::Watched).await
    }

    pub async fn add_to_saved(&self, movie: &Movie) -> MoveOutcome {
        self.move_to(movie, Collection::Saved).await
    }

    pub async fn add_to_watched(&self, movie: &Movie) -> MoveOutcome {
        self.move_to(movie, Collection::Watched).await
    }

    pub async fn remove_from_saved(&self, id: MovieId) {
        self.remove(Collection::Saved, id).await
    }

    pub async fn remove_from_watched(&self, id: MovieId) {
        self.remove(Collection::Watched, id).await
    }

    pub async fn is_in_saved(&self, id: MovieId) -> bool {
        self.contains(Collection::Saved, id).await
    }

    pub async fn is_in_watched(&self, id: MovieId) -> bool {
        self.contains(Collection::Watched, id).await
    }
}
