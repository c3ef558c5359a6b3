pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{CatalogError, CatalogProvider};
pub use providers::TmdbProvider;
pub use types::{Genre, Movie, MovieDetails, MovieId, MovieQuery, ProductionCompany};
