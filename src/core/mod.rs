//! # Core Application Logic
//!
//! This module contains reel's business logic.
//! It knows nothing about any specific front end.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (wiring)         │
//!                    │  • MovieLibrary         │
//!                    │  • Feed (paging)        │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    CLI     │      │  Catalog   │      │  Storage   │
//!     │  (clap)    │      │  (TMDB)    │      │ (files/mem)│
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`library`]: the saved / watched collections and their exclusion rule
//! - [`storage`]: the key-value port the library persists through
//! - [`feed`]: infinite-scroll paging over catalog listings
//! - [`state`]: the `App` struct tying catalog, library, and config together
//! - [`config`]: layered configuration

pub mod config;
pub mod feed;
pub mod library;
pub mod state;
pub mod storage;

pub use feed::Feed;
pub use library::{Collection, MoveOutcome, MovieLibrary, Snapshot};
pub use state::App;
