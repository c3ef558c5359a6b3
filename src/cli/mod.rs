//! # CLI Adapter
//!
//! Subcommands standing in for the app's screens. Each one maps onto a
//! handful of `App` calls and writes plain text to the given writer.
//!
//! Catalog failures abort the command with a `CliError`. Library failures
//! never do; the library logs them and carries on.

pub mod render;

use std::fmt;
use std::io::{self, Write};

use clap::Subcommand;
use log::info;

use crate::catalog::{CatalogError, MovieId};
use crate::core::library::PAGE_SIZE;
use crate::core::{App, Collection, MoveOutcome};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Trending strip plus the latest popular movies
    Home {
        /// Number of listing pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Search the catalog by title
    Search {
        query: String,
        /// Number of result pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show details for a movie
    Show { id: MovieId },
    /// Add a movie to your saved list (moves it out of watched)
    Save {
        id: MovieId,
        /// Remove it instead if it is already saved
        #[arg(long)]
        toggle: bool,
    },
    /// Mark a movie as watched (moves it out of saved)
    Watch {
        id: MovieId,
        /// Unmark it instead if it is already watched
        #[arg(long)]
        toggle: bool,
    },
    /// Remove a movie from your saved list
    Unsave { id: MovieId },
    /// Remove a movie from your watched list
    Unwatch { id: MovieId },
    /// List saved movies, newest first
    Saved {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List watched movies, newest first
    Watched,
}

#[derive(Debug)]
pub enum CliError {
    Catalog(CatalogError),
    Io(io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Catalog(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "output error: {e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Runs one command against `app`, writing its output to `out`.
pub async fn run(
    command: Command,
    app: &App,
    trending_count: usize,
    out: &mut impl Write,
) -> Result<(), CliError> {
    info!("Running command: {:?}", command);

    match command {
        Command::Home { pages } => {
            let feed = app.feed("", pages.max(1)).await?;
            writeln!(out, "Trending Movies")?;
            writeln!(out, "{}", render::movie_list(&feed.trending(trending_count)))?;
            writeln!(out)?;
            writeln!(out, "Latest Movies")?;
            let all: Vec<_> = feed.movies().collect();
            writeln!(out, "{}", render::movie_list(&all))?;
            if let Some(next) = feed.next_page() {
                writeln!(out, "\n(more with --pages {next})")?;
            }
        }
        Command::Search { query, pages } => {
            if query.trim().is_empty() {
                writeln!(out, "Search for a movie to get started!")?;
                return Ok(());
            }
            let feed = app.feed(&query, pages.max(1)).await?;
            if feed.is_empty() {
                writeln!(out, "No movies found.")?;
                return Ok(());
            }
            writeln!(out, "Search results for {}", feed.query())?;
            let all: Vec<_> = feed.movies().collect();
            writeln!(out, "{}", render::movie_list(&all))?;
        }
        Command::Show { id } => {
            let view = app.details(id).await?;
            write!(out, "{}", render::details_view(&view, &app.image_base_url))?;
        }
        Command::Save { id, toggle } => {
            set_membership(app, Collection::Saved, id, toggle, out).await?;
        }
        Command::Watch { id, toggle } => {
            set_membership(app, Collection::Watched, id, toggle, out).await?;
        }
        Command::Unsave { id } => {
            app.remove(Collection::Saved, id).await;
            writeln!(out, "Movie {id} is not in your saved list")?;
        }
        Command::Unwatch { id } => {
            app.remove(Collection::Watched, id).await;
            writeln!(out, "Movie {id} is not in your watched list")?;
        }
        Command::Saved { page } => {
            let total = app.library.get_saved().await.len();
            if total == 0 {
                writeln!(out, "No saved movies yet.")?;
                return Ok(());
            }
            let pages = total.div_ceil(PAGE_SIZE);
            if !(1..=pages).contains(&page) {
                writeln!(out, "Page {page} does not exist; saved movies span pages 1-{pages}.")?;
                return Ok(());
            }
            let movies = app.library.page(Collection::Saved, page).await;
            writeln!(out, "Saved Movies (page {page} of {pages})")?;
            let refs: Vec<_> = movies.iter().collect();
            writeln!(out, "{}", render::movie_list(&refs))?;
        }
        Command::Watched => {
            let movies = app.library.get_watched().await;
            if movies.is_empty() {
                writeln!(out, "No watched movies yet.")?;
                return Ok(());
            }
            writeln!(out, "Watched Movies")?;
            let refs: Vec<_> = movies.iter().collect();
            writeln!(out, "{}", render::movie_list(&refs))?;
        }
    }
    Ok(())
}

async fn set_membership(
    app: &App,
    collection: Collection,
    id: MovieId,
    toggle: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if toggle {
        let present = app.toggle(collection, id).await?;
        if present {
            writeln!(out, "Movie {id} added to {collection}")?;
        } else {
            writeln!(out, "Movie {id} removed from {collection}")?;
        }
        return Ok(());
    }

    match app.add(collection, id).await? {
        MoveOutcome::Inserted => writeln!(out, "Movie {id} added to {collection}")?,
        MoveOutcome::AlreadyPresent => writeln!(out, "Movie {id} is already in {collection}")?,
        MoveOutcome::WriteFailed => {
            writeln!(out, "Could not update {collection}; see the log for details")?
        }
    }
    Ok(())
}
