//! Plain-text rendering for listings and the details view.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::catalog::{Movie, MovieDetails};
use crate::core::Collection;
use crate::core::state::MovieDetailsView;

const TITLE_WIDTH: usize = 40;
const WRAP_WIDTH: usize = 72;
const NOT_AVAILABLE: &str = "N/A";

/// Pads or truncates `text` to exactly `width` display columns.
pub fn fit_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        let padding = width - text.width();
        return format!("{text}{}", " ".repeat(padding));
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        // Leave one column for the ellipsis.
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

fn year_or_na(year: Option<i32>) -> String {
    match year {
        Some(y) => y.to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Vote average rounded to the nearest whole point, as shown on the rating badge.
pub fn rating(vote_average: f64) -> String {
    format!("{}/10", vote_average.round() as i64)
}

/// `25000000` → `"$25 million"`, `2500000` → `"$2.5 million"`.
pub fn budget_millions(amount: u64) -> String {
    let millions = amount as f64 / 1_000_000.0;
    let text = format!("{millions:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("${text} million")
}

/// Revenue rounds to whole millions.
pub fn revenue_millions(amount: u64) -> String {
    format!("${} million", (amount as f64 / 1_000_000.0).round() as u64)
}

/// Joins names with ` • `, or `N/A` when there are none.
pub fn joined<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.filter(|n| !n.trim().is_empty()).collect();
    if names.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        names.join(" • ")
    }
}

/// One listing line: id, title, year, rating.
pub fn movie_row(movie: &Movie) -> String {
    format!(
        "{:>8}  {}  {:>4}  {}",
        movie.id,
        fit_to_width(&movie.title, TITLE_WIDTH),
        year_or_na(movie.release_year()),
        rating(movie.vote_average)
    )
}

pub fn movie_list(movies: &[&Movie]) -> String {
    movies
        .iter()
        .map(|m| movie_row(m))
        .collect::<Vec<_>>()
        .join("\n")
}

fn membership_line(membership: Option<Collection>) -> &'static str {
    match membership {
        Some(Collection::Saved) => "In your saved list",
        Some(Collection::Watched) => "Marked as watched",
        None => "Not in your library",
    }
}

fn field(label: &str, value: &str) -> String {
    format!("{label}\n  {value}\n")
}

/// The details screen as text.
pub fn details_view(view: &MovieDetailsView, image_base: &str) -> String {
    let d: &MovieDetails = &view.details;
    let mut out = String::new();

    out.push_str(&format!("{}\n", or_na(&d.title)));
    let runtime = d
        .runtime
        .map(|r| format!("{r}m"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    out.push_str(&format!("{} • {}\n", year_or_na(d.release_year()), runtime));
    out.push_str(&format!(
        "★ {} ({} votes)\n",
        rating(d.vote_average),
        d.vote_count
    ));
    out.push_str(&format!("[{}]\n\n", membership_line(view.membership)));

    let overview = d.overview.as_deref().unwrap_or_default();
    let wrapped = if overview.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        let options = textwrap::Options::new(WRAP_WIDTH)
            .initial_indent("  ")
            .subsequent_indent("  ");
        textwrap::fill(overview, options).trim_start().to_string()
    };
    out.push_str(&field("Overview", &wrapped));
    out.push_str(&field(
        "Genres",
        &joined(d.genres.iter().map(|g| g.name.as_str())),
    ));
    out.push_str(&field("Budget", &budget_millions(d.budget)));
    out.push_str(&field("Revenue", &revenue_millions(d.revenue)));
    out.push_str(&field(
        "Production Companies",
        &joined(d.production_companies.iter().map(|c| c.name.as_str())),
    ));
    if let Some(url) = d.poster_url(image_base) {
        out.push_str(&field("Poster", &url));
    }
    out
}
