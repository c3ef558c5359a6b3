use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Catalog identifier of a movie (TMDB id).
pub type MovieId = u64;

/// TMDB sends `null` for blank fields on sparse entries; read those as the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A single movie as it appears in catalog listings and in the local collections.
///
/// Field names follow TMDB's snake_case JSON so listings can be stored as-is.
/// Everything except `id` is optional on the wire and falls back to a default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: bool,
}

impl Movie {
    /// Year component of `release_date`, if it is a valid `YYYY-MM-DD` date.
    pub fn release_year(&self) -> Option<i32> {
        release_year(&self.release_date)
    }

    /// Full poster URL under the given image base, or `None` if the movie has no poster.
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        image_url(image_base, self.poster_path.as_deref())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin_country: String,
}

/// Full record returned by the details endpoint. A superset of [`Movie`],
/// except genres come back with names instead of bare ids.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub id: MovieId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: bool,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl MovieDetails {
    /// Collapses the details into the record stored in the local collections.
    pub fn to_movie(&self) -> Movie {
        Movie {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
            overview: self.overview.clone().unwrap_or_default(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            original_language: self.original_language.clone(),
            original_title: self.original_title.clone(),
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
            adult: self.adult,
            video: self.video,
        }
    }

    pub fn release_year(&self) -> Option<i32> {
        release_year(&self.release_date)
    }

    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        image_url(image_base, self.poster_path.as_deref())
    }
}

/// Parameters for a listing request. A blank `query` means "popular".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieQuery<'a> {
    pub query: &'a str,
    /// 1-indexed page number.
    pub page: u32,
}

impl<'a> MovieQuery<'a> {
    pub fn popular(page: u32) -> Self {
        Self { query: "", page }
    }

    pub fn search(query: &'a str, page: u32) -> Self {
        Self { query, page }
    }

    /// True when the query is blank and the popular listing should be used.
    pub fn is_popular(&self) -> bool {
        self.query.trim().is_empty()
    }
}

fn release_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

fn image_url(image_base: &str, path: Option<&str>) -> Option<String> {
    match path {
        Some(p) if !p.is_empty() => Some(format!("{}{}", image_base.trim_end_matches('/'), p)),
        _ => None,
    }
}
