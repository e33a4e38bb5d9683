// ============================================================================
// Kinopoisk Unofficial API Types
// ============================================================================

use serde::Deserialize;

use super::{FilmDetail, FilmId, FilmSummary, MediaType};

const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenre {
    pub genre: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCountry {
    pub country: String,
}

/// API response from GET /api/v2.2/films/{id}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilmDetails {
    pub kinopoisk_id: u64,
    #[serde(default)]
    pub name_ru: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_original: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub poster_url_preview: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub film_length: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub rating_kinopoisk: Option<f64>,
    #[serde(default)]
    pub rating_imdb: Option<f64>,
    #[serde(default)]
    pub genres: Vec<ApiGenre>,
    #[serde(default)]
    pub countries: Vec<ApiCountry>,
    #[serde(rename = "type", default)]
    pub film_type: Option<String>,
}

impl From<ApiFilmDetails> for FilmDetail {
    fn from(api: ApiFilmDetails) -> Self {
        FilmDetail {
            id: FilmId(api.kinopoisk_id),
            name: display_name(api.name_ru, api.name_en, api.name_original),
            poster_url: api.poster_url,
            poster_preview_url: api.poster_url_preview,
            year: api.year,
            duration_minutes: api.film_length,
            description: api.description.or(api.short_description),
            rating_kinopoisk: api.rating_kinopoisk,
            rating_imdb: api.rating_imdb,
            genres: api.genres.into_iter().map(|g| g.genre).collect(),
            countries: api.countries.into_iter().map(|c| c.country).collect(),
            media_type: MediaType::from_catalog(api.film_type.as_deref()),
        }
    }
}

/// Entry of a collection or premieres listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCollectionItem {
    pub kinopoisk_id: u64,
    #[serde(default)]
    pub name_ru: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub name_original: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub poster_url_preview: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Only present on premieres
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub rating_kinopoisk: Option<f64>,
    #[serde(default)]
    pub genres: Vec<ApiGenre>,
    #[serde(rename = "type", default)]
    pub film_type: Option<String>,
}

impl From<ApiCollectionItem> for FilmSummary {
    fn from(item: ApiCollectionItem) -> Self {
        FilmSummary {
            id: FilmId(item.kinopoisk_id),
            name: display_name(item.name_ru, item.name_en, item.name_original),
            year: item.year,
            duration_minutes: item.duration,
            poster_url: item.poster_url,
            poster_preview_url: item.poster_url_preview,
            genres: item.genres.into_iter().map(|g| g.genre).collect(),
            media_type: MediaType::from_catalog(item.film_type.as_deref()),
            rating: item.rating_kinopoisk,
        }
    }
}

/// API response from GET /api/v2.2/films/collections
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCollectionResponse {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub total_pages: u32,
    pub items: Vec<ApiCollectionItem>,
}

/// API response from GET /api/v2.2/films/premieres
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPremieresResponse {
    pub items: Vec<ApiCollectionItem>,
}

/// Film returned by the v2.1 keyword search, which encodes numbers as strings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeywordFilm {
    pub film_id: u64,
    #[serde(default)]
    pub name_ru: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(rename = "type", default)]
    pub film_type: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub film_length: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub genres: Vec<ApiGenre>,
    #[serde(default)]
    pub countries: Vec<ApiCountry>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub poster_url_preview: Option<String>,
}

impl From<ApiKeywordFilm> for FilmSummary {
    fn from(film: ApiKeywordFilm) -> Self {
        FilmSummary {
            id: FilmId(film.film_id),
            name: display_name(film.name_ru, film.name_en, None),
            year: film.year.as_deref().and_then(parse_year),
            duration_minutes: film.film_length.as_deref().and_then(parse_duration),
            poster_url: film.poster_url,
            poster_preview_url: film.poster_url_preview,
            genres: film.genres.into_iter().map(|g| g.genre).collect(),
            media_type: MediaType::from_catalog(film.film_type.as_deref()),
            rating: film.rating.as_deref().and_then(parse_rating),
        }
    }
}

/// API response from GET /api/v2.1/films/search-by-keyword
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeywordSearchResponse {
    pub keyword: String,
    #[serde(default)]
    pub pages_count: u32,
    #[serde(default)]
    pub films: Vec<ApiKeywordFilm>,
}

fn display_name(ru: Option<String>, en: Option<String>, original: Option<String>) -> String {
    [ru, en, original]
        .into_iter()
        .flatten()
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Parses `"2010"`; ranges like `"2019-2023"` keep the start year
pub fn parse_year(raw: &str) -> Option<i32> {
    raw.split('-').next()?.trim().parse().ok()
}

/// Parses the keyword search `"H:MM"` length into minutes
///
/// Anything but exactly two segments, minutes past 59, or a total that does
/// not fit `u32` is treated as unknown.
pub fn parse_duration(raw: &str) -> Option<u32> {
    let (hours, minutes) = raw.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Ratings arrive as `"7.9"`, `"null"` or a percentage for unreleased titles
pub fn parse_rating(raw: &str) -> Option<f64> {
    if raw.ends_with('%') {
        return None;
    }
    raw.trim().parse().ok()
}
