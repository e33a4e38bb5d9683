use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub mod catalog_api;
pub mod user_library;

pub use catalog_api::{
    ApiCollectionItem, ApiCollectionResponse, ApiCountry, ApiFilmDetails, ApiGenre,
    ApiKeywordFilm, ApiKeywordSearchResponse, ApiPremieresResponse,
};
pub use user_library::{LastSearch, ListKind, ListMembership, UserProfile};

/// Catalog identifier of a film or show (Kinopoisk ID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilmId(pub u64);

impl Display for FilmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FilmId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Film,
    Video,
    TvSeries,
    MiniSeries,
    TvShow,
    Unknown,
}

impl MediaType {
    /// Maps the catalog's `type` field
    pub fn from_catalog(raw: Option<&str>) -> Self {
        match raw {
            Some("FILM") => MediaType::Film,
            Some("VIDEO") => MediaType::Video,
            Some("TV_SERIES") => MediaType::TvSeries,
            Some("MINI_SERIES") => MediaType::MiniSeries,
            Some("TV_SHOW") => MediaType::TvShow,
            _ => MediaType::Unknown,
        }
    }
}

/// Full detail record for one catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilmDetail {
    pub id: FilmId,
    pub name: String,
    pub poster_url: Option<String>,
    pub poster_preview_url: Option<String>,
    pub year: Option<i32>,
    pub duration_minutes: Option<u32>,
    pub description: Option<String>,
    pub rating_kinopoisk: Option<f64>,
    pub rating_imdb: Option<f64>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub media_type: MediaType,
}

/// Short record used in collections, premieres and search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilmSummary {
    pub id: FilmId,
    pub name: String,
    pub year: Option<i32>,
    pub duration_minutes: Option<u32>,
    pub poster_url: Option<String>,
    pub poster_preview_url: Option<String>,
    pub genres: Vec<String>,
    pub media_type: MediaType,
    pub rating: Option<f64>,
}

/// Curated catalog collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    TopAll,
    TopMovies,
    TopShows,
}

impl Collection {
    /// Value of the catalog's `type` query parameter
    pub fn catalog_type(&self) -> &'static str {
        match self {
            Collection::TopAll => "TOP_POPULAR_ALL",
            Collection::TopMovies => "TOP_POPULAR_MOVIES",
            Collection::TopShows => "TOP_250_TV_SHOWS",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Collection::TopAll => "top-all",
            Collection::TopMovies => "top-movies",
            Collection::TopShows => "top-shows",
        }
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-all" => Ok(Collection::TopAll),
            "top-movies" => Ok(Collection::TopMovies),
            "top-shows" => Ok(Collection::TopShows),
            other => Err(format!("Unknown collection '{}'", other)),
        }
    }
}

/// One page of a curated collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionPage {
    pub total: u32,
    pub total_pages: u32,
    pub items: Vec<FilmSummary>,
}

/// One page of keyword search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordSearchPage {
    pub keyword: String,
    pub pages_count: u32,
    pub films: Vec<FilmSummary>,
}

/// Home screen payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomeFeed {
    pub movies: Vec<FilmSummary>,
    pub shows: Vec<FilmSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_film_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&FilmId(301)).unwrap();
        assert_eq!(json, "301");

        let id: FilmId = serde_json::from_str("435").unwrap();
        assert_eq!(id, FilmId(435));
    }

    #[test]
    fn test_film_id_display() {
        assert_eq!(format!("{}", FilmId(6989814)), "6989814");
    }

    #[test]
    fn test_media_type_from_catalog() {
        assert_eq!(MediaType::from_catalog(Some("FILM")), MediaType::Film);
        assert_eq!(
            MediaType::from_catalog(Some("TV_SERIES")),
            MediaType::TvSeries
        );
        assert_eq!(
            MediaType::from_catalog(Some("MINI_SERIES")),
            MediaType::MiniSeries
        );
        assert_eq!(MediaType::from_catalog(Some("ANIME")), MediaType::Unknown);
        assert_eq!(MediaType::from_catalog(None), MediaType::Unknown);
    }

    #[test]
    fn test_collection_catalog_types() {
        assert_eq!(Collection::TopAll.catalog_type(), "TOP_POPULAR_ALL");
        assert_eq!(Collection::TopMovies.catalog_type(), "TOP_POPULAR_MOVIES");
        assert_eq!(Collection::TopShows.catalog_type(), "TOP_250_TV_SHOWS");
    }

    #[test]
    fn test_collection_slug_parsing() {
        for collection in [
            Collection::TopAll,
            Collection::TopMovies,
            Collection::TopShows,
        ] {
            assert_eq!(collection.slug().parse::<Collection>(), Ok(collection));
        }
        assert!("top-anime".parse::<Collection>().is_err());
    }
}
