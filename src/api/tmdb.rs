//! TMDB (The Movie Database) API client
//!
//! Provides list, search, detail and related-title lookups for movies and TV shows.
//! API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    CatalogItem, CatalogPage, ItemDetail, MediaType, MovieDetail, MovieList, RelatedKind,
    TvDetail, TvList,
};

/// Default TMDB v3 endpoint
pub const API_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Image CDN root; a size segment and the record's path are appended
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Default response language
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Unauthorized (401), check the TMDB access token")]
    Unauthorized,

    #[error("Rate limited (429)")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl TmdbError {
    /// Whether this error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, TmdbError::NotFound | TmdbError::InvalidId(_))
    }
}

/// Poster/backdrop sizes served by the image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W185,
    W500,
    W780,
    W1280,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W185 => "w185",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::W1280 => "w1280",
            ImageSize::Original => "original",
        }
    }
}

/// Build a CDN URL for an image path such as `/74xTEgt7R36Fpooo50r9T25onhq.jpg`
pub fn image_url(path: &str, size: ImageSize) -> String {
    format!("{}/{}{}", IMAGE_BASE_URL, size.as_str(), path)
}

/// Poster URL for a carousel card, if the record has a poster
pub fn poster_url(item: &CatalogItem) -> Option<String> {
    item.poster_path
        .as_deref()
        .map(|p| image_url(p, ImageSize::W500))
}

/// Banner URL: wide backdrop, falling back to the poster
pub fn banner_url(item: &CatalogItem) -> Option<String> {
    item.banner_path().map(|p| image_url(p, ImageSize::W1280))
}

/// TMDB API client
pub struct TmdbClient {
    access_token: String,
    base_url: String,
    language: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client with the given bearer access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, API_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Override the response language (e.g. "ko-KR")
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Make an authenticated GET request.
    ///
    /// Failures are returned as-is: recovery is a user-initiated refresh.
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%endpoint, "tmdb request");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(TmdbError::from)?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await.map_err(TmdbError::from)?;
                let parsed: T = serde_json::from_str(&body).map_err(|e| {
                    TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                })?;
                Ok(parsed)
            }
            StatusCode::NOT_FOUND => Err(TmdbError::NotFound.into()),
            StatusCode::UNAUTHORIZED => Err(TmdbError::Unauthorized.into()),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(%endpoint, "tmdb rate limit hit");
                Err(TmdbError::RateLimited.into())
            }
            status => {
                warn!(%endpoint, status = status.as_u16(), "tmdb request failed");
                Err(TmdbError::ServerError(status.as_u16()).into())
            }
        }
    }

    fn paged(&self, path: &str, page: u32) -> String {
        format!(
            "{}?language={}&page={}",
            path,
            urlencoding::encode(&self.language),
            page.max(1)
        )
    }

    /// Fetch a page of a movie collection (now playing, popular, ...)
    pub async fn movie_list(&self, list: MovieList, page: u32) -> Result<CatalogPage> {
        let endpoint = self.paged(&format!("/movie/{}", list.endpoint()), page);
        let response: PageResponse = self.get(&endpoint).await?;
        Ok(response.into_page(MediaType::Movie))
    }

    /// Fetch a page of a TV collection (airing today, on the air, ...)
    pub async fn tv_list(&self, list: TvList, page: u32) -> Result<CatalogPage> {
        let endpoint = self.paged(&format!("/tv/{}", list.endpoint()), page);
        let response: PageResponse = self.get(&endpoint).await?;
        Ok(response.into_page(MediaType::Tv))
    }

    /// Search movies or TV shows by keyword
    pub async fn search(&self, media: MediaType, query: &str, page: u32) -> Result<CatalogPage> {
        let endpoint = format!(
            "/search/{}?query={}&include_adult=false&language={}&page={}",
            media.api_segment(),
            urlencoding::encode(query),
            urlencoding::encode(&self.language),
            page.max(1)
        );
        let response: PageResponse = self.get(&endpoint).await?;
        Ok(response.into_page(media))
    }

    /// Similar or recommended titles for a record
    pub async fn related(
        &self,
        media: MediaType,
        id: &str,
        kind: RelatedKind,
        page: u32,
    ) -> Result<CatalogPage> {
        let id = parse_id(id)?;
        let endpoint = self.paged(
            &format!("/{}/{}/{}", media.api_segment(), id, kind.endpoint()),
            page,
        );
        let response: PageResponse = self.get(&endpoint).await?;
        Ok(response.into_page(media))
    }

    /// Get movie details by ID
    pub async fn movie_detail(&self, id: &str) -> Result<MovieDetail> {
        let id = parse_id(id)?;
        let endpoint = format!(
            "/movie/{}?language={}",
            id,
            urlencoding::encode(&self.language)
        );
        let response: MovieResponse = self.get(&endpoint).await?;
        Ok(response.into_detail())
    }

    /// Get TV show details by ID
    pub async fn tv_detail(&self, id: &str) -> Result<TvDetail> {
        let id = parse_id(id)?;
        let endpoint = format!("/tv/{}?language={}", id, urlencoding::encode(&self.language));
        let response: TvResponse = self.get(&endpoint).await?;
        Ok(response.into_detail())
    }

    /// Get details for either media type
    pub async fn detail(&self, media: MediaType, id: &str) -> Result<ItemDetail> {
        match media {
            MediaType::Movie => self.movie_detail(id).await.map(ItemDetail::Movie),
            MediaType::Tv => self.tv_detail(id).await.map(ItemDetail::Tv),
        }
    }
}

/// TMDB ids are numeric; anything else cannot exist upstream
fn parse_id(id: &str) -> Result<u64, TmdbError> {
    id.trim()
        .parse()
        .map_err(|_| TmdbError::InvalidId(id.to_string()))
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
    #[serde(default)]
    results: Vec<ItemRaw>,
}

impl PageResponse {
    fn into_page(self, media: MediaType) -> CatalogPage {
        CatalogPage {
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            results: self
                .results
                .into_iter()
                .filter_map(|r| r.into_item(media))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ItemRaw {
    id: u64,
    // Only present on multi-type endpoints
    media_type: Option<String>,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    popularity: Option<f32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

impl ItemRaw {
    fn into_item(self, default_media: MediaType) -> Option<CatalogItem> {
        let media_type = match self.media_type.as_deref() {
            None => default_media,
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            Some(_) => return None, // "person" and other types
        };

        let title = self.title.or(self.name).unwrap_or_default();
        let release_date = self
            .release_date
            .or(self.first_air_date)
            .filter(|d| !d.is_empty());

        Some(CatalogItem {
            id: self.id.to_string(),
            media_type,
            title,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            release_date,
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            popularity: self.popularity.unwrap_or(0.0),
            genre_ids: self.genre_ids,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    id: u64,
    title: String,
    tagline: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    homepage: Option<String>,
}

impl MovieResponse {
    fn into_detail(self) -> MovieDetail {
        MovieDetail {
            id: self.id.to_string(),
            title: self.title,
            tagline: self.tagline,
            release_date: self.release_date.filter(|d| !d.is_empty()),
            runtime: self.runtime,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            homepage: self.homepage.filter(|h| !h.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TvResponse {
    id: u64,
    name: String,
    tagline: Option<String>,
    first_air_date: Option<String>,
    number_of_seasons: Option<u16>,
    number_of_episodes: Option<u32>,
    #[serde(default)]
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    homepage: Option<String>,
}

impl TvResponse {
    fn into_detail(self) -> TvDetail {
        TvDetail {
            id: self.id.to_string(),
            name: self.name,
            tagline: self.tagline,
            first_air_date: self.first_air_date.filter(|d| !d.is_empty()),
            number_of_seasons: self.number_of_seasons.unwrap_or(0),
            number_of_episodes: self.number_of_episodes.unwrap_or(0),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            homepage: self.homepage.filter(|h| !h.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(media_type: Option<&str>) -> ItemRaw {
        ItemRaw {
            id: 1396,
            media_type: media_type.map(String::from),
            title: None,
            name: Some("Breaking Bad".to_string()),
            release_date: None,
            first_air_date: Some("2008-01-20".to_string()),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            vote_average: None,
            vote_count: None,
            popularity: None,
            genre_ids: vec![],
        }
    }

    #[test]
    fn test_media_type_filter() {
        assert!(raw(Some("tv")).into_item(MediaType::Movie).is_some());
        assert!(raw(Some("person")).into_item(MediaType::Movie).is_none());
    }

    #[test]
    fn test_tv_name_becomes_title() {
        let item = raw(None).into_item(MediaType::Tv).unwrap();
        assert_eq!(item.id, "1396");
        assert_eq!(item.title, "Breaking Bad");
        assert_eq!(item.media_type, MediaType::Tv);
        assert_eq!(item.year(), Some(2008));
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("/abc.jpg", ImageSize::W500),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            image_url("/abc.jpg", ImageSize::Original),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
    }

    #[test]
    fn test_banner_prefers_backdrop() {
        let mut item = raw(None).into_item(MediaType::Tv).unwrap();
        assert_eq!(banner_url(&item), None);

        item.poster_path = Some("/poster.jpg".into());
        assert_eq!(
            banner_url(&item).as_deref(),
            Some("https://image.tmdb.org/t/p/w1280/poster.jpg")
        );

        item.backdrop_path = Some("/backdrop.jpg".into());
        assert_eq!(
            banner_url(&item).as_deref(),
            Some("https://image.tmdb.org/t/p/w1280/backdrop.jpg")
        );
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("550").unwrap(), 550);
        assert!(parse_id("fight-club").unwrap_err().is_not_found());
    }
}
