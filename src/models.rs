//! Data structures and types for Marquee
//!
//! Contains the shared models used across the application organized by domain:
//! - **Catalog**: TMDB list/search records projected into `CatalogItem`
//! - **Detail**: movie and TV show detail records
//! - **Lists**: the named catalog collections shown as carousels

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Catalog Models (TMDB)
// =============================================================================

/// Media type discriminator for catalog records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// TMDB path segment for this media type (`movie` / `tv`)
    pub fn api_segment(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Route segment for this media type (`movies` / `tv-shows`)
    pub fn route_segment(&self) -> &'static str {
        match self {
            MediaType::Movie => "movies",
            MediaType::Tv => "tv-shows",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
        }
    }
}

/// A movie or TV show record from a TMDB list or search endpoint.
///
/// The id is kept as text: detail routes carry it as a path parameter and
/// selection compares against it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub media_type: MediaType,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f32,
    pub vote_count: u32,
    pub popularity: f32,
    pub genre_ids: Vec<u32>,
}

impl CatalogItem {
    /// Release (or first air) year, if the date is present
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Image used by the banner: backdrop first, poster otherwise
    pub fn banner_path(&self) -> Option<&str> {
        self.backdrop_path
            .as_deref()
            .or(self.poster_path.as_deref())
    }
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

/// One page of a paginated TMDB collection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogPage {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<CatalogItem>,
}

impl CatalogPage {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the upstream collection has more pages after this one
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

// =============================================================================
// Detail Models
// =============================================================================

/// Detailed movie information from TMDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub overview: String,
    pub vote_average: f32,
    pub vote_count: u32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub homepage: Option<String>,
}

/// Detailed TV show information from TMDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvDetail {
    pub id: String,
    pub name: String,
    pub tagline: Option<String>,
    pub first_air_date: Option<String>,
    pub number_of_seasons: u16,
    pub number_of_episodes: u32,
    pub genres: Vec<String>,
    pub overview: String,
    pub vote_average: f32,
    pub vote_count: u32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub homepage: Option<String>,
}

/// Detail record shown by the modal overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum ItemDetail {
    Movie(MovieDetail),
    Tv(TvDetail),
}

impl ItemDetail {
    pub fn media_type(&self) -> MediaType {
        match self {
            ItemDetail::Movie(_) => MediaType::Movie,
            ItemDetail::Tv(_) => MediaType::Tv,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ItemDetail::Movie(d) => &d.id,
            ItemDetail::Tv(d) => &d.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ItemDetail::Movie(d) => &d.title,
            ItemDetail::Tv(d) => &d.name,
        }
    }

    pub fn tagline(&self) -> Option<&str> {
        match self {
            ItemDetail::Movie(d) => d.tagline.as_deref(),
            ItemDetail::Tv(d) => d.tagline.as_deref(),
        }
        .filter(|t| !t.is_empty())
    }

    pub fn overview(&self) -> &str {
        match self {
            ItemDetail::Movie(d) => &d.overview,
            ItemDetail::Tv(d) => &d.overview,
        }
    }

    pub fn genres(&self) -> &[String] {
        match self {
            ItemDetail::Movie(d) => &d.genres,
            ItemDetail::Tv(d) => &d.genres,
        }
    }

    pub fn vote_average(&self) -> f32 {
        match self {
            ItemDetail::Movie(d) => d.vote_average,
            ItemDetail::Tv(d) => d.vote_average,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            ItemDetail::Movie(d) => d.poster_path.as_deref(),
            ItemDetail::Tv(d) => d.poster_path.as_deref(),
        }
    }

    pub fn year(&self) -> Option<u16> {
        match self {
            ItemDetail::Movie(d) => d.release_date.as_deref(),
            ItemDetail::Tv(d) => d.first_air_date.as_deref(),
        }
        .and_then(extract_year)
    }

    /// Short length summary: "2h 14m" for movies, "3 seasons · 24 episodes" for TV
    pub fn length_summary(&self) -> Option<String> {
        match self {
            ItemDetail::Movie(d) => d.runtime.filter(|r| *r > 0).map(format_runtime),
            ItemDetail::Tv(d) if d.number_of_seasons > 0 => Some(format!(
                "{} season{} · {} episodes",
                d.number_of_seasons,
                if d.number_of_seasons == 1 { "" } else { "s" },
                d.number_of_episodes
            )),
            ItemDetail::Tv(_) => None,
        }
    }
}

// =============================================================================
// Catalog Lists
// =============================================================================

/// Movie collections shown on the home section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieList {
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
}

impl MovieList {
    pub const ALL: [MovieList; 4] = [
        MovieList::NowPlaying,
        MovieList::Popular,
        MovieList::TopRated,
        MovieList::Upcoming,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            MovieList::NowPlaying => "now_playing",
            MovieList::Popular => "popular",
            MovieList::TopRated => "top_rated",
            MovieList::Upcoming => "upcoming",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MovieList::NowPlaying => "Now Playing",
            MovieList::Popular => "Popular",
            MovieList::TopRated => "Top Rated",
            MovieList::Upcoming => "Upcoming",
        }
    }
}

/// TV collections shown on the TV shows section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TvList {
    AiringToday,
    OnTheAir,
    Popular,
    TopRated,
}

impl TvList {
    pub const ALL: [TvList; 4] = [
        TvList::AiringToday,
        TvList::OnTheAir,
        TvList::Popular,
        TvList::TopRated,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            TvList::AiringToday => "airing_today",
            TvList::OnTheAir => "on_the_air",
            TvList::Popular => "popular",
            TvList::TopRated => "top_rated",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TvList::AiringToday => "Airing Today",
            TvList::OnTheAir => "On The Air",
            TvList::Popular => "Popular",
            TvList::TopRated => "Top Rated",
        }
    }
}

/// Related-title lists offered on a detail record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    Similar,
    Recommended,
}

impl RelatedKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            RelatedKind::Similar => "similar",
            RelatedKind::Recommended => "recommendations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RelatedKind::Similar => "More Like This",
            RelatedKind::Recommended => "Recommended",
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

/// Format a runtime in minutes as "2h 14m" / "48m"
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(release_date: Option<&str>) -> CatalogItem {
        CatalogItem {
            id: "1".into(),
            media_type: MediaType::Movie,
            title: "Heat".into(),
            overview: String::new(),
            poster_path: Some("/poster.jpg".into()),
            backdrop_path: None,
            release_date: release_date.map(String::from),
            vote_average: 8.3,
            vote_count: 100,
            popularity: 1.0,
            genre_ids: vec![],
        }
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2022-03-04"), Some(2022));
        assert_eq!(extract_year("1995"), Some(1995));
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("abc"), None);
    }

    #[test]
    fn test_item_display_and_banner() {
        let heat = item(Some("1995-12-15"));
        assert_eq!(heat.to_string(), "Heat (1995) [Movie]");
        assert_eq!(heat.banner_path(), Some("/poster.jpg"));

        let undated = item(None);
        assert_eq!(undated.to_string(), "Heat [Movie]");
    }

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(134), "2h 14m");
        assert_eq!(format_runtime(48), "48m");
    }

    #[test]
    fn test_length_summary() {
        let tv = ItemDetail::Tv(TvDetail {
            id: "1396".into(),
            name: "Breaking Bad".into(),
            tagline: Some(String::new()),
            first_air_date: Some("2008-01-20".into()),
            number_of_seasons: 5,
            number_of_episodes: 62,
            genres: vec!["Drama".into()],
            overview: String::new(),
            vote_average: 8.9,
            vote_count: 10,
            poster_path: None,
            backdrop_path: None,
            homepage: None,
        });
        assert_eq!(tv.length_summary().as_deref(), Some("5 seasons · 62 episodes"));
        assert_eq!(tv.tagline(), None);
        assert_eq!(tv.year(), Some(2008));
    }
}
