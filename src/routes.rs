//! Client-side routes
//!
//! Every screen is addressed by a path under a configurable base path:
//!
//! ```text
//! /                          home (movie carousels)
//! /tv-shows                  TV carousels
//! /search?query=..           search results
//! /movies/:movieId           movie detail over home
//! /tv-shows/:tvShowId        TV detail over the TV section
//! /search/movies/:id?query=  movie detail over search results
//! /search/tv-shows/:id?query=
//! ```
//!
//! Detail paths may carry `list=<carouselId>` naming the carousel the item was
//! opened from.

use std::fmt;

use crate::models::{CatalogItem, MediaType};

/// Query parameter correlating a detail overlay with its carousel
pub const LIST_PARAM: &str = "list";

/// Query parameter carrying the search keyword
pub const QUERY_PARAM: &str = "query";

/// Page underneath any detail overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Home,
    TvShows,
    Search { query: String },
    NotFound { path: String },
}

impl Section {
    pub fn search(query: impl Into<String>) -> Self {
        Section::Search {
            query: query.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Home => "HOME",
            Section::TvShows => "TV SHOWS",
            Section::Search { .. } => "SEARCH",
            Section::NotFound { .. } => "NOT FOUND",
        }
    }
}

/// The item a detail overlay shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRef {
    pub media: MediaType,
    pub id: String,
    pub list: Option<String>,
}

impl DetailRef {
    pub fn new(media: MediaType, id: impl Into<String>) -> Self {
        Self {
            media,
            id: id.into(),
            list: None,
        }
    }

    pub fn from_list(mut self, list: impl Into<String>) -> Self {
        self.list = Some(list.into());
        self
    }

    /// Resolve the referenced item in a loaded collection
    pub fn find_in<'a>(&self, items: &'a [CatalogItem]) -> Option<&'a CatalogItem> {
        items
            .iter()
            .find(|item| item.media_type == self.media && item.id == self.id)
    }
}

/// A parsed location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub section: Section,
    pub detail: Option<DetailRef>,
}

impl Default for Route {
    fn default() -> Self {
        Route::home()
    }
}

impl Route {
    pub fn home() -> Self {
        Self::section(Section::Home)
    }

    pub fn tv_shows() -> Self {
        Self::section(Section::TvShows)
    }

    /// Search results for `query`; a blank query redirects home
    pub fn search(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            Route::home()
        } else {
            Self::section(Section::search(query))
        }
    }

    pub fn section(section: Section) -> Self {
        Self {
            section,
            detail: None,
        }
    }

    /// Same section with a detail overlay opened on top
    pub fn with_detail(&self, detail: DetailRef) -> Self {
        Self {
            section: self.section.clone(),
            detail: Some(detail),
        }
    }

    /// Same section with the overlay closed
    pub fn without_detail(&self) -> Self {
        Self::section(self.section.clone())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.section, Section::NotFound { .. })
    }

    /// Parse `path` (optionally with a `?query`) under `base_path`
    pub fn parse(base_path: &str, path: &str) -> Route {
        let not_found = || Route::section(Section::NotFound {
            path: path.to_string(),
        });

        let base = normalize_base(base_path);
        let Some(rest) = path.strip_prefix(base.as_str()) else {
            return not_found();
        };
        if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')) {
            return not_found();
        }

        let (path_part, query_part) = match rest.split_once('?') {
            Some((p, q)) => (p, q),
            None => (rest, ""),
        };
        let params = parse_query(query_part);
        let param = |name: &str| {
            params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        };
        let list = param(LIST_PARAM).filter(|l| !l.is_empty());
        let query = param(QUERY_PARAM).unwrap_or_default();

        let segments: Vec<String> = path_part
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode)
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let detail = |media: MediaType, id: &str| DetailRef {
            media,
            id: id.to_string(),
            list: list.clone(),
        };

        match segments.as_slice() {
            [] => Route::home(),
            ["tv-shows"] => Route::tv_shows(),
            ["search"] => Route::search(&query),
            ["movies", id] => Route::home().with_detail(detail(MediaType::Movie, *id)),
            ["tv-shows", id] => Route::tv_shows().with_detail(detail(MediaType::Tv, *id)),
            ["search", media @ ("movies" | "tv-shows"), id] => {
                let route = Route::search(&query);
                if route.section == Section::Home {
                    return route;
                }
                let media = if *media == "movies" {
                    MediaType::Movie
                } else {
                    MediaType::Tv
                };
                route.with_detail(detail(media, *id))
            }
            _ => not_found(),
        }
    }

    /// Render this route as a path under `base_path`
    pub fn to_path(&self, base_path: &str) -> String {
        let base = normalize_base(base_path);
        let (path, mut params): (String, Vec<(&str, String)>) = match (&self.section, &self.detail) {
            (Section::NotFound { path }, _) => return path.clone(),
            (Section::Home, None) => ("/".to_string(), vec![]),
            (Section::TvShows, None) => ("/tv-shows".to_string(), vec![]),
            (Section::Search { query }, None) => {
                ("/search".to_string(), vec![(QUERY_PARAM, query.clone())])
            }
            (Section::Search { query }, Some(d)) => (
                format!("/search/{}/{}", d.media.route_segment(), encode(&d.id)),
                vec![(QUERY_PARAM, query.clone())],
            ),
            (_, Some(d)) => (
                format!("/{}/{}", d.media.route_segment(), encode(&d.id)),
                vec![],
            ),
        };

        if let Some(list) = self.detail.as_ref().and_then(|d| d.list.clone()) {
            params.push((LIST_PARAM, list));
        }

        let mut out = if base.is_empty() || path != "/" {
            format!("{}{}", base, path)
        } else {
            base
        };
        if !params.is_empty() {
            let query: Vec<String> = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, encode(v)))
                .collect();
            out.push('?');
            out.push_str(&query.join("&"));
        }
        out
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path("/"))
    }
}

/// Navigation history with a back action bounded to this session.
///
/// Going back with no earlier entry lands on home instead of leaving the app.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::home())
    }
}

impl History {
    pub fn new(initial: Route) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    pub fn current(&self) -> &Route {
        // Never empty: constructed with one entry and `back` keeps the last
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Navigate to `route`; navigating to the current route is a no-op
    pub fn push(&mut self, route: Route) -> bool {
        if *self.current() == route {
            return false;
        }
        self.entries.push(route);
        true
    }

    /// Swap the current entry (redirects)
    pub fn replace(&mut self, route: Route) {
        let last = self.entries.len() - 1;
        self.entries[last] = route;
    }

    /// Go back one entry, or home when there is nothing earlier.
    /// Returns false only when already home with no history.
    pub fn back(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            true
        } else if *self.current() != Route::home() {
            self.replace(Route::home());
            true
        } else {
            false
        }
    }
}

fn normalize_base(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|c| c.into_owned())
        .unwrap_or(spaced)
}

fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode(k), decode(v)),
            None => (decode(pair), String::new()),
        })
        .collect()
}
