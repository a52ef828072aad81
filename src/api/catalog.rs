//! Cached catalog service
//!
//! Wraps a `TmdbClient` with two `QueryCache`s (list pages and detail records).
//! Views ask for a `CatalogQuery`; a fresh cache hit never touches the network.

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use super::cache::QueryCache;
use super::tmdb::TmdbClient;
use crate::models::{CatalogPage, ItemDetail, MediaType, MovieList, RelatedKind, TvList};

/// A catalog request, also used as the page cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogQuery {
    Movies {
        list: MovieList,
        page: u32,
    },
    Tv {
        list: TvList,
        page: u32,
    },
    Search {
        media: MediaType,
        query: String,
        page: u32,
    },
    Related {
        media: MediaType,
        id: String,
        related: RelatedKind,
        page: u32,
    },
}

impl CatalogQuery {
    pub fn movies(list: MovieList) -> Self {
        CatalogQuery::Movies { list, page: 1 }
    }

    pub fn tv(list: TvList) -> Self {
        CatalogQuery::Tv { list, page: 1 }
    }

    pub fn search(media: MediaType, query: impl Into<String>) -> Self {
        CatalogQuery::Search {
            media,
            query: query.into(),
            page: 1,
        }
    }

    pub fn related(media: MediaType, id: impl Into<String>, related: RelatedKind) -> Self {
        CatalogQuery::Related {
            media,
            id: id.into(),
            related,
            page: 1,
        }
    }

    /// Same query for another result page (1-based)
    pub fn with_page(mut self, n: u32) -> Self {
        let n = n.max(1);
        match &mut self {
            CatalogQuery::Movies { page, .. }
            | CatalogQuery::Tv { page, .. }
            | CatalogQuery::Search { page, .. }
            | CatalogQuery::Related { page, .. } => *page = n,
        }
        self
    }

    /// Media type of the records this query returns
    pub fn media_type(&self) -> MediaType {
        match self {
            CatalogQuery::Movies { .. } => MediaType::Movie,
            CatalogQuery::Tv { .. } => MediaType::Tv,
            CatalogQuery::Search { media, .. } | CatalogQuery::Related { media, .. } => *media,
        }
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogQuery::Movies { list, page } => write!(f, "movie/{} p{}", list.endpoint(), page),
            CatalogQuery::Tv { list, page } => write!(f, "tv/{} p{}", list.endpoint(), page),
            CatalogQuery::Search { media, query, page } => {
                write!(f, "search/{} {:?} p{}", media.api_segment(), query, page)
            }
            CatalogQuery::Related {
                media,
                id,
                related,
                page,
            } => write!(
                f,
                "{}/{}/{} p{}",
                media.api_segment(),
                id,
                related.endpoint(),
                page
            ),
        }
    }
}

/// Cache key for detail records
pub type DetailKey = (MediaType, String);

/// Catalog data access shared by every view
pub struct Catalog {
    client: TmdbClient,
    pages: QueryCache<CatalogQuery, CatalogPage>,
    details: QueryCache<DetailKey, ItemDetail>,
}

impl Catalog {
    /// Catalog with the default 60/65 minute cache windows
    pub fn new(client: TmdbClient) -> Self {
        Self {
            client,
            pages: QueryCache::default(),
            details: QueryCache::default(),
        }
    }

    /// Catalog with explicit staleness and eviction windows
    pub fn with_ttl(client: TmdbClient, stale_after: Duration, evict_after: Duration) -> Self {
        Self {
            client,
            pages: QueryCache::new(stale_after, evict_after),
            details: QueryCache::new(stale_after, evict_after),
        }
    }

    pub fn pages(&self) -> &QueryCache<CatalogQuery, CatalogPage> {
        &self.pages
    }

    pub fn details(&self) -> &QueryCache<DetailKey, ItemDetail> {
        &self.details
    }

    /// Fetch one page for `query`, serving a fresh cached copy when present
    pub async fn page(&self, query: &CatalogQuery) -> Result<CatalogPage> {
        if let Some(hit) = self.pages.get_fresh(query) {
            debug!(%query, "catalog cache hit");
            return Ok(hit);
        }

        let page = match query {
            CatalogQuery::Movies { list, page } => self.client.movie_list(*list, *page).await?,
            CatalogQuery::Tv { list, page } => self.client.tv_list(*list, *page).await?,
            CatalogQuery::Search { media, query, page } => {
                self.client.search(*media, query, *page).await?
            }
            CatalogQuery::Related {
                media,
                id,
                related,
                page,
            } => self.client.related(*media, id, *related, *page).await?,
        };

        info!(%query, results = page.len(), "catalog page fetched");
        self.pages.insert(query.clone(), page.clone());
        Ok(page)
    }

    /// Fetch a detail record, serving a fresh cached copy when present
    pub async fn detail(&self, media: MediaType, id: &str) -> Result<ItemDetail> {
        let key = (media, id.to_string());
        if let Some(hit) = self.details.get_fresh(&key) {
            debug!(?media, %id, "detail cache hit");
            return Ok(hit);
        }

        let detail = self.client.detail(media, id).await?;
        info!(?media, %id, "detail fetched");
        self.details.insert(key, detail.clone());
        Ok(detail)
    }

    /// Forget a cached page so the next request refetches it
    pub fn invalidate(&self, query: &CatalogQuery) -> bool {
        self.pages.invalidate(query)
    }

    /// Forget a cached detail record
    pub fn invalidate_detail(&self, media: MediaType, id: &str) -> bool {
        self.details.invalidate(&(media, id.to_string()))
    }

    /// Drop entries past the eviction window in both caches
    pub fn sweep(&self) -> usize {
        let evicted = self.pages.sweep() + self.details.sweep();
        if evicted > 0 {
            debug!(evicted, "catalog cache swept");
        }
        evicted
    }
}
