//! Catalog data access
//!
//! - tmdb: Movie/TV lists, search, details via the TMDB REST API
//! - cache: Time-windowed in-memory query cache
//! - catalog: Client + caches behind one injectable service

pub mod cache;
pub mod catalog;
pub mod tmdb;

pub use cache::QueryCache;
pub use catalog::{Catalog, CatalogQuery};
pub use tmdb::{TmdbClient, TmdbError};
