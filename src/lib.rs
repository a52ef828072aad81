//! Marquee - terminal catalog browser for movies and TV shows
//!
//! Paged carousels of TMDB collections, search, and a detail overlay, all
//! addressable by route.
//!
//! # Modules
//!
//! - `models` - Catalog records, detail records, named collections
//! - `api` - TMDB client, query cache, cached catalog service
//! - `carousel` - Page controller, drag gesture, eased motion
//! - `routes` - Route parsing/rendering and session-bound history
//! - `app` - Application state, input handling, fetch effects
//! - `ui` - TUI rendering
//! - `cli` / `commands` - Scriptable subcommands
//! - `config` / `logging` - Ambient setup

pub mod api;
pub mod app;
pub mod carousel;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod routes;
pub mod ui;

// Re-export commonly used types
pub use models::{CatalogItem, CatalogPage, ItemDetail, MediaType, MovieDetail, TvDetail};

pub use api::{Catalog, CatalogQuery, TmdbClient, TmdbError};
pub use app::{App, AppEvent, Effect};
pub use carousel::{Breakpoints, CarouselController};
pub use routes::{History, Route};
