//! Integration tests for Marquee
//!
//! Tests are organized by component:
//! - tmdb_test: TMDB API client tests (mocked HTTP)
//! - catalog_test: Cached catalog service and fetch effects
//! - carousel_test: Page controller, drag release, strip motion
//! - ui_test: Rendering and mouse routing against a test backend
//! - cli_test: Argument parsing, JSON envelope, command exit codes
//! - e2e_test: End-to-end flows (Home -> Detail -> Back, Search -> Detail)

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
