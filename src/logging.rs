//! Tracing setup
//!
//! The TUI owns the terminal, so interactive runs log to a file. CLI runs log
//! to stderr, keeping stdout clean for JSON output.
//! Filter comes from `MARQUEE_LOG`, then `RUST_LOG`, defaulting to `info`.

use anyhow::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "MARQUEE_LOG";

fn env_filter(default: &str) -> EnvFilter {
    let directives = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default.into());
    EnvFilter::new(directives)
}

/// Log to stderr (CLI mode). Quiet runs only show warnings.
pub fn init_stderr(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter(default))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Log to an append-only file (TUI mode)
pub fn init_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    Ok(())
}
