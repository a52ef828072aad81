//! Configuration management for Marquee
//!
//! Handles config file loading/saving and TMDB credential lookup.
//! Config is stored at ~/.config/marquee/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::cache::{DEFAULT_EVICT_AFTER, DEFAULT_STALE_AFTER};
use crate::api::tmdb::{API_BASE_URL, DEFAULT_LANGUAGE};

/// Environment variable holding the TMDB v4 read access token
pub const TOKEN_ENV: &str = "TMDB_ACCESS_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB read access token (bearer)
    pub access_token: Option<String>,
    /// Override for the TMDB API root
    pub api_base_url: Option<String>,
    /// Response language, e.g. "en-US"
    pub language: Option<String>,
    /// Path prefix every route lives under
    pub base_path: Option<String>,
    /// Minutes a fetched page is served from cache
    pub cache_stale_minutes: Option<u64>,
    /// Minutes before a cached page is dropped
    pub cache_evict_minutes: Option<u64>,
    /// Log file used in TUI mode
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/marquee/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("marquee").join("config.toml"))
    }

    /// The file in use: `explicit` when given, else the default location
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf).or_else(Self::path)
    }

    /// Load config from the default location.
    /// A missing file yields the defaults; one that cannot be read or parsed is an error.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(p) if p.exists() => Self::load_from(&p),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` when given (errors are reported), else the default location
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Self::load(),
        }
    }

    /// Save config to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Get the TMDB access token with fallback chain:
    /// 1. Environment variable TMDB_ACCESS_TOKEN
    /// 2. Token from config file
    pub fn access_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }

        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No TMDB access token: set {} or access_token in {}",
                    TOKEN_ENV,
                    Self::path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "the config file".into())
                )
            })
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(API_BASE_URL)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn base_path(&self) -> &str {
        self.base_path.as_deref().unwrap_or("/")
    }

    pub fn cache_stale_after(&self) -> Duration {
        self.cache_stale_minutes
            .map(|m| Duration::from_secs(m * 60))
            .unwrap_or(DEFAULT_STALE_AFTER)
    }

    pub fn cache_evict_after(&self) -> Duration {
        self.cache_evict_minutes
            .map(|m| Duration::from_secs(m * 60))
            .unwrap_or(DEFAULT_EVICT_AFTER)
    }

    /// Log file for TUI mode (~/.local/share/marquee/marquee.log)
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::data_local_dir().map(|p| p.join("marquee").join("marquee.log"))
        })
    }
}
