//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the cached catalog service.
//! Each handler takes CLI args, the loaded config and Output, returns ExitCode.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::api::{Catalog, CatalogQuery, TmdbClient, TmdbError};
use crate::cli::{
    ConfigCmd, ConfigView, ExitCode, InfoCmd, ListCmd, Output, RelatedCmd, SearchCmd,
};
use crate::config::Config;
use crate::models::{CatalogPage, ItemDetail, MediaType};

/// Build the TMDB client described by `config`
pub fn client_from_config(config: &Config) -> Result<TmdbClient> {
    let token = config.access_token()?;
    Ok(TmdbClient::with_base_url(token, config.api_base_url()).with_language(config.language()))
}

/// Build the cached catalog described by `config`
pub fn catalog_from_config(config: &Config) -> Result<Catalog> {
    let client = client_from_config(config)?;
    Ok(Catalog::with_ttl(
        client,
        config.cache_stale_after(),
        config.cache_evict_after(),
    ))
}

/// Map a fetch failure to its exit code
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<TmdbError>() {
        Some(e) if e.is_not_found() => ExitCode::NotFound,
        Some(TmdbError::Unauthorized) => ExitCode::ConfigError,
        Some(TmdbError::InvalidResponse(_)) => ExitCode::Error,
        Some(_) => ExitCode::NetworkError,
        None => ExitCode::Error,
    }
}

fn catalog_or_exit(config: &Config, output: &Output) -> Result<Catalog, ExitCode> {
    catalog_from_config(config).map_err(|e| output.error(e.to_string(), ExitCode::ConfigError))
}

/// One line per record: id, title, year, rating
pub fn format_page(page: &CatalogPage, limit: usize) -> Vec<String> {
    page.results
        .iter()
        .take(limit)
        .map(|item| {
            let year = item.year().map(|y| y.to_string()).unwrap_or_else(|| "----".into());
            format!(
                "{:>8}  {}  ★ {:.1}  {}",
                item.id, year, item.vote_average, item.title
            )
        })
        .collect()
}

fn print_page(mut page: CatalogPage, limit: usize, output: &Output) -> ExitCode {
    if output.json {
        page.results.truncate(limit);
        if let Err(e) = output.print(&page) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        for line in format_page(&page, limit) {
            output.line(line);
        }
        output.info(format!(
            "page {}/{} · {} results",
            page.page, page.total_pages, page.total_results
        ));
    }
    ExitCode::Success
}

async fn run_page_query(query: CatalogQuery, limit: usize, config: &Config, output: &Output) -> ExitCode {
    let catalog = match catalog_or_exit(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    info!(%query, "cli page query");
    match catalog.page(&query).await {
        Ok(page) => print_page(page, limit, output),
        Err(e) => output.error(format!("{} failed: {}", query, e), exit_code_for(&e)),
    }
}

// =============================================================================
// List Command
// =============================================================================

pub async fn list_cmd(cmd: ListCmd, config: &Config, output: &Output) -> ExitCode {
    run_page_query(cmd.collection.query(cmd.page), cmd.limit, config, output).await
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }

    output.info(format!("Searching for: {}", query));
    let query = CatalogQuery::search(cmd.media_type.into(), query).with_page(cmd.page);
    run_page_query(query, cmd.limit, config, output).await
}

// =============================================================================
// Info Command
// =============================================================================

/// Human-readable detail summary
pub fn format_detail(detail: &ItemDetail) -> Vec<String> {
    let mut lines = Vec::new();
    let year = detail.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    lines.push(format!("{}{}", detail.title(), year));
    if let Some(tagline) = detail.tagline() {
        lines.push(format!("\"{}\"", tagline));
    }

    let mut meta = vec![format!("★ {:.1}", detail.vote_average())];
    if let Some(length) = detail.length_summary() {
        meta.push(length);
    }
    if !detail.genres().is_empty() {
        meta.push(detail.genres().join(", "));
    }
    lines.push(meta.join(" · "));

    if !detail.overview().is_empty() {
        lines.push(String::new());
        lines.push(detail.overview().to_string());
    }
    lines
}

pub async fn info_cmd(cmd: InfoCmd, config: &Config, output: &Output) -> ExitCode {
    let media: MediaType = cmd.media_type.into();
    let catalog = match catalog_or_exit(config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!("Getting info for: {} {}", media.api_segment(), cmd.id));
    match catalog.detail(media, &cmd.id).await {
        Ok(detail) => {
            if output.json {
                if let Err(e) = output.print(&detail) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            } else {
                for line in format_detail(&detail) {
                    output.line(line);
                }
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Info failed: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Related Command
// =============================================================================

pub async fn related_cmd(cmd: RelatedCmd, config: &Config, output: &Output) -> ExitCode {
    let query = CatalogQuery::related(cmd.media_type.into(), cmd.id.clone(), cmd.kind.into());
    run_page_query(query, cmd.limit, config, output).await
}

// =============================================================================
// Config Command
// =============================================================================

/// Snapshot of the effective configuration with the token redacted.
/// `path` is the file the configuration was read from.
pub fn config_view(config: &Config, path: Option<&Path>) -> ConfigView {
    ConfigView {
        path: path.map(|p| p.display().to_string()),
        token_set: config.access_token().is_ok(),
        api_base_url: config.api_base_url().to_string(),
        language: config.language().to_string(),
        base_path: config.base_path().to_string(),
        cache_stale_minutes: config.cache_stale_after().as_secs() / 60,
        cache_evict_minutes: config.cache_evict_after().as_secs() / 60,
        log_file: config.log_file().map(|p| p.display().to_string()),
    }
}

/// Print the effective config, saving a new token first when asked.
/// `path` is the file `config` was loaded from (`--config`, else the default location).
pub fn config_cmd(
    cmd: ConfigCmd,
    mut config: Config,
    path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    if let Some(token) = cmd.set_token {
        let token = token.trim().to_string();
        if token.is_empty() {
            return output.error("Token is empty", ExitCode::InvalidArgs);
        }
        let Some(path) = path else {
            return output.error("Could not determine config path", ExitCode::ConfigError);
        };
        config.access_token = Some(token);
        if let Err(e) = config.save_to(path) {
            return output.error(format!("Failed to save config: {}", e), ExitCode::ConfigError);
        }
        output.info(format!("Access token saved to {}", path.display()));
    }

    if let Err(e) = output.print(config_view(&config, path)) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}
