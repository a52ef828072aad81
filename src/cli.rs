//! CLI - Command Line Interface for Marquee
//!
//! Every catalog the TUI browses is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Browse a collection
//! marquee list popular --json
//!
//! # Search and inspect
//! marquee search "blade runner" -t movie
//! marquee info 78 -t movie
//! marquee related 1396 -t tv --kind recommended
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::CatalogQuery;
use crate::models::{MediaType, MovieList, RelatedKind, TvList};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Record or collection not found
    NotFound = 4,
    /// Missing or unreadable configuration
    ConfigError = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Marquee - browse movie and TV catalogs from the terminal
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "marquee",
    version,
    about = "Browse movie and TV catalogs from the terminal",
    long_about = "Carousels of now playing, popular, top rated and upcoming titles, \
                  with search and detail views.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  marquee                             Launch interactive TUI\n\
                  marquee /tv-shows/1396              Open the TUI at a route\n\
                  marquee list now-playing            Print a collection\n\
                  marquee search \"heat\" -t movie      Search movies\n\
                  marquee info 550 -t movie --json    Detail record as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Route to open the TUI at (e.g. /movies/550?list=popular)
    #[arg(value_name = "ROUTE")]
    pub route: Option<String>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of a movie or TV collection
    #[command(visible_alias = "ls")]
    List(ListCmd),

    /// Search for movies or TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get details for a movie or show
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Similar or recommended titles for a movie or show
    #[command(visible_alias = "rel")]
    Related(RelatedCmd),

    /// Show or update the config file
    Config(ConfigCmd),
}

/// Media type argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeArg {
    /// Movies
    Movie,
    /// TV shows
    Tv,
}

impl From<MediaTypeArg> for MediaType {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::Movie => MediaType::Movie,
            MediaTypeArg::Tv => MediaType::Tv,
        }
    }
}

// =============================================================================
// List Command
// =============================================================================

/// Print a collection
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Collection to fetch
    #[arg(value_enum)]
    pub collection: Collection,

    /// Result page (1-based)
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Named collections, movies first
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
    AiringToday,
    OnTheAir,
    PopularTv,
    TopRatedTv,
}

impl Collection {
    pub fn query(&self, page: u32) -> CatalogQuery {
        let query = match self {
            Collection::NowPlaying => CatalogQuery::movies(MovieList::NowPlaying),
            Collection::Popular => CatalogQuery::movies(MovieList::Popular),
            Collection::TopRated => CatalogQuery::movies(MovieList::TopRated),
            Collection::Upcoming => CatalogQuery::movies(MovieList::Upcoming),
            Collection::AiringToday => CatalogQuery::tv(TvList::AiringToday),
            Collection::OnTheAir => CatalogQuery::tv(TvList::OnTheAir),
            Collection::PopularTv => CatalogQuery::tv(TvList::Popular),
            Collection::TopRatedTv => CatalogQuery::tv(TvList::TopRated),
        };
        query.with_page(page)
    }
}

// =============================================================================
// Search Command
// =============================================================================

/// Search movies or TV shows by keyword
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Media type to search
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeArg,

    /// Result page (1-based)
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

// =============================================================================
// Info Command
// =============================================================================

/// Get detailed information about a movie or TV show
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB ID
    #[arg(required = true)]
    pub id: String,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeArg,
}

// =============================================================================
// Related Command
// =============================================================================

/// Titles related to a movie or show
#[derive(Args, Debug)]
pub struct RelatedCmd {
    /// TMDB ID
    #[arg(required = true)]
    pub id: String,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeArg,

    /// Which relation to fetch
    #[arg(long, short = 'k', value_enum, default_value = "similar")]
    pub kind: RelatedKindArg,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedKindArg {
    Similar,
    Recommended,
}

impl From<RelatedKindArg> for RelatedKind {
    fn from(arg: RelatedKindArg) -> Self {
        match arg {
            RelatedKindArg::Similar => RelatedKind::Similar,
            RelatedKindArg::Recommended => RelatedKind::Recommended,
        }
    }
}

// =============================================================================
// Config Command
// =============================================================================

/// Show the effective configuration, or store an access token
#[derive(Args, Debug)]
pub struct ConfigCmd {
    /// Save this TMDB access token to the config file
    #[arg(long, value_name = "TOKEN")]
    pub set_token: Option<String>,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Effective configuration, token redacted
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub token_set: bool,
    pub api_base_url: String,
    pub language: String,
    pub base_path: String,
    pub cache_stale_minutes: u64,
    pub cache_evict_minutes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // For non-JSON, caller should handle formatting
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a line of human-readable output (ignored in JSON mode)
    pub fn line(&self, text: impl std::fmt::Display) {
        if !self.json {
            println!("{}", text);
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Argument Validation
// =============================================================================

/// Validate a TMDB ID (digits only)
pub fn validate_tmdb_id(id: &str) -> Result<&str, &'static str> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Ok(id)
    } else {
        Err("Invalid TMDB ID (expected digits, e.g. 550)")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["marquee"]);
        assert!(!cli.is_cli_mode());
        assert!(cli.route.is_none());
    }

    #[test]
    fn test_route_argument() {
        let cli = Cli::parse_from(["marquee", "/movies/550?list=popular"]);
        assert!(!cli.is_cli_mode());
        assert_eq!(cli.route.as_deref(), Some("/movies/550?list=popular"));
    }

    #[test]
    fn test_list_command() {
        let cli = Cli::parse_from(["marquee", "list", "airing-today", "-l", "5"]);
        if let Some(Command::List(cmd)) = cli.command {
            assert_eq!(cmd.collection, Collection::AiringToday);
            assert_eq!(cmd.limit, 5);
            assert_eq!(cmd.collection.query(cmd.page), CatalogQuery::tv(TvList::AiringToday));
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_search_defaults_to_movies() {
        let cli = Cli::parse_from(["marquee", "search", "heat"]);
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.query, "heat");
            assert_eq!(cmd.media_type, MediaTypeArg::Movie);
            assert_eq!(cmd.page, 1);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_related_command() {
        let cli = Cli::parse_from(["marquee", "--json", "related", "1396", "-t", "tv", "-k", "recommended"]);
        assert!(cli.json);
        if let Some(Command::Related(cmd)) = cli.command {
            assert_eq!(cmd.id, "1396");
            assert_eq!(MediaType::from(cmd.media_type), MediaType::Tv);
            assert_eq!(RelatedKind::from(cmd.kind), RelatedKind::Recommended);
        } else {
            panic!("Expected Related command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["marquee", "info", "550", "--quiet", "-c", "/tmp/m.toml"]);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
    }

    #[test]
    fn test_validate_tmdb_id() {
        assert!(validate_tmdb_id("550").is_ok());
        assert!(validate_tmdb_id("").is_err());
        assert!(validate_tmdb_id("tt0137523").is_err());
        assert!(validate_tmdb_id("55 0").is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::ConfigError), 5);
    }

    #[test]
    fn test_json_error_envelope() {
        let out = JsonOutput::<()>::error_msg("boom", ExitCode::NotFound);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["exit_code"], 4);
        assert!(json.get("data").is_none());
    }
}
