//! Marquee - terminal catalog browser for movies and TV shows
//!
//! Paged carousels of now playing, popular, top rated and upcoming titles,
//! with search and a detail overlay. Every screen has a route.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! marquee
//!
//! # Open the TUI at a route
//! marquee "/search/movies/949?query=heat"
//!
//! # CLI mode (for automation)
//! marquee list top-rated --json
//! marquee info 1396 -t tv
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use marquee::api::Catalog;
use marquee::app::{run_effect, App, AppEvent, Effect};
use marquee::cli::{self, Cli, Command, ExitCode, Output};
use marquee::commands;
use marquee::config::Config;
use marquee::logging;
use marquee::routes::Route;
use marquee::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Redraw interval while idle (spinner frames)
const TICK_RATE: Duration = Duration::from_millis(100);

/// Redraw interval while a strip is animating
const FRAME_RATE: Duration = Duration::from_millis(16);

/// How often expired cache entries are dropped
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        logging::init_stderr(cli.quiet);
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        let config = Config::load_or_default(cli.config.as_deref())?;
        if let Some(path) = config.log_file() {
            logging::init_file(&path)?;
        }
        run_tui(config, cli.route).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::ConfigError),
    };

    match cli.command {
        Some(Command::List(cmd)) => commands::list_cmd(cmd, &config, &output).await,

        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &config, &output).await,

        Some(Command::Info(cmd)) => {
            if let Err(e) = cli::validate_tmdb_id(&cmd.id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::info_cmd(cmd, &config, &output).await
        }

        Some(Command::Related(cmd)) => {
            if let Err(e) = cli::validate_tmdb_id(&cmd.id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::related_cmd(cmd, &config, &output).await
        }

        Some(Command::Config(cmd)) => {
            let path = Config::resolve_path(cli.config.as_deref());
            commands::config_cmd(cmd, config, path.as_deref(), &output)
        }

        None => {
            // Handled by the is_cli_mode check
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Route given on the command line, resolved under the configured base path
fn initial_route(base_path: &str, arg: Option<&str>) -> Route {
    let Some(path) = arg else {
        return Route::home();
    };
    let base = base_path.trim_end_matches('/');
    if base.is_empty() || path.starts_with(base) {
        Route::parse(base_path, path)
    } else {
        Route::parse(base_path, &format!("{}{}", base, path))
    }
}

/// Run interactive TUI
async fn run_tui(config: Config, route: Option<String>) -> Result<()> {
    // Fail before touching the terminal if there is no token
    let catalog = Arc::new(commands::catalog_from_config(&config)?);

    let route = initial_route(config.base_path(), route.as_deref());
    info!(route = %route, "starting tui");
    let mut app = App::with_route(config.base_path(), route);

    let mut terminal = init_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app, catalog).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Run queued effects on tokio tasks; results come back over `tx`
fn spawn_effects(effects: Vec<Effect>, catalog: &Arc<Catalog>, tx: &mpsc::UnboundedSender<AppEvent>) {
    for effect in effects {
        let catalog = Arc::clone(catalog);
        let tx = tx.clone();
        tokio::spawn(async move {
            let event = run_effect(&catalog, effect).await;
            if tx.send(event).is_err() {
                warn!("app closed before fetch completed");
            }
        });
    }
}

/// Main event loop - handles input, applies fetch results, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, catalog: Arc<Catalog>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut last_tick = Instant::now();
    let mut last_sweep = Instant::now();

    while app.running {
        spawn_effects(app.take_effects(), &catalog, &tx);
        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        let timeout = if app.is_animating() { FRAME_RATE } else { TICK_RATE };
        if event::poll(timeout)? {
            match event::read()? {
                // Only handle key press events (ignore releases on Windows)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                }
                // Carousels re-measure on the next draw
                _ => {}
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick();
            last_tick = Instant::now();
        }
        if last_sweep.elapsed() >= SWEEP_INTERVAL {
            catalog.sweep();
            last_sweep = Instant::now();
        }
    }

    Ok(())
}
