//! Cinezy - terminal movie search with favorites, feedback notes and trailers
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! cinezy
//!
//! # CLI mode (for automation)
//! cinezy search "blade runner"
//! cinezy favorites add tt0083658
//! cinezy trailer tt0083658 --json
//! ```

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use cinezy::app::App;
use cinezy::cli::{self, Cli, Command, ExitCode, FavoritesCmd, Output};
use cinezy::commands;
use cinezy::config::Config;
use cinezy::storage::{KeyValueStore, MemoryStore};
use cinezy::tasks::{AppEvent, Services};
use cinezy::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        init_cli_logging(cli.verbose);
        let exit_code = run_cli(cli, &config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        let _guard = init_tui_logging();
        run_tui(config).await
    }
}

// =============================================================================
// Logging
// =============================================================================

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Logs go to stderr; stdout is reserved for command output
fn init_cli_logging(verbose: bool) {
    let default = if verbose { "cinezy=debug" } else { "cinezy=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(default))
        .with_target(false)
        .init();
}

/// The terminal belongs to ratatui, so TUI logs go to a daily file
fn init_tui_logging() -> Option<WorkerGuard> {
    let log_dir = dirs::data_dir()
        .map(|d| d.join("cinezy").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("cinezy").join("logs"));
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "cinezy.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter("cinezy=info"))
        .with_ansi(false)
        .with_target(false)
        .init();

    info!("cinezy v{} starting", env!("CARGO_PKG_VERSION"));
    Some(guard)
}

// =============================================================================
// CLI Mode
// =============================================================================

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config) -> ExitCode {
    let output = Output::new(&cli);

    let imdb_id = match &cli.command {
        Some(Command::Info(cmd)) => Some(cmd.imdb_id.as_str()),
        Some(Command::Trailer(cmd)) => Some(cmd.imdb_id.as_str()),
        Some(Command::Feedback(cmd)) => Some(cmd.imdb_id()),
        Some(Command::Favorites(
            FavoritesCmd::Add(arg) | FavoritesCmd::Remove(arg) | FavoritesCmd::Toggle(arg),
        )) => Some(arg.imdb_id.as_str()),
        _ => None,
    };
    if let Some(Err(e)) = imdb_id.map(cli::validate_imdb_id) {
        return output.error(e, ExitCode::InvalidArgs);
    }

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, config, &output).await,

        Some(Command::Info(cmd)) => commands::info_cmd(cmd, config, &output).await,

        Some(Command::Favorites(cmd)) => commands::favorites_cmd(cmd, config, &output).await,

        Some(Command::Feedback(cmd)) => commands::feedback_cmd(cmd, config, &output).await,

        Some(Command::Trailer(cmd)) => commands::trailer_cmd(cmd, config, &output).await,

        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave raw mode before the panic message is printed
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        default_hook(panic);
    }));
}

fn open_storage(config: &Config) -> Box<dyn KeyValueStore> {
    match commands::open_store(config) {
        Ok(store) => {
            info!(path = %store.path().display(), "storage ready");
            Box::new(store)
        }
        Err(e) => {
            warn!(error = %e, "storage unavailable, favorites and feedback will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

/// Run interactive TUI
async fn run_tui(config: Config) -> Result<()> {
    let services = Services::from_config(&config);
    let mut app = App::new(open_storage(&config)).with_default_search(config.default_search());

    install_panic_hook();
    let mut terminal = init_terminal()?;

    app.startup();
    let result = run_event_loop(&mut terminal, &mut app, &services).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    info!("cinezy exiting");
    result
}

/// Main event loop - handles input, dispatches work, applies results, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, services: &Services) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    while app.running {
        for action in app.drain_actions() {
            services.dispatch(action, tx.clone());
        }

        while let Ok(event) = rx.try_recv() {
            app.apply_event(event);
        }

        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout so background results show up
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}
