//! CLI - Command Line Interface for Cinezy
//!
//! Every TUI action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search with full details
//! cinezy search "the matrix" --json
//!
//! # Favorites and feedback
//! cinezy favorites add tt0133093
//! cinezy feedback set tt0133093 "Still holds up"
//!
//! # Trailers
//! cinezy trailer tt0133093 --open
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::MediaType;

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
    /// Title or saved entry not found
    NotFound = 4,
    /// Storage file could not be read or written
    StorageError = 5,
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

/// Cinezy - search movies, keep favorites, leave notes, watch trailers
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "cinezy",
    version,
    about = "Terminal movie search with favorites, feedback notes and trailers",
    long_about = "Search OMDb from the terminal, browse results as cards, \
                  keep a favorites list, attach a note to any title \
                  and open its trailer.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  cinezy                               Launch interactive TUI\n\
                  cinezy search \"blade runner\"         Search with details\n\
                  cinezy favorites toggle tt0083658    Add or remove a favorite\n\
                  cinezy trailer tt0083658 --mpv       Play the trailer in mpv"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

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
    /// Search for movies and shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get details for one title
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List or change favorites
    #[command(visible_alias = "fav", subcommand)]
    Favorites(FavoritesCmd),

    /// Show, set or delete the feedback note for a title
    #[command(visible_alias = "fb", subcommand)]
    Feedback(FeedbackCmd),

    /// Find a title's trailer
    #[command(visible_alias = "tr")]
    Trailer(TrailerCmd),
}

// =============================================================================
// Search Command
// =============================================================================

/// Search titles by name
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search term
    #[arg(required = true)]
    pub term: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: usize,

    /// Skip the per-title detail lookups
    #[arg(long)]
    pub no_details: bool,

    /// Filter by media type
    #[arg(long = "type", short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,
}

/// Media type filter for search
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeFilter {
    /// Movies only
    Movie,
    /// Series only
    Series,
    /// Episodes only
    Episode,
}

impl From<MediaTypeFilter> for MediaType {
    fn from(filter: MediaTypeFilter) -> Self {
        match filter {
            MediaTypeFilter::Movie => MediaType::Movie,
            MediaTypeFilter::Series => MediaType::Series,
            MediaTypeFilter::Episode => MediaType::Episode,
        }
    }
}

// =============================================================================
// Info Command
// =============================================================================

/// Get the full record for a title
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// IMDB ID (e.g., tt0848228)
    #[arg(required = true)]
    pub imdb_id: String,
}

// =============================================================================
// Favorites Commands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum FavoritesCmd {
    /// List saved favorites
    #[command(visible_alias = "ls")]
    List,

    /// Add a title (no-op if already a favorite)
    Add(ImdbIdArg),

    /// Remove a title (no-op if not a favorite)
    #[command(visible_alias = "rm")]
    Remove(ImdbIdArg),

    /// Add the title if missing, remove it otherwise
    Toggle(ImdbIdArg),
}

/// A single IMDB ID argument
#[derive(Args, Debug)]
pub struct ImdbIdArg {
    /// IMDB ID (e.g., tt0848228)
    #[arg(required = true)]
    pub imdb_id: String,
}

// =============================================================================
// Feedback Commands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum FeedbackCmd {
    /// Print the saved note
    Show(ImdbIdArg),

    /// Save a note, replacing any previous one
    Set(FeedbackSetCmd),

    /// Delete the saved note
    #[command(visible_alias = "rm")]
    Delete(FeedbackDeleteCmd),
}

#[derive(Args, Debug)]
pub struct FeedbackSetCmd {
    /// IMDB ID (e.g., tt0848228)
    #[arg(required = true)]
    pub imdb_id: String,

    /// Note text
    #[arg(required = true)]
    pub text: String,
}

#[derive(Args, Debug)]
pub struct FeedbackDeleteCmd {
    /// IMDB ID (e.g., tt0848228)
    #[arg(required = true)]
    pub imdb_id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl FeedbackCmd {
    /// IMDB ID the command targets
    pub fn imdb_id(&self) -> &str {
        match self {
            FeedbackCmd::Show(arg) => &arg.imdb_id,
            FeedbackCmd::Set(cmd) => &cmd.imdb_id,
            FeedbackCmd::Delete(cmd) => &cmd.imdb_id,
        }
    }
}

// =============================================================================
// Trailer Command
// =============================================================================

/// Resolve a title's trailer
#[derive(Args, Debug)]
pub struct TrailerCmd {
    /// IMDB ID (e.g., tt0848228)
    #[arg(required = true)]
    pub imdb_id: String,

    /// Open the trailer in the browser
    #[arg(long, short = 'o')]
    pub open: bool,

    /// Play the trailer in mpv
    #[arg(long, conflicts_with = "open")]
    pub mpv: bool,
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

/// Result of a favorites change
#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteChange {
    pub imdb_id: String,
    pub favorite: bool,
    /// False when the list already had the requested state
    pub changed: bool,
}

/// Resolved trailer for one title
#[derive(Debug, Serialize)]
pub struct TrailerInfo {
    pub imdb_id: String,
    pub title: String,
    pub query: String,
    /// URL opened by `--open`
    pub url: String,
    #[serde(flatten)]
    pub outcome: crate::api::TrailerOutcome,
}

/// Saved feedback for one title
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub imdb_id: String,
    pub feedback: Option<String>,
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
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a plain line for humans, or `data` as JSON
    pub fn print_or<T: Serialize>(&self, text: impl std::fmt::Display, data: T) -> anyhow::Result<()> {
        if self.json {
            self.print(data)
        } else {
            println!("{}", text);
            Ok(())
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
// IMDB ID Validation
// =============================================================================

/// Validate IMDB ID format (tt followed by digits)
pub fn validate_imdb_id(id: &str) -> Result<&str, &'static str> {
    if id.starts_with("tt") && id.len() >= 9 && id[2..].chars().all(|c| c.is_ascii_digit()) {
        Ok(id)
    } else {
        Err("Invalid IMDB ID format (expected tt followed by 7+ digits)")
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
        let cli = Cli::parse_from::<_, &str>([]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["cinezy", "search", "heat", "--type", "series", "--no-details"]);
        assert!(cli.is_cli_mode());
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.term, "heat");
            assert_eq!(cmd.limit, 10);
            assert!(cmd.no_details);
            assert_eq!(cmd.media_type, Some(MediaTypeFilter::Series));
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "cinezy",
            "--json",
            "--quiet",
            "--verbose",
            "--config",
            "/tmp/cinezy.toml",
            "search",
            "test",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/cinezy.toml")));
    }

    #[test]
    fn test_favorites_subcommands() {
        let cli = Cli::parse_from(["cinezy", "favorites", "toggle", "tt0848228"]);
        match cli.command {
            Some(Command::Favorites(FavoritesCmd::Toggle(arg))) => {
                assert_eq!(arg.imdb_id, "tt0848228")
            }
            other => panic!("Expected favorites toggle, got {:?}", other),
        }

        let cli = Cli::parse_from(["cinezy", "fav", "ls"]);
        assert!(matches!(
            cli.command,
            Some(Command::Favorites(FavoritesCmd::List))
        ));
    }

    #[test]
    fn test_feedback_delete_yes() {
        let cli = Cli::parse_from(["cinezy", "feedback", "delete", "tt0848228", "--yes"]);
        match cli.command {
            Some(Command::Feedback(cmd)) => {
                assert_eq!(cmd.imdb_id(), "tt0848228");
                assert!(matches!(cmd, FeedbackCmd::Delete(FeedbackDeleteCmd { yes: true, .. })));
            }
            other => panic!("Expected feedback delete, got {:?}", other),
        }
    }

    #[test]
    fn test_trailer_open_and_mpv_conflict() {
        let result = Cli::try_parse_from(["cinezy", "trailer", "tt0848228", "--open", "--mpv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_media_type_filter_maps() {
        assert_eq!(MediaType::from(MediaTypeFilter::Movie), MediaType::Movie);
        assert_eq!(MediaType::from(MediaTypeFilter::Episode), MediaType::Episode);
    }

    #[test]
    fn test_validate_imdb_id() {
        assert!(validate_imdb_id("tt0848228").is_ok());
        assert!(validate_imdb_id("tt12345678").is_ok());
        assert!(validate_imdb_id("tt123456").is_err()); // too short
        assert!(validate_imdb_id("nm1234567").is_err()); // wrong prefix
        assert!(validate_imdb_id("1234567").is_err()); // no prefix
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::StorageError), 5);
    }
}
