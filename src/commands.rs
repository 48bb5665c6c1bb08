//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the appropriate backend services.
//! Each handler takes CLI args, the loaded config and Output, returns ExitCode.

use std::io::BufRead;

use tracing::{debug, info};

use crate::api::{OmdbError, TrailerOutcome};
use crate::cli::{
    ExitCode, FavoriteChange, FavoritesCmd, FeedbackCmd, FeedbackEntry, InfoCmd, Output,
    SearchCmd, TrailerCmd, TrailerInfo,
};
use crate::config::Config;
use crate::launch::LaunchTarget;
use crate::models::MovieDetail;
use crate::storage::{FavoritesStore, FeedbackStore, FileStore, StorageError, Toggle};
use crate::tasks::Services;
use crate::ui::card::DELETE_PROMPT;

/// Open the key-value store named by the config, or the default one
pub fn open_store(config: &Config) -> Result<FileStore, StorageError> {
    match &config.storage_path {
        Some(path) => FileStore::open(path.clone()),
        None => FileStore::open_default(),
    }
}

/// Exit code for a failed OMDb lookup
fn lookup_failure(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<OmdbError>() {
        Some(OmdbError::Api(_)) => ExitCode::NotFound,
        _ => ExitCode::NetworkError,
    }
}

/// Exit code for a failed search: OMDb rejecting the term is the caller's problem
fn search_failure(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<OmdbError>() {
        Some(OmdbError::Api(_)) => ExitCode::InvalidArgs,
        _ => ExitCode::NetworkError,
    }
}

fn storage_failure(output: &Output, e: StorageError) -> ExitCode {
    output.error(format!("Storage error: {}", e), ExitCode::StorageError)
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let services = Services::from_config(config);

    output.info(format!("Searching for: {}", cmd.term));

    let term = cmd.term.trim();
    if term.is_empty() {
        return output.error("Search term is empty", ExitCode::InvalidArgs);
    }

    let mut summaries = match services
        .omdb
        .search_with_type(term, cmd.media_type.map(Into::into))
        .await
    {
        Ok(results) => results,
        Err(e) => return output.error(format!("Search failed: {}", e), search_failure(&e)),
    };
    summaries.truncate(cmd.limit);
    info!(term, results = summaries.len(), "search finished");

    let printed = if cmd.no_details {
        let text = summaries
            .iter()
            .map(|s| format!("{}  {}", s.imdb_id, s))
            .collect::<Vec<_>>()
            .join("\n");
        output.print_or(text, &summaries)
    } else {
        output.info(format!("Fetching details for {} titles...", summaries.len()));
        let details = services.omdb.enrich(&summaries).await;
        let text = details
            .iter()
            .map(|d| format!("{}  {}", d.imdb_id, d))
            .collect::<Vec<_>>()
            .join("\n");
        output.print_or(text, &details)
    };

    if let Err(e) = printed {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, config: &Config, output: &Output) -> ExitCode {
    let services = Services::from_config(config);

    output.info(format!("Getting info for: {}", cmd.imdb_id));

    match services.omdb.detail(&cmd.imdb_id).await {
        Ok(detail) => {
            if let Err(e) = output.print_or(describe(&detail), &detail) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Info failed: {}", e), lookup_failure(&e)),
    }
}

/// Multi-line human description of a title
fn describe(movie: &MovieDetail) -> String {
    let mut lines = vec![
        movie.to_string(),
        format!("Genre: {}", movie.genre_label()),
        format!("Duration: {}", movie.runtime_label()),
    ];
    if let Some(director) = &movie.director {
        lines.push(format!("Director: {}", director));
    }
    if let Some(actors) = &movie.actors {
        lines.push(format!("Cast: {}", actors));
    }
    lines.push(String::new());
    lines.push(movie.plot_or_default().to_string());
    lines.join("\n")
}

// =============================================================================
// Favorites Commands
// =============================================================================

pub async fn favorites_cmd(cmd: FavoritesCmd, config: &Config, output: &Output) -> ExitCode {
    let mut store = match open_store(config) {
        Ok(store) => store,
        Err(e) => return storage_failure(output, e),
    };
    let mut favorites = FavoritesStore::load(&store);

    let (imdb_id, want) = match cmd {
        FavoritesCmd::List => {
            let text = if favorites.is_empty() {
                "No favorite movies yet.".to_string()
            } else {
                favorites
                    .items()
                    .iter()
                    .map(|m| format!("{}  {}", m.imdb_id, m))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            if let Err(e) = output.print_or(text, favorites.items()) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            return ExitCode::Success;
        }
        FavoritesCmd::Add(arg) => (arg.imdb_id, Some(true)),
        FavoritesCmd::Remove(arg) => (arg.imdb_id, Some(false)),
        FavoritesCmd::Toggle(arg) => (arg.imdb_id, None),
    };

    let is_favorite = favorites.contains(&imdb_id);
    let want = want.unwrap_or(!is_favorite);

    if want == is_favorite {
        debug!(imdb_id = %imdb_id, favorite = want, "favorites unchanged");
        let change = FavoriteChange {
            imdb_id,
            favorite: want,
            changed: false,
        };
        return match output.print_or("Nothing to change", &change) {
            Ok(()) => ExitCode::Success,
            Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
        };
    }

    let movie = match favorites.get(&imdb_id) {
        Some(existing) => existing.clone(),
        None => {
            let services = Services::from_config(config);
            match services.omdb.detail(&imdb_id).await {
                Ok(detail) => detail,
                Err(e) => {
                    return output.error(format!("Lookup failed: {}", e), lookup_failure(&e))
                }
            }
        }
    };

    let title = movie.to_string();
    let toggled = favorites.toggle(movie);
    if let Err(e) = favorites.persist(&mut store) {
        return storage_failure(output, e);
    }
    info!(imdb_id = %imdb_id, ?toggled, "favorites updated");

    let text = match toggled {
        Toggle::Added => format!("Added to favorites: {}", title),
        Toggle::Removed => format!("Removed from favorites: {}", title),
    };
    let change = FavoriteChange {
        imdb_id,
        favorite: toggled == Toggle::Added,
        changed: true,
    };
    match output.print_or(text, &change) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Feedback Commands
// =============================================================================

pub async fn feedback_cmd(cmd: FeedbackCmd, config: &Config, output: &Output) -> ExitCode {
    let mut store = match open_store(config) {
        Ok(store) => store,
        Err(e) => return storage_failure(output, e),
    };

    match cmd {
        FeedbackCmd::Show(arg) => match FeedbackStore::get(&store, &arg.imdb_id) {
            Some(text) => {
                let entry = FeedbackEntry {
                    imdb_id: arg.imdb_id,
                    feedback: Some(text.clone()),
                };
                match output.print_or(text, &entry) {
                    Ok(()) => ExitCode::Success,
                    Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
                }
            }
            None => output.error(
                format!("No feedback saved for {}", arg.imdb_id),
                ExitCode::NotFound,
            ),
        },

        FeedbackCmd::Set(set) => match FeedbackStore::submit(&mut store, &set.imdb_id, &set.text) {
            Ok(true) => {
                info!(imdb_id = %set.imdb_id, "feedback saved");
                let entry = FeedbackEntry {
                    imdb_id: set.imdb_id,
                    feedback: Some(set.text),
                };
                match output.print_or("Feedback saved", &entry) {
                    Ok(()) => ExitCode::Success,
                    Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
                }
            }
            Ok(false) => output.error("Feedback text is empty", ExitCode::InvalidArgs),
            Err(e) => storage_failure(output, e),
        },

        FeedbackCmd::Delete(del) => {
            if FeedbackStore::get(&store, &del.imdb_id).is_none() {
                return output.error(
                    format!("No feedback saved for {}", del.imdb_id),
                    ExitCode::NotFound,
                );
            }

            if !del.yes {
                eprint!("{} [y/N] ", DELETE_PROMPT);
                if !confirm(&mut std::io::stdin().lock()) {
                    output.info("Cancelled");
                    return ExitCode::Success;
                }
            }

            if let Err(e) = FeedbackStore::delete(&mut store, &del.imdb_id) {
                return storage_failure(output, e);
            }
            info!(imdb_id = %del.imdb_id, "feedback deleted");

            let entry = FeedbackEntry {
                imdb_id: del.imdb_id,
                feedback: None,
            };
            match output.print_or("Feedback deleted", &entry) {
                Ok(()) => ExitCode::Success,
                Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
            }
        }
    }
}

/// Read one answer line; only y/yes (any case) confirms
fn confirm(input: &mut impl BufRead) -> bool {
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

// =============================================================================
// Trailer Command
// =============================================================================

pub async fn trailer_cmd(cmd: TrailerCmd, config: &Config, output: &Output) -> ExitCode {
    let services = Services::from_config(config);

    let movie = match services.omdb.detail(&cmd.imdb_id).await {
        Ok(detail) => detail,
        Err(e) => return output.error(format!("Lookup failed: {}", e), lookup_failure(&e)),
    };

    let query = movie.trailer_query();
    output.info(format!("Looking for: {}", query));
    let outcome = services.trailer.resolve(&query).await;

    let trailer = TrailerInfo {
        imdb_id: cmd.imdb_id,
        title: movie.title.clone(),
        query,
        url: outcome.url(),
        outcome: outcome.clone(),
    };
    if let Err(e) = output.print_or(&trailer.url, &trailer) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }

    let launcher = &services.launcher;
    if cmd.mpv {
        let TrailerOutcome::Found { video_id, .. } = &outcome else {
            return output.error("No playable trailer found", ExitCode::NotFound);
        };
        if !launcher.mpv_available().await {
            return output.error("mpv not found on PATH", ExitCode::Error);
        }
        output.info(format!("Playing in {}...", LaunchTarget::Mpv));
        let url = crate::api::trailer::watch_url(video_id);
        return match launcher.play(&url) {
            Ok(mut child) => match child.wait().await {
                Ok(_) => ExitCode::Success,
                Err(e) => output.error(format!("Player failed: {}", e), ExitCode::Error),
            },
            Err(e) => output.error(format!("Player failed: {}", e), ExitCode::Error),
        };
    }

    if cmd.open {
        if let Err(e) = launcher.launch(&outcome, LaunchTarget::Browser) {
            return output.error(format!("Could not open browser: {}", e), ExitCode::Error);
        }
    }

    ExitCode::Success
}
