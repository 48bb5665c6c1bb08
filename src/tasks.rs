//! Background work for the TUI
//!
//! The app never awaits network calls itself. Key handlers queue an
//! [`Action`]; the event loop hands each one to [`Services::dispatch`],
//! which spawns a task that reports back with an [`AppEvent`] over an
//! unbounded channel drained once per tick.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, warn};

use crate::api::{OmdbClient, TrailerClient, TrailerOutcome};
use crate::config::Config;
use crate::launch::{LaunchTarget, Launcher};
use crate::models::{MovieDetail, MovieSummary};

/// Work requested by the app
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Title search, tagged with the generation that issued it
    Search { generation: u64, term: String },
    /// One detail lookup per summary
    Enrich {
        generation: u64,
        summaries: Vec<MovieSummary>,
    },
    /// Find a trailer for a card
    ResolveTrailer { imdb_id: String, query: String },
    /// Detail lookup for a favorite that was added from a bare summary
    EnrichFavorite(MovieDetail),
    /// Hand a trailer outcome to the browser or a local player
    Launch {
        outcome: TrailerOutcome,
        target: LaunchTarget,
    },
}

/// Completed work reported back to the app
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SearchFinished {
        generation: u64,
        result: Result<Vec<MovieSummary>, String>,
    },
    DetailsFinished {
        generation: u64,
        details: Vec<MovieDetail>,
    },
    TrailerResolved {
        imdb_id: String,
        outcome: TrailerOutcome,
    },
    FavoriteEnriched(MovieDetail),
    LaunchFailed(String),
}

/// Clients shared by every spawned task
#[derive(Clone)]
pub struct Services {
    pub omdb: OmdbClient,
    pub trailer: TrailerClient,
    pub launcher: Launcher,
}

impl Services {
    pub fn new(omdb: OmdbClient, trailer: TrailerClient, launcher: Launcher) -> Self {
        Self {
            omdb,
            trailer,
            launcher,
        }
    }

    /// Build clients from config (API key chain, timeouts, trailer endpoints)
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.request_timeout();
        let omdb = OmdbClient::with_timeout(
            config.omdb_api_key(),
            config
                .omdb_url
                .as_deref()
                .unwrap_or(crate::api::omdb::OMDB_BASE_URL),
            timeout,
        );

        let trailer = match &config.invidious_url {
            Some(url) => {
                TrailerClient::with_urls(crate::api::trailer::YOUTUBE_BASE_URL, url.clone())
            }
            None => TrailerClient::new(),
        }
        .with_relay(config.trailer_relay.clone())
        .with_timeout(timeout);

        Self::new(omdb, trailer, Launcher::new())
    }

    /// Run `action` in the background, sending its result on `tx`
    pub fn dispatch(&self, action: Action, tx: UnboundedSender<AppEvent>) {
        debug!(?action, "dispatching");
        match action {
            Action::Search { generation, term } => {
                let omdb = self.omdb.clone();
                tokio::spawn(async move {
                    let result = omdb.search(&term).await.map_err(|e| {
                        debug!(term = %term, error = %e, "search request failed");
                        e.to_string()
                    });
                    send(&tx, AppEvent::SearchFinished { generation, result });
                });
            }
            Action::Enrich {
                generation,
                summaries,
            } => {
                let omdb = self.omdb.clone();
                tokio::spawn(async move {
                    let details = omdb.enrich(&summaries).await;
                    send(&tx, AppEvent::DetailsFinished { generation, details });
                });
            }
            Action::ResolveTrailer { imdb_id, query } => {
                let trailer = self.trailer.clone();
                tokio::spawn(async move {
                    let outcome = trailer.resolve(&query).await;
                    send(&tx, AppEvent::TrailerResolved { imdb_id, outcome });
                });
            }
            Action::EnrichFavorite(movie) => {
                let omdb = self.omdb.clone();
                tokio::spawn(async move {
                    match omdb.detail(&movie.imdb_id).await {
                        Ok(detail) => send(&tx, AppEvent::FavoriteEnriched(detail)),
                        Err(e) => {
                            warn!(imdb_id = %movie.imdb_id, error = %e, "favorite keeps summary record")
                        }
                    }
                });
            }
            Action::Launch { outcome, target } => {
                if let Err(e) = self.launcher.launch(&outcome, target) {
                    error!(error = %e, %target, "launch failed");
                    send(&tx, AppEvent::LaunchFailed(e.to_string()));
                }
            }
        }
    }
}

fn send(tx: &UnboundedSender<AppEvent>, event: AppEvent) {
    if tx.send(event).is_err() {
        debug!("event receiver dropped");
    }
}
