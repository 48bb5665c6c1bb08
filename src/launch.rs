//! Handing trailers off to the outside world
//!
//! Opens URLs in the system browser or plays them in a local mpv.

use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::info;

use crate::api::trailer::watch_url;
use crate::api::TrailerOutcome;

/// Where a trailer is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchTarget {
    /// System browser (default)
    #[default]
    Browser,
    /// mpv media player
    Mpv,
}

impl LaunchTarget {
    pub fn display_name(&self) -> &'static str {
        match self {
            LaunchTarget::Browser => "browser",
            LaunchTarget::Mpv => "mpv",
        }
    }
}

impl std::fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Errors from launching a URL
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start: {0}")]
    StartFailed(#[from] std::io::Error),
}

/// Hands a URL to the desktop
pub type Opener = fn(&str) -> std::io::Result<()>;

/// System browser, detached so the caller never waits on the launcher
fn open_detached(url: &str) -> std::io::Result<()> {
    open::that_detached(url)
}

/// Launches trailer URLs
#[derive(Debug, Clone, Default)]
pub struct Launcher {
    mpv_command: String,
    /// `None` means the system browser
    opener: Option<Opener>,
}

impl Launcher {
    pub fn new() -> Self {
        Self {
            mpv_command: "mpv".to_string(),
            opener: None,
        }
    }

    /// Use a different player binary (tests, non-standard installs)
    pub fn with_mpv_command(command: impl Into<String>) -> Self {
        Self {
            mpv_command: command.into(),
            opener: None,
        }
    }

    /// Route browser launches through `opener`
    pub fn with_opener(mut self, opener: Opener) -> Self {
        self.opener = Some(opener);
        self
    }

    fn mpv(&self) -> &str {
        if self.mpv_command.is_empty() {
            "mpv"
        } else {
            &self.mpv_command
        }
    }

    /// Check if mpv is on PATH
    pub async fn mpv_available(&self) -> bool {
        Command::new("which")
            .arg(self.mpv())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Open `url` in the system browser
    pub fn open_url(&self, url: &str) -> Result<(), LaunchError> {
        info!(url, "opening in browser");
        self.opener.unwrap_or(open_detached)(url)?;
        Ok(())
    }

    /// Start mpv on `url` without waiting for it to exit
    pub fn play(&self, url: &str) -> Result<Child, LaunchError> {
        info!(url, player = self.mpv(), "starting local player");
        let mut cmd = Command::new(self.mpv());
        cmd.arg(url)
            .arg("--force-window=immediate")
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LaunchError::NotFound(self.mpv().to_string())
            } else {
                LaunchError::StartFailed(e)
            }
        })
    }

    /// Send a resolved trailer to `target`.
    ///
    /// External outcomes always go to the browser: a search page is not playable.
    pub fn launch(&self, outcome: &TrailerOutcome, target: LaunchTarget) -> Result<(), LaunchError> {
        match (outcome, target) {
            (TrailerOutcome::Found { video_id, .. }, LaunchTarget::Mpv) => {
                self.play(&watch_url(video_id)).map(|_| ())
            }
            _ => self.open_url(&outcome.url()),
        }
    }
}
