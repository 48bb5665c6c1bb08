//! Trailer lookup
//!
//! Finds a YouTube video id for "<title> <year> official trailer".
//! Scrapes the results page first, then asks an Invidious instance,
//! and finally gives up with the plain search-results URL.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";
pub const INVIDIOUS_BASE_URL: &str = "https://invidious.io.lol";

/// Errors from a single lookup path
#[derive(Error, Debug)]
pub enum TrailerError {
    #[error("No video id in response")]
    NoMatch,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Where a trailer was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailerSource {
    Scrape,
    Invidious,
}

/// Result of a trailer lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrailerOutcome {
    /// A playable video id
    Found {
        video_id: String,
        source: TrailerSource,
    },
    /// Nothing found; open this search page instead
    External { url: String },
}

impl TrailerOutcome {
    /// URL to hand to a browser for this outcome
    pub fn url(&self) -> String {
        match self {
            TrailerOutcome::Found { video_id, .. } => embed_url(video_id),
            TrailerOutcome::External { url } => url.clone(),
        }
    }
}

/// Autoplaying embed URL for a video id
pub fn embed_url(video_id: &str) -> String {
    format!(
        "{}/embed/{}?autoplay=1&mute=0&controls=1&rel=0&modestbranding=1",
        YOUTUBE_BASE_URL, video_id
    )
}

/// Plain watch URL (for local players)
pub fn watch_url(video_id: &str) -> String {
    format!("{}/watch?v={}", YOUTUBE_BASE_URL, video_id)
}

/// Public search-results page for a query
pub fn search_page_url(query: &str) -> String {
    format!(
        "{}/results?search_query={}",
        YOUTUBE_BASE_URL,
        urlencoding::encode(query)
    )
}

/// Pull the first `"videoId":"…"` out of a results page
pub fn extract_video_id(html: &str) -> Option<String> {
    let re = regex::Regex::new(r#""videoId":"([^"]+)""#).ok()?;
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Deserialize)]
struct InvidiousVideo {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// Trailer resolver with a primary scrape path and a JSON fallback
#[derive(Clone)]
pub struct TrailerClient {
    youtube_url: String,
    invidious_url: String,
    relay: Option<String>,
    client: reqwest::Client,
}

impl Default for TrailerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TrailerClient {
    pub fn new() -> Self {
        Self::with_urls(YOUTUBE_BASE_URL, INVIDIOUS_BASE_URL)
    }

    /// Create a client against custom endpoints (for testing)
    pub fn with_urls(youtube_url: impl Into<String>, invidious_url: impl Into<String>) -> Self {
        Self {
            youtube_url: youtube_url.into().trim_end_matches('/').to_string(),
            invidious_url: invidious_url.into().trim_end_matches('/').to_string(),
            relay: None,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Route the scrape request through a relay; the encoded target URL
    /// is appended to `prefix`
    pub fn with_relay(mut self, prefix: Option<String>) -> Self {
        self.relay = prefix.filter(|p| !p.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    /// Resolve a trailer for `query`. Never fails: the last resort is the
    /// external search page.
    pub async fn resolve(&self, query: &str) -> TrailerOutcome {
        match self.scrape(query).await {
            Ok(video_id) => {
                info!(query, %video_id, "trailer found by scrape");
                return TrailerOutcome::Found {
                    video_id,
                    source: TrailerSource::Scrape,
                };
            }
            Err(e) => warn!(query, error = %e, "trailer scrape failed"),
        }

        match self.invidious(query).await {
            Ok(video_id) => {
                info!(query, %video_id, "trailer found by invidious");
                TrailerOutcome::Found {
                    video_id,
                    source: TrailerSource::Invidious,
                }
            }
            Err(e) => {
                warn!(query, error = %e, "trailer fallback failed, opening search page");
                TrailerOutcome::External {
                    url: search_page_url(query),
                }
            }
        }
    }

    /// Primary path: HTML results page
    pub async fn scrape(&self, query: &str) -> Result<String, TrailerError> {
        let target = format!(
            "{}/results?search_query={}",
            self.youtube_url,
            urlencoding::encode(query)
        );
        let url = match &self.relay {
            Some(prefix) => format!("{}{}", prefix, urlencoding::encode(&target)),
            None => target,
        };
        debug!(%url, "trailer scrape");

        let response = self.client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(TrailerError::ServerError(response.status().as_u16()));
        }
        let html = response.text().await?;
        extract_video_id(&html).ok_or(TrailerError::NoMatch)
    }

    /// Secondary path: Invidious search API
    pub async fn invidious(&self, query: &str) -> Result<String, TrailerError> {
        let url = format!(
            "{}/api/v1/search?q={}&type=video",
            self.invidious_url,
            urlencoding::encode(query)
        );
        debug!(%url, "trailer invidious lookup");

        let response = self.client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(TrailerError::ServerError(response.status().as_u16()));
        }
        let body = response.text().await?;
        let videos: Vec<InvidiousVideo> = serde_json::from_str(&body)
            .map_err(|e| TrailerError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        videos
            .into_iter()
            .next()
            .and_then(|v| v.video_id)
            .filter(|id| !id.is_empty())
            .ok_or(TrailerError::NoMatch)
    }
}
