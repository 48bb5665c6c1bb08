//! Data structures and types for Cinezy
//!
//! Shared models used across the application:
//! - **Search**: OMDb summary records returned by a title search
//! - **Detail**: enriched records returned by a per-id lookup
//! - **Presentation**: rating tiers and view tabs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder artwork used when OMDb has no poster
pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/300x450";

/// Shown on cards whose record has no plot
pub const DEFAULT_PLOT: &str = "An unforgettable cinematic experience.";

// =============================================================================
// Search Models
// =============================================================================

/// OMDb `Type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Series,
    Episode,
    Game,
    #[serde(other)]
    Other,
}

impl MediaType {
    /// Parse OMDb's `Type` string, unknown values map to `Other`
    pub fn from_omdb(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "movie" => MediaType::Movie,
            "series" => MediaType::Series,
            "episode" => MediaType::Episode,
            "game" => MediaType::Game,
            _ => MediaType::Other,
        }
    }

    /// Value OMDb expects in its `type=` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Episode => "episode",
            MediaType::Game => "game",
            MediaType::Other => "",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Series => write!(f, "Series"),
            MediaType::Episode => write!(f, "Episode"),
            MediaType::Game => write!(f, "Game"),
            MediaType::Other => write!(f, "Other"),
        }
    }
}

/// Minimal record returned by a title search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub imdb_id: String,
    pub title: String,
    /// OMDb years are text and may be ranges ("2011–2019")
    pub year: String,
    pub poster: Option<String>,
    pub media_type: MediaType,
}

impl fmt::Display for MovieSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.title, self.year, self.media_type)
    }
}

// =============================================================================
// Detail Models
// =============================================================================

/// Enriched record from a per-id lookup.
///
/// Every enrichment field is optional: a record built from a
/// [`MovieSummary`] (when the lookup failed) simply has none of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: Option<String>,
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
}

impl From<MovieSummary> for MovieDetail {
    fn from(summary: MovieSummary) -> Self {
        Self {
            imdb_id: summary.imdb_id,
            title: summary.title,
            year: summary.year,
            poster: summary.poster,
            media_type: summary.media_type,
            genre: None,
            runtime: None,
            plot: None,
            imdb_rating: None,
            director: None,
            actors: None,
            released: None,
        }
    }
}

impl MovieDetail {
    /// True if this record carries any field only a detail lookup provides
    pub fn is_enriched(&self) -> bool {
        self.genre.is_some()
            || self.runtime.is_some()
            || self.plot.is_some()
            || self.imdb_rating.is_some()
    }

    /// Plot text, or the stock line when unknown
    pub fn plot_or_default(&self) -> &str {
        self.plot.as_deref().unwrap_or(DEFAULT_PLOT)
    }

    /// Genre, falling back to the media type
    pub fn genre_label(&self) -> String {
        self.genre
            .clone()
            .unwrap_or_else(|| self.media_type.to_string())
    }

    /// Runtime, falling back to the year
    pub fn runtime_label(&self) -> &str {
        self.runtime.as_deref().unwrap_or(&self.year)
    }

    /// Poster URL, or the placeholder
    pub fn poster_or_placeholder(&self) -> &str {
        self.poster.as_deref().unwrap_or(POSTER_PLACEHOLDER)
    }

    /// Rating tier for the badge, if a rating is present
    pub fn rating_tier(&self) -> Option<RatingTier> {
        self.imdb_rating.as_deref().map(RatingTier::from_rating)
    }

    /// Query used for trailer lookups
    pub fn trailer_query(&self) -> String {
        format!("{} {} official trailer", self.title, self.year)
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)?;
        if let Some(runtime) = &self.runtime {
            write!(f, " - {}", runtime)?;
        }
        if let Some(rating) = &self.imdb_rating {
            write!(f, " - ⭐ {}", rating)?;
        }
        Ok(())
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Rating badge band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTier {
    /// 8.5 and above
    High,
    /// 7.5 up to 8.5
    Mid,
    /// Everything else, including unparsable ratings
    Low,
}

impl RatingTier {
    pub fn from_rating(rating: &str) -> Self {
        match rating.trim().parse::<f32>() {
            Ok(n) if n >= 8.5 => RatingTier::High,
            Ok(n) if n >= 7.5 => RatingTier::Mid,
            _ => RatingTier::Low,
        }
    }
}

/// Top-level view tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Search,
    Favorites,
}

impl Tab {
    pub fn toggle(self) -> Self {
        match self {
            Tab::Search => Tab::Favorites,
            Tab::Favorites => Tab::Search,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
