//! API clients for external services
//!
//! - OMDb: movie search and per-title details
//! - Trailer: YouTube scrape with Invidious fallback

pub mod omdb;
pub mod trailer;

pub use omdb::{OmdbClient, OmdbError};
pub use trailer::{TrailerClient, TrailerOutcome, TrailerSource};
