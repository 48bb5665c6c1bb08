//! OMDb (Open Movie Database) API client
//!
//! Title search and per-id detail lookups.
//! API docs: https://www.omdbapi.com

use anyhow::Result;
use futures::future::join_all;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{MediaType, MovieDetail, MovieSummary};

/// Default public endpoint
pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com";

/// OMDb API error types
#[derive(Error, Debug)]
pub enum OmdbError {
    /// OMDb answered `"Response":"False"` for a lookup
    #[error("OMDb error: {0}")]
    Api(String),

    #[error("Invalid API key (401)")]
    Unauthorized,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// OMDb API client
#[derive(Clone)]
pub struct OmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OmdbClient {
    /// Create a new OMDb client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, OMDB_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_timeout(api_key, base_url, Duration::from_secs(30))
    }

    /// Create a client with a custom base URL and request timeout
    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// GET `<base>/?apikey=<key>&<query>` and decode the JSON body
    async fn get<T: for<'de> Deserialize<'de>>(&self, query: &str) -> Result<T, OmdbError> {
        let url = format!("{}/?apikey={}&{}", self.base_url, self.api_key, query);
        debug!(query, "omdb request");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| OmdbError::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            StatusCode::UNAUTHORIZED => Err(OmdbError::Unauthorized),
            status => Err(OmdbError::ServerError(status.as_u16())),
        }
    }

    /// Search titles matching `term`
    pub async fn search(&self, term: &str) -> Result<Vec<MovieSummary>> {
        self.search_with_type(term, None).await
    }

    /// Search titles matching `term`, optionally restricted to one media type.
    ///
    /// "Movie not found!" is an empty result, not an error.
    pub async fn search_with_type(
        &self,
        term: &str,
        media_type: Option<MediaType>,
    ) -> Result<Vec<MovieSummary>> {
        let mut query = format!("s={}", urlencoding::encode(term));
        if let Some(t) = media_type.filter(|t| *t != MediaType::Other) {
            query.push_str("&type=");
            query.push_str(t.as_query());
        }

        let response: SearchResponse = self.get(&query).await?;
        Ok(response.into_results()?)
    }

    /// Look up one title by IMDb id
    pub async fn detail(&self, imdb_id: &str) -> Result<MovieDetail> {
        let query = format!("i={}&plot=short", urlencoding::encode(imdb_id));
        let response: DetailResponse = self.get(&query).await?;
        Ok(response.into_detail()?)
    }

    /// Enrich every summary with its detail record.
    ///
    /// Lookups run concurrently; the output has the same length and order as
    /// the input, and a failed lookup yields the summary itself.
    pub async fn enrich(&self, summaries: &[MovieSummary]) -> Vec<MovieDetail> {
        if summaries.is_empty() {
            return Vec::new();
        }

        let lookups = summaries.iter().map(|summary| async move {
            match self.detail(&summary.imdb_id).await {
                Ok(detail) => detail,
                Err(e) => {
                    warn!(imdb_id = %summary.imdb_id, error = %e, "detail lookup failed, using summary");
                    MovieDetail::from(summary.clone())
                }
            }
        });

        join_all(lookups).await
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<SummaryRaw>,
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl SearchResponse {
    fn into_results(self) -> Result<Vec<MovieSummary>, OmdbError> {
        if is_false(self.response.as_deref()) {
            let msg = self.error.unwrap_or_default();
            // No match is an ordinary empty result
            if msg.to_lowercase().contains("not found") {
                return Ok(Vec::new());
            }
            return Err(OmdbError::Api(msg));
        }

        Ok(self
            .search
            .into_iter()
            .map(SummaryRaw::into_summary)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct SummaryRaw {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "Type", default)]
    media_type: String,
}

impl SummaryRaw {
    fn into_summary(self) -> MovieSummary {
        MovieSummary {
            imdb_id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster: known(self.poster),
            media_type: MediaType::from_omdb(&self.media_type),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Type")]
    media_type: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl DetailResponse {
    fn into_detail(self) -> Result<MovieDetail, OmdbError> {
        if is_false(self.response.as_deref()) {
            return Err(OmdbError::Api(self.error.unwrap_or_default()));
        }

        let imdb_id = self
            .imdb_id
            .ok_or_else(|| OmdbError::InvalidResponse("missing imdbID".into()))?;

        Ok(MovieDetail {
            imdb_id,
            title: self.title.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            poster: known(self.poster),
            media_type: self
                .media_type
                .as_deref()
                .map(MediaType::from_omdb)
                .unwrap_or_default(),
            genre: known(self.genre),
            runtime: known(self.runtime),
            plot: known(self.plot),
            imdb_rating: known(self.imdb_rating),
            director: known(self.director),
            actors: known(self.actors),
            released: known(self.released),
        })
    }
}

fn is_false(response: Option<&str>) -> bool {
    response.map(|r| r.eq_ignore_ascii_case("false")).unwrap_or(false)
}

/// OMDb uses the literal "N/A" for unknown fields
fn known(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_filters_na() {
        assert_eq!(known(Some("N/A".into())), None);
        assert_eq!(known(Some(String::new())), None);
        assert_eq!(known(None), None);
        assert_eq!(known(Some("8.0".into())), Some("8.0".into()));
    }

    #[test]
    fn test_search_not_found_is_empty() {
        let raw: SearchResponse =
            serde_json::from_str(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap();
        assert!(raw.into_results().unwrap().is_empty());
    }

    #[test]
    fn test_search_other_error_is_err() {
        let raw: SearchResponse =
            serde_json::from_str(r#"{"Response":"False","Error":"Too many results."}"#).unwrap();
        assert!(matches!(raw.into_results(), Err(OmdbError::Api(_))));
    }

    #[test]
    fn test_summary_poster_na_is_none() {
        let raw = SummaryRaw {
            imdb_id: "tt1".into(),
            title: "No Poster".into(),
            year: "1999".into(),
            poster: Some("N/A".into()),
            media_type: "movie".into(),
        };
        let summary = raw.into_summary();
        assert!(summary.poster.is_none());
        assert_eq!(summary.media_type, MediaType::Movie);
    }

    #[test]
    fn test_detail_false_response_is_err() {
        let raw: DetailResponse =
            serde_json::from_str(r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#).unwrap();
        match raw.into_detail() {
            Err(OmdbError::Api(msg)) => assert_eq!(msg, "Incorrect IMDb ID."),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_detail_missing_id_is_invalid() {
        let raw: DetailResponse = serde_json::from_str(r#"{"Title":"Orphan"}"#).unwrap();
        assert!(matches!(raw.into_detail(), Err(OmdbError::InvalidResponse(_))));
    }
}
