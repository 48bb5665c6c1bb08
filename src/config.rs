//! Configuration management for Cinezy
//!
//! Handles config file loading and API key resolution.
//! Config is stored at ~/.config/cinezy/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bundled public OMDb key used when nothing else is configured
const BUNDLED_OMDB_KEY: &str = "45aa9a43";

/// Search issued when the app starts
pub const DEFAULT_SEARCH: &str = "Avengers";

/// Default HTTP request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// OMDb API key
    pub omdb_api_key: Option<String>,
    /// OMDb-compatible endpoint
    pub omdb_url: Option<String>,
    /// Term searched on startup
    pub default_search: Option<String>,
    /// Prefix prepended to the encoded results-page URL (e.g. a CORS relay)
    pub trailer_relay: Option<String>,
    /// Invidious instance used as trailer fallback
    pub invidious_url: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Override for the key-value storage file
    pub storage_path: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/cinezy/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinezy").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load config from an explicit path. Missing or invalid files give defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Get OMDb API key with fallback chain:
    /// 1. Environment variable OMDB_API_KEY
    /// 2. Key from config file
    /// 3. Bundled public key
    pub fn omdb_api_key(&self) -> String {
        if let Ok(key) = std::env::var("OMDB_API_KEY") {
            if !key.trim().is_empty() {
                return key;
            }
        }

        self.omdb_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| BUNDLED_OMDB_KEY.to_string())
    }

    /// Startup search term
    pub fn default_search(&self) -> &str {
        self.default_search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SEARCH)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|&s| s > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.omdb_api_key.is_none());
        assert_eq!(config.default_search(), "Avengers");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_configured_values_win() {
        let config = Config {
            default_search: Some("Alien".into()),
            request_timeout_secs: Some(5),
            ..Default::default()
        };
        assert_eq!(config.default_search(), "Alien");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_blank_search_uses_default() {
        let config = Config {
            default_search: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(config.default_search(), DEFAULT_SEARCH);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "omdb_api_key = \"abc123\"\ntrailer_relay = \"https://corsproxy.io/?\"\nrequest_timeout_secs = 10\n",
        )
        .unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.omdb_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.trailer_relay.as_deref(), Some("https://corsproxy.io/?"));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.default_search(), DEFAULT_SEARCH);
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn test_load_invalid_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
