//! Configuration management for libris.
//!
//! Loads configuration from ${LIBRIS_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured API base URL.
pub const API_URL_ENV: &str = "LIBRIS_API_URL";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Write logs to `<home>/logs/` instead of stderr.
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Catalog page size sent as `limit`.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound of the owner dashboard fetch.
    ///
    /// Owned books are filtered client-side from a single fetch of this many
    /// entries, so owners with books beyond this window are under-reported.
    #[serde(default = "default_dashboard_limit")]
    pub dashboard_limit: u32,
    /// Per-request timeout; expiry surfaces as a network failure.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
    const DEFAULT_PAGE_SIZE: u32 = 12;
    const DEFAULT_DASHBOARD_LIMIT: u32 = 100;
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the API base URL with precedence: env > config > default.
    ///
    /// # Errors
    /// Returns an error if the chosen URL is not a valid absolute URL.
    pub fn resolved_api_base_url(&self) -> Result<String> {
        resolve_base_url(
            std::env::var(API_URL_ENV).ok().as_deref(),
            Some(&self.api_base_url),
            Self::DEFAULT_API_BASE_URL,
        )
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Page size, never zero.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            dashboard_limit: default_dashboard_limit(),
            request_timeout_secs: default_request_timeout_secs(),
            log: LogConfig::default(),
        }
    }
}

fn default_api_base_url() -> String {
    Config::DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    Config::DEFAULT_PAGE_SIZE
}

fn default_dashboard_limit() -> u32 {
    Config::DEFAULT_DASHBOARD_LIMIT
}

fn default_request_timeout_secs() -> u64 {
    Config::DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Picks the first non-empty candidate (env, then config), else the default.
fn resolve_base_url(
    env_url: Option<&str>,
    config_url: Option<&str>,
    default_url: &str,
) -> Result<String> {
    let chosen = [env_url, config_url]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(default_url);

    url::Url::parse(chosen).with_context(|| format!("Invalid API base URL: {chosen}"))?;
    Ok(chosen.trim_end_matches('/').to_string())
}

pub mod paths {
    //! Path resolution for libris configuration and data directories.
    //!
    //! LIBRIS_HOME resolution order:
    //! 1. LIBRIS_HOME environment variable (if set)
    //! 2. ~/.config/libris (default)

    use std::path::PathBuf;

    /// Returns the libris home directory.
    pub fn libris_home() -> PathBuf {
        if let Ok(home) = std::env::var("LIBRIS_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("libris"))
            .unwrap_or_else(|| PathBuf::from(".libris"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        libris_home().join("config.toml")
    }

    /// Returns the path of the persisted session credential.
    pub fn credential_path() -> PathBuf {
        libris_home().join("session.json")
    }

    /// Returns the log directory.
    pub fn logs_dir() -> PathBuf {
        libris_home().join("logs")
    }
}
