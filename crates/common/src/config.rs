//! Client configuration types and loading
//!
//! Config precedence: explicit values > env vars > config file > defaults.
//! The API key is loaded from `AUTHPLATFORM_API_KEY` or `api_key_file`,
//! never stored in the TOML directly to avoid leaking secrets.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::Secret;
use crate::error::{Error, Result};

/// Env var holding the server-to-server API key
pub const API_KEY_ENV: &str = "AUTHPLATFORM_API_KEY";

/// Env var pointing at the config file
pub const CONFIG_PATH_ENV: &str = "AUTHPLATFORM_CONFIG";

/// Request timeout applied when the config does not set one
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connection settings for the auth platform client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Platform origin, e.g. `https://auth.example.com`
    pub base_url: String,
    /// Application the scoped endpoints live under
    pub application_id: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(skip)]
    pub api_key: Option<Secret<String>>,
    /// Path to a file containing the API key (alternative to the env var)
    #[serde(default)]
    pub api_key_file: Option<PathBuf>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ClientConfig {
    /// Build a config in code with default timeout and no API key.
    pub fn new(base_url: impl Into<String>, application_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            application_id: application_id.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            api_key: None,
            api_key_file: None,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the API key used when no bearer token is present.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// API key resolution order:
    /// 1. `AUTHPLATFORM_API_KEY` env var
    /// 2. `api_key_file` path from config
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: ClientConfig = toml::from_str(&contents)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            debug!("api key taken from environment");
            config.api_key = Some(Secret::new(key));
        } else if let Some(ref key_file) = config.api_key_file {
            let key = std::fs::read_to_string(key_file).map_err(|e| {
                Error::Config(format!(
                    "failed to read api_key_file {}: {e}",
                    key_file.display()
                ))
            })?;
            let key = key.trim().to_owned();
            if key.is_empty() {
                warn!(path = %key_file.display(), "api_key_file is empty, ignoring");
            } else {
                config.api_key = Some(Secret::new(key));
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants and normalize the base URL (trailing slashes removed).
    pub fn validate(&mut self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        let trimmed = self.base_url.trim_end_matches('/').len();
        self.base_url.truncate(trimmed);

        if self.application_id.trim().is_empty() {
            return Err(Error::Config("application_id must not be empty".into()));
        }

        if self.timeout_ms == 0 {
            return Err(Error::Config("timeout_ms must be greater than 0".into()));
        }

        Ok(())
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve config file path from CLI arg or `AUTHPLATFORM_CONFIG` env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from("authplatform.toml")
    }
}
