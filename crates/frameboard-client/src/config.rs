//! Client configuration.

use std::env;

/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8601/api";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "FRAMEBOARD_BASE_URL";

/// Connection settings for the REST backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that endpoint paths are joined onto.
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read the base URL from [`BASE_URL_ENV`], falling back to the default.
    pub fn from_env() -> Self {
        match env::var(BASE_URL_ENV) {
            Ok(base_url) => Self { base_url },
            Err(_) => Self::default(),
        }
    }
}
