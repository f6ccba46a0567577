//! API configuration read from the environment.

use std::env;
use std::time::Duration;

pub const BASE_URL_ENV: &str = "MPFM_API_BASE_URL";
pub const POLL_INTERVAL_ENV: &str = "MPFM_POLL_INTERVAL_SECS";
pub const TIMEOUT_ENV: &str = "MPFM_HTTP_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Configuration loading error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `https://mpfm.example.com/api`.
    pub base_url: String,
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration baked in at compile time, for WASM builds where
    /// there is no process environment.
    pub fn compiled() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                BASE_URL_ENV => option_env!("MPFM_API_BASE_URL"),
                POLL_INTERVAL_ENV => option_env!("MPFM_POLL_INTERVAL_SECS"),
                TIMEOUT_ENV => option_env!("MPFM_HTTP_TIMEOUT_SECS"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    /// Build configuration from any key lookup. Unset or blank keys take
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = match read(BASE_URL_ENV) {
            Some(url) => validate_base_url(&url)?,
            None => DEFAULT_BASE_URL.to_string(),
        };
        let poll_secs = read_u64(read(POLL_INTERVAL_ENV), POLL_INTERVAL_ENV, DEFAULT_POLL_INTERVAL_SECS)?
            .max(MIN_POLL_INTERVAL_SECS);
        let timeout_secs = read_u64(read(TIMEOUT_ENV), TIMEOUT_ENV, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid(TIMEOUT_ENV.to_string(), "0".to_string()));
        }

        Ok(Self {
            base_url,
            poll_interval: Duration::from_secs(poll_secs),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn read_u64(value: Option<String>, key: &str, default: u64) -> Result<u64, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), raw)),
        None => Ok(default),
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = || ConfigError::Invalid(BASE_URL_ENV.to_string(), raw.to_string());
    let url = reqwest::Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}
