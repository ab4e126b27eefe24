//! Environment configuration.
//!
//! All settings come from `RANGEMARK_*` environment variables with defaults
//! that suit local and test environments only; a production deployment must
//! set at least [`ENV_API`] and [`ENV_TOKEN`].
//!
//! # API pattern
//!
//! - [`Config::from_lookup`] takes an explicit variable lookup; used in tests.
//! - [`Config::from_env`] reads the process environment, delegates to
//!   `from_lookup`.
//!
//! Tests must NEVER call `from_env`; always inject a lookup.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::Marker;

/// Inventory API endpoint URL.
pub const ENV_API: &str = "RANGEMARK_API";
/// API token sent as `Authorization: Token <value>`.
pub const ENV_TOKEN: &str = "RANGEMARK_TOKEN";
/// Optional path to a PEM trust anchor for TLS verification.
pub const ENV_CA_CERT: &str = "RANGEMARK_CA_CERT";
/// Management marker substring override.
pub const ENV_MARKER: &str = "RANGEMARK_MARKER";
/// Per-call HTTP deadline in seconds.
pub const ENV_TIMEOUT_SECS: &str = "RANGEMARK_TIMEOUT_SECS";
/// Retry attempts for fetch/patch calls; 0 disables retries.
pub const ENV_RETRIES: &str = "RANGEMARK_RETRIES";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TOKEN: &str = "0123456789abcdef0123456789abcdef01234567";
pub const DEFAULT_MARKER: &str = "// managed by rangemark";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved runtime configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token: String,
    pub ca_cert: Option<PathBuf>,
    pub marker: Marker,
    pub timeout: Duration,
    pub retries: u32,
}

/// Errors from environment parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric variable held something that is not a non-negative integer.
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an explicit variable lookup.
    ///
    /// Empty values count as unset, so `RANGEMARK_CA_CERT=""` behaves like an
    /// absent variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let api_url = get(ENV_API)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let token = get(ENV_TOKEN).unwrap_or_else(|| DEFAULT_TOKEN.to_string());
        let ca_cert = get(ENV_CA_CERT).map(PathBuf::from);
        let marker = Marker::new(get(ENV_MARKER).unwrap_or_else(|| DEFAULT_MARKER.to_string()));
        let timeout_secs = parse_number(ENV_TIMEOUT_SECS, get(ENV_TIMEOUT_SECS))?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let retries = parse_number(ENV_RETRIES, get(ENV_RETRIES))?.unwrap_or(0) as u32;

        Ok(Self {
            api_url,
            token,
            ca_cert,
            marker,
            timeout: Duration::from_secs(timeout_secs),
            retries,
        })
    }
}

fn parse_number(key: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
    }
}
