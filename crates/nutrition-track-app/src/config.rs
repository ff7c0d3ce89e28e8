//! Runtime configuration.
//!
//! Every field has a default matching the deployed page. Overrides come from a
//! key lookup so the same parser serves `std::env` on the host and
//! compile-time `option_env!` values in the browser build.

use nutrition_track_auth::SESSION_STORAGE_KEY;
use nutrition_track_core::DEFAULT_MAX_UPLOAD_BYTES;
use nutrition_track_upload::{DEFAULT_ANALYZE_ENDPOINT, validate_endpoint};
use thiserror::Error;

/// Override key for [`AppConfig::endpoint`].
pub const ENV_ENDPOINT: &str = "NUTRITION_TRACK_ENDPOINT";
/// Override key for [`AppConfig::storage_key`].
pub const ENV_STORAGE_KEY: &str = "NUTRITION_TRACK_STORAGE_KEY";
/// Override key for [`AppConfig::max_upload_bytes`].
pub const ENV_MAX_UPLOAD_BYTES: &str = "NUTRITION_TRACK_MAX_UPLOAD_BYTES";
/// Override key for [`AppConfig::reveal_delay_ms`].
pub const ENV_REVEAL_DELAY_MS: &str = "NUTRITION_TRACK_REVEAL_DELAY_MS";
/// Override key for [`AppConfig::notification_ttl_ms`].
pub const ENV_NOTIFICATION_TTL_MS: &str = "NUTRITION_TRACK_NOTIFICATION_TTL_MS";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Analysis endpoint (absolute URL or origin-relative path).
    pub endpoint: String,
    /// Storage key for the session record.
    pub storage_key: String,
    /// Largest accepted image, in bytes.
    pub max_upload_bytes: usize,
    /// Delay before a mounted region fades in.
    pub reveal_delay_ms: u32,
    /// Lifetime of a notification.
    pub notification_ttl_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ANALYZE_ENDPOINT.to_string(),
            storage_key: SESSION_STORAGE_KEY.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            reveal_delay_ms: 100,
            notification_ttl_ms: 3_000,
        }
    }
}

impl AppConfig {
    /// Builds a config from defaults plus any overrides `lookup` returns.
    ///
    /// Blank override values are ignored.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for unparsable numbers, an invalid endpoint, or
    /// a zero upload limit.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(endpoint) = value(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        if let Some(storage_key) = value(ENV_STORAGE_KEY) {
            config.storage_key = storage_key;
        }
        if let Some(raw) = value(ENV_MAX_UPLOAD_BYTES) {
            config.max_upload_bytes = parse_number(ENV_MAX_UPLOAD_BYTES, &raw)?;
        }
        if let Some(raw) = value(ENV_REVEAL_DELAY_MS) {
            config.reveal_delay_ms = parse_number(ENV_REVEAL_DELAY_MS, &raw)?;
        }
        if let Some(raw) = value(ENV_NOTIFICATION_TTL_MS) {
            config.notification_ttl_ms = parse_number(ENV_NOTIFICATION_TTL_MS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Builds a config from process environment variables.
    ///
    /// # Errors
    /// See [`AppConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Checks cross-field invariants.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEndpoint`] or
    /// [`ConfigError::ZeroUploadLimit`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(&self.endpoint)
            .map_err(|error| ConfigError::InvalidEndpoint(error.to_string()))?;
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        Ok(())
    }
}

fn parse_number<N: std::str::FromStr>(key: &'static str, raw: &str) -> Result<N, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric override did not parse.
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        /// Override key.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
    /// The endpoint failed validation.
    #[error("{0}")]
    InvalidEndpoint(String),
    /// The upload limit is zero.
    #[error("upload limit must be greater than zero")]
    ZeroUploadLimit,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        let config = AppConfig::from_lookup(|_| None).expect("defaults should validate");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.endpoint, "/analyze");
        assert_eq!(config.storage_key, "nutritiontrack_user");
    }

    #[test]
    fn applies_overrides_and_ignores_blanks() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_ENDPOINT, "https://food.example.test/analyze"),
            (ENV_STORAGE_KEY, "  "),
            (ENV_NOTIFICATION_TTL_MS, "5000"),
        ]))
        .expect("overrides should validate");
        assert_eq!(config.endpoint, "https://food.example.test/analyze");
        assert_eq!(config.storage_key, "nutritiontrack_user");
        assert_eq!(config.notification_ttl_ms, 5_000);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_MAX_UPLOAD_BYTES, "lots")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert_eq!(
            AppConfig::from_lookup(lookup(&[(ENV_MAX_UPLOAD_BYTES, "0")])),
            Err(ConfigError::ZeroUploadLimit)
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_ENDPOINT, "analyze")])),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }
}
