//! Request-layer configuration resolved once at startup.
//!
//! The browser has no process environment, so values are baked in at build
//! time through `option_env!` and parsed by [`ApiConfig::from_values`].
//! Unset or blank values take their defaults; malformed ones are errors.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown SENTINEL_AUTH_MODE: {0} (expected 'cookie' or 'bearer')")]
    UnknownAuthMode(String),
    #[error("invalid SENTINEL_API_TIMEOUT_MS: {0} (expected a positive number of milliseconds)")]
    InvalidTimeout(String),
}

/// How the browser proves identity to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Session cookie forwarded automatically on every request.
    Cookie,
    /// `Authorization: Bearer <token>` attached by a request interceptor.
    Bearer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub auth_mode: AuthMode,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            auth_mode: AuthMode::Cookie,
        }
    }
}

impl ApiConfig {
    /// Build config from build-time environment.
    ///
    /// Optional:
    /// - `SENTINEL_API_BASE_URL`: default `/api`
    /// - `SENTINEL_API_TIMEOUT_MS`: default 10000
    /// - `SENTINEL_AUTH_MODE`: `cookie` (default) or `bearer`
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_values(
            option_env!("SENTINEL_API_BASE_URL"),
            option_env!("SENTINEL_API_TIMEOUT_MS"),
            option_env!("SENTINEL_AUTH_MODE"),
        )
    }

    pub fn from_values(
        base_url: Option<&str>,
        timeout_ms: Option<&str>,
        auth_mode: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_owned();
        let timeout_ms = parse_timeout_ms(timeout_ms)?;
        let auth_mode = parse_auth_mode(auth_mode)?;

        Ok(Self { base_url, timeout: Duration::from_millis(timeout_ms), auth_mode })
    }

    /// Join a resource path onto the base address.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn parse_timeout_ms(raw: Option<&str>) -> Result<u64, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_API_TIMEOUT_MS),
        Some(value) => value
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| ConfigError::InvalidTimeout(value.to_owned())),
    }
}

fn parse_auth_mode(raw: Option<&str>) -> Result<AuthMode, ConfigError> {
    match raw.map(str::trim).unwrap_or("cookie") {
        "" | "cookie" => Ok(AuthMode::Cookie),
        "bearer" => Ok(AuthMode::Bearer),
        other => Err(ConfigError::UnknownAuthMode(other.to_owned())),
    }
}
