//! Runtime configuration loaded from environment variables.

use crate::deployment::{
    services::DEFAULT_MAX_IN_FLIGHT,
    view::{DisplayLocale, ViewOptions},
};
use chrono::FixedOffset;
use std::time::Duration;
use thiserror::Error;

const API_URL: &str = "AGENTHUB_API_URL";
const API_TOKEN: &str = "AGENTHUB_API_TOKEN";
const REQUEST_TIMEOUT_SECS: &str = "AGENTHUB_REQUEST_TIMEOUT_SECS";
const MAX_IN_FLIGHT: &str = "AGENTHUB_MAX_IN_FLIGHT";
const LOCALE: &str = "AGENTHUB_LOCALE";
const UTC_OFFSET_MINUTES: &str = "AGENTHUB_UTC_OFFSET_MINUTES";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 540;

/// Errors returned while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),
    /// A variable holds a value that cannot be used.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Settings for the backend client, reconciler, and display projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    api_url: String,
    api_token: String,
    request_timeout: Duration,
    max_in_flight: usize,
    locale: DisplayLocale,
    utc_offset: FixedOffset,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `AGENTHUB_API_URL`              | `http://localhost:8000` |
    /// | `AGENTHUB_API_TOKEN`            | required                |
    /// | `AGENTHUB_REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `AGENTHUB_MAX_IN_FLIGHT`        | `4`                     |
    /// | `AGENTHUB_LOCALE`               | `ja-JP`                 |
    /// | `AGENTHUB_UTC_OFFSET_MINUTES`   | `540`                   |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the token is missing or a value is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the token is missing or a value is
    /// invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_url = parse_api_url(read(API_URL).as_deref().unwrap_or(DEFAULT_API_URL))?;
        let api_token = read(API_TOKEN).ok_or(ConfigError::Missing(API_TOKEN))?;
        let request_timeout_secs: u64 =
            parse_number(REQUEST_TIMEOUT_SECS, read(REQUEST_TIMEOUT_SECS))?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(invalid(REQUEST_TIMEOUT_SECS, "must be at least 1"));
        }
        let max_in_flight: usize =
            parse_number(MAX_IN_FLIGHT, read(MAX_IN_FLIGHT))?.unwrap_or(DEFAULT_MAX_IN_FLIGHT);
        if max_in_flight == 0 {
            return Err(invalid(MAX_IN_FLIGHT, "must be at least 1"));
        }
        let locale = read(LOCALE)
            .map(|raw| DisplayLocale::try_from(raw.as_str()))
            .transpose()
            .map_err(|err| invalid(LOCALE, err.to_string()))?
            .unwrap_or_default();
        let offset_minutes: i32 = parse_number(UTC_OFFSET_MINUTES, read(UTC_OFFSET_MINUTES))?
            .unwrap_or(DEFAULT_UTC_OFFSET_MINUTES);
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| invalid(UTC_OFFSET_MINUTES, "must be within +/- 24 hours"))?;

        Ok(Self {
            api_url,
            api_token,
            request_timeout: Duration::from_secs(request_timeout_secs),
            max_in_flight,
            locale,
            utc_offset,
        })
    }

    /// Returns the backend base URL without a trailing slash.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the reconciler concurrency bound.
    #[must_use]
    pub const fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Returns display options for the configured locale and offset.
    #[must_use]
    pub const fn view_options(&self) -> ViewOptions {
        ViewOptions::new(self.locale, self.utc_offset)
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

fn parse_number<T>(name: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| value.parse::<T>())
        .transpose()
        .map_err(|err| invalid(name, err.to_string()))
}

fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(invalid(API_URL, format!("'{raw}' must be an http or https URL")));
    }
    Ok(trimmed.to_owned())
}
