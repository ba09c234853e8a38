//! Locale-aware timestamp rendering for display rows.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt;
use thiserror::Error;

/// Offset used when none is configured (Japan Standard Time).
const DEFAULT_OFFSET_SECONDS: i32 = 9 * 3600;

/// Placeholder for absent timestamps.
pub const MISSING_TIMESTAMP: &str = "-";

/// Error returned while parsing a display locale.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported display locale: {0}")]
pub struct ParseDisplayLocaleError(pub String);

/// Supported timestamp renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayLocale {
    /// `2025/1/5 9:03:07`
    #[default]
    JaJp,
    /// `1/5/2025, 9:03:07 AM`
    EnUs,
    /// RFC 3339 with the configured offset.
    Iso,
}

impl DisplayLocale {
    /// Returns the locale tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JaJp => "ja-JP",
            Self::EnUs => "en-US",
            Self::Iso => "iso",
        }
    }

    fn render(self, local: DateTime<FixedOffset>) -> String {
        match self {
            Self::JaJp => local.format("%Y/%-m/%-d %-H:%M:%S").to_string(),
            Self::EnUs => local.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
            Self::Iso => local.to_rfc3339(),
        }
    }
}

impl fmt::Display for DisplayLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DisplayLocale {
    type Error = ParseDisplayLocaleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "ja-jp" | "ja" => Ok(Self::JaJp),
            "en-us" | "en" => Ok(Self::EnUs),
            "iso" | "rfc3339" => Ok(Self::Iso),
            _ => Err(ParseDisplayLocaleError(value.to_owned())),
        }
    }
}

/// Locale and time zone used to render timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    locale: DisplayLocale,
    utc_offset: FixedOffset,
}

impl ViewOptions {
    /// Creates options for a locale and UTC offset.
    #[must_use]
    pub const fn new(locale: DisplayLocale, utc_offset: FixedOffset) -> Self {
        Self { locale, utc_offset }
    }

    /// Returns the locale.
    #[must_use]
    pub const fn locale(&self) -> DisplayLocale {
        self.locale
    }

    /// Returns the UTC offset.
    #[must_use]
    pub const fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Renders a timestamp in the configured locale and offset.
    #[must_use]
    pub fn format_timestamp(&self, timestamp: DateTime<Utc>) -> String {
        self.locale
            .render(timestamp.with_timezone(&self.utc_offset))
    }

    /// Renders an optional timestamp, using [`MISSING_TIMESTAMP`] for `None`.
    #[must_use]
    pub fn format_optional(&self, timestamp: Option<DateTime<Utc>>) -> String {
        timestamp.map_or_else(
            || MISSING_TIMESTAMP.to_owned(),
            |value| self.format_timestamp(value),
        )
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        let offset = FixedOffset::east_opt(DEFAULT_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix());
        Self::new(DisplayLocale::default(), offset)
    }
}
