//! Core runtime settings.
//!
//! # Responsibility
//! - Describe the knobs hosts may tune (logging, strip width, time offset).
//! - Parse and validate settings documents.
//!
//! # Invariants
//! - `CoreSettings::default()` always validates.
//! - Unknown fields in a settings document are rejected.

use crate::calendar::grid::{DEFAULT_RECENT_WEEKS, MAX_RECENT_WEEKS};
use chrono::{FixedOffset, Offset, Utc};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Settings validation/parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Document is not valid settings JSON.
    Parse(String),
    RecentWeeksOutOfRange(u32),
    UtcOffsetOutOfRange(i32),
    /// `log_dir` is set but blank or relative.
    InvalidLogDir(String),
    InvalidLogLevel(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid settings document: {message}"),
            Self::RecentWeeksOutOfRange(value) => write!(
                f,
                "recent_week_count must be within 1..={MAX_RECENT_WEEKS}, got {value}"
            ),
            Self::UtcOffsetOutOfRange(value) => write!(
                f,
                "utc_offset_minutes must be within +-{MAX_UTC_OFFSET_MINUTES}, got {value}"
            ),
            Self::InvalidLogDir(value) => {
                write!(f, "log_dir must be an absolute path, got `{value}`")
            }
            Self::InvalidLogLevel(value) => write!(
                f,
                "unsupported log_level `{value}`; expected off|error|warn|info|debug|trace"
            ),
        }
    }
}

impl Error for SettingsError {}

/// Host-tunable settings for the journal core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreSettings {
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off if unset.
    pub log_dir: Option<String>,
    pub recent_week_count: u32,
    /// Offset applied when labelling posting times.
    pub utc_offset_minutes: i32,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            recent_week_count: DEFAULT_RECENT_WEEKS,
            utc_offset_minutes: 0,
        }
    }
}

impl CoreSettings {
    /// Parses and validates a JSON settings document.
    ///
    /// Missing fields take their default values.
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(raw).map_err(|err| SettingsError::Parse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.level_filter()?;
        check_recent_week_count(self.recent_week_count)?;
        if self.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES.unsigned_abs() {
            return Err(SettingsError::UtcOffsetOutOfRange(self.utc_offset_minutes));
        }
        if let Some(dir) = &self.log_dir {
            if dir.trim().is_empty() || !std::path::Path::new(dir.trim()).is_absolute() {
                return Err(SettingsError::InvalidLogDir(dir.clone()));
            }
        }
        Ok(())
    }

    /// Parsed `log_level`, case-insensitive.
    pub fn level_filter(&self) -> Result<LevelFilter, SettingsError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| SettingsError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Offset for posted labels; falls back to UTC if out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Bounds shared by settings documents and per-call overrides.
pub fn check_recent_week_count(value: u32) -> Result<u32, SettingsError> {
    if (1..=MAX_RECENT_WEEKS).contains(&value) {
        Ok(value)
    } else {
        Err(SettingsError::RecentWeeksOutOfRange(value))
    }
}
