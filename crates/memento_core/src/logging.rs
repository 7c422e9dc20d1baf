//! Rolling file logs for the journal core.
//!
//! # Responsibility
//! - Start the file logger from [`CoreSettings`] once per process.
//! - Keep entry content out of log files: events carry ids, counts and
//!   dates, and panic reports carry only their source location.
//!
//! # Invariants
//! - Starting again with the same directory and level is a no-op.
//! - Starting again with another directory or level is rejected.
//! - Starting never panics.

use crate::config::{CoreSettings, SettingsError};
use flexi_logger::{
    Age, Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "memento";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
/// A week of daily files.
const KEPT_LOG_FILES: usize = 7;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// What [`init_from_settings`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStart {
    /// `log_dir` is unset; nothing is written.
    Disabled,
    Started,
    /// The same directory and level were already active.
    AlreadyActive,
}

#[derive(Debug)]
pub enum LoggingError {
    Settings(SettingsError),
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(String),
    /// A logger with another directory or level is already running.
    Conflict {
        active_dir: PathBuf,
        active_level: LevelFilter,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settings(err) => write!(f, "{err}"),
            Self::CreateDir { dir, source } => {
                write!(f, "failed to create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::Conflict {
                active_dir,
                active_level,
            } => write!(
                f,
                "logging already active at `{}` with level `{active_level}`",
                active_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Settings(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(_) | Self::Conflict { .. } => None,
        }
    }
}

impl From<SettingsError> for LoggingError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

/// Starts rolling file logs as configured by `settings`.
///
/// # Errors
/// - [`LoggingError::Settings`] when `settings` do not validate.
/// - [`LoggingError::Conflict`] when another configuration is already active.
/// - [`LoggingError::CreateDir`] / [`LoggingError::Backend`] when the
///   directory or the logger backend cannot be set up.
pub fn init_from_settings(settings: &CoreSettings) -> Result<LogStart, LoggingError> {
    settings.validate()?;
    let Some(dir) = settings.log_dir.as_deref() else {
        return Ok(LogStart::Disabled);
    };
    let log_dir = PathBuf::from(dir.trim());
    let level = settings.level_filter()?;

    if let Some(active) = ACTIVE_LOGGER.get() {
        return ensure_same(active, &log_dir, level).map(|()| LogStart::AlreadyActive);
    }

    let mut started = false;
    let active = ACTIVE_LOGGER.get_or_try_init(|| {
        started = true;
        start_logger(settings, &log_dir, level)
    })?;
    ensure_same(active, &log_dir, level)?;

    Ok(if started {
        LogStart::Started
    } else {
        LogStart::AlreadyActive
    })
}

fn ensure_same(
    active: &ActiveLogger,
    log_dir: &Path,
    level: LevelFilter,
) -> Result<(), LoggingError> {
    if active.log_dir == log_dir && active.level == level {
        return Ok(());
    }
    Err(LoggingError::Conflict {
        active_dir: active.log_dir.clone(),
        active_level: active.level,
    })
}

fn start_logger(
    settings: &CoreSettings,
    log_dir: &Path,
    level: LevelFilter,
) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        dir: log_dir.to_path_buf(),
        source,
    })?;

    let spec = LogSpecification::builder().default(level).build();
    let handle = Logger::with(spec)
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::AgeOrSize(Age::Day, MAX_LOG_FILE_SIZE_BYTES),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=core_init module=logging status=ok version={} level={} recent_weeks={} utc_offset_minutes={}",
        env!("CARGO_PKG_VERSION"),
        level,
        settings.recent_week_count,
        settings.utc_offset_minutes
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

// Runs once: only reached from the first successful logger start.
fn install_panic_hook() {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // payload may quote entry text
        let location = panic_info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        error!("event=panic_captured module=core status=error location={location}");
        previous_hook(panic_info);
    }));
}
