//! Runtime configuration loaded from environment variables.
//!
//! | Env Var                   | Default                               |
//! |---------------------------|---------------------------------------|
//! | `FILMORATE_DB_PATH`       | unset: in-memory database             |
//! | `FILMORATE_LOG_LEVEL`     | `debug` in debug builds, else `info`  |
//! | `FILMORATE_LOG_DIR`       | unset: file logging disabled          |
//! | `FILMORATE_POPULAR_LIMIT` | `10`                                  |
//!
//! Every value is checked here, so a loaded config is always usable by
//! `logging::init_logging` and the services.

use crate::projection::popularity::DEFAULT_POPULAR_LIMIT;
use log::LevelFilter;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "FILMORATE_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "FILMORATE_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "FILMORATE_LOG_DIR";
pub const POPULAR_LIMIT_VAR: &str = "FILMORATE_POPULAR_LIMIT";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPopularLimit(String),
    InvalidLogLevel(String),
    /// Log files go to a fixed place, never relative to the working dir.
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPopularLimit(value) => write!(
                f,
                "{POPULAR_LIMIT_VAR} must be a positive integer, got `{value}`"
            ),
            Self::InvalidLogLevel(value) => write!(
                f,
                "{LOG_LEVEL_VAR} must be one of trace|debug|info|warn|error, got `{value}`"
            ),
            Self::RelativeLogDir(value) => {
                write!(f, "{LOG_DIR_VAR} must be an absolute path, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Process configuration for stores, logging and projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmorateConfig {
    /// SQLite file. `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: LevelFilter,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub log_dir: Option<PathBuf>,
    /// Popular-list size when the caller gives none.
    pub popular_default_limit: u32,
}

impl Default for FilmorateConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
            popular_default_limit: DEFAULT_POPULAR_LIMIT,
        }
    }
}

impl FilmorateConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let popular_default_limit = match get(POPULAR_LIMIT_VAR) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidPopularLimit(raw))?,
            None => defaults.popular_default_limit,
        };
        let log_level = match get(LOG_LEVEL_VAR) {
            Some(raw) => parse_log_level(&raw).ok_or(ConfigError::InvalidLogLevel(raw))?,
            None => defaults.log_level,
        };
        let log_dir = match get(LOG_DIR_VAR) {
            Some(raw) if PathBuf::from(&raw).is_absolute() => Some(PathBuf::from(raw)),
            Some(raw) => return Err(ConfigError::RelativeLogDir(raw)),
            None => None,
        };

        Ok(Self {
            db_path: get(DB_PATH_VAR).map(PathBuf::from),
            log_level,
            log_dir,
            popular_default_limit,
        })
    }
}

/// `debug` in debug builds, `info` otherwise.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn parse_log_level(raw: &str) -> Option<LevelFilter> {
    match raw.to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        _ => None,
    }
}
