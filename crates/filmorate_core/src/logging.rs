//! Rolling file logging driven by `FilmorateConfig`.
//!
//! # Invariants
//! - The logger starts at most once per process; a second call with the
//!   same level and directory is a no-op, any other call is rejected.
//! - Events carry ids, counts and durations only; never emails, logins or
//!   names.

use crate::config::FilmorateConfig;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle,
    Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "filmorate";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn matches(&self, level: LevelFilter, log_dir: &Path) -> Result<(), LoggingError> {
        if self.level == level && self.log_dir == log_dir {
            Ok(())
        } else {
            Err(LoggingError::AlreadyInitialized {
                level: self.level,
                log_dir: self.log_dir.clone(),
            })
        }
    }
}

/// Logger startup failure.
#[derive(Debug)]
pub enum LoggingError {
    /// Logging runs with a different level or directory.
    AlreadyInitialized { level: LevelFilter, log_dir: PathBuf },
    CreateDir {
        log_dir: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized { level, log_dir } => write!(
                f,
                "logging already runs at `{level}` in `{}`",
                log_dir.display()
            ),
            Self::CreateDir { log_dir, source } => write!(
                f,
                "cannot create log directory `{}`: {source}",
                log_dir.display()
            ),
            Self::Backend(err) => write!(f, "cannot start logger: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyInitialized { .. } => None,
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
        }
    }
}

/// Starts file logging when `config.log_dir` is set.
///
/// Returns `Ok(false)` and leaves the logger untouched when no directory is
/// configured.
pub fn init_logging(config: &FilmorateConfig) -> Result<bool, LoggingError> {
    let Some(log_dir) = config.log_dir.as_deref() else {
        return Ok(false);
    };
    let level = config.log_level;

    if let Some(active) = ACTIVE.get() {
        active.matches(level, log_dir)?;
        return Ok(true);
    }

    ACTIVE
        .get_or_try_init(|| start_logger(level, log_dir))?
        .matches(level, log_dir)?;
    Ok(true)
}

fn start_logger(level: LevelFilter, log_dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        log_dir: log_dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::with(LogSpecification::builder().default(level).build())
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_hook();
    info!(
        "event=logging_start module=logging status=ok level={} version={}",
        level,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

// Runs inside the OnceCell initializer, so at most once.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        error!(
            "event=panic module=logging status=error location={} payload={}",
            location,
            panic_payload(info)
        );
        previous(info);
    }));
}

fn panic_payload(info: &PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    single_line(payload, PANIC_PAYLOAD_LIMIT)
}

/// Flattens newlines and caps length so one event stays one log line.
fn single_line(value: &str, max_chars: usize) -> String {
    let mut line: String = value
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r') { ' ' } else { ch })
        .take(max_chars)
        .collect();
    if value.chars().count() > max_chars {
        line.push_str("...");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::{init_logging, single_line, LoggingError};
    use crate::config::FilmorateConfig;
    use log::LevelFilter;

    #[test]
    fn no_log_dir_leaves_logging_off() {
        assert!(matches!(init_logging(&FilmorateConfig::default()), Ok(false)));
    }

    #[test]
    fn single_line_flattens_and_truncates() {
        assert_eq!(single_line("a\nb\rc", 10), "a b c");
        assert_eq!(single_line("abcdef", 3), "abc...");
    }

    #[test]
    fn restart_with_same_config_is_a_no_op_and_other_configs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = FilmorateConfig {
            log_level: LevelFilter::Info,
            log_dir: Some(dir.path().join("logs")),
            ..FilmorateConfig::default()
        };

        assert!(matches!(init_logging(&config), Ok(true)));
        assert!(matches!(init_logging(&config), Ok(true)));
        assert!(dir.path().join("logs").is_dir());

        let louder = FilmorateConfig {
            log_level: LevelFilter::Debug,
            ..config.clone()
        };
        assert!(matches!(
            init_logging(&louder),
            Err(LoggingError::AlreadyInitialized {
                level: LevelFilter::Info,
                ..
            })
        ));

        let elsewhere = FilmorateConfig {
            log_dir: Some(dir.path().join("other")),
            ..config
        };
        assert!(matches!(
            init_logging(&elsewhere),
            Err(LoggingError::AlreadyInitialized { .. })
        ));
    }
}
