//! Structured logging setup for repobuild
//!
//! Initialization and configuration for structured logging using the
//! `tracing` ecosystem. Console output goes to stderr; when a log directory
//! is configured, a second plain-text layer writes to a dated file under it,
//! one file per day.
//!
//! Initialization is guarded by `Once`, so repeated setup calls are no-ops.
//!
//! # Example
//!
//! ```no_run
//! use repobuild::util::{init_logging, LoggingConfig};
//! use std::path::PathBuf;
//!
//! init_logging(LoggingConfig {
//!     level: tracing::Level::INFO,
//!     log_dir: Some(PathBuf::from("logs")),
//! });
//!
//! tracing::info!("Application started");
//! ```

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Directory for the dated log file; `None` disables file output
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_dir: None,
        }
    }
}

/// Parses a log level from a string
///
/// Returns the corresponding `Level`, or `Level::INFO` when the string is
/// not a known level name.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Initializes the logging system with the provided configuration
///
/// Sets up the `tracing` subscriber with a stderr console layer and, when a
/// log directory is configured, a dated file layer
/// (`<dir>/repobuild_<YYYYMMDD>.log`). `RUST_LOG` overrides the configured
/// level. Can only be called once; subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            filter = filter
                .add_directive(format!("repobuild={}", config.level).parse().unwrap())
                .add_directive("hyper=warn".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap());
        }

        let file_layer = config.log_dir.as_ref().and_then(|dir| {
            let path = dir.join(format!(
                "repobuild_{}.log",
                chrono::Local::now().format("%Y%m%d")
            ));
            match std::fs::create_dir_all(dir)
                .and_then(|_| OpenOptions::new().create(true).append(true).open(&path))
            {
                Ok(file) => Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .with_writer(std::sync::Arc::new(file)),
                ),
                Err(e) => {
                    eprintln!("Failed to open log file {}: {}", path.display(), e);
                    None
                }
            }
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(file_layer)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_known_values() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("INFO"), Level::INFO);
        assert_eq!(parse_level("Warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_unknown_falls_back_to_info() {
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_default_config_has_no_file_output() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(LoggingConfig::default());
        // Second call must be a no-op rather than a panic
        init_logging(LoggingConfig::default());
    }
}
