//! # Logger
//!
//! A centralized logging utility for the project. It provides a unified way
//! to configure console and file logging with rotation, non-blocking I/O,
//! and environment-based filtering.
//!
//! * Use [`LoggerBuilder::env_filter`] to set module-directed filters
//!   (e.g., `"flagstone=debug"`), in addition to `RUST_LOG`.
//! * File logging is non-blocking; keep the returned [`Logger`] handle alive
//!   so buffered lines are flushed on shutdown.
//!
//! ## Example
//!
//! ```rust
//! # use flagstone_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder("my-app")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::LoggerError;
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl LoggerBuilder {
    /// Enables or disables console logging.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Sets the directory for rolling log files.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Configures the log file rotation strategy.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Configures maximum number of log files to keep.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Enables JSON formatting for the file layer.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Adds an explicit env filter (e.g., `flagstone=debug`).
    ///
    /// Environment variables still override via `RUST_LOG`; this is a programmatic default.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. **Note:** When file logging is enabled, the
    /// handle contains a [`WorkerGuard`] that must be kept alive for the
    /// duration of the program so non-blocking logs are flushed correctly.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set.
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
            });
        }
        if !self.console && self.path.is_none() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
            });
        }

        let env_filter = self.build_env_filter()?;

        let mut layers = Vec::new();

        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = if let Some(path) = self.path {
            fs::create_dir_all(&path).map_err(|source| LoggerError::LogDirectory {
                source,
                path: path.display().to_string().into(),
            })?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.rotation)
                .filename_prefix(&self.name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.max_files)
                .build(path)?;

            let (non_blocking, g) = tracing_appender::non_blocking(file_appender);

            let file_layer = layer().with_writer(non_blocking).with_ansi(false);
            layers.push(if self.json { file_layer.json().boxed() } else { file_layer.boxed() });

            Some(g)
        } else {
            None
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }

    fn build_env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let base = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            Some(directives) => base
                .parse(format!("{},{directives}", self.level))
                .map_err(|e| LoggerError::InvalidConfiguration { message: e.to_string().into() }),
            None => Ok(base.from_env_lossy()),
        }
    }
}

/// A handle to the initialized logging system.
///
/// This struct holds the background worker guard. Drop this struct only
/// when the application is shutting down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    ///
    /// The `name` serves as the primary identifier for your logs and is used
    /// as a prefix for rolling log files (e.g., `my-app.2026-08-29.log`).
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            console: true,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}
