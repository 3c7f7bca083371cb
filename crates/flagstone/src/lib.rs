//! Facade crate for Flagstone features and shared modules.
//! Re-exports domain/kernel primitives and composes the feature platform.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init`] at startup to build the platform from configuration.
//! - Register features and handlers on [`Platform::features`], then share it
//!   (e.g., behind an `Arc`) with request-handling code.

pub use flagstone_domain as domain;
pub use flagstone_flags as flags;
pub use flagstone_kernel as kernel;
pub use flagstone_logger as logger;
pub use flagstone_metrics as metrics;
pub use flagstone_options as options;

use flagstone_domain::config::{AppConfig, LogConfig};
use flagstone_flags::{FeatureManager, FlagError};
use flagstone_kernel::config::ConfigError;
use flagstone_logger::{Logger, LoggerError};
use flagstone_metrics::{FlagMetrics, MetricsError};
use flagstone_options::OptionsStore;
use prometheus::Registry;
use std::fmt;
use std::path::Path;

/// Errors raised while composing the platform.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Flags(#[from] FlagError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// The composed feature platform, owned by the host application.
pub struct Platform {
    /// Registry and evaluation engine. Register features and handlers here
    /// during startup, then share immutably.
    pub features: FeatureManager,
    /// Dynamic-configuration options, shared with control-plane sync jobs.
    pub options: OptionsStore,
    /// Prometheus registry holding the evaluation collectors; expose it
    /// through whatever scrape endpoint the host runs.
    pub metrics: Registry,
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform").field("features", &self.features).finish_non_exhaustive()
    }
}

/// Builds the feature platform from configuration.
///
/// Static default overrides from `config.flags.defaults` are applied before
/// any registration, so features registered later keep the configured value
/// rather than their registration default.
///
/// # Errors
/// Returns [`PlatformError::Metrics`] if the collectors cannot be registered.
pub fn init(config: &AppConfig) -> Result<Platform, PlatformError> {
    let registry = Registry::new();
    let metrics = FlagMetrics::new(&registry)?;
    let options = OptionsStore::new();

    let mut features =
        FeatureManager::builder().options(options.clone()).metrics(metrics).build();
    for (name, value) in &config.flags.defaults {
        features.set_default(name, *value);
    }

    tracing::info!(defaults = config.flags.defaults.len(), "Feature platform initialized");
    Ok(Platform { features, options, metrics: registry })
}

/// Loads [`AppConfig`] from a file plus `FLAGSTONE__` environment overrides.
///
/// # Errors
/// Returns [`PlatformError::Config`] if the file is missing or malformed.
pub fn load_config(path: Option<impl AsRef<Path>>) -> Result<AppConfig, PlatformError> {
    Ok(flagstone_kernel::config::load_config(path)?)
}

/// Initializes the global tracing subscriber from [`LogConfig`].
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for an unknown level and
/// [`LoggerError::Subscriber`] if a subscriber is already installed.
pub fn init_logging(name: &str, config: &LogConfig) -> Result<Logger, LoggerError> {
    let level = config.level.parse().map_err(|_| LoggerError::InvalidConfiguration {
        message: format!("unknown log level: {}", config.level).into(),
    })?;

    let mut builder = Logger::builder(name).console(config.console).level(level);
    if let Some(path) = &config.path {
        builder = builder.path(path);
    }
    if config.json {
        builder = builder.json();
    }
    builder.init()
}
