use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub logging: LogConfig,
    pub flags: FlagsConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub console: bool,
    pub json: bool,
    pub path: Option<PathBuf>,
}

/// Feature-flag configuration: static default overrides applied at startup.
///
/// Keys are feature names (`organizations:...`, `projects:...`, or unscoped),
/// values the default returned when no handler has an opinion.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlagsConfig {
    pub defaults: BTreeMap<String, bool>,
}

// --- Default ---

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), console: true, json: false, path: None }
    }
}
