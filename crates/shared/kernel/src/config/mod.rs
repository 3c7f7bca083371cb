use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `flagstone.toml`). If no path is
///    provided, it defaults to `"flagstone"`.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with
///    `FLAGSTONE__`. Nested structures are accessed using double underscores
///    (e.g., `FLAGSTONE__LOGGING__LEVEL` maps to `logging.level`).
///
/// # Errors
/// Returns [`ConfigError::Load`] if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, env_source(None))
}

/// Like [`load_config`], but takes the environment overrides from an explicit
/// key/value snapshot instead of the process environment.
///
/// Keys use the same shape as the real variables (e.g.,
/// `FLAGSTONE__LOGGING__LEVEL`). Mutating the process environment is not an
/// option for callers that need reproducible overrides (tests, embedding).
///
/// # Errors
/// Same failure modes as [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    vars: config::Map<String, String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, env_source(Some(vars)))
}

fn env_source(vars: Option<config::Map<String, String>>) -> Environment {
    let env =
        Environment::with_prefix("FLAGSTONE").separator("__").convert_case(config::Case::Snake);
    match vars {
        Some(vars) => env.source(Some(vars)),
        None => env,
    }
}

fn load_layered<T>(path: Option<impl AsRef<Path>>, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from("flagstone"), |p| p.as_ref().to_path_buf());

    let builder =
        Config::builder().add_source(File::from(effective_path.as_path())).add_source(env);

    info!("Loading config from {}", effective_path.display());

    let config = builder.build()?.try_deserialize::<T>()?;

    Ok(config)
}
