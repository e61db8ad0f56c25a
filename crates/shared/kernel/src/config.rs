use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File stem looked up when no explicit path is given (`skyline.toml`, `skyline.json`, ...).
pub const DEFAULT_CONFIG_STEM: &str = "skyline";

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "SKYLINE";

/// Separator between nested keys in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

/// Custom error type for config loading.
#[skyline_derive::skyline_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from an optional file overlaid with environment variables.
///
/// Layers, lowest precedence first:
/// 1. **Base File**: `path`, or [`DEFAULT_CONFIG_STEM`] in the working directory. The format is
///    inferred from the extension; a stem without extension probes every supported format.
///    An explicit `path` must exist; the default file is optional, so a bare checkout runs
///    on defaults.
/// 2. **Environment Overrides**: variables prefixed with `SKYLINE__`, nested keys joined by
///    double underscores (e.g. `SKYLINE__LOGGING__LEVEL=debug` maps to `logging.level`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a file cannot be parsed,
/// or the merged values do not match the structure of `T`.
///
/// # Example
/// ```rust,no_run
/// use skyline_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_STEM), |p| p.as_ref().to_path_buf());

    debug!(path = %effective_path.display(), required, "Loading config");

    load_layered(&effective_path, required, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR)
}

fn load_layered<T>(path: &Path, required: bool, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(env)
        .build()
        .context("Failed to build config")?;

    debug!(path = %path.display(), "Config sources merged");

    config.try_deserialize::<T>().context("Failed to deserialize config")
}
