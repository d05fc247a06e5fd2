//! Configuration loader with multi-source merging

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use kvlog_application::{ConfigValidationError, LogStoreConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level config files, checked in order; the first one found wins.
const PROJECT_CONFIG_FILES: [&str; 2] = ["kvlog.toml", ".kvlog.toml"];

/// Prefix of environment overrides, e.g. `KVLOG_SERVICE_NAME`.
///
/// Nested keys use a double underscore: `KVLOG_CONNECT_OPTIONS__HOST`.
pub const ENV_PREFIX: &str = "KVLOG_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigValidationError),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `KVLOG_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./kvlog.toml` or `./.kvlog.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&Path>) -> Result<LogStoreConfig, ConfigLoadError> {
        let config: LogStoreConfig = Self::figment(config_path).extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Load only default configuration
    pub fn load_defaults() -> LogStoreConfig {
        LogStoreConfig::default()
    }

    /// The merged provider stack, before extraction.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(LogStoreConfig::default()));

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}
