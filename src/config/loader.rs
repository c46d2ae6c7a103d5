//! Configuration Loader
//!
//! Environment-aware configuration loading built on the `config` crate. Sources are
//! layered lowest to highest priority:
//!
//! 1. built-in defaults
//! 2. `<dir>/dispatch.toml`
//! 3. `<dir>/dispatch.<environment>.toml`
//! 4. `DISPATCH_*` environment variables (`__` separates nested keys)

use config::{Config, Environment, File, FileFormat};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::DispatchConfig;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, CONFIG_FILE_STEM, DEFAULT_CONFIG_DIRECTORY,
    ENVIRONMENT_VARIABLES,
};
use crate::error::Result;

/// Loaded, validated configuration together with where it came from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: DispatchConfig,
    environment: String,
    config_directory: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> Result<Arc<ConfigManager>> {
        Self::load_from_directory(PathBuf::from(DEFAULT_CONFIG_DIRECTORY))
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: impl Into<PathBuf>) -> Result<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    /// Useful for testing without modifying global environment variables.
    pub fn load_from_directory_with_env(
        config_dir: impl Into<PathBuf>,
        environment: &str,
    ) -> Result<Arc<ConfigManager>> {
        let config_directory = config_dir.into();

        debug!(
            environment = %environment,
            directory = %config_directory.display(),
            "Loading dispatch configuration"
        );

        let base = config_directory.join(format!("{CONFIG_FILE_STEM}.toml"));
        let overlay = config_directory.join(format!("{CONFIG_FILE_STEM}.{environment}.toml"));

        let settings = Config::builder()
            .add_source(File::from(base).format(FileFormat::Toml).required(false))
            .add_source(File::from(overlay).format(FileFormat::Toml).required(false))
            .add_source(Self::environment_source())
            .build()?;

        let config: DispatchConfig = settings.try_deserialize()?;
        Self::finish(config, environment, Some(config_directory))
    }

    /// Load a single configuration file, without environment overrides
    pub fn load_from_file(path: &Path) -> Result<Arc<ConfigManager>> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        let config: DispatchConfig = settings.try_deserialize()?;
        Self::finish(
            config,
            &Self::detect_environment(),
            path.parent().map(Path::to_path_buf),
        )
    }

    /// Wrap an in-memory configuration, validating it like a loaded one
    pub fn from_config(config: DispatchConfig) -> Result<Arc<ConfigManager>> {
        Self::finish(config, &Self::detect_environment(), None)
    }

    fn finish(
        config: DispatchConfig,
        environment: &str,
        config_directory: Option<PathBuf>,
    ) -> Result<Arc<ConfigManager>> {
        config.validate()?;

        debug!(
            environment = %environment,
            couriers = config.couriers.count,
            orders = config.orders.count,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    fn environment_source() -> Environment {
        Environment::with_prefix(CONFIG_ENV_PREFIX)
            .prefix_separator("_")
            .separator(CONFIG_ENV_SEPARATOR)
            .try_parsing(true)
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> Option<&Path> {
        self.config_directory.as_deref()
    }

    /// JSON view of the effective configuration for diagnostics
    pub fn debug_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    /// Detect the runtime environment, defaulting to `development`
    pub fn detect_environment() -> String {
        ENVIRONMENT_VARIABLES
            .iter()
            .find_map(|name| env::var(name).ok())
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "development".to_string())
    }
}
