//! Application configuration.
//!
//! Values are layered: built-in defaults, then the optional
//! `config.toml` in the user's config directory, then `SHOPLEDGER_*`
//! environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::store::{CatalogStore, DEFAULT_DATA_DIR};

/// Directory under the user's config directory holding `config.toml`.
pub const CONFIG_DIR: &str = "shopledger";

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `SHOPLEDGER_DATA_FILE`.
pub const ENV_PREFIX: &str = "SHOPLEDGER";

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# shopledger configuration
#
# Every key is optional; commented values show the built-in defaults.
# Environment variables prefixed with SHOPLEDGER_ take precedence,
# e.g. SHOPLEDGER_DATA_FILE=/tmp/catalog.json.

# Path of the catalog file.
# data_file = "<data dir>/shopledger/catalog.json"

# Directory receiving shopledger.log.
# log_dir = "<data dir>/shopledger/logs"
"#;

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog file location.
    pub data_file: PathBuf,
    /// Directory for log output.
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: CatalogStore::default_path(),
            log_dir: default_log_dir(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load using `path` as the config file. A missing file is not an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("data_file", defaults.data_file.to_string_lossy().into_owned())?
            .set_default("log_dir", defaults.log_dir.to_string_lossy().into_owned())?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Store for the configured catalog file.
    pub fn store(&self) -> CatalogStore {
        CatalogStore::new(&self.data_file)
    }
}

/// Default path of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DATA_DIR)
        .join("logs")
}

/// Write the commented template to the default location if no config exists.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    Ok(true)
}
