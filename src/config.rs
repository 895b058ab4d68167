//! Category table configuration.
//!
//! The built-in table covers the common Commodore image formats; a TOML file
//! can replace it to organize other collections. Loading falls back in order:
//! an explicitly supplied path, then `.c64tidy.toml` in the current
//! directory, then the built-in table.
//!
//! # Configuration File Format
//!
//! ```toml
//! [categories]
//! PRG = ".prg"
//! D64 = ".d64"
//! SID = ".sid"
//! ```
//!
//! Every value is the literal extension suffix a filename must end with,
//! including the leading dot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::file_category::CategoryTable;

/// Name of the config file picked up from the working directory.
const LOCAL_CONFIG_FILE: &str = ".c64tidy.toml";

/// Errors that can occur while loading a category table.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or an invalid category entry.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// On-disk shape of a category table override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name to extension suffix, e.g. `PRG = ".prg"`.
    pub categories: BTreeMap<String, String>,
}

impl CategoryConfig {
    /// Load a category table, with fallback to the built-in one.
    ///
    /// Attempts to load in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.c64tidy.toml` in the current directory
    /// 3. Fall back to the built-in Commodore table
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read or validated, or if a discovered local file is invalid.
    pub fn load(config_path: Option<&Path>) -> Result<CategoryTable, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        Ok(CategoryTable::builtin())
    }

    /// Load a category table from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist,
    /// `ConfigError::ConfigInvalid` if TOML parsing or validation fails, and
    /// `ConfigError::IoError` if the file cannot be read.
    fn load_from_file(path: &Path) -> Result<CategoryTable, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: CategoryConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;

        Ok(CategoryTable::from_entries(config.categories))
    }

    /// Check that the table is usable before any filesystem work begins.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::ConfigInvalid(
                "no categories defined".to_string(),
            ));
        }

        for (name, extension) in &self.categories {
            if name.is_empty() {
                return Err(ConfigError::ConfigInvalid(
                    "category names must not be empty".to_string(),
                ));
            }
            if !extension.starts_with('.') || extension.len() < 2 {
                return Err(ConfigError::ConfigInvalid(format!(
                    "extension '{}' for category '{}' must start with '.' and name a suffix",
                    extension, name
                )));
            }
        }

        Ok(())
    }
}
