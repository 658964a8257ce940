//! Configuration module for modshelf
//!
//! Manages the named mod collections, where ordering state is kept, and the
//! drag threshold. Configuration is stored in the user's config directory
//! (`~/.config/modshelf/config.toml` on Linux).

mod setup;

pub use setup::first_time_setup;

use crate::drag::DEFAULT_DRAG_THRESHOLD;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const fn default_drag_threshold() -> f64 {
    DEFAULT_DRAG_THRESHOLD
}

/// Keys accepted by [`ModshelfConfig::get`] and [`ModshelfConfig::set`]
pub const SETTING_KEYS: [&str; 3] = ["quiet", "drag_threshold", "state_dir"];

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModshelfConfig {
    /// Map of collection names to their mods folders
    #[serde(default)]
    pub collections: HashMap<String, PathBuf>,

    /// The collection to use when none is specified
    #[serde(default)]
    pub default_collection: Option<String>,

    /// Where ordering and expansion state is kept; defaults to the system
    /// data directory
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Pixels a press must travel before it becomes a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,
}

impl Default for ModshelfConfig {
    fn default() -> Self {
        Self {
            collections: HashMap::new(),
            default_collection: None,
            state_dir: None,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            quiet: false,
        }
    }
}

impl ModshelfConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("modshelf").join("config.toml"))
    }

    /// Default location of the ordering state
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system data directory cannot be determined.
    pub fn default_state_dir() -> Result<PathBuf, ConfigError> {
        dirs::data_local_dir()
            .map(|dir| dir.join("modshelf").join("state"))
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the
    /// configuration cannot be serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            return Err(ConfigError::Message(format!(
                "drag_threshold must be a non-negative number, got {}",
                self.drag_threshold
            )));
        }
        Ok(())
    }

    /// Add a collection to the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if saving the configuration fails.
    pub fn add_collection(&mut self, name: String, path: PathBuf) -> Result<(), ConfigError> {
        self.collections.insert(name, path);
        self.save()
    }

    /// Remove a collection from the configuration
    ///
    /// Forgets it as the default too.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if saving the configuration fails.
    pub fn remove_collection(&mut self, name: &str) -> Result<Option<PathBuf>, ConfigError> {
        let removed = self.collections.remove(name);
        if self.default_collection.as_deref() == Some(name) {
            self.default_collection = None;
        }
        self.save()?;
        Ok(removed)
    }

    /// Get a collection's mods folder by name
    #[must_use]
    pub fn get_collection(&self, name: &str) -> Option<&PathBuf> {
        self.collections.get(name)
    }

    /// All collection names, sorted
    #[must_use]
    pub fn list_collections(&self) -> Vec<&String> {
        let mut names: Vec<&String> = self.collections.keys().collect();
        names.sort();
        names
    }

    /// Set the default collection
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the collection name doesn't exist in the configuration
    /// or if saving the configuration fails.
    pub fn set_default_collection(&mut self, name: String) -> Result<(), ConfigError> {
        if !self.collections.contains_key(&name) {
            return Err(ConfigError::Message(format!(
                "Collection '{name}' does not exist in configuration"
            )));
        }
        self.default_collection = Some(name);
        self.save()
    }

    /// Get the default collection name
    #[must_use]
    pub const fn get_default_collection(&self) -> Option<&String> {
        self.default_collection.as_ref()
    }

    /// Pick the collection to work on: the requested one, else the default
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if nothing is requested and there is no default,
    /// or if the chosen name is not configured.
    pub fn resolve_collection(&self, requested: Option<&str>) -> Result<(String, PathBuf), ConfigError> {
        let name = requested
            .or(self.default_collection.as_deref())
            .ok_or_else(|| {
                ConfigError::Message(
                    "No collection specified and no default set. Use -c NAME or `modshelf collection set-default`"
                        .to_string(),
                )
            })?;
        let path = self
            .collections
            .get(name)
            .ok_or_else(|| ConfigError::Message(format!("Collection '{name}' not found in configuration")))?;
        Ok((name.to_string(), path.clone()))
    }

    /// Directory of the ordering state store
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no directory is configured and the system
    /// data directory cannot be determined.
    pub fn state_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.state_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_state_dir(),
        }
    }

    /// Read a setting as text
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "quiet" => Some(self.quiet.to_string()),
            "drag_threshold" => Some(self.drag_threshold.to_string()),
            "state_dir" => Some(
                self.state_dir
                    .as_ref()
                    .map_or_else(|| "(default)".to_string(), |dir| dir.display().to_string()),
            ),
            _ => None,
        }
    }

    /// Change a setting from text; does not save
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the key is unknown or the value does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "quiet" => {
                self.quiet = match value.to_lowercase().as_str() {
                    "true" | "yes" | "1" | "on" => true,
                    "false" | "no" | "0" | "off" => false,
                    _ => {
                        return Err(ConfigError::Message(format!(
                            "Invalid value for quiet: '{value}'. Use true or false"
                        )));
                    }
                };
            }
            "drag_threshold" => {
                let threshold: f64 = value
                    .parse()
                    .map_err(|_| ConfigError::Message(format!("Invalid drag_threshold: '{value}'")))?;
                let previous = self.drag_threshold;
                self.drag_threshold = threshold;
                if let Err(e) = self.validate() {
                    self.drag_threshold = previous;
                    return Err(e);
                }
            }
            "state_dir" => {
                self.state_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            _ => {
                return Err(ConfigError::Message(format!(
                    "Unknown setting '{key}'. Valid keys: {}",
                    SETTING_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load()
        } else {
            first_time_setup()
        }
    }
}
