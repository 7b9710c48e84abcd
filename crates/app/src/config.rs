//! Application configuration
//!
//! Loaded from `roommap.toml`. Every field is optional; a missing file means
//! all defaults.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use roommap_core::{GridSize, RoomMap, DEFAULT_COLS, DEFAULT_MAP_NAME, DEFAULT_ROWS, MAP_SLOT};
use serde::{Deserialize, Serialize};

/// Config file name inside the platform config directory
pub const CONFIG_FILE: &str = "roommap.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: u32, cols: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Settings for a fresh map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_cols")]
    pub cols: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file; defaults to the platform data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_slot")]
    pub slot: String,
}

fn default_name() -> String {
    DEFAULT_MAP_NAME.to_string()
}

fn default_rows() -> u32 {
    DEFAULT_ROWS
}

fn default_cols() -> u32 {
    DEFAULT_COLS
}

fn default_slot() -> String {
    MAP_SLOT.to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            slot: default_slot(),
        }
    }
}

impl MapConfig {
    /// The map used when storage holds nothing usable
    pub fn fallback_map(&self) -> RoomMap {
        RoomMap::new(self.name.clone(), GridSize::new(self.rows, self.cols))
    }
}

impl AppConfig {
    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from an explicit path, or the platform default location
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_toml(&std::fs::read_to_string(path)?)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => {
                    tracing::debug!(path = %path.display(), "Loading config");
                    Self::from_toml(&std::fs::read_to_string(path)?)
                }
                _ => Ok(Self::default()),
            },
        }
    }

    /// `roommap.toml` in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "onyx", "roommap").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.map.rows == 0 || self.map.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.map.rows,
                cols: self.map.cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.map.name, "My Room Map");
        assert_eq!((config.map.rows, config.map.cols), (9, 5));
        assert_eq!(config.storage.slot, "roomMap");
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[map]
name = "East Wing"
rows = 4
cols = 6

[storage]
path = "/tmp/east.db"
slot = "eastWing"
"#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.map.name, "East Wing");
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/east.db")));
        assert_eq!(config.storage.slot, "eastWing");

        let map = config.map.fallback_map();
        assert_eq!(map.grid_size, GridSize::new(4, 6));
        assert!(map.is_empty());
    }

    #[test]
    fn test_partial_section() {
        let config = AppConfig::from_toml("[map]\nrows = 3\n").unwrap();
        assert_eq!(config.map.rows, 3);
        assert_eq!(config.map.cols, 5);
        assert_eq!(config.map.name, "My Room Map");
    }

    #[test]
    fn test_zero_grid_rejected() {
        let err = AppConfig::from_toml("[map]\nrows = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGrid { rows: 0, cols: 5 }));
    }

    #[test]
    fn test_bad_toml_rejected() {
        assert!(matches!(
            AppConfig::from_toml("[map\nrows = 3").unwrap_err(),
            ConfigError::ParseError(_)
        ));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "[map]\nname = \"Cellar\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.map.name, "Cellar");
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let temp = TempDir::new().unwrap();
        let err = AppConfig::load(Some(&temp.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
