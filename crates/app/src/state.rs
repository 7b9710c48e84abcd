//! Application state: config, database and the editor session

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use roommap_core::{Database, LoadOutcome, MapSession};

use crate::config::AppConfig;
use crate::error::{AppError, Result};

/// Database file name inside the platform data directory
const DB_FILE: &str = "roommap.db";

/// Main application state
pub struct AppState {
    pub config: AppConfig,
    db_path: PathBuf,
    db: Database,
}

impl AppState {
    /// Open the database named by `db_override`, the config, or the data dir
    pub fn new(config: AppConfig, db_override: Option<&Path>) -> Result<Self> {
        let db_path = match db_override.or(config.storage.path.as_deref()) {
            Some(path) => path.to_path_buf(),
            None => Self::data_path()?.join(DB_FILE),
        };

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::open(&db_path)?;
        tracing::debug!(path = %db_path.display(), "Database opened");

        Ok(Self {
            config,
            db_path,
            db,
        })
    }

    fn data_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "onyx", "roommap").ok_or_else(|| {
            AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open an editor session on the configured slot
    pub fn session(&self) -> Result<(MapSession<&Database>, LoadOutcome)> {
        let fallback = self.config.map.fallback_map();
        Ok(MapSession::open(
            &self.db,
            &self.config.storage.slot,
            fallback,
        )?)
    }
}
