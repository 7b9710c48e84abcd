//! Storage layer for room maps
//!
//! A map lives in one named slot of a key-value store. [`Database`] keeps the
//! slots in SQLite; [`MemoryStore`] keeps them in a hash map.

mod memory;
mod migrations;
mod parse;
mod slots;
mod traits;

use crate::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, instrument};

pub use memory::MemoryStore;
pub use slots::SlotStore;
pub use traits::{SlotRepository, MAP_SLOT};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        debug!(version = self.schema_version()?, "Database schema ready");
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> Result<u32> {
        migrations::get_current_version(&self.conn)
    }

    /// Get slot store
    pub fn slots(&self) -> SlotStore<'_> {
        SlotStore::new(&self.conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl SlotRepository for Database {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.slots().get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.slots().set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots().remove(key)
    }

    fn last_written(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        self.slots().updated_at(key)
    }
}
