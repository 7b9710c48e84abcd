//! Storage slot trait
//!
//! The map is persisted into a single named slot of an opaque key-value
//! store. Implementations may be backed by SQLite or held in memory.

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Key under which the editor keeps its map
pub const MAP_SLOT: &str = "roomMap";

/// A key-value store of named byte slots
///
/// Writes are last-write-wins; there is exactly one writer.
pub trait SlotRepository {
    /// Read a slot, `None` if it was never written or has been removed
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrite a slot
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove a slot; removing an absent slot is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// When a slot was last written, `None` if it is absent
    fn last_written(&self, key: &str) -> Result<Option<DateTime<Utc>>>;
}

impl<T: SlotRepository + ?Sized> SlotRepository for &T {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn last_written(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        (**self).last_written(key)
    }
}
