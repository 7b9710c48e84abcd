//! In-memory slot storage
//!
//! Used for tests and throwaway sessions; nothing survives the process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::traits::SlotRepository;
use crate::error::Result;
use crate::models::now;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    written_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock cannot leave a half-written slot
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SlotRepository for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots().get(key).map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let entry = Entry {
            value: value.to_vec(),
            written_at: now(),
        };
        self.slots().insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots().remove(key);
        Ok(())
    }

    fn last_written(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.slots().get(key).map(|entry| entry.written_at))
    }
}
