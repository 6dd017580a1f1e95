//! String settings.
//!
//! Settings are process-wide: a write is visible to every later read through
//! any handle to the same store. Concurrent writers are last-write-wins.

use gradepost_core::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A string key-value setting store.
pub trait SettingStore: Send + Sync {
    /// Get the value of a setting, or `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a setting, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a setting, returning its previous value.
    fn remove(&self, key: &str) -> Result<Option<String>>;

    /// Get the value of a setting, or `default` if it was never set.
    fn get_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }
}

/// An in-memory setting store.
#[derive(Clone, Default)]
pub struct InMemorySettingStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySettingStore {
    /// Create an empty setting store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingStore for InMemorySettingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.write().remove(key))
    }
}
