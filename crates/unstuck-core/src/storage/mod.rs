mod config;
pub mod database;

pub use config::{Config, EngagementConfig, LoggingConfig, NotificationsConfig};
pub use database::Database;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::StorageError;

/// Persisted keys. Each holds one independently recoverable value.
pub mod keys {
    pub const VAULT: &str = "unstuck_vault";
    pub const COMPLETED_COUNT: &str = "unstuck_completed";
    pub const HISTORY: &str = "unstuck_history";
    pub const RESCUE_SETTINGS: &str = "unstuck_rescue";
    pub const AWAY_SINCE: &str = "unstuck_away_since";
    pub const APP_LIMITS: &str = "unstuck_app_limits";
}

/// Synchronous string key-value store that survives process restart.
///
/// Every write is committed before the call returns.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Write several keys as one step. Backends with transactions override
    /// this so a crash never leaves only some of the keys written.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Shared handle used by every component that persists state.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// Volatile store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read a JSON value, substituting the default when the key is absent or
/// its content does not parse.
pub(crate) fn load_json_or_default<T>(store: &dyn KeyValueStore, key: &str) -> Result<T, StorageError>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(raw) = store.get(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding malformed persisted value");
            Ok(T::default())
        }
    }
}

/// Returns the data directory.
///
/// `UNSTUCK_DATA_DIR` wins when set. Otherwise `~/.config/unstuck[-dev]/`
/// based on `UNSTUCK_ENV` (set `UNSTUCK_ENV=dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("UNSTUCK_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("UNSTUCK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("unstuck-dev")
            } else {
                base_dir.join("unstuck")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
