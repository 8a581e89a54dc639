//! Locally persisted preferences.
//!
//! The only durable-storage touchpoint in the core: one string key holding a
//! JSON-encoded value, read at partition construction and written on every
//! update. Persistence failures degrade to in-memory behavior.

use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::warn;

/// Key/value store for client-side preferences.
pub trait PrefStore: Send + Sync {
    /// Read the stored value for `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`.
    fn write(&self, key: &str, value: &str);
}

/// In-memory store for tests and ephemeral sessions.
pub struct MemoryPrefStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPrefStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Pre-seed a key, mimicking a store left over from a previous session.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.values.write().insert(key.into(), value.into());
        store
    }
}

impl Default for MemoryPrefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefStore for MemoryPrefStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }
}

/// File-backed store: one JSON object of `key -> value` strings.
pub struct FilePrefStore {
    path: PathBuf,
}

impl FilePrefStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> HashMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "preference file unreadable, starting empty");
                HashMap::new()
            }
        }
    }
}

impl PrefStore for FilePrefStore {
    fn read(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        let mut map = self.load();
        map.insert(key.to_string(), value.to_string());
        let raw = match serde_json::to_string_pretty(&map) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, "failed to encode preferences");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, raw) {
            warn!(path = %self.path.display(), %err, "failed to persist preferences");
        }
    }
}
