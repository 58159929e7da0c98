//! # Session Store
//!
//! Two flat string entries in page-scoped storage remember which backend was
//! used last and on which chain. The record is only a hint for silent
//! restoration; the backend stays the source of truth.

use crate::backend::BackendKind;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Durable string key-value storage (`localStorage` in a browser).
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-local storage for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// The persisted pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRecord {
    pub kind: BackendKind,
    pub chain_id: u64,
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    type_key: String,
    chain_key: String,
}

impl SessionStore {
    /// Store under `"{namespace}-type"` and `"{namespace}-chain-id"`.
    pub fn new(storage: Arc<dyn KeyValueStorage>, namespace: &str) -> Self {
        Self {
            storage,
            type_key: format!("{}-type", namespace),
            chain_key: format!("{}-chain-id", namespace),
        }
    }

    pub fn save(&self, kind: BackendKind, chain_id: u64) {
        debug!(backend = %kind, chain_id, "saving session");
        self.storage.set(&self.type_key, kind.key());
        self.storage.set(&self.chain_key, &chain_id.to_string());
    }

    pub fn clear(&self) {
        self.storage.remove(&self.type_key);
        self.storage.remove(&self.chain_key);
    }

    /// `None` unless both entries are present and readable.
    pub fn read(&self) -> Option<SessionRecord> {
        let kind = BackendKind::from_key(&self.storage.get(&self.type_key)?)?;
        let chain_id = self
            .storage
            .get(&self.chain_key)?
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|chain_id| *chain_id != 0)?;
        Some(SessionRecord { kind, chain_id })
    }
}
