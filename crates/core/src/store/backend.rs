//! Key-value backend abstraction.
//!
//! The store persists each collection as one JSON document under a string
//! key. Any durable medium that can get/set strings atomically can back it;
//! the SQLite implementation lives in the storage crate, and
//! [`MemoryBackend`] serves tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::{DatabaseError, Result};

/// Durable string key-value medium behind the entity repository.
///
/// Implementations report medium-level failures only; content is opaque to
/// the backend and is sanitized above this layer.
pub trait KvBackend: Send + Sync {
    /// Reads the document stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes one document.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Writes several documents atomically: either every entry becomes
    /// visible or none does.
    fn set_many(&self, entries: &[(String, String)]) -> Result<()>;

    /// Whether a document exists under `key`.
    fn contains(&self, key: &str) -> Result<bool>;
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryBackend {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| DatabaseError::ReadFailed(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| DatabaseError::WriteFailed(e.to_string()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        for (key, value) in entries {
            data.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        let data = self
            .data
            .read()
            .map_err(|e| DatabaseError::ReadFailed(e.to_string()))?;
        Ok(data.contains_key(key))
    }
}
