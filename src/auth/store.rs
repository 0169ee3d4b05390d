//! Persistent bearer token storage
//!
//! The store behaves like browser local storage: a flat JSON object of string
//! values, of which the console only uses one key.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Storage holding a single bearer token
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>>;

    fn set(&self, token: &str) -> Result<()>;

    fn remove(&self) -> Result<()>;
}

/// Token store backed by a JSON file on disk
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_str(&content).map_err(|e| {
            Error::Storage(format!(
                "Storage file {} is not valid JSON: {}",
                self.path.display(),
                e
            ))
        })?;

        match value {
            Value::Object(entries) => Ok(entries),
            _ => Err(Error::Storage(format!(
                "Storage file {} does not contain a JSON object",
                self.path.display()
            ))),
        }
    }

    /// Entries to write back, or `None` when the file is unusable and will
    /// be started over
    fn entries_for_write(&self) -> Result<Option<Map<String, Value>>> {
        match self.read_entries() {
            Ok(entries) => Ok(Some(entries)),
            Err(Error::Storage(reason)) => {
                tracing::warn!("{}; replacing it", reason);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(&self.key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut entries = self.entries_for_write()?.unwrap_or_default();
        entries.insert(self.key.clone(), Value::String(token.to_string()));
        self.write_entries(&entries)?;
        tracing::debug!("Stored token under '{}' in {}", self.key, self.path.display());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match self.entries_for_write()? {
            Some(mut entries) => {
                if entries.remove(&self.key).is_some() {
                    self.write_entries(&entries)?;
                    tracing::debug!("Removed token '{}' from {}", self.key, self.path.display());
                }
            }
            None => self.write_entries(&Map::new())?,
        }
        Ok(())
    }
}

/// In-memory token store, for tests and embedding
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Other("Token store lock poisoned".to_string())
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.read().map_err(poisoned)?.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.write().map_err(poisoned)? = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.token.write().map_err(poisoned)? = None;
        Ok(())
    }
}
