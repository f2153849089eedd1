//! Session stores backed by a JSON file or an in-memory map.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chronopay_application::SessionStore;
use chronopay_core::{AppError, AppResult};
use serde_json::{Map, Value};
use tracing::debug;

/// Session store reading a JSON object of key/value pairs from disk.
///
/// String values are returned as-is; any other non-null value is returned as
/// its JSON text so nested payloads can be stored without double encoding.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store over the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn load(&self) -> AppResult<Option<Map<String, Value>>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "session file not found");
                return Ok(None);
            }
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read session file '{}': {error}",
                    self.path.display()
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<Map<String, Value>>(raw.as_str())
            .map(Some)
            .map_err(|error| {
                AppError::Internal(format!(
                    "session file '{}' is not a JSON object: {error}",
                    self.path.display()
                ))
            })
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let Some(mut entries) = self.load()? else {
            return Ok(None);
        };

        Ok(match entries.remove(key) {
            Some(Value::String(value)) => Some(value),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
    }
}

/// Session store holding fixed entries in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    entries: HashMap<String, String>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one entry.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl SessionStore for InMemorySessionStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }
}
