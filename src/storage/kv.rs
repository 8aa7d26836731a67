//! Synchronous key/value substrates
//!
//! The local backend and the small-state store both sit on a
//! [`KeyValueStore`]: an in-memory map for a single session, or a directory
//! holding one JSON file per key.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PantryError;

use super::file_io::{read_text_optional, write_text_atomic};

/// Synchronous string key/value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PantryError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PantryError>;

    /// All keys, sorted
    fn keys(&self) -> Result<Vec<String>, PantryError>;

    /// Fail if `set` would reject this key, without writing anything
    fn check_key(&self, _key: &str) -> Result<(), PantryError> {
        Ok(())
    }
}

/// Whether a key can name a file in a [`FileStore`] directory
///
/// ASCII letters, digits, `_`, `-` and `.`, not starting with `.`.
pub fn is_valid_store_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Session-scoped store backed by a map
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PantryError> {
        let data = self.data.read().map_err(|e| {
            PantryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PantryError> {
        let mut data = self.data.write().map_err(|e| {
            PantryError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, PantryError> {
        let data = self.data.read().map_err(|e| {
            PantryError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut keys: Vec<String> = data.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Device store persisting each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PantryError> {
        if !is_valid_store_key(key) {
            return Err(PantryError::Storage(format!("Invalid store key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PantryError> {
        read_text_optional(self.path_for(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PantryError> {
        write_text_atomic(self.path_for(key)?, value)
    }

    fn check_key(&self, key: &str) -> Result<(), PantryError> {
        self.path_for(key).map(|_| ())
    }

    fn keys(&self) -> Result<Vec<String>, PantryError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            PantryError::Storage(format!("Failed to list {}: {}", self.dir.display(), e))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PantryError::Storage(e.to_string()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(key) = name.strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("pantryapp_stock").unwrap(), None);

        store.set("pantryapp_stock", "one").unwrap();
        store.set("pantryapp_stock", "two").unwrap();
        store.set("pantryapp_recipes", "three").unwrap();

        assert_eq!(store.get("pantryapp_stock").unwrap().as_deref(), Some("two"));
        assert_eq!(
            store.keys().unwrap(),
            vec!["pantryapp_recipes".to_string(), "pantryapp_stock".to_string()]
        );
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_file_store() {
        let temp_dir = TempDir::new().unwrap();
        exercise(&FileStore::new(temp_dir.path().join("data")));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        FileStore::new(temp_dir.path().to_path_buf())
            .set("cloud_user_id", "user123")
            .unwrap();

        let reopened = FileStore::new(temp_dir.path().to_path_buf());
        assert_eq!(
            reopened.get("cloud_user_id").unwrap().as_deref(),
            Some("user123")
        );
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf());

        for key in ["", "../escape", "a/b", ".hidden", "pantryapp_zz bad"] {
            assert!(store.check_key(key).is_err(), "{key:?}");
            assert!(store.set(key, "x").is_err(), "{key:?}");
        }
        assert!(store.keys().unwrap().is_empty());
        store.check_key("pantryapp_stock").unwrap();
    }

    #[test]
    fn test_memory_store_accepts_any_key() {
        MemoryStore::new().check_key("zz bad/../").unwrap();
    }
}
