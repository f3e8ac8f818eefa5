//! Key-value backends for session state.

use crate::errors::VelixaError;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const STORAGE_CORRUPT: &str = "VELIXA_SESSION_STORAGE_CORRUPT";

/// String values by key, the shape of browser local storage.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, VelixaError>;
    fn set(&self, key: &str, value: &str) -> Result<(), VelixaError>;
    fn remove(&self, key: &str) -> Result<(), VelixaError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, VelixaError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), VelixaError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), VelixaError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One JSON object on disk, rewritten on every change. A missing file reads
/// as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, VelixaError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(VelixaError::session(
                STORAGE_CORRUPT,
                format!("{} does not hold a JSON object", self.path.display()),
            )),
        }
    }

    /// Writes a sibling temp file, then renames it over the target, so the
    /// file on disk is always a complete object.
    fn store(&self, entries: &Map<String, Value>) -> Result<(), VelixaError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut staged = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(staged.as_file_mut(), entries)?;
        staged.as_file_mut().flush()?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|err| err.error)?;

        log::trace!("Saved {} session entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, VelixaError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), VelixaError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.store(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), VelixaError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("v".to_string()));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_storage_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let storage = FileStorage::new(&path);

        assert_eq!(storage.get("token").unwrap(), None);
        storage.set("token", "abc").unwrap();
        assert!(path.exists());

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("token").unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn test_file_storage_remove_persists() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();
        storage.remove("a").unwrap();

        let raw = fs::read_to_string(storage.path()).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, serde_json::json!({"b": "2"}));
    }

    #[test]
    fn test_file_storage_leaves_only_complete_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileStorage::new(&path);

        for i in 0..20 {
            storage.set("token", &format!("tok-{}", i)).unwrap();
            let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(parsed["token"], Value::String(format!("tok-{}", i)));
        }

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("session.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_storage_replaces_instead_of_truncating() {
        use std::io::Read;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileStorage::new(&path);
        storage.set("token", "old").unwrap();

        let mut previous = fs::File::open(&path).unwrap();
        storage.set("token", "new").unwrap();

        let mut raw = String::new();
        previous.read_to_string(&mut raw).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, serde_json::json!({"token": "old"}));
        assert_eq!(storage.get("token").unwrap(), Some("new".to_string()));
    }

    #[test]
    fn test_file_storage_rejects_non_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "[1, 2]").unwrap();

        match FileStorage::new(&path).get("token") {
            Err(VelixaError::Session { code, .. }) => assert_eq!(code, STORAGE_CORRUPT),
            other => panic!("Expected session error, got {:?}", other),
        }
    }

    #[test]
    fn test_file_storage_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileStorage::new(&path).get("token"),
            Err(VelixaError::Json(_))
        ));
    }
}
