//! Persistence of small JSON values, such as the selected airport.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Key under which the user's [`AirportSelection`](flightsnorway_models::AirportSelection) is kept.
pub const SELECTED_AIRPORT_KEY: &str = "selected-airport";

/// Key/value persistence used by the selection workflow.
pub trait SelectionStore: Send + Sync {
    /// Returns true if a value is stored under `key`.
    fn exists(&self, key: &str) -> bool;

    /// Load and deserialize the value under `key`.
    ///
    /// Fails with [`StoreError::NotFound`] if nothing is stored and with
    /// [`StoreError::Corrupt`] if the stored data does not deserialize as `T`.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError>;

    /// Serialize `value` and store it under `key`, replacing any previous value.
    ///
    /// Fails with [`StoreError::Serialize`] if `value` cannot be turned into JSON.
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;
}

impl<S: SelectionStore> SelectionStore for Arc<S> {
    fn exists(&self, key: &str) -> bool {
        (**self).exists(key)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        (**self).load(key)
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SelectionStore for JsonFileStore {
    fn exists(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let value = serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded stored value");
        Ok(value)
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        fs::write(&path, json)?;
        tracing::debug!(path = %path.display(), "saved value");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store holding serialized JSON strings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &str, raw: &str) {
        self.lock().insert(key.to_string(), raw.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SelectionStore for MemoryStore {
    fn exists(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let entries = self.lock();
        let raw = entries
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        serde_json::from_str(raw).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.lock().insert(key.to_string(), raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightsnorway_models::{Airport, AirportSelection, Location};

    fn selection() -> AirportSelection {
        Airport::new("SVG", "Stavanger", Location::new(58.8767, 5.6378)).into()
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));
        assert!(!store.exists(SELECTED_AIRPORT_KEY));

        store.save(SELECTED_AIRPORT_KEY, &selection()).unwrap();
        assert!(store.exists(SELECTED_AIRPORT_KEY));
        assert!(store.dir().join("selected-airport.json").is_file());

        let loaded: AirportSelection = store.load(SELECTED_AIRPORT_KEY).unwrap();
        assert_eq!(loaded, selection());
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }

    #[test]
    fn serialization_failure_is_not_reported_as_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let file_store = JsonFileStore::new(dir.path());
        let err = file_store.save("broken", &Unserializable).unwrap_err();
        assert!(matches!(err, StoreError::Serialize { ref key, .. } if key == "broken"));
        assert!(!file_store.exists("broken"));

        let memory = MemoryStore::new();
        let err = memory.save("broken", &Unserializable).unwrap_err();
        assert!(matches!(err, StoreError::Serialize { .. }));
        assert!(!memory.exists("broken"));
    }

    #[test]
    fn file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let err = store.load::<AirportSelection>("nothing").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(key) if key == "nothing"));
    }

    #[test]
    fn file_store_corrupt_value() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("selected-airport.json"), "{ not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.exists(SELECTED_AIRPORT_KEY));
        let err = store.load::<AirportSelection>(SELECTED_AIRPORT_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save(SELECTED_AIRPORT_KEY, &selection()).unwrap();
        store
            .save(SELECTED_AIRPORT_KEY, &AirportSelection::Nearest)
            .unwrap();
        let loaded: AirportSelection = store.load(SELECTED_AIRPORT_KEY).unwrap();
        assert!(loaded.is_nearest());
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(!store.exists(SELECTED_AIRPORT_KEY));
        store.save(SELECTED_AIRPORT_KEY, &AirportSelection::Nearest).unwrap();
        let loaded: AirportSelection = store.load(SELECTED_AIRPORT_KEY).unwrap();
        assert_eq!(loaded, AirportSelection::Nearest);
    }

    #[test]
    fn memory_store_corrupt_value() {
        let store = MemoryStore::new();
        store.insert_raw(SELECTED_AIRPORT_KEY, "[1, 2, 3]");
        let err = store.load::<AirportSelection>(SELECTED_AIRPORT_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
