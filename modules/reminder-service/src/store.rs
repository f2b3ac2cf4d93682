//! JSON-array file store for reminders.
//!
//! The whole array is read on every load and rewritten on every save. Saves go
//! through a sibling `.tmp` file and an atomic rename so readers never see a
//! truncated file; when the rename is refused the target is overwritten in place.

use parking_lot::{Mutex, MutexGuard};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to open temp file {}: {source}", .path.display())]
    TempOpen { path: PathBuf, source: io::Error },
    #[error("failed to write temp file {}: {source}", .path.display())]
    TempWrite { path: PathBuf, source: io::Error },
    #[error("failed to overwrite {}: {source}", .path.display())]
    Overwrite { path: PathBuf, source: io::Error },
}

pub struct RecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every stored record. A missing file is created as `[]`;
    /// unreadable or non-array content is treated as empty.
    pub fn load(&self) -> Vec<Value> {
        let _guard = self.lock.lock();
        self.load_locked()
    }

    /// Replaces the stored array with `records`.
    pub fn save(&self, records: &[Value]) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        self.save_locked(records)
    }

    /// Loads the array and keeps the store locked until the returned
    /// transaction is committed or dropped.
    pub fn transaction(&self) -> Transaction<'_> {
        let guard = self.lock.lock();
        let records = self.load_locked();
        Transaction {
            store: self,
            _guard: guard,
            records,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn load_locked(&self) -> Vec<Value> {
        if !self.path.exists() {
            if let Err(e) = self.create_empty() {
                log::warn!("Could not create {}: {}", self.path.display(), e);
            }
            return Vec::new();
        }

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Could not read {}: {}, treating as empty", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                log::warn!("{} does not hold a JSON array, treating as empty", self.path.display());
                Vec::new()
            }
            Err(e) => {
                log::warn!("{} is not valid JSON ({}), treating as empty", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn create_empty(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        log::info!("Creating empty reminder store at {}", self.path.display());
        fs::write(&self.path, "[]")
    }

    fn save_locked(&self, records: &[Value]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(records)?;
        let tmp = self.temp_path();

        let mut file = File::create(&tmp).map_err(|source| StoreError::TempOpen {
            path: tmp.clone(),
            source,
        })?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|source| StoreError::TempWrite {
                path: tmp.clone(),
                source,
            })?;
        drop(file);

        if let Err(e) = fs::rename(&tmp, &self.path) {
            log::warn!(
                "Rename {} -> {} failed ({}), overwriting in place",
                tmp.display(),
                self.path.display(),
                e
            );
            fs::write(&self.path, content.as_bytes()).map_err(|source| StoreError::Overwrite {
                path: self.path.clone(),
                source,
            })?;
            let _ = fs::remove_file(&tmp);
        }

        log::debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Read-modify-write access to the store. Nothing is written unless
/// [`Transaction::commit`] is called.
pub struct Transaction<'a> {
    store: &'a RecordStore,
    _guard: MutexGuard<'a, ()>,
    records: Vec<Value>,
}

impl Transaction<'_> {
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<Value> {
        &mut self.records
    }

    pub fn commit(self) -> Result<(), StoreError> {
        self.store.save_locked(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn store_in(dir: &tempfile::TempDir) -> RecordStore {
        RecordStore::new(dir.path().join("reminders.json"))
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.load().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn test_load_creates_missing_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("data").join("reminders.json"));

        assert!(store.load().is_empty());
        assert!(store.path().exists());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[{\"id\": ").unwrap();

        assert!(store.load().is_empty());
        // fail-soft load leaves the file alone
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[{\"id\": ");
    }

    #[test]
    fn test_load_non_array_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(store.path(), r#"{"id": "a"}"#).unwrap();
        assert!(store.load().is_empty());

        fs::write(store.path(), "").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let records = vec![
            json!({"id": "a", "title": "Pay bills", "day": 5, "month": 3, "year": 2025}),
            json!({"id": "b", "title": "Dentist", "day": "12", "month": "4", "year": "2025", "time": "09:30"}),
        ];

        store.save(&records).unwrap();

        assert_eq!(store.load(), records);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_save_uses_two_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&[json!({"id": "a"})]).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        assert_eq!(written, "[\n  {\n    \"id\": \"a\"\n  }\n]");
    }

    #[test]
    fn test_save_fails_when_temp_cannot_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("missing").join("reminders.json"));

        let err = store.save(&[json!({"id": "a"})]).unwrap_err();
        assert!(matches!(err, StoreError::TempOpen { .. }));
    }

    #[test]
    fn test_save_fails_when_rename_and_overwrite_fail() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory at the target path refuses both rename and overwrite
        let target = dir.path().join("reminders.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();
        let store = RecordStore::new(&target);

        let err = store.save(&[json!({"id": "a"})]).unwrap_err();
        assert!(matches!(err, StoreError::Overwrite { .. }));
    }

    #[test]
    fn test_uncommitted_transaction_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&[json!({"id": "a"})]).unwrap();

        {
            let mut tx = store.transaction();
            tx.records_mut().clear();
            assert!(tx.records().is_empty());
        }

        assert_eq!(store.load(), vec![json!({"id": "a"})]);
    }

    #[test]
    fn test_concurrent_transactions_keep_every_append() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut tx = store.transaction();
                    tx.records_mut().push(json!({ "id": format!("r{}", i) }));
                    tx.commit().unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load().len(), 8);
    }
}
