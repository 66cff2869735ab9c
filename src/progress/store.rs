//! Durable key-value backends for reading progress.
//!
//! [`FileStore`] keeps one JSON file per item under a cache directory, named
//! by a SHA-256 hash of the item key so arbitrary manga paths are safe as
//! filenames; the original key is stored inside the file for enumeration.
//! [`MemoryStore`] is the ephemeral twin for tests and incognito-style
//! embedding. Malformed contents are treated as absent, never as an error.

use super::ProgressRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub trait ProgressStore {
    /// Direct read; absent and unparseable both come back as `None`.
    fn get(&self, key: &str) -> Option<ProgressRecord>;

    /// Overwrite the record for `key`.
    fn set(&self, key: &str, record: &ProgressRecord) -> Result<()>;

    /// Delete the record for `key`; deleting an absent key is a no-op.
    fn delete(&self, key: &str) -> Result<()>;

    /// Keys of every readable record (used by expiry sweeps).
    fn list_keys(&self) -> Vec<String>;
}

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    #[serde(flatten)]
    record: ProgressRecord,
}

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        self.root.join(format!("{hash}.json"))
    }
}

impl ProgressStore for FileStore {
    fn get(&self, key: &str) -> Option<ProgressRecord> {
        let data = fs::read_to_string(self.entry_path(key)).ok()?;
        let entry: StoredEntry = serde_json::from_str(&data).ok()?;
        (entry.key == key).then_some(entry.record)
    }

    fn set(&self, key: &str, record: &ProgressRecord) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        let entry = StoredEntry {
            key: key.to_string(),
            record: *record,
        };
        let contents = serde_json::to_string(&entry).context("Failed to encode progress")?;
        let path = self.entry_path(key);
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to delete {}", path.display()))
            }
        }
    }

    fn list_keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| fs::read_to_string(entry.path()).ok())
            .filter_map(|data| serde_json::from_str::<StoredEntry>(&data).ok())
            .map(|entry| entry.key)
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<String, ProgressRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Option<ProgressRecord> {
        self.records.borrow().get(key).copied()
    }

    fn set(&self, key: &str, record: &ProgressRecord) -> Result<()> {
        self.records.borrow_mut().insert(key.to_string(), *record);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.records.borrow_mut().remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Vec<String> {
        self.records.borrow().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "mangashelf-sync-store-{label}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn record(position: f32) -> ProgressRecord {
        ProgressRecord {
            scroll_position: position,
            timestamp: 1_700_000_000_000,
            total_items: 24,
        }
    }

    #[test]
    fn file_store_round_trips_awkward_keys() {
        let dir = scratch_dir("roundtrip");
        let store = FileStore::new(&dir);
        let key = "/library/One Piece/vol 1/../cover?.cbz";

        store.set(key, &record(128.0)).expect("write succeeds");
        let loaded = store.get(key).expect("record present");
        assert_eq!(loaded.scroll_position, 128.0);
        assert_eq!(loaded.total_items, 24);
        assert_eq!(store.list_keys(), vec![key.to_string()]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_treats_malformed_contents_as_absent() {
        let dir = scratch_dir("malformed");
        let store = FileStore::new(&dir);
        store.set("good", &record(10.0)).expect("write succeeds");

        // Corrupt the file on disk behind the store's back.
        let path = store.entry_path("good");
        fs::write(&path, "{not json").expect("corruption written");

        assert!(store.get("good").is_none(), "parse failure reads as absent");
        assert!(store.list_keys().is_empty(), "unreadable entries are skipped");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_delete_is_idempotent() {
        let dir = scratch_dir("delete");
        let store = FileStore::new(&dir);
        store.set("k", &record(1.0)).expect("write succeeds");

        store.delete("k").expect("delete succeeds");
        store.delete("k").expect("second delete is a no-op");
        assert!(store.get("k").is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_lists_nothing_before_first_write() {
        let store = FileStore::new(scratch_dir("empty"));
        assert!(store.list_keys().is_empty());
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        store.set("k", &record(5.0)).expect("write succeeds");
        assert_eq!(store.get("k").map(|r| r.scroll_position), Some(5.0));
        store.delete("k").expect("delete succeeds");
        assert!(store.get("k").is_none());
    }
}
