//! Hash store — SHA-256-based idempotency tracking for built files.
//!
//! Persists a `HashStoreFile` JSON document at
//! `<manifest dir>/.splice/hashes.json`.
//! Writes use the same atomic `.tmp` + rename pattern as the manifest.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, BuildError};

/// In-memory hash store: maps destination path strings to the SHA-256 hex
/// digest of the last written content.
pub type HashStore = HashMap<String, String>;

/// On-disk hash store payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashStoreFile {
    pub built_at: DateTime<Utc>,
    pub files: HashStore,
}

/// Path to the hash store JSON for a manifest directory — pure, no I/O.
pub fn store_path(manifest_dir: &Path) -> PathBuf {
    manifest_dir.join(".splice").join("hashes.json")
}

/// Load the hash store for `manifest_dir`.
///
/// Returns an empty store if the file does not yet exist.
pub fn load(manifest_dir: &Path) -> Result<HashStoreFile, BuildError> {
    let path = store_path(manifest_dir);
    if !path.exists() {
        return Ok(HashStoreFile {
            built_at: Utc::now(),
            files: HashMap::new(),
        });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save the hash store for `manifest_dir` atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save(manifest_dir: &Path, store: &HashStoreFile) -> Result<(), BuildError> {
    let path = store_path(manifest_dir);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid hash store path"),
        ));
    };

    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(store)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_store_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let store = load(tmp.path()).unwrap();
        assert!(store.files.is_empty());
    }

    #[test]
    fn roundtrip_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut files = HashMap::new();
        files.insert("dist/index.html".to_string(), "deadbeef".to_string());
        files.insert("dist/about/index.html".to_string(), "cafebabe".to_string());
        let store = HashStoreFile {
            built_at: Utc::now(),
            files,
        };

        save(tmp.path(), &store).unwrap();
        let loaded = load(tmp.path()).unwrap();
        assert_eq!(loaded.files, store.files);
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let tmp = TempDir::new().unwrap();
        let store = HashStoreFile {
            built_at: Utc::now(),
            files: HashMap::new(),
        };
        save(tmp.path(), &store).unwrap();
        let tmp_path = store_path(tmp.path()).with_extension("json.tmp");
        assert!(
            !tmp_path.exists(),
            "tmp file should be removed after atomic rename"
        );
    }
}
