//! Hash-gated atomic writer.
//!
//! ## `atomic_write` — write protocol
//!
//! 1. Normalise line endings to LF.
//! 2. SHA-256 hash the normalised content.
//! 3. Compare with the stored hash → skip if identical.
//! 4. Write to `<path>.splice.tmp`.
//! 5. Rename to final path (atomic on POSIX).
//! 6. Update the hash store entry (caller saves the store).

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, BuildError};
use crate::hash_store::HashStore;

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped — content matches the stored hash.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

/// Atomically write a single resolved document and update the hash store.
///
/// The hash store is loaded before the call; the caller is responsible for
/// saving it after all documents for a run are processed.
///
/// Returns [`WriteResult`] indicating whether the file was written or skipped.
pub fn atomic_write(
    path: &Path,
    content: &str,
    store: &mut HashStore,
    dry_run: bool,
) -> Result<WriteResult, BuildError> {
    let tmp = PathBuf::from(format!("{}.splice.tmp", path.display()));
    atomic_write_with_tmp(path, content, store, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    content: &str,
    store: &mut HashStore,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, BuildError> {
    // Normalise line endings to LF before hashing and writing.
    let normalized = content.replace("\r\n", "\n");
    let content = normalized.as_str();

    let digest = {
        let mut h = Sha256::new();
        h.update(content.as_bytes());
        hex::encode(h.finalize())
    };

    let key = path.to_string_lossy().to_string();
    if let Some(stored) = store.get(&key) {
        if stored == &digest {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    store.insert(key, digest);

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
