//! `splice.yaml` manifest persistence.
//!
//! The manifest lives next to the sources it describes; every relative path
//! inside it (mappings, `includes_dir`, `docroot`) is interpreted against the
//! manifest's own directory.
//!
//! Saves are atomic: serialize → `.yaml.tmp` sibling → `rename`. The `.tmp`
//! file is always in the same directory as the target (same filesystem — no
//! EXDEV on rename).

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::ManifestError;
use crate::types::Manifest;

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "splice.yaml";

/// `<dir>/splice.yaml` — pure, no I/O.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load a manifest from `path`.
///
/// Returns `ManifestError::NotFound` if absent,
/// `ManifestError::Parse` (with path + line context) if malformed YAML.
pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ManifestError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save a manifest to `path`, bumping `updated_at`.
pub fn save(path: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
    let mut manifest = manifest.clone();
    manifest.updated_at = Utc::now();

    let yaml = serde_yaml::to_string(&manifest)?;
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

/// Write a starter manifest at `<dir>/splice.yaml`.
///
/// Refuses to overwrite an existing manifest unless `force` is set.
pub fn init(dir: &Path, docroot: PathBuf, force: bool) -> Result<PathBuf, ManifestError> {
    let path = manifest_path(dir);
    if path.exists() && !force {
        return Err(ManifestError::AlreadyExists { path });
    }
    std::fs::create_dir_all(dir)?;
    save(&path, &Manifest::starter(docroot))?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
