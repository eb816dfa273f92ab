//! Manifest-driven build pipeline.
//!
//! Collects source documents per mapping, runs each through the resolution
//! engine, and writes destinations with hash-gated atomic writes. A fatal
//! document error (malformed include vars, unreadable include, cycle) is
//! recorded in the report and does not stop sibling documents.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use splice_core::manifest;
use splice_core::types::Mapping;
use splice_engine::{docroot, Preprocessor, Settings};

use crate::error::{io_err, BuildError};
use crate::hash_store;
use crate::writer::{atomic_write, WriteResult};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Outcome of building a single source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Written { src: PathBuf, dest: PathBuf },
    Unchanged { src: PathBuf, dest: PathBuf },
    WouldWrite { src: PathBuf, dest: PathBuf },
    Failed { src: PathBuf, error: String },
}

/// Summary of one build run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BuildReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Written { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Unchanged { .. }))
    }

    pub fn would_write(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::WouldWrite { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

// ---------------------------------------------------------------------------
// Source collection
// ---------------------------------------------------------------------------

/// Expand one mapping into `(source, destination)` document pairs.
///
/// A directory source is walked recursively (sorted, filtered by the
/// mapping's extension list) and its relative layout mirrored under `dest`.
/// A file source maps to `dest` directly, or into it when `dest` is a
/// directory (existing, or spelled with a trailing separator).
pub(crate) fn collect_sources(
    manifest_dir: &Path,
    mapping: &Mapping,
) -> Result<Vec<(PathBuf, PathBuf)>, BuildError> {
    let src = docroot::absolutize(&mapping.src, manifest_dir);
    let dest = docroot::absolutize(&mapping.dest, manifest_dir);

    if src.is_dir() {
        let mut files = Vec::new();
        walk(&src, &mut files)?;
        files.sort();
        let mut pairs = Vec::new();
        for file in files {
            if !matches_extension(&file, &mapping.extensions) {
                continue;
            }
            let rel = file.strip_prefix(&src).unwrap_or(&file).to_path_buf();
            pairs.push((file, dest.join(rel)));
        }
        return Ok(pairs);
    }

    if src.is_file() {
        let dest = if dest_is_directory(&mapping.dest, &dest) {
            match src.file_name() {
                Some(name) => dest.join(name),
                None => dest,
            }
        } else {
            dest
        };
        return Ok(vec![(src, dest)]);
    }

    Err(io_err(
        &src,
        std::io::Error::new(ErrorKind::NotFound, "mapping source not found"),
    ))
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), BuildError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            walk(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn matches_extension(file: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let Some(ext) = file.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.') == ext)
}

fn dest_is_directory(as_written: &Path, resolved: &Path) -> bool {
    as_written.to_string_lossy().ends_with(['/', '\\']) || resolved.is_dir()
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Absolute directory of the manifest. Docroot arithmetic compares this
/// against absolute document paths, so a relative `--manifest` argument must
/// not leak through.
pub(crate) fn manifest_dir_of(manifest_path: &Path) -> Result<PathBuf, BuildError> {
    let dir = match manifest_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let cwd = std::env::current_dir().map_err(|e| io_err(".", e))?;
    Ok(docroot::absolutize(&dir, &cwd))
}

/// Run the build for every mapping in the manifest at `manifest_path`.
///
/// `dry_run` renders everything but writes nothing (hash store included).
pub fn run(manifest_path: &Path, dry_run: bool) -> Result<BuildReport, BuildError> {
    let build_started_at = Utc::now();

    let manifest = manifest::load(manifest_path)?;
    let manifest_dir = manifest_dir_of(manifest_path)?;

    let engine = Preprocessor::new(Settings::from_manifest(&manifest, &manifest_dir))?;
    let mut store = hash_store::load(&manifest_dir)?;
    let mut outcomes = Vec::new();

    for mapping in &manifest.mappings {
        for (src, dest) in collect_sources(&manifest_dir, mapping)? {
            match engine.process_file(&src) {
                Ok(content) => {
                    let result = atomic_write(&dest, &content, &mut store.files, dry_run)?;
                    outcomes.push(match result {
                        WriteResult::Written { path } => DocumentOutcome::Written { src, dest: path },
                        WriteResult::Unchanged { path } => {
                            DocumentOutcome::Unchanged { src, dest: path }
                        }
                        WriteResult::WouldWrite { path } => {
                            DocumentOutcome::WouldWrite { src, dest: path }
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("failed to process {}: {e}", src.display());
                    outcomes.push(DocumentOutcome::Failed {
                        src,
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    if !dry_run {
        store.built_at = build_started_at;
        hash_store::save(&manifest_dir, &store)?;
    }

    Ok(BuildReport { outcomes })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
