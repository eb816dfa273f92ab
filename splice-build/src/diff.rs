//! Dry-run unified diff support for `splice diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use splice_core::manifest;
use splice_engine::{Preprocessor, Settings};

use crate::error::{io_err, BuildError};
use crate::pipeline::collect_sources;

/// A single pending file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Diff result for a manifest.
#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    pub diffs: Vec<FileDiff>,
    /// Documents that failed to render, with their error text.
    pub failures: Vec<(PathBuf, String)>,
}

/// Render what `build` would write and compare it to current on-disk content.
///
/// No files are written. Documents that fail to render are reported in
/// `failures` and do not stop their siblings.
pub fn diff_manifest(manifest_path: &Path) -> Result<DiffReport, BuildError> {
    let manifest = manifest::load(manifest_path)?;
    let manifest_dir = crate::pipeline::manifest_dir_of(manifest_path)?;
    let engine = Preprocessor::new(Settings::from_manifest(&manifest, &manifest_dir))?;

    let mut report = DiffReport::default();
    for mapping in &manifest.mappings {
        for (src, dest) in collect_sources(&manifest_dir, mapping)? {
            let rendered = match engine.process_file(&src) {
                Ok(content) => normalize_line_endings(&content),
                Err(e) => {
                    tracing::warn!("diff skipping {}: {e}", src.display());
                    report.failures.push((src, e.to_string()));
                    continue;
                }
            };
            let existing = read_existing_or_empty(&dest)?;
            if existing == rendered {
                continue;
            }

            let relative = dest.strip_prefix(&manifest_dir).unwrap_or(dest.as_path());
            let old_header = format!("a/{}", relative.display());
            let new_header = format!("b/{}", relative.display());
            let unified = TextDiff::from_lines(&existing, &rendered)
                .unified_diff()
                .header(&old_header, &new_header)
                .context_radius(3)
                .to_string();

            report.diffs.push(FileDiff {
                path: dest,
                unified_diff: unified,
            });
        }
    }

    Ok(report)
}

fn read_existing_or_empty(path: &Path) -> Result<String, BuildError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
