//! Domain types for the Splice manifest.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! All types are serializable/deserializable via serde + serde_yaml.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Directive markers
// ---------------------------------------------------------------------------

/// Tokens that delimit directives in source documents.
///
/// A placeholder is `{prefix}{name}{suffix}`, a conditional block is
/// `{prefix}{start_if}{name}{suffix} … {prefix}{end_if}{suffix}`, and an
/// include is `{prefix}include("path"[, {…}]){suffix}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default = "default_start_if")]
    pub start_if: String,
    #[serde(default = "default_end_if")]
    pub end_if: String,
}

fn default_prefix() -> String {
    "@@".to_owned()
}

fn default_start_if() -> String {
    "_IF_:".to_owned()
}

fn default_end_if() -> String {
    "_ENDIF_".to_owned()
}

impl Default for Markers {
    fn default() -> Self {
        Markers {
            prefix: default_prefix(),
            suffix: String::new(),
            start_if: default_start_if(),
            end_if: default_end_if(),
        }
    }
}

impl Markers {
    /// Placeholder token for a variable name.
    pub fn placeholder(&self, name: &str) -> String {
        format!("{}{}{}", self.prefix, name, self.suffix)
    }

    /// Start marker of a conditional block for a variable name.
    pub fn block_start(&self, name: &str) -> String {
        format!("{}{}{}{}", self.prefix, self.start_if, name, self.suffix)
    }

    /// End marker of a conditional block.
    pub fn block_end(&self) -> String {
        format!("{}{}{}", self.prefix, self.end_if, self.suffix)
    }
}

// ---------------------------------------------------------------------------
// Reserved source-dir variable
// ---------------------------------------------------------------------------

/// A reserved global variable whose value is recomputed for every top-level
/// source document: the document's own path, forward-slashed, with
/// `strip_prefix` removed when configured.
///
/// The recomputed value lives in a per-document context; the configured
/// global scope is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDirVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_prefix: Option<String>,
}

// ---------------------------------------------------------------------------
// Mappings
// ---------------------------------------------------------------------------

/// One source-to-destination mapping in a manifest.
///
/// `src` may be a single file or a directory; directories are walked
/// recursively and their relative layout is mirrored under `dest`.
/// Relative paths are interpreted against the manifest's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub src: PathBuf,
    pub dest: PathBuf,
    /// Extension filter for directory sources (e.g. `["html", "tpl"]`).
    /// Empty means every file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Root of a `splice.yaml` run manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    #[serde(default)]
    pub markers: Markers,
    /// Variables visible to every document. String values may contain
    /// template expressions; non-strings are serialized to compact JSON.
    #[serde(default)]
    pub globals: BTreeMap<String, serde_json::Value>,
    /// Fixed directory that relative include paths resolve against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes_dir: Option<PathBuf>,
    /// Project root the `docroot` variable points back to.
    #[serde(default = "default_docroot")]
    pub docroot: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<SourceDirVar>,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_docroot() -> PathBuf {
    PathBuf::from(".")
}

impl Manifest {
    /// A starter manifest with default markers and an example mapping.
    pub fn starter(docroot: PathBuf) -> Self {
        let now = Utc::now();
        Manifest {
            version: 1,
            markers: Markers::default(),
            globals: BTreeMap::new(),
            includes_dir: None,
            docroot,
            source_dir: None,
            mappings: vec![Mapping {
                src: PathBuf::from("src"),
                dest: PathBuf::from("dist"),
                extensions: vec!["html".to_owned()],
            }],
            created_at: now,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
