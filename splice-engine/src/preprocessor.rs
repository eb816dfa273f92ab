//! The preprocessing pipeline: conditional stripping → placeholder
//! substitution → recursive include resolution.
//!
//! Includes are resolved depth-first: every included document runs the full
//! three-stage pipeline with its own local scope and working directory
//! before its result is spliced into the parent. All per-document state (the
//! recomputed source-dir value and the chain of in-progress include targets)
//! lives in a context threaded through the recursion — nothing is shared
//! across documents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use splice_core::types::{Manifest, Markers, SourceDirVar};

use crate::conditional;
use crate::docroot;
use crate::error::{io_err, PreprocessError};
use crate::include;
use crate::scope::{GlobalScope, LocalScope};
use crate::substitute;

/// Secondary guard under the cycle check, for chains that grow without
/// repeating a path.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hook applied to each included document's resolved content before it is
/// spliced into the parent.
pub type PostIncludeHook = Box<dyn Fn(&str, &LocalScope) -> String>;

/// Name of the implicit local variable bound at every document and include
/// site: the relative path from the document's directory back to the
/// configured root.
pub const DOCROOT_VAR: &str = "docroot";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Configuration surface of the engine.
///
/// `docroot` and `includes_dir` should be absolute; [`Settings::from_manifest`]
/// resolves them against the manifest's directory.
pub struct Settings {
    pub markers: Markers,
    pub globals: BTreeMap<String, Value>,
    /// Fixed directory that relative include paths resolve against. When
    /// unset, relative includes resolve against the including document's
    /// directory.
    pub includes_dir: Option<PathBuf>,
    /// Project root the `docroot` variable points back to.
    pub docroot: PathBuf,
    /// Reserved global recomputed per top-level document.
    pub source_dir: Option<SourceDirVar>,
    pub max_depth: usize,
    pub post_include: Option<PostIncludeHook>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            markers: Markers::default(),
            globals: BTreeMap::new(),
            includes_dir: None,
            docroot: PathBuf::from("."),
            source_dir: None,
            max_depth: DEFAULT_MAX_DEPTH,
            post_include: None,
        }
    }
}

impl Settings {
    /// Engine settings for a manifest, with relative paths resolved against
    /// `base_dir` (the manifest's directory).
    pub fn from_manifest(manifest: &Manifest, base_dir: &Path) -> Self {
        Settings {
            markers: manifest.markers.clone(),
            globals: manifest.globals.clone(),
            includes_dir: manifest
                .includes_dir
                .as_deref()
                .map(|dir| docroot::absolutize(dir, base_dir)),
            docroot: docroot::absolutize(&manifest.docroot, base_dir),
            source_dir: manifest.source_dir.clone(),
            max_depth: DEFAULT_MAX_DEPTH,
            post_include: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-document context
// ---------------------------------------------------------------------------

/// State scoped to one top-level document's processing.
#[derive(Debug, Clone)]
struct DocumentContext {
    /// Recomputed value of the reserved source-dir variable.
    source_dir_value: Option<String>,
    /// In-progress target paths, top-level document first. A resolved
    /// include target reappearing in this chain is a cycle.
    chain: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// Preprocessor
// ---------------------------------------------------------------------------

/// The resolution engine. Construct once per run; globals are normalized
/// exactly once and read-only thereafter.
pub struct Preprocessor {
    markers: Markers,
    globals: GlobalScope,
    includes_dir: Option<PathBuf>,
    docroot: PathBuf,
    source_dir: Option<SourceDirVar>,
    max_depth: usize,
    post_include: Option<PostIncludeHook>,
}

impl Preprocessor {
    /// Normalize the global scope and capture the configuration. Expression
    /// failures in global values surface here, before any document is read.
    pub fn new(settings: Settings) -> Result<Self, PreprocessError> {
        let globals = GlobalScope::new(&settings.globals)?;
        Ok(Preprocessor {
            markers: settings.markers,
            globals,
            includes_dir: settings.includes_dir,
            docroot: settings.docroot,
            source_dir: settings.source_dir,
            max_depth: settings.max_depth,
            post_include: settings.post_include,
        })
    }

    /// The normalized global scope.
    pub fn globals(&self) -> &GlobalScope {
        &self.globals
    }

    /// Read and fully resolve one top-level source document.
    pub fn process_file(&self, path: &Path) -> Result<String, PreprocessError> {
        let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        self.process_str(&content, path)
    }

    /// Fully resolve in-memory content as if read from `path`.
    ///
    /// `path` determines the document's working directory, its implicit
    /// `docroot` binding, and the per-document source-dir value.
    pub fn process_str(&self, content: &str, path: &Path) -> Result<String, PreprocessError> {
        let source_dir_value = self.source_dir.as_ref().map(|var| {
            let mut value = path.to_string_lossy().replace('\\', "/");
            if let Some(strip) = &var.strip_prefix {
                value = value.replacen(strip.as_str(), "", 1);
            }
            value
        });

        let resolved = if path.is_absolute() {
            docroot::normalize(path)
        } else {
            let cwd = std::env::current_dir().map_err(|e| io_err(".", e))?;
            docroot::absolutize(path, &cwd)
        };
        let dir = parent_dir(&resolved);

        let mut vars = serde_json::Map::new();
        vars.insert(
            DOCROOT_VAR.to_owned(),
            Value::String(docroot::docroot_value(&dir, &self.docroot)),
        );
        let locals = LocalScope::new(&vars, &self.globals)?;

        let mut ctx = DocumentContext {
            source_dir_value,
            chain: vec![resolved],
        };
        self.run_stages(content, &locals, &dir, &mut ctx)
    }

    fn source_dir_pair<'a>(&'a self, ctx: &'a DocumentContext) -> Option<(&'a str, &'a str)> {
        match (&self.source_dir, &ctx.source_dir_value) {
            (Some(var), Some(value)) => Some((var.name.as_str(), value.as_str())),
            _ => None,
        }
    }

    fn run_stages(
        &self,
        content: &str,
        locals: &LocalScope,
        working_dir: &Path,
        ctx: &mut DocumentContext,
    ) -> Result<String, PreprocessError> {
        let stripped = conditional::strip_blocks(content, &self.markers, locals, &self.globals);
        let substituted = substitute::substitute(
            &stripped,
            &self.markers,
            locals,
            &self.globals,
            self.source_dir_pair(ctx),
        );
        self.resolve_includes(substituted, working_dir, ctx)
    }

    /// Repeatedly resolve the first include directive until none remain.
    fn resolve_includes(
        &self,
        mut content: String,
        working_dir: &Path,
        ctx: &mut DocumentContext,
    ) -> Result<String, PreprocessError> {
        while let Some(directive) = include::find_directive(&content, &self.markers) {
            let mut vars: serde_json::Map<String, Value> = match &directive.vars {
                Some(raw) => {
                    serde_json::from_str(raw).map_err(|e| PreprocessError::IncludeVars {
                        directive: directive.text(&content).to_owned(),
                        source: e,
                    })?
                }
                None => serde_json::Map::new(),
            };

            let target = Path::new(&directive.path);
            let resolved = if target.is_absolute() {
                if self.includes_dir.is_some() {
                    tracing::warn!(
                        "includes_dir applies only to relative paths; using {} as given",
                        directive.path
                    );
                }
                docroot::normalize(target)
            } else {
                let base = self.includes_dir.as_deref().unwrap_or(working_dir);
                docroot::absolutize(target, base)
            };
            let target_dir = parent_dir(&resolved);

            // Implicit docroot binding; a caller-supplied value wins.
            vars.entry(DOCROOT_VAR.to_owned()).or_insert_with(|| {
                Value::String(docroot::docroot_value(&target_dir, &self.docroot))
            });

            if ctx.chain.contains(&resolved) {
                return Err(PreprocessError::IncludeCycle {
                    path: resolved,
                    chain: ctx.chain.clone(),
                });
            }
            if ctx.chain.len() >= self.max_depth {
                return Err(PreprocessError::DepthExceeded {
                    limit: self.max_depth,
                    path: resolved,
                });
            }

            tracing::debug!("including {}", resolved.display());
            let included =
                std::fs::read_to_string(&resolved).map_err(|e| io_err(&resolved, e))?;
            let locals = LocalScope::new(&vars, &self.globals)?;

            ctx.chain.push(resolved);
            let mut expanded = self.run_stages(&included, &locals, &target_dir, ctx)?;
            ctx.chain.pop();

            if let Some(hook) = &self.post_include {
                expanded = hook(&expanded, &locals);
            }

            // Splice by the recorded span and rescan the mutated document
            // from the start.
            content.replace_range(directive.span, &expanded);
        }
        Ok(content)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
