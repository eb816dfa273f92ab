//! Error types for splice-build.

use std::path::PathBuf;

use thiserror::Error;

use splice_core::error::ManifestError;
use splice_engine::PreprocessError;

/// All errors that can arise from build operations.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An error from the resolution engine that aborts the whole run
    /// (per-document engine failures are reported in the build report
    /// instead).
    #[error("engine error: {0}")]
    Engine(#[from] PreprocessError),

    /// An error loading the manifest.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (hash store).
    #[error("hash store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`BuildError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.into(),
        source,
    }
}
