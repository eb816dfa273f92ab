//! Error types for splice-engine.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while preprocessing a document.
///
/// Every variant is fatal for the enclosing document only; sibling documents
/// in a multi-document run are unaffected.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// An include target or source document could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The inline local-variable data on an include directive is not a valid
    /// JSON object.
    #[error("invalid include variables in `{directive}`: {source}")]
    IncludeVars {
        directive: String,
        #[source]
        source: serde_json::Error,
    },

    /// A file includes itself, directly or through a chain.
    #[error("include cycle: {} is already being processed (chain: {})", .path.display(), format_chain(.chain))]
    IncludeCycle { path: PathBuf, chain: Vec<PathBuf> },

    /// Includes nested deeper than the configured limit.
    #[error("include depth exceeded limit {limit} at {path}")]
    DepthExceeded { limit: usize, path: PathBuf },

    /// A template expression in a variable value failed to evaluate.
    /// Raised at scope-construction time, never from document content.
    #[error("variable expression error: {0}")]
    Expression(#[from] tera::Error),
}

/// Convenience constructor for [`PreprocessError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PreprocessError {
    PreprocessError::Io {
        path: path.into(),
        source,
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
