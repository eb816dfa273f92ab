//! Splice core library — manifest types, persistence, errors.
//!
//! Public API surface:
//! - [`types`] — [`Markers`], [`Mapping`], [`SourceDirVar`], [`Manifest`]
//! - [`error`] — [`ManifestError`]
//! - [`manifest`] — load / save / init

pub mod error;
pub mod manifest;
pub mod types;

pub use error::ManifestError;
pub use types::{Manifest, Mapping, Markers, SourceDirVar};
