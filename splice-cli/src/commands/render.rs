//! `splice render <file>` — resolve one document and print it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use splice_core::manifest;
use splice_engine::{Preprocessor, Settings};

/// Arguments for `splice render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Source document to resolve.
    pub file: PathBuf,

    /// Manifest file supplying markers, globals, and the docroot.
    #[arg(long, default_value = "splice.yaml")]
    pub manifest: PathBuf,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let manifest = manifest::load(&self.manifest)
            .with_context(|| format!("cannot load manifest '{}'", self.manifest.display()))?;
        let base_dir = match self.manifest.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        // docroot arithmetic needs an absolute base
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let base_dir = splice_engine::docroot::absolutize(base_dir, &cwd);

        let engine = Preprocessor::new(Settings::from_manifest(&manifest, &base_dir))?;
        let output = engine
            .process_file(&self.file)
            .with_context(|| format!("failed to render '{}'", self.file.display()))?;

        print!("{output}");
        Ok(())
    }
}
