//! `splice init [path] [--docroot DIR] [--force]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use splice_core::manifest;

/// Write a starter `splice.yaml` manifest.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory).
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Project root the `docroot` variable points back to, relative to the
    /// manifest's directory.
    #[arg(long, default_value = ".")]
    pub docroot: PathBuf,

    /// Overwrite an existing manifest.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let path = manifest::init(&self.path, self.docroot, self.force).with_context(|| {
            format!("failed to initialize manifest in '{}'", self.path.display())
        })?;

        println!("✓ Wrote starter manifest: {}", path.display());
        println!("  Edit mappings and globals, then run `splice build`.");
        Ok(())
    }
}
