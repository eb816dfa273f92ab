//! `splice diff` — show unified diffs of pending writes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use splice_build::diff_manifest;

/// Arguments for `splice diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Manifest file to diff against.
    #[arg(long, default_value = "splice.yaml")]
    pub manifest: PathBuf,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let report = diff_manifest(&self.manifest)
            .with_context(|| format!("diff failed for '{}'", self.manifest.display()))?;

        for (src, error) in &report.failures {
            eprintln!("{} {}: {error}", "✗".red(), src.display());
        }

        if report.diffs.is_empty() {
            println!("No pending changes.");
            return Ok(());
        }

        for diff in report.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }
}
