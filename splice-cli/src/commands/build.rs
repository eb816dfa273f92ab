//! `splice build` — build every mapping in the manifest.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use splice_build::{pipeline, DocumentOutcome};

/// Arguments for `splice build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Manifest file to build from.
    #[arg(long, default_value = "splice.yaml")]
    pub manifest: PathBuf,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl BuildArgs {
    pub fn run(self) -> Result<()> {
        let report = pipeline::run(&self.manifest, self.dry_run)
            .with_context(|| format!("build failed for '{}'", self.manifest.display()))?;

        let prefix = if self.dry_run { "[dry-run] " } else { "" };
        if report.outcomes.is_empty() {
            println!("{prefix}Nothing to build — add mappings to the manifest.");
            return Ok(());
        }

        println!(
            "{prefix}{} {} written, {} unchanged, {} failed",
            "✓".green(),
            report.written() + report.would_write(),
            report.unchanged(),
            report.failed()
        );
        for outcome in &report.outcomes {
            match outcome {
                DocumentOutcome::Written { dest, .. } => {
                    println!("  {}  {}", "✎".green(), dest.display())
                }
                DocumentOutcome::WouldWrite { dest, .. } => {
                    println!("  {}  {}", "~".yellow(), dest.display())
                }
                DocumentOutcome::Unchanged { dest, .. } => println!("  ·  {}", dest.display()),
                DocumentOutcome::Failed { src, error } => {
                    println!("  {}  {}: {error}", "✗".red(), src.display())
                }
            }
        }

        if report.has_failures() {
            anyhow::bail!("{} document(s) failed", report.failed());
        }
        Ok(())
    }
}
