//! Splice — build-time template preprocessor CLI.
//!
//! # Usage
//!
//! ```text
//! splice init [path] [--docroot DIR] [--force]
//! splice build [--manifest FILE] [--dry-run]
//! splice render <file> [--manifest FILE]
//! splice diff [--manifest FILE]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{build::BuildArgs, diff::DiffArgs, init::InitArgs, render::RenderArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "splice",
    version,
    about = "Resolve template documents: conditional blocks, variables, includes",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter splice.yaml manifest.
    Init(InitArgs),

    /// Build every mapping in the manifest.
    Build(BuildArgs),

    /// Resolve a single document and print it to stdout.
    Render(RenderArgs),

    /// Show unified diffs of what build would write.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Build(args) => args.run(),
        Commands::Render(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
