//! Command-line interface for amr-caller.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **call**: Resolve hit tables into resistance calls and predicted phenotypes
//! - **tables**: List or export the embedded drug key and mutation catalog
//!
//! ## Usage
//!
//! ```text
//! # Call one genome from its hit tables
//! amr-caller call --resfinder SRR1952908.resfinder.tsv --pointfinder SRR1952908.pointfinder.tsv
//!
//! # Batch of genomes, JSON output for scripting
//! amr-caller call --resfinder genomes/*.resfinder.tsv --format json
//!
//! # Keep hits the default list would drop
//! amr-caller call --resfinder sample.tsv --no-exclude-genes
//!
//! # Inspect the embedded tables
//! amr-caller tables drugs --class quinolone
//! amr-caller tables export mutations --output my_mutations.tsv
//! ```

use clap::{Parser, Subcommand};

pub mod call;
pub mod tables;

#[derive(Parser)]
#[command(name = "amr-caller")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Call antimicrobial resistance genes, mutations, and phenotypes from assembly hits")]
#[command(
    long_about = "amr-caller resolves raw alignment hits against AMR reference databases into per-genome results.\n\nHits are filtered by identity and coverage thresholds, trusted chromosomal genes are excluded, overlapping hits from the same gene family are deduplicated, point-mutation hits are classified as known or novel substitutions, and surviving calls are mapped to predicted drug classes.\n\nGenomes with no surviving calls are reported as explicit negatives."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Call resistance genes, mutations, and phenotypes from hit tables
    Call(call::CallArgs),

    /// Inspect or export the reference tables
    Tables(tables::TablesArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
