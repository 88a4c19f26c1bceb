//! # amr-caller
//!
//! A library for calling antimicrobial resistance (AMR) genes, point
//! mutations, and predicted phenotypes from genome-assembly alignment hits.
//!
//! Aligning an assembly against AMR reference databases produces raw hits
//! that are noisy in predictable ways: marginal alignments, conserved
//! chromosomal genes that say nothing about acquired resistance, stacks of
//! overlapping allele variants on the same contig region, and point-mutation
//! loci where only specific substitutions matter.
//!
//! `amr-caller` resolves those hits into one defensible answer per genome.
//!
//! ## Features
//!
//! - **Threshold filtering**: Identity and coverage cutoffs per database
//! - **Gene exclusion**: Drops trusted chromosomal genes, built-in or custom list
//! - **Overlap resolution**: One call per gene family per contig region,
//!   with a published tie-break order
//! - **Mutation classification**: Known and novel substitutions at codon and
//!   promoter loci
//! - **Phenotype prediction**: Many-to-many drug-class mapping, including
//!   combinatorial requirements
//! - **Explicit negatives**: Genomes with no findings stay in the output
//!
//! ## Example
//!
//! ```rust,no_run
//! use amr_caller::catalog::{DrugTable, MutationCatalog};
//! use amr_caller::engine::{CallEngine, GenomeHits};
//! use amr_caller::parsing::hits::parse_hits_file;
//! use amr_caller::DatabaseKind;
//! use std::path::Path;
//!
//! // Load the embedded reference tables
//! let drugs = DrugTable::load_embedded().unwrap();
//! let mutations = MutationCatalog::load_embedded().unwrap();
//!
//! // Parse one genome's hit table
//! let (genome_id, hits) = parse_hits_file(
//!     Path::new("SRR1952908.resfinder.tsv"),
//!     DatabaseKind::Resfinder,
//!     None,
//! )
//! .unwrap();
//!
//! // Resolve hits into calls and predictions
//! let engine = CallEngine::new(&drugs, &mutations).unwrap();
//! let output = engine.run(&[GenomeHits::with_hits(genome_id, hits)]);
//!
//! for result in &output.results {
//!     println!("{}: {} calls", result.genome_id, result.resistance_calls.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Embedded drug key and point-mutation catalog
//! - [`core`]: Core data types for hits, calls, and genome results
//! - [`engine`]: The match-resolution and phenotype-inference pipeline
//! - [`parsing`]: Parsers for hit tables and gene lists
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod engine;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::drugs::DrugTable;
pub use catalog::mutations::MutationCatalog;
pub use core::call::{PhenotypePrediction, ResistanceCall};
pub use core::genome::GenomeResult;
pub use core::hit::Hit;
pub use core::types::*;
pub use engine::{CallEngine, EngineConfig, GenomeHits, RunOutput};
