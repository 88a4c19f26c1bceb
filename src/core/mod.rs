//! Core data types for AMR call resolution.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Hit`]: One local-alignment hit between a reference sequence and a contig
//! - [`ResistanceCall`]: A surviving, deduplicated, thresholded match
//! - [`PhenotypePrediction`]: An inferred drug-class resistance
//! - [`GenomeResult`]: Everything called for one input genome
//! - [`GenomeId`], [`DatabaseKind`], [`CallType`], [`Strand`]: identifier and
//!   classification types
//!
//! ## Genome identifiers
//!
//! Genome ids are opaque strings. An id like `12345` stays the string
//! `"12345"` through the whole pipeline and into the output; nothing ever
//! parses it as a number.
//!
//! ## Gene families
//!
//! Overlap resolution groups hits by gene family, the base name with
//! ResFinder-style allele suffixes removed:
//!
//! | Reference name | Family |
//! |----------------|--------|
//! | blaTEM-1B      | blaTEM |
//! | blaCTX-M-15    | blaCTX-M |
//! | aac(6')-Iaa    | aac(6')-Iaa |
//! | gyrA           | gyrA |

pub mod call;
pub mod genome;
pub mod hit;
pub mod types;

pub use call::{PhenotypePrediction, ResistanceCall};
pub use genome::GenomeResult;
pub use hit::Hit;
pub use types::{CallType, DatabaseKind, GenomeId, Strand};
