//! Parsers for hit tables and auxiliary input files.
//!
//! This module provides parsers for:
//!
//! - **BLAST tabular hit files**: 13-column outfmt-6 rows, plain or gzipped
//! - **Gene lists**: one name per line, for custom exclusion lists
//!
//! ## Example
//!
//! ```rust,no_run
//! use amr_caller::core::DatabaseKind;
//! use amr_caller::parsing::hits::parse_hits_file;
//! use std::path::Path;
//!
//! let (genome_id, hits) = parse_hits_file(
//!     Path::new("SRR1952908.resfinder.tsv"),
//!     DatabaseKind::Resfinder,
//!     None,
//! )
//! .unwrap();
//! println!("{}: {} hits", genome_id, hits.len());
//! ```
//!
//! ## Hit Columns
//!
//! Hit rows carry these tab-separated columns, in order:
//!
//! | Column | Description |
//! |--------|-------------|
//! | qseqid | Reference sequence id, `<gene>_<variant>_<accession>` |
//! | sseqid | Contig id |
//! | pident | Percent identity |
//! | length | Alignment length in columns |
//! | qstart, qend | Alignment span on the reference |
//! | sstart, send | Alignment span on the contig |
//! | slen | Contig length |
//! | qlen | Reference length |
//! | sstrand | `plus` or `minus` |
//! | sseq | Aligned contig sequence, with gaps |
//! | qseq | Aligned reference sequence, with gaps |

pub mod genes;
pub mod hits;

pub use hits::ParseError;
