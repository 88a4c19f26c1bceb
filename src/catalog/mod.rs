//! Static reference tables: the drug key and the point-mutation catalog.
//!
//! Both tables are TSVs embedded into the binary at compile time, with
//! file-based overrides for custom content:
//!
//! - [`DrugTable`]: gene/mutation name → drug class, many-to-many, with an
//!   optional `requires` column for combinatorial classes
//! - [`MutationCatalog`]: per-locus wild-type residues and the cataloged
//!   resistance-conferring substitutions
//!
//! Tables are loaded once at startup into immutable values and passed into
//! the engine explicitly; there is no global lookup state.
//!
//! ## Example
//!
//! ```rust,no_run
//! use amr_caller::catalog::{DrugTable, MutationCatalog};
//!
//! let drugs = DrugTable::load_embedded().unwrap();
//! let mutations = MutationCatalog::load_embedded().unwrap();
//!
//! for entry in drugs.entries_for("blaTEM-1B") {
//!     println!("{} -> {}", entry.name, entry.drug_class);
//! }
//! assert!(mutations.lookup("gyrA", 83).is_some());
//! ```

use thiserror::Error;

pub mod drugs;
pub mod mutations;

pub use drugs::{DrugEntry, DrugTable};
pub use mutations::{LocusKind, MutationCatalog, MutationEntry};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read table: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Invalid table row at line {line}: {message}")]
    InvalidRow { line: usize, message: String },

    #[error("Table has no data rows")]
    Empty,
}
