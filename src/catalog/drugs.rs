//! The drug key: gene/mutation names mapped to drug classes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::catalog::TableError;

/// One (name, drug class) association from the drug key.
///
/// Names are allele-level gene names (`blaTEM-1B`) or canonical mutation
/// names (`gyrA (S83L)`), matched exactly and case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugEntry {
    pub name: String,

    pub drug_class: String,

    /// Other call names that must all be present in the same genome before
    /// this class is predicted. Empty for ordinary single-call classes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
}

/// The gene/mutation → drug-class table.
///
/// Many-to-many: a name may appear in several rows (several classes), a
/// class in several rows (several supporting names).
#[derive(Debug)]
pub struct DrugTable {
    /// All rows, in file order
    pub entries: Vec<DrugEntry>,

    /// Index: name -> row indices
    name_to_entries: HashMap<String, Vec<usize>>,
}

impl DrugTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            name_to_entries: HashMap::new(),
        }
    }

    /// Load the embedded default drug key
    ///
    /// # Errors
    ///
    /// Returns `TableError` if the embedded table is malformed (also caught
    /// at compile time by build.rs).
    pub fn load_embedded() -> Result<Self, TableError> {
        // Embedded at compile time, validated by build.rs
        const EMBEDDED_DRUG_KEY: &str = include_str!("../../tables/drug_key.tsv");
        Self::from_tsv(EMBEDDED_DRUG_KEY)
    }

    /// Load a drug key from a TSV file
    ///
    /// # Errors
    ///
    /// Returns `TableError::ReadError` if the file cannot be read, or a parse
    /// error for malformed rows.
    pub fn load_from_file(path: &Path) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_tsv(&content)
    }

    /// Parse a drug key from TSV text.
    ///
    /// Columns: `name`, `class`, optional `requires` (comma-separated names).
    /// Blank lines and `#` comments are skipped; a plain header row starting
    /// with `name` is tolerated.
    ///
    /// # Errors
    ///
    /// Returns `TableError::InvalidRow` with a 1-based line number for rows
    /// missing a name or class, or `TableError::Empty` if no data rows remain.
    pub fn from_tsv(text: &str) -> Result<Self, TableError> {
        let mut table = Self::new();

        for (number, line) in text.lines().enumerate() {
            let line_number = number + 1;
            let line = line.trim_end();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields[0].eq_ignore_ascii_case("name") {
                continue;
            }
            if fields.len() < 2 {
                return Err(TableError::InvalidRow {
                    line: line_number,
                    message: format!("expected at least 2 columns, found {}", fields.len()),
                });
            }

            let name = fields[0].trim();
            let drug_class = fields[1].trim();
            if name.is_empty() || drug_class.is_empty() {
                return Err(TableError::InvalidRow {
                    line: line_number,
                    message: "name and class must be non-empty".to_string(),
                });
            }

            let requires = fields
                .get(2)
                .map(|f| {
                    f.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();

            table.add_entry(DrugEntry {
                name: name.to_string(),
                drug_class: drug_class.to_string(),
                requires,
            });
        }

        if table.is_empty() {
            return Err(TableError::Empty);
        }

        Ok(table)
    }

    /// Add a row to the table
    pub fn add_entry(&mut self, entry: DrugEntry) {
        let index = self.entries.len();
        self.name_to_entries
            .entry(entry.name.clone())
            .or_default()
            .push(index);
        self.entries.push(entry);
    }

    /// All rows for a name, in file order. Empty when the name is unknown.
    pub fn entries_for(&self, name: &str) -> Vec<&DrugEntry> {
        self.name_to_entries
            .get(name)
            .map(|indices| indices.iter().map(|&idx| &self.entries[idx]).collect())
            .unwrap_or_default()
    }

    /// Whether the table has any row for a name
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_entries.contains_key(name)
    }

    /// Render the table back to TSV (used by `tables export`)
    pub fn to_tsv(&self) -> String {
        let mut out = String::from("#name\tclass\trequires\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "{}\t{}\t{}\n",
                entry.name,
                entry.drug_class,
                entry.requires.join(",")
            ));
        }
        out
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DrugTable {
    fn default() -> Self {
        Self::new()
    }
}
