//! The known-mutation catalog for point-mutation loci.
//!
//! Mirrors the PointFinder resistens-overview layout: each row names a
//! locus, a position, the wild-type residue there, and the set of residues
//! known to confer resistance.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::catalog::TableError;

/// How positions and residues of a locus are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocusKind {
    /// Coding locus: positions are 1-based codon numbers, residues are
    /// one-letter amino acids.
    Codon,
    /// Non-coding locus (promoters): positions are promoter-style base
    /// offsets (negative = upstream, -1 immediately before the coding
    /// start), residues are nucleotides.
    Nucleotide,
}

impl std::fmt::Display for LocusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Codon => write!(f, "codon"),
            Self::Nucleotide => write!(f, "nucleotide"),
        }
    }
}

/// One cataloged position: wild-type residue plus the known resistant ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationEntry {
    pub locus: String,
    pub kind: LocusKind,
    pub position: i64,
    pub wild_type: String,
    pub resistant: Vec<String>,
}

impl MutationEntry {
    /// Whether an observed residue is a cataloged resistance mutation here
    #[must_use]
    pub fn is_resistant(&self, observed: &str) -> bool {
        self.resistant.iter().any(|r| r == observed)
    }
}

/// All cataloged point-mutation positions, indexed by locus.
#[derive(Debug)]
pub struct MutationCatalog {
    /// All rows, in file order
    pub entries: Vec<MutationEntry>,

    /// Index: locus -> row indices
    locus_to_entries: HashMap<String, Vec<usize>>,
}

impl MutationCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            locus_to_entries: HashMap::new(),
        }
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns `TableError` if the embedded table is malformed (also caught
    /// at compile time by build.rs).
    pub fn load_embedded() -> Result<Self, TableError> {
        // Embedded at compile time, validated by build.rs
        const EMBEDDED_MUTATIONS: &str = include_str!("../../tables/point_mutations.tsv");
        Self::from_tsv(EMBEDDED_MUTATIONS)
    }

    /// Load a catalog from a TSV file
    ///
    /// # Errors
    ///
    /// Returns `TableError::ReadError` if the file cannot be read, or a parse
    /// error for malformed rows.
    pub fn load_from_file(path: &Path) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_tsv(&content)
    }

    /// Parse a catalog from TSV text.
    ///
    /// Columns: `locus`, `kind` (codon|nucleotide), `position`, `wild_type`,
    /// `resistant` (comma-separated residues). Blank lines and `#` comments
    /// are skipped; a plain header row starting with `locus` is tolerated.
    ///
    /// # Errors
    ///
    /// Returns `TableError::InvalidRow` with a 1-based line number on
    /// malformed rows, or `TableError::Empty` if no data rows remain.
    pub fn from_tsv(text: &str) -> Result<Self, TableError> {
        let mut catalog = Self::new();

        for (number, line) in text.lines().enumerate() {
            let line_number = number + 1;
            let line = line.trim_end();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields[0].eq_ignore_ascii_case("locus") {
                continue;
            }
            if fields.len() < 5 {
                return Err(TableError::InvalidRow {
                    line: line_number,
                    message: format!("expected 5 columns, found {}", fields.len()),
                });
            }

            let kind = match fields[1].trim() {
                "codon" => LocusKind::Codon,
                "nucleotide" => LocusKind::Nucleotide,
                other => {
                    return Err(TableError::InvalidRow {
                        line: line_number,
                        message: format!("unknown locus kind '{other}'"),
                    })
                }
            };

            let position: i64 = fields[2].trim().parse().map_err(|_| TableError::InvalidRow {
                line: line_number,
                message: format!("position '{}' is not an integer", fields[2]),
            })?;
            if (kind == LocusKind::Codon && position < 1) || position == 0 {
                return Err(TableError::InvalidRow {
                    line: line_number,
                    message: format!("position {position} is not valid for a {kind} locus"),
                });
            }

            let wild_type = fields[3].trim();
            if wild_type.chars().count() != 1 {
                return Err(TableError::InvalidRow {
                    line: line_number,
                    message: format!("wild_type '{wild_type}' must be a single residue"),
                });
            }

            let resistant: Vec<String> = fields[4]
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if resistant.is_empty() {
                return Err(TableError::InvalidRow {
                    line: line_number,
                    message: "resistant residue list is empty".to_string(),
                });
            }

            catalog.add_entry(MutationEntry {
                locus: fields[0].trim().to_string(),
                kind,
                position,
                wild_type: wild_type.to_string(),
                resistant,
            });
        }

        if catalog.is_empty() {
            return Err(TableError::Empty);
        }

        Ok(catalog)
    }

    /// Add a row to the catalog
    pub fn add_entry(&mut self, entry: MutationEntry) {
        let index = self.entries.len();
        self.locus_to_entries
            .entry(entry.locus.clone())
            .or_default()
            .push(index);
        self.entries.push(entry);
    }

    /// The cataloged entry at a locus position, if any
    pub fn lookup(&self, locus: &str, position: i64) -> Option<&MutationEntry> {
        self.locus_to_entries.get(locus).and_then(|indices| {
            indices
                .iter()
                .map(|&idx| &self.entries[idx])
                .find(|e| e.position == position)
        })
    }

    /// All cataloged rows for a locus, in file order
    pub fn entries_for(&self, locus: &str) -> Vec<&MutationEntry> {
        self.locus_to_entries
            .get(locus)
            .map(|indices| indices.iter().map(|&idx| &self.entries[idx]).collect())
            .unwrap_or_default()
    }

    /// Whether the catalog knows this locus at all
    pub fn is_known_locus(&self, locus: &str) -> bool {
        self.locus_to_entries.contains_key(locus)
    }

    /// The residue kind a locus is cataloged with, if cataloged
    pub fn kind_of(&self, locus: &str) -> Option<LocusKind> {
        self.locus_to_entries
            .get(locus)
            .and_then(|indices| indices.first())
            .map(|&idx| self.entries[idx].kind)
    }

    /// Whether a locus uses promoter-style coordinates (every cataloged
    /// position upstream of the coding start). Novel changes in such loci
    /// are published in the same negative convention.
    pub fn is_promoter_locus(&self, locus: &str) -> bool {
        self.locus_to_entries
            .get(locus)
            .is_some_and(|indices| indices.iter().all(|&idx| self.entries[idx].position < 0))
    }

    /// Render the catalog back to TSV (used by `tables export`)
    pub fn to_tsv(&self) -> String {
        let mut out = String::from("#locus\tkind\tposition\twild_type\tresistant\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                entry.locus,
                entry.kind,
                entry.position,
                entry.wild_type,
                entry.resistant.join(",")
            ));
        }
        out
    }

    /// Number of rows in the catalog
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MutationCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = MutationCatalog::load_embedded().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.is_known_locus("gyrA"));
        assert!(catalog.is_known_locus("ampC-promoter"));
        assert!(!catalog.is_known_locus("blaTEM"));
    }

    #[test]
    fn test_lookup_cataloged_position() {
        let catalog = MutationCatalog::load_embedded().unwrap();

        let entry = catalog.lookup("gyrA", 83).unwrap();
        assert_eq!(entry.wild_type, "S");
        assert!(entry.is_resistant("L"));
        assert!(!entry.is_resistant("T"));
    }

    #[test]
    fn test_lookup_uncataloged_position() {
        let catalog = MutationCatalog::load_embedded().unwrap();
        assert!(catalog.lookup("gyrA", 85).is_none());
        assert!(catalog.lookup("rpoZ", 83).is_none());
    }

    #[test]
    fn test_promoter_locus_detection() {
        let catalog = MutationCatalog::load_embedded().unwrap();
        assert!(catalog.is_promoter_locus("ampC-promoter"));
        assert!(!catalog.is_promoter_locus("gyrA"));
        assert!(!catalog.is_promoter_locus("unknown"));
    }

    #[test]
    fn test_from_tsv_rejects_bad_kind() {
        let result = MutationCatalog::from_tsv("gyrA\tprotein\t83\tS\tL\n");
        assert!(matches!(
            result,
            Err(TableError::InvalidRow { line: 1, .. })
        ));
    }

    #[test]
    fn test_from_tsv_rejects_zero_position() {
        let result = MutationCatalog::from_tsv("ampC-promoter\tnucleotide\t0\tC\tT\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_tsv_rejects_multichar_wild_type() {
        let result = MutationCatalog::from_tsv("gyrA\tcodon\t83\tSer\tL\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_tsv_round_trip() {
        let catalog = MutationCatalog::load_embedded().unwrap();
        let reparsed = MutationCatalog::from_tsv(&catalog.to_tsv()).unwrap();
        assert_eq!(reparsed.len(), catalog.len());
    }
}
