use serde::{Deserialize, Serialize};

use crate::core::types::{DatabaseKind, GenomeId, Strand};

/// A single local-alignment hit between a reference sequence and a contig.
///
/// Produced by the hit-table parser (one BLAST outfmt-6 row), immutable from
/// then on. Query-side fields describe the AMR reference sequence, subject
/// fields the genome contig it landed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Genome the hit belongs to
    pub genome_id: GenomeId,

    /// Database the reference sequence came from
    pub database: DatabaseKind,

    /// Gene or mutation-locus name (e.g. `blaTEM-1B`, `gyrA`)
    pub reference_name: String,

    /// Reference accession (e.g. `JF910132`); for single-token ids this
    /// repeats the name
    pub accession: String,

    /// Contig the reference aligned to
    pub contig_id: String,

    /// 1-based inclusive contig coordinates, normalized so start <= end
    pub contig_start: u64,
    pub contig_end: u64,

    /// Percent identity of the alignment (0-100)
    pub percent_identity: f64,

    /// Percent of the reference covered by the alignment (0-100)
    pub percent_coverage: f64,

    /// Strand of the contig region relative to the reference
    pub strand: Strand,

    /// 1-based inclusive coordinates of the alignment on the reference
    pub ref_start: u64,
    pub ref_end: u64,

    /// Full length of the reference sequence
    pub ref_length: u64,

    /// Aligned reference sequence (with gap characters), when the hit table
    /// carried it. Required for point-mutation resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aligned_ref: Option<String>,

    /// Aligned contig sequence (with gap characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aligned_contig: Option<String>,
}

impl Hit {
    /// Grouping key for overlap resolution: the base gene name with allele
    /// suffixes removed.
    #[must_use]
    pub fn gene_family(&self) -> &str {
        gene_family(&self.reference_name)
    }

    /// Whether two hits share any base on the same contig.
    ///
    /// Coordinates are inclusive, so ranges touching at a single base count
    /// as overlapping.
    #[must_use]
    pub fn overlaps(&self, other: &Hit) -> bool {
        self.contig_id == other.contig_id
            && self.contig_start <= other.contig_end
            && other.contig_start <= self.contig_end
    }
}

/// Derive the gene family from a reference name.
///
/// ResFinder allele names append `-`-separated variant segments that start
/// with a digit (`blaTEM-1B`, `blaCTX-M-15`). Those are stripped from the
/// right; anything else is already the family name (`aac(6')-Iaa`, `tet(A)`,
/// `gyrA`).
#[must_use]
pub fn gene_family(name: &str) -> &str {
    let mut family = name;
    while let Some(idx) = family.rfind('-') {
        let suffix = &family[idx + 1..];
        if suffix.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            family = &family[..idx];
        } else {
            break;
        }
    }
    family
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(contig: &str, start: u64, end: u64) -> Hit {
        Hit {
            genome_id: GenomeId::new("g1"),
            database: DatabaseKind::Resfinder,
            reference_name: "blaTEM-1B".to_string(),
            accession: "JF910132".to_string(),
            contig_id: contig.to_string(),
            contig_start: start,
            contig_end: end,
            percent_identity: 100.0,
            percent_coverage: 100.0,
            strand: Strand::Plus,
            ref_start: 1,
            ref_end: end - start + 1,
            ref_length: end - start + 1,
            aligned_ref: None,
            aligned_contig: None,
        }
    }

    #[test]
    fn test_gene_family_strips_allele_suffixes() {
        assert_eq!(gene_family("blaTEM-1B"), "blaTEM");
        assert_eq!(gene_family("blaCTX-M-15"), "blaCTX-M");
        assert_eq!(gene_family("blaCTX-M-14"), "blaCTX-M");
        assert_eq!(gene_family("mcr-1"), "mcr");
        assert_eq!(gene_family("aadA1"), "aadA1");
    }

    #[test]
    fn test_gene_family_keeps_non_allele_names() {
        assert_eq!(gene_family("aac(6')-Iaa"), "aac(6')-Iaa");
        assert_eq!(gene_family("aac(6')-Ib-cr"), "aac(6')-Ib-cr");
        assert_eq!(gene_family("tet(A)"), "tet(A)");
        assert_eq!(gene_family("gyrA"), "gyrA");
        // Trailing dash has no suffix to inspect
        assert_eq!(gene_family("odd-"), "odd-");
    }

    #[test]
    fn test_overlaps_inclusive_coordinates() {
        let a = hit("contig1", 1, 100);
        assert!(a.overlaps(&hit("contig1", 50, 150)));
        assert!(a.overlaps(&hit("contig1", 100, 200)));
        assert!(!a.overlaps(&hit("contig1", 101, 200)));
    }

    #[test]
    fn test_overlaps_requires_same_contig() {
        let a = hit("contig1", 1, 100);
        assert!(!a.overlaps(&hit("contig2", 1, 100)));
    }
}
