use serde::{Deserialize, Serialize};

use crate::core::hit::Hit;
use crate::core::types::{CallType, GenomeId, Strand};

/// A surviving, deduplicated, thresholded match asserting the presence of a
/// resistance gene or point mutation in a genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceCall {
    pub genome_id: GenomeId,

    /// Gene name (`blaTEM-1B`) or canonical mutation name (`gyrA (S83L)`)
    pub name: String,

    pub accession: String,

    #[serde(rename = "type")]
    pub call_type: CallType,

    pub percent_identity: f64,
    pub percent_coverage: f64,

    /// Location of the supporting alignment on the assembly
    pub contig_id: String,
    pub contig_start: u64,
    pub contig_end: u64,
    pub strand: Strand,
}

impl ResistanceCall {
    /// Build a gene-presence call from a surviving resistance-gene hit.
    #[must_use]
    pub fn from_gene_hit(hit: &Hit) -> Self {
        Self {
            genome_id: hit.genome_id.clone(),
            name: hit.reference_name.clone(),
            accession: hit.accession.clone(),
            call_type: CallType::Gene,
            percent_identity: hit.percent_identity,
            percent_coverage: hit.percent_coverage,
            contig_id: hit.contig_id.clone(),
            contig_start: hit.contig_start,
            contig_end: hit.contig_end,
            strand: hit.strand,
        }
    }

    /// Build a mutation call from a surviving point-mutation hit.
    ///
    /// The mutation resolver supplies the canonical name and whether the
    /// substitution is cataloged.
    #[must_use]
    pub fn from_mutation_hit(hit: &Hit, name: String, call_type: CallType) -> Self {
        Self {
            genome_id: hit.genome_id.clone(),
            name,
            accession: hit.accession.clone(),
            call_type,
            percent_identity: hit.percent_identity,
            percent_coverage: hit.percent_coverage,
            contig_id: hit.contig_id.clone(),
            contig_start: hit.contig_start,
            contig_end: hit.contig_end,
            strand: hit.strand,
        }
    }

    /// Compact location string for human-readable output.
    #[must_use]
    pub fn location(&self) -> String {
        format!(
            "{}:{}-{} ({})",
            self.contig_id, self.contig_start, self.contig_end, self.strand
        )
    }
}

/// An inferred resistance to one drug class in one genome.
///
/// Many-to-many with calls: one call may support several classes, one class
/// may accumulate several supporting calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypePrediction {
    pub genome_id: GenomeId,

    pub drug_class: String,

    /// Names of the calls supporting the prediction, sorted and deduplicated
    pub supporting_calls: Vec<String>,
}
