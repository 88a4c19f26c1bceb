//! Result aggregation: assemble the final per-genome report.

use crate::core::call::{PhenotypePrediction, ResistanceCall};
use crate::core::genome::GenomeResult;
use crate::core::types::GenomeId;

/// Build the final result for one genome.
///
/// Calls are ordered by name, then contig, then start position, so repeated
/// runs over the same input produce identical output. Predictions arrive
/// already ordered by drug class.
pub fn build_result(
    genome_id: GenomeId,
    mut calls: Vec<ResistanceCall>,
    predictions: Vec<PhenotypePrediction>,
) -> GenomeResult {
    calls.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.contig_id.cmp(&b.contig_id))
            .then_with(|| a.contig_start.cmp(&b.contig_start))
    });

    GenomeResult {
        genome_id,
        resistance_calls: calls,
        phenotype_predictions: predictions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CallType, Strand};

    fn call(name: &str, contig: &str, start: u64) -> ResistanceCall {
        ResistanceCall {
            genome_id: GenomeId::new("sample1"),
            name: name.to_string(),
            accession: "X00000".to_string(),
            call_type: CallType::Gene,
            percent_identity: 100.0,
            percent_coverage: 100.0,
            contig_id: contig.to_string(),
            contig_start: start,
            contig_end: start + 999,
            strand: Strand::Plus,
        }
    }

    #[test]
    fn test_calls_ordered_by_name_contig_start() {
        let calls = vec![
            call("tet(A)", "contig2", 500),
            call("blaTEM-1B", "contig1", 9000),
            call("blaTEM-1B", "contig1", 100),
            call("blaTEM-1B", "contig2", 100),
        ];

        let result = build_result(GenomeId::new("sample1"), calls, Vec::new());
        let order: Vec<(&str, &str, u64)> = result
            .resistance_calls
            .iter()
            .map(|c| (c.name.as_str(), c.contig_id.as_str(), c.contig_start))
            .collect();
        assert_eq!(
            order,
            vec![
                ("blaTEM-1B", "contig1", 100),
                ("blaTEM-1B", "contig1", 9000),
                ("blaTEM-1B", "contig2", 100),
                ("tet(A)", "contig2", 500),
            ]
        );
    }

    #[test]
    fn test_empty_inputs_build_negative() {
        let result = build_result(GenomeId::new("12345"), Vec::new(), Vec::new());
        assert!(result.is_negative());
        assert_eq!(result.genome_id.to_string(), "12345");
    }
}
