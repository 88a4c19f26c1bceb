//! Phenotype mapping: from surviving calls to predicted drug classes.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

use crate::catalog::DrugTable;
use crate::core::call::{PhenotypePrediction, ResistanceCall};
use crate::core::types::GenomeId;

/// Map one genome's calls to drug-class predictions.
///
/// One prediction per (genome, drug class), accumulating every supporting
/// call name. Gene and known-mutation calls participate; novel mutations are
/// reported upstream but never mapped. Calls whose name has no drug-key
/// entry are logged once each and left visible without a prediction.
///
/// Returns the predictions (ordered by class name) and the number of
/// distinct call names missing from the drug key.
pub fn map_calls(
    genome_id: &GenomeId,
    calls: &[ResistanceCall],
    drugs: &DrugTable,
) -> (Vec<PhenotypePrediction>, usize) {
    // Names present in this genome, for combinatorial requirements
    let present: HashSet<&str> = calls.iter().map(|c| c.name.as_str()).collect();

    let mut classes: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut missing: HashSet<&str> = HashSet::new();

    for call in calls {
        if !call.call_type.predicts_phenotype() {
            debug!("{}: {} is novel, not mapped", genome_id, call.name);
            continue;
        }

        let entries = drugs.entries_for(&call.name);
        if entries.is_empty() {
            if missing.insert(call.name.as_str()) {
                warn!(
                    "{}: no drug-key entry for {}, call reported without a phenotype",
                    genome_id, call.name
                );
            }
            continue;
        }

        for entry in entries {
            let met = entry
                .requires
                .iter()
                .all(|required| present.contains(required.as_str()));
            if !met {
                debug!(
                    "{}: {} needs {:?} for {}, requirement not met",
                    genome_id, call.name, entry.requires, entry.drug_class
                );
                continue;
            }

            let supporting = classes.entry(entry.drug_class.as_str()).or_default();
            supporting.insert(call.name.as_str());
            for required in &entry.requires {
                supporting.insert(required.as_str());
            }
        }
    }

    let predictions = classes
        .into_iter()
        .map(|(drug_class, supporting)| PhenotypePrediction {
            genome_id: genome_id.clone(),
            drug_class: drug_class.to_string(),
            supporting_calls: supporting.into_iter().map(String::from).collect(),
        })
        .collect();

    (predictions, missing.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CallType, Strand};

    fn call(name: &str, call_type: CallType) -> ResistanceCall {
        ResistanceCall {
            genome_id: GenomeId::new("g1"),
            name: name.to_string(),
            accession: name.to_string(),
            call_type,
            percent_identity: 100.0,
            percent_coverage: 100.0,
            contig_id: "contig1".to_string(),
            contig_start: 1,
            contig_end: 1000,
            strand: Strand::Plus,
        }
    }

    fn classes(predictions: &[PhenotypePrediction]) -> Vec<&str> {
        predictions.iter().map(|p| p.drug_class.as_str()).collect()
    }

    #[test]
    fn test_gene_maps_to_class() {
        let drugs = DrugTable::load_embedded().unwrap();
        let calls = vec![call("tet(A)", CallType::Gene)];

        let (predictions, missing) = map_calls(&GenomeId::new("g1"), &calls, &drugs);
        assert_eq!(classes(&predictions), vec!["tetracycline"]);
        assert_eq!(predictions[0].supporting_calls, vec!["tet(A)"]);
        assert_eq!(missing, 0);
    }

    #[test]
    fn test_multi_class_gene_maps_to_each() {
        let drugs = DrugTable::load_embedded().unwrap();
        let calls = vec![call("aac(6')-Ib-cr", CallType::Gene)];

        let (predictions, _) = map_calls(&GenomeId::new("g1"), &calls, &drugs);
        assert_eq!(
            classes(&predictions),
            vec!["aminoglycoside", "fluoroquinolone"]
        );
    }

    #[test]
    fn test_known_mutation_maps() {
        let drugs = DrugTable::load_embedded().unwrap();
        let calls = vec![call("gyrA (S83L)", CallType::KnownMutation)];

        let (predictions, missing) = map_calls(&GenomeId::new("g1"), &calls, &drugs);
        assert_eq!(classes(&predictions), vec!["quinolone"]);
        assert_eq!(missing, 0);
    }

    #[test]
    fn test_novel_mutation_never_maps() {
        let drugs = DrugTable::load_embedded().unwrap();
        // gyrA (S83L) is in the drug key, but a novel call must not map
        let calls = vec![call("gyrA (S83L)", CallType::NovelMutation)];

        let (predictions, missing) = map_calls(&GenomeId::new("g1"), &calls, &drugs);
        assert!(predictions.is_empty());
        assert_eq!(missing, 0);
    }

    #[test]
    fn test_unknown_name_counts_once() {
        let drugs = DrugTable::load_embedded().unwrap();
        let calls = vec![
            call("mysteryGene", CallType::Gene),
            call("mysteryGene", CallType::Gene),
        ];

        let (predictions, missing) = map_calls(&GenomeId::new("g1"), &calls, &drugs);
        assert!(predictions.is_empty());
        assert_eq!(missing, 1);
    }

    #[test]
    fn test_supporting_calls_accumulate() {
        let drugs = DrugTable::load_embedded().unwrap();
        let calls = vec![
            call("blaTEM-1B", CallType::Gene),
            call("blaCTX-M-15", CallType::Gene),
        ];

        let (predictions, _) = map_calls(&GenomeId::new("g1"), &calls, &drugs);
        assert_eq!(classes(&predictions), vec!["beta-lactam"]);
        assert_eq!(
            predictions[0].supporting_calls,
            vec!["blaCTX-M-15", "blaTEM-1B"]
        );
    }

    #[test]
    fn test_combinatorial_requirement_unmet() {
        let drugs = DrugTable::load_embedded().unwrap();
        let calls = vec![call("sul1", CallType::Gene)];

        let (predictions, _) = map_calls(&GenomeId::new("g1"), &calls, &drugs);
        // sulfonamide alone; the combined class needs dfrA1 too
        assert_eq!(classes(&predictions), vec!["sulfonamide"]);
    }

    #[test]
    fn test_combinatorial_requirement_met() {
        let drugs = DrugTable::load_embedded().unwrap();
        let calls = vec![
            call("sul1", CallType::Gene),
            call("dfrA1", CallType::Gene),
        ];

        let (predictions, _) = map_calls(&GenomeId::new("g1"), &calls, &drugs);
        assert_eq!(
            classes(&predictions),
            vec!["sulfonamide", "trimethoprim", "trimethoprim-sulfamethoxazole"]
        );

        let combined = predictions
            .iter()
            .find(|p| p.drug_class == "trimethoprim-sulfamethoxazole")
            .unwrap();
        assert_eq!(combined.supporting_calls, vec!["dfrA1", "sul1"]);
    }

    #[test]
    fn test_no_calls_no_predictions() {
        let drugs = DrugTable::load_embedded().unwrap();
        let (predictions, missing) = map_calls(&GenomeId::new("g1"), &[], &drugs);
        assert!(predictions.is_empty());
        assert_eq!(missing, 0);
    }
}
