use serde::{Deserialize, Serialize};

use crate::core::call::{PhenotypePrediction, ResistanceCall};
use crate::core::types::GenomeId;

/// The complete result for one input genome.
///
/// One of these exists for every genome submitted to a run, including
/// genomes with no surviving calls (explicit negative results), unless the
/// caller opted into negative-result exclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeResult {
    pub genome_id: GenomeId,

    /// Surviving calls, ordered by (name, contig, start)
    pub resistance_calls: Vec<ResistanceCall>,

    /// Predicted drug-class resistances, ordered by class name
    pub phenotype_predictions: Vec<PhenotypePrediction>,
}

impl GenomeResult {
    /// An explicit negative result: the genome was scanned and nothing
    /// survived.
    #[must_use]
    pub fn negative(genome_id: GenomeId) -> Self {
        Self {
            genome_id,
            resistance_calls: Vec::new(),
            phenotype_predictions: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.resistance_calls.is_empty()
    }

    /// Distinct predicted drug classes, in prediction order.
    #[must_use]
    pub fn drug_classes(&self) -> Vec<&str> {
        self.phenotype_predictions
            .iter()
            .map(|p| p.drug_class.as_str())
            .collect()
    }
}
