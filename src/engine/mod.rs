//! The match-resolution and phenotype-inference pipeline.
//!
//! This module turns raw alignment hits into per-genome resistance calls:
//!
//! - [`thresholds`]: drop hits below the identity/coverage cutoffs
//! - [`exclusion`]: drop hits on the gene exclusion list
//! - [`overlap`]: keep one hit per gene family per overlapping contig region
//! - [`mutation`]: classify point-mutation hits as known or novel substitutions
//! - [`phenotype`]: map surviving calls to drug classes via the drug key
//! - [`aggregate`]: one ordered [`GenomeResult`] per input genome
//!
//! Stages run as a strict chain per genome; genomes are independent of each
//! other. All reference tables are borrowed immutably for the lifetime of the
//! engine.
//!
//! ## Example
//!
//! ```rust,no_run
//! use amr_caller::catalog::{DrugTable, MutationCatalog};
//! use amr_caller::core::GenomeId;
//! use amr_caller::engine::{CallEngine, GenomeHits};
//!
//! let drugs = DrugTable::load_embedded().unwrap();
//! let mutations = MutationCatalog::load_embedded().unwrap();
//! let engine = CallEngine::new(&drugs, &mutations).unwrap();
//!
//! let genomes = vec![GenomeHits::new(GenomeId::new("sampleA"))];
//! let output = engine.run(&genomes);
//!
//! for result in &output.results {
//!     println!(
//!         "{}: {} calls, {} predicted classes",
//!         result.genome_id,
//!         result.resistance_calls.len(),
//!         result.phenotype_predictions.len()
//!     );
//! }
//! ```

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{DrugTable, MutationCatalog};
use crate::core::call::ResistanceCall;
use crate::core::genome::GenomeResult;
use crate::core::hit::Hit;
use crate::core::types::{DatabaseKind, GenomeId};
use crate::utils::validation::is_valid_percent;

pub mod aggregate;
pub mod exclusion;
pub mod mutation;
pub mod overlap;
pub mod phenotype;
pub mod thresholds;

pub use exclusion::{ExclusionList, ExclusionPolicy, DEFAULT_EXCLUDED_GENES};

/// Default minimum percent identity, both databases
pub const DEFAULT_MIN_IDENTITY: f64 = 98.0;

/// Default minimum percent coverage for resistance-gene hits
pub const DEFAULT_MIN_COVERAGE_RESFINDER: f64 = 60.0;

/// Default minimum percent coverage for point-mutation hits
pub const DEFAULT_MIN_COVERAGE_POINTFINDER: f64 = 95.0;

/// Identity/coverage cutoffs for one database
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub min_identity: f64,
    pub min_coverage: f64,
}

impl Thresholds {
    #[must_use]
    pub fn new(min_identity: f64, min_coverage: f64) -> Self {
        Self {
            min_identity,
            min_coverage,
        }
    }

    /// Whether a hit meets both cutoffs. Boundary values pass.
    #[must_use]
    pub fn accepts(&self, hit: &Hit) -> bool {
        hit.percent_identity >= self.min_identity && hit.percent_coverage >= self.min_coverage
    }
}

/// Errors that abort a run before any genome is processed
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {name} threshold {value}: must be a percent between 0 and 100")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Failed to read exclusion list {path}: {source}")]
    ExclusionUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid exclusion list {path}: {message}")]
    ExclusionInvalid { path: PathBuf, message: String },
}

/// Configuration for one run of the engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Cutoffs for resistance-gene hits
    pub resfinder: Thresholds,
    /// Cutoffs for point-mutation hits
    pub pointfinder: Thresholds,
    /// Which gene exclusion list applies
    pub exclusion: ExclusionPolicy,
    /// Whether genomes with no surviving calls appear in the results.
    /// Defaults to true; excluding negatives is an explicit opt-out.
    pub include_negatives: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resfinder: Thresholds::new(DEFAULT_MIN_IDENTITY, DEFAULT_MIN_COVERAGE_RESFINDER),
            pointfinder: Thresholds::new(DEFAULT_MIN_IDENTITY, DEFAULT_MIN_COVERAGE_POINTFINDER),
            exclusion: ExclusionPolicy::BuiltIn,
            include_negatives: true,
        }
    }
}

impl EngineConfig {
    /// The cutoffs that apply to a hit from the given database
    #[must_use]
    pub fn thresholds_for(&self, database: DatabaseKind) -> Thresholds {
        match database {
            DatabaseKind::Resfinder => self.resfinder,
            DatabaseKind::Pointfinder => self.pointfinder,
        }
    }

    /// Check all threshold values are valid percents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThreshold` naming the first offending
    /// value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("resfinder identity", self.resfinder.min_identity),
            ("resfinder coverage", self.resfinder.min_coverage),
            ("pointfinder identity", self.pointfinder.min_identity),
            ("pointfinder coverage", self.pointfinder.min_coverage),
        ];
        for (name, value) in checks {
            if !is_valid_percent(value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

/// All hits for one input genome, as handed to the engine.
///
/// An empty hit list is valid and yields an explicit negative result.
#[derive(Debug, Clone)]
pub struct GenomeHits {
    pub genome_id: GenomeId,
    pub hits: Vec<Hit>,
}

impl GenomeHits {
    #[must_use]
    pub fn new(genome_id: GenomeId) -> Self {
        Self {
            genome_id,
            hits: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hits(genome_id: GenomeId, hits: Vec<Hit>) -> Self {
        Self { genome_id, hits }
    }
}

/// Per-run counters for summary reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunDiagnostics {
    pub genomes_processed: usize,
    pub negative_genomes: usize,
    pub hits_seen: usize,
    pub dropped_by_threshold: usize,
    pub dropped_by_exclusion: usize,
    pub merged_by_overlap: usize,
    /// How often overlap resolution fell through to the accession tie-break
    pub overlap_tie_breaks: usize,
    /// Distinct call names with no drug-key entry
    pub names_without_phenotype: usize,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// One result per genome, in submission order (negatives omitted when
    /// configured)
    pub results: Vec<GenomeResult>,
    pub diagnostics: RunDiagnostics,
}

/// The resolution pipeline, borrowing the loaded reference tables.
pub struct CallEngine<'a> {
    drugs: &'a DrugTable,
    mutations: &'a MutationCatalog,
    config: EngineConfig,
    exclusions: ExclusionList,
}

impl<'a> CallEngine<'a> {
    /// Create an engine with default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration validation fails (cannot happen
    /// for the defaults, but the signature matches `with_config`).
    pub fn new(drugs: &'a DrugTable, mutations: &'a MutationCatalog) -> Result<Self, ConfigError> {
        Self::with_config(drugs, mutations, EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    ///
    /// Thresholds are validated and the exclusion list materialized here,
    /// before any genome is processed; a bad custom list aborts the run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for out-of-range thresholds or an
    /// unreadable/empty/malformed custom exclusion list.
    pub fn with_config(
        drugs: &'a DrugTable,
        mutations: &'a MutationCatalog,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let exclusions = ExclusionList::from_policy(&config.exclusion)?;
        Ok(Self {
            drugs,
            mutations,
            config,
            exclusions,
        })
    }

    /// The configuration the engine was built with
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The exclusion list in effect
    #[must_use]
    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    /// Run the pipeline over every submitted genome.
    ///
    /// Results come back in submission order. Re-running with the same hits
    /// and configuration produces identical output.
    #[must_use]
    pub fn run(&self, genomes: &[GenomeHits]) -> RunOutput {
        let mut diagnostics = RunDiagnostics::default();
        let mut results = Vec::with_capacity(genomes.len());

        for genome in genomes {
            let result = self.call_genome(genome, &mut diagnostics);
            diagnostics.genomes_processed += 1;

            if result.is_negative() {
                diagnostics.negative_genomes += 1;
                if !self.config.include_negatives {
                    debug!("omitting negative result for genome {}", genome.genome_id);
                    continue;
                }
            }
            results.push(result);
        }

        RunOutput {
            results,
            diagnostics,
        }
    }

    /// Resolve one genome's hits into a result
    fn call_genome(&self, genome: &GenomeHits, diagnostics: &mut RunDiagnostics) -> GenomeResult {
        diagnostics.hits_seen += genome.hits.len();

        let (kept, dropped) = thresholds::apply(&genome.hits, &self.config);
        diagnostics.dropped_by_threshold += dropped;

        let (kept, excluded) = exclusion::apply(kept, &self.exclusions);
        diagnostics.dropped_by_exclusion += excluded;

        let (kept, stats) = overlap::resolve(kept);
        diagnostics.merged_by_overlap += stats.merged;
        diagnostics.overlap_tie_breaks += stats.tie_breaks;

        let mut calls: Vec<ResistanceCall> = Vec::new();
        for hit in kept {
            if hit.database.is_point_mutation() {
                calls.extend(mutation::resolve(hit, self.mutations));
            } else {
                calls.push(ResistanceCall::from_gene_hit(hit));
            }
        }

        let (predictions, unmapped) = phenotype::map_calls(&genome.genome_id, &calls, self.drugs);
        diagnostics.names_without_phenotype += unmapped;

        debug!(
            "genome {}: {} hits in, {} calls, {} predicted classes",
            genome.genome_id,
            genome.hits.len(),
            calls.len(),
            predictions.len()
        );

        aggregate::build_result(genome.genome_id.clone(), calls, predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> (DrugTable, MutationCatalog) {
        (
            DrugTable::load_embedded().unwrap(),
            MutationCatalog::load_embedded().unwrap(),
        )
    }

    #[test]
    fn test_default_config_thresholds() {
        let config = EngineConfig::default();
        assert_eq!(config.resfinder.min_identity, 98.0);
        assert_eq!(config.resfinder.min_coverage, 60.0);
        assert_eq!(config.pointfinder.min_coverage, 95.0);
        assert!(config.include_negatives);
    }

    #[test]
    fn test_validate_rejects_out_of_range_thresholds() {
        let mut config = EngineConfig::default();
        config.resfinder.min_identity = 101.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold {
                name: "resfinder identity",
                ..
            })
        ));

        config.resfinder.min_identity = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_engine_rejects_bad_config() {
        let (drugs, mutations) = tables();
        let mut config = EngineConfig::default();
        config.pointfinder.min_coverage = 150.0;
        assert!(CallEngine::with_config(&drugs, &mutations, config).is_err());
    }

    #[test]
    fn test_run_with_no_genomes() {
        let (drugs, mutations) = tables();
        let engine = CallEngine::new(&drugs, &mutations).unwrap();
        let output = engine.run(&[]);
        assert!(output.results.is_empty());
        assert_eq!(output.diagnostics, RunDiagnostics::default());
    }

    #[test]
    fn test_empty_genome_is_negative() {
        let (drugs, mutations) = tables();
        let engine = CallEngine::new(&drugs, &mutations).unwrap();

        let genomes = vec![GenomeHits::new(GenomeId::new("empty"))];
        let output = engine.run(&genomes);

        assert_eq!(output.results.len(), 1);
        assert!(output.results[0].is_negative());
        assert_eq!(output.diagnostics.negative_genomes, 1);
    }
}
