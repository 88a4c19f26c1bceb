//! Threshold filtering: the first pipeline stage.

use tracing::trace;

use crate::core::hit::Hit;
use crate::engine::EngineConfig;

/// Keep the hits meeting the identity/coverage cutoffs of their database.
///
/// Pure and order-preserving: survivors come back in input order. Dropped
/// hits are counted, not reported as errors.
pub fn apply<'h>(hits: &'h [Hit], config: &EngineConfig) -> (Vec<&'h Hit>, usize) {
    let mut kept = Vec::with_capacity(hits.len());
    let mut dropped = 0;

    for hit in hits {
        if config.thresholds_for(hit.database).accepts(hit) {
            kept.push(hit);
        } else {
            trace!(
                "dropping {} ({}: id {:.1}%, cov {:.1}%)",
                hit.reference_name,
                hit.database,
                hit.percent_identity,
                hit.percent_coverage
            );
            dropped += 1;
        }
    }

    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DatabaseKind, GenomeId, Strand};

    fn hit(name: &str, database: DatabaseKind, identity: f64, coverage: f64) -> Hit {
        Hit {
            genome_id: GenomeId::new("g1"),
            database,
            reference_name: name.to_string(),
            accession: name.to_string(),
            contig_id: "contig1".to_string(),
            contig_start: 1,
            contig_end: 1000,
            percent_identity: identity,
            percent_coverage: coverage,
            strand: Strand::Plus,
            ref_start: 1,
            ref_end: 1000,
            ref_length: 1000,
            aligned_ref: None,
            aligned_contig: None,
        }
    }

    #[test]
    fn test_boundary_values_survive() {
        let hits = vec![hit("a", DatabaseKind::Resfinder, 98.0, 60.0)];
        let (kept, dropped) = apply(&hits, &EngineConfig::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_either_cutoff_drops() {
        let hits = vec![
            hit("low_id", DatabaseKind::Resfinder, 97.9, 100.0),
            hit("low_cov", DatabaseKind::Resfinder, 100.0, 59.9),
            hit("ok", DatabaseKind::Resfinder, 100.0, 100.0),
        ];
        let (kept, dropped) = apply(&hits, &EngineConfig::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].reference_name, "ok");
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_per_database_coverage_defaults() {
        // 80% coverage passes the resfinder default (60) but not the
        // pointfinder default (95)
        let hits = vec![
            hit("gene", DatabaseKind::Resfinder, 99.0, 80.0),
            hit("gyrA", DatabaseKind::Pointfinder, 99.0, 80.0),
        ];
        let (kept, dropped) = apply(&hits, &EngineConfig::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].reference_name, "gene");
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_order_preserved() {
        let hits = vec![
            hit("c", DatabaseKind::Resfinder, 99.0, 99.0),
            hit("a", DatabaseKind::Resfinder, 99.0, 99.0),
            hit("b", DatabaseKind::Resfinder, 99.0, 99.0),
        ];
        let (kept, _) = apply(&hits, &EngineConfig::default());
        let names: Vec<&str> = kept.iter().map(|h| h.reference_name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
