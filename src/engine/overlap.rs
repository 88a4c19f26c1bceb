//! Overlap resolution: one call per locus per genome.
//!
//! Hits from the same gene family often tile the same stretch of a contig
//! (alternate alleles of one acquired gene all align to the locus). This
//! stage groups hits by (genome, gene family, contig), clusters the groups
//! into overlapping regions, and keeps the single best hit per region.
//!
//! The tie-break order is a published contract: percent identity descending,
//! then percent coverage descending, then lexicographically smallest
//! accession. Changing it changes reported calls.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::core::hit::Hit;

/// Counters reported back to the run diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapStats {
    /// Hits merged away into a better hit on the same region
    pub merged: usize,
    /// Clusters where identity and coverage tied and the accession decided
    pub tie_breaks: usize,
}

/// Resolve overlaps, keeping survivors in their input order.
pub fn resolve(hits: Vec<&Hit>) -> (Vec<&Hit>, OverlapStats) {
    let mut stats = OverlapStats::default();
    if hits.len() < 2 {
        return (hits, stats);
    }

    // Group hit indices by (genome, family, contig)
    let mut groups: HashMap<(&str, &str, &str), Vec<usize>> = HashMap::new();
    for (index, hit) in hits.iter().enumerate() {
        let key = (
            hit.genome_id.0.as_str(),
            hit.gene_family(),
            hit.contig_id.as_str(),
        );
        groups.entry(key).or_default().push(index);
    }

    // Sorted keys so warnings and debug output are reproducible
    let mut keys: Vec<(&str, &str, &str)> = groups.keys().copied().collect();
    keys.sort_unstable();

    let mut kept: Vec<usize> = Vec::with_capacity(hits.len());
    for key in keys {
        let mut members = groups.remove(&key).unwrap_or_default();

        if members.len() == 1 {
            kept.push(members[0]);
            continue;
        }

        // Cluster by coordinate: after sorting by start, a hit starting at or
        // before the running maximum end overlaps the current cluster
        members.sort_unstable_by_key(|&i| (hits[i].contig_start, hits[i].contig_end));

        let mut cluster: Vec<usize> = Vec::new();
        let mut cluster_end = 0u64;
        for index in members {
            let hit = hits[index];
            if cluster.is_empty() || hit.contig_start <= cluster_end {
                cluster_end = cluster_end.max(hit.contig_end);
                cluster.push(index);
            } else {
                kept.push(pick_best(&hits, &cluster, &mut stats));
                cluster_end = hit.contig_end;
                cluster = vec![index];
            }
        }
        if !cluster.is_empty() {
            kept.push(pick_best(&hits, &cluster, &mut stats));
        }
    }

    // Restore input order
    kept.sort_unstable();
    let resolved = kept.into_iter().map(|i| hits[i]).collect();
    (resolved, stats)
}

/// The winning index of one overlap cluster
fn pick_best(hits: &[&Hit], cluster: &[usize], stats: &mut OverlapStats) -> usize {
    if cluster.len() == 1 {
        return cluster[0];
    }

    let mut ranked: Vec<usize> = cluster.to_vec();
    ranked.sort_by(|&a, &b| {
        let (a, b) = (hits[a], hits[b]);
        b.percent_identity
            .partial_cmp(&a.percent_identity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.percent_coverage
                    .partial_cmp(&a.percent_coverage)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.accession.cmp(&b.accession))
    });

    let best = hits[ranked[0]];
    let runner_up = hits[ranked[1]];
    stats.merged += cluster.len() - 1;

    if best.percent_identity == runner_up.percent_identity
        && best.percent_coverage == runner_up.percent_coverage
    {
        stats.tie_breaks += 1;
        warn!(
            "ambiguous overlap on {} {}:{}-{}: {} and {} tie at {:.2}%/{:.2}%, kept {} by accession",
            best.genome_id,
            best.contig_id,
            best.contig_start,
            best.contig_end,
            best.accession,
            runner_up.accession,
            best.percent_identity,
            best.percent_coverage,
            best.accession
        );
    } else {
        debug!(
            "merged {} overlapping {} hits on {}:{}-{}, kept {} ({:.2}%)",
            cluster.len(),
            best.gene_family(),
            best.contig_id,
            best.contig_start,
            best.contig_end,
            best.reference_name,
            best.percent_identity
        );
    }

    ranked[0]
}
