//! Point-mutation resolution for PointFinder-style hits.
//!
//! A point-mutation hit aligns a wild-type reference locus against a contig.
//! This stage walks the aligned sequence pair, finds substitutions, and
//! classifies each one against the known-mutation catalog:
//!
//! - cataloged resistant substitution → known mutation call
//! - substitution absent from the catalog → novel mutation call
//!   (reported, never phenotype-mapped)
//! - wild-type region → no call at all
//!
//! Coding loci are compared codon by codon at the amino-acid level, so a
//! synonymous base change is still wild-type. Promoter loci are compared
//! base by base in promoter coordinates (-1 is the base before the coding
//! start). Gapped alignment columns are not substitutions and are skipped.

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::catalog::{LocusKind, MutationCatalog};
use crate::core::call::ResistanceCall;
use crate::core::hit::Hit;
use crate::core::types::CallType;

/// The standard genetic code, indexed by TCAG base order
const CODON_TABLE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

/// Translate one codon to its one-letter amino acid, `*` for stops.
///
/// Returns `None` for gaps, ambiguity codes, or anything that is not three
/// recognizable bases.
#[must_use]
pub fn translate_codon(codon: &str) -> Option<char> {
    let bytes = codon.as_bytes();
    if bytes.len() != 3 {
        return None;
    }
    let index = base_index(bytes[0])? * 16 + base_index(bytes[1])? * 4 + base_index(bytes[2])?;
    Some(CODON_TABLE[index] as char)
}

/// Resolve one surviving point-mutation hit into zero or more calls.
///
/// Each independent substitution yields its own call. A hit without a usable
/// aligned sequence pair is skipped with a warning; the genome still gets a
/// result from its remaining hits.
pub fn resolve(hit: &Hit, catalog: &MutationCatalog) -> Vec<ResistanceCall> {
    let Some(bases) = aligned_bases(hit) else {
        warn!(
            "skipping {} hit on {} {}: missing or inconsistent aligned sequences",
            hit.reference_name, hit.genome_id, hit.contig_id
        );
        return Vec::new();
    };

    match catalog.kind_of(&hit.reference_name) {
        Some(LocusKind::Nucleotide) => resolve_bases(hit, catalog, &bases),
        Some(LocusKind::Codon) => resolve_codons(hit, catalog, &bases),
        None => {
            debug!(
                "locus {} is not cataloged, substitutions will be novel",
                hit.reference_name
            );
            resolve_codons(hit, catalog, &bases)
        }
    }
}

/// Map reference positions to (reference base, contig base), both uppercase.
///
/// Columns where the reference is gapped (insertions in the contig) do not
/// consume a reference position. Returns `None` when the pair is absent,
/// length-mismatched, or inconsistent with the hit's reference coordinates.
fn aligned_bases(hit: &Hit) -> Option<HashMap<u64, (u8, u8)>> {
    let (ref_seq, contig_seq) = match (&hit.aligned_ref, &hit.aligned_contig) {
        (Some(r), Some(c)) if r.len() == c.len() => (r, c),
        _ => return None,
    };

    let mut bases = HashMap::new();
    let mut pos = hit.ref_start;
    for (r, c) in ref_seq.bytes().zip(contig_seq.bytes()) {
        if r == b'-' {
            continue;
        }
        bases.insert(pos, (r.to_ascii_uppercase(), c.to_ascii_uppercase()));
        pos += 1;
    }

    if pos != hit.ref_end + 1 {
        return None;
    }
    Some(bases)
}

/// Codon-level resolution for coding loci
fn resolve_codons(
    hit: &Hit,
    catalog: &MutationCatalog,
    bases: &HashMap<u64, (u8, u8)>,
) -> Vec<ResistanceCall> {
    let locus = hit.reference_name.as_str();

    // Codon numbers containing at least one substitution, in locus order
    let mut affected: BTreeSet<u64> = BTreeSet::new();
    for (&pos, &(r, c)) in bases {
        if c != r && c != b'-' {
            affected.insert((pos - 1) / 3 + 1);
        }
    }

    let mut calls = Vec::new();
    for codon_number in affected {
        let start = (codon_number - 1) * 3 + 1;
        let mut ref_codon = String::with_capacity(3);
        let mut obs_codon = String::with_capacity(3);
        let mut clean = true;
        for pos in start..start + 3 {
            match bases.get(&pos) {
                Some(&(r, c)) if c != b'-' => {
                    ref_codon.push(r as char);
                    obs_codon.push(c as char);
                }
                _ => {
                    clean = false;
                    break;
                }
            }
        }
        if !clean {
            debug!(
                "codon {codon_number} of {locus} is gapped or only partially aligned, skipping"
            );
            continue;
        }

        let (Some(ref_aa), Some(obs_aa)) =
            (translate_codon(&ref_codon), translate_codon(&obs_codon))
        else {
            debug!("codon {codon_number} of {locus} contains ambiguous bases, skipping");
            continue;
        };
        if ref_aa == obs_aa {
            // Synonymous change: wild-type at the protein level
            continue;
        }

        let name = format!("{locus} ({ref_aa}{codon_number}{obs_aa})");
        let call_type = classify(
            catalog,
            locus,
            i64::try_from(codon_number).unwrap_or(i64::MAX),
            &ref_aa.to_string(),
            &obs_aa.to_string(),
        );
        debug!("{}: {} ({})", hit.genome_id, name, call_type);
        calls.push(ResistanceCall::from_mutation_hit(hit, name, call_type));
    }

    calls
}

/// Base-level resolution for nucleotide (promoter) loci
fn resolve_bases(
    hit: &Hit,
    catalog: &MutationCatalog,
    bases: &HashMap<u64, (u8, u8)>,
) -> Vec<ResistanceCall> {
    let locus = hit.reference_name.as_str();
    let promoter = catalog.is_promoter_locus(locus);

    let mut positions: Vec<u64> = bases
        .iter()
        .filter(|(_, &(r, c))| c != r && c != b'-')
        .map(|(&pos, _)| pos)
        .collect();
    positions.sort_unstable();

    let mut calls = Vec::new();
    for pos in positions {
        let (r, c) = bases[&pos];
        if base_index(c).is_none() {
            debug!("ambiguous base at {locus} position {pos}, skipping");
            continue;
        }

        let published = if promoter {
            promoter_offset(pos, hit.ref_length)
        } else {
            i64::try_from(pos).unwrap_or(i64::MAX)
        };
        let name = format!("{} ({}{}{})", locus, r as char, published, c as char);
        let call_type = classify(
            catalog,
            locus,
            published,
            &(r as char).to_string(),
            &(c as char).to_string(),
        );
        debug!("{}: {} ({})", hit.genome_id, name, call_type);
        calls.push(ResistanceCall::from_mutation_hit(hit, name, call_type));
    }

    calls
}

/// Convert a 1-based reference index to a promoter coordinate, where the
/// final reference base sits at -1.
#[allow(clippy::cast_possible_wrap)]
fn promoter_offset(pos: u64, ref_length: u64) -> i64 {
    pos as i64 - ref_length as i64 - 1
}

/// Known when the catalog lists the observed residue at this position,
/// novel otherwise.
fn classify(
    catalog: &MutationCatalog,
    locus: &str,
    position: i64,
    reference: &str,
    observed: &str,
) -> CallType {
    match catalog.lookup(locus, position) {
        Some(entry) => {
            if entry.wild_type != reference {
                warn!(
                    "catalog wild-type {} at {} position {} disagrees with the aligned reference ({})",
                    entry.wild_type, locus, position, reference
                );
            }
            if entry.is_resistant(observed) {
                CallType::KnownMutation
            } else {
                CallType::NovelMutation
            }
        }
        None => CallType::NovelMutation,
    }
}
