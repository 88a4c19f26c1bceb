//! Parser for BLAST tabular hit files.
//!
//! Reads 13-column outfmt-6 rows (query = AMR reference sequence, subject =
//! genome contig) into [`Hit`] values. Supports plain and gzip-compressed
//! tables. A malformed row is logged and skipped so one bad line never costs
//! the rest of the genome.

use std::ffi::OsStr;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use flate2::read::GzDecoder;

use crate::core::hit::Hit;
use crate::core::types::{DatabaseKind, GenomeId, Strand};
use crate::utils::validation::{check_hit_limit, is_valid_percent};

/// Expected number of tab-separated columns per hit row
pub const HIT_COLUMNS: usize = 13;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Too many hits: {0} exceeds maximum allowed (1000000)")]
    TooManyHits(usize),
}

/// Parse a hit table and tag every hit with the genome it belongs to.
///
/// The genome id is the file name up to the first `.`, so
/// `SRR1952908.resfinder.tsv` and `SRR1952908.pointfinder.tsv` land on the
/// same genome. Pass `genome_id` to override.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or decompressed, or
/// `ParseError::TooManyHits` if the limit is exceeded. An empty table is not
/// an error; it yields no hits.
pub fn parse_hits_file(
    path: &Path,
    database: DatabaseKind,
    genome_id: Option<GenomeId>,
) -> Result<(GenomeId, Vec<Hit>), ParseError> {
    let genome_id = genome_id.unwrap_or_else(|| genome_id_from_path(path));
    let content = read_table(path)?;
    let hits = parse_hits_text(&content, &genome_id, database)?;
    Ok((genome_id, hits))
}

/// Parse hit-table text.
///
/// Blank lines, `#` comments, and a leading `qseqid` header row are
/// tolerated. Rows that fail to parse are skipped with a warning.
///
/// # Errors
///
/// Returns `ParseError::TooManyHits` if the limit is exceeded.
pub fn parse_hits_text(
    text: &str,
    genome_id: &GenomeId,
    database: DatabaseKind,
) -> Result<Vec<Hit>, ParseError> {
    let mut hits = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();

        // Tolerate a column-name header on the first non-comment line
        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "qseqid" {
                continue;
            }
        }

        // Line numbers in warnings are 1-based for user friendliness
        let line_num = i + 1;

        match parse_row(&fields, genome_id, database) {
            Ok(hit) => {
                if check_hit_limit(hits.len()).is_some() {
                    return Err(ParseError::TooManyHits(hits.len()));
                }
                hits.push(hit);
            }
            Err(reason) => {
                warn!("{genome_id}: skipping malformed hit row at line {line_num}: {reason}");
            }
        }
    }

    Ok(hits)
}

/// Parse one tab-split row into a hit. The error string is a reason for the
/// skip warning, not a user-facing failure.
fn parse_row(fields: &[&str], genome_id: &GenomeId, database: DatabaseKind) -> Result<Hit, String> {
    if fields.len() != HIT_COLUMNS {
        return Err(format!(
            "expected {HIT_COLUMNS} columns, found {}",
            fields.len()
        ));
    }

    let (reference_name, accession) = split_reference_id(fields[0]);
    if reference_name.is_empty() {
        return Err("empty reference id".to_string());
    }

    let contig_id = fields[1].trim();
    if contig_id.is_empty() {
        return Err("empty contig id".to_string());
    }

    let percent_identity: f64 = parse_field(fields[2], "pident")?;
    if !is_valid_percent(percent_identity) {
        return Err(format!("pident out of range: {percent_identity}"));
    }

    let length: u64 = parse_field(fields[3], "length")?;
    let ref_start: u64 = parse_field(fields[4], "qstart")?;
    let ref_end: u64 = parse_field(fields[5], "qend")?;
    let sstart: u64 = parse_field(fields[6], "sstart")?;
    let send: u64 = parse_field(fields[7], "send")?;
    // slen is carried by the format but nothing downstream needs it
    let _: u64 = parse_field(fields[8], "slen")?;
    let ref_length: u64 = parse_field(fields[9], "qlen")?;

    if ref_length == 0 {
        return Err("qlen is zero".to_string());
    }
    if ref_start == 0 || ref_end < ref_start || ref_end > ref_length {
        return Err(format!(
            "inconsistent reference coordinates {ref_start}-{ref_end} (qlen {ref_length})"
        ));
    }
    if sstart == 0 || send == 0 {
        return Err("contig coordinates are 1-based".to_string());
    }

    let strand = match fields[10].trim() {
        "plus" | "+" => Strand::Plus,
        "minus" | "-" => Strand::Minus,
        other => return Err(format!("unrecognized strand '{other}'")),
    };

    // Subject coordinates run backwards on the minus strand
    let (contig_start, contig_end) = if sstart <= send {
        (sstart, send)
    } else {
        (send, sstart)
    };

    Ok(Hit {
        genome_id: genome_id.clone(),
        database,
        reference_name: reference_name.to_string(),
        accession: accession.to_string(),
        contig_id: contig_id.to_string(),
        contig_start,
        contig_end,
        percent_identity,
        percent_coverage: percent_of(length, ref_length),
        strand,
        ref_start,
        ref_end,
        ref_length,
        aligned_contig: non_empty(fields[11]),
        aligned_ref: non_empty(fields[12]),
    })
}

/// Split a reference id of the form `<gene>_<variant>_<accession>`.
///
/// The variant index is the first all-digit token with a name before it and
/// an accession after it (`blaTEM-1B_1_JF910132`). Accessions may themselves
/// contain underscores (`aac(6')-Iaa_1_NC_003197`). Ids without a variant
/// token, such as bare locus names (`gyrA`), are used as both name and
/// accession.
#[must_use]
pub fn split_reference_id(id: &str) -> (&str, &str) {
    let id = id.trim();
    let mut offset = 0;
    for token in id.split('_') {
        let end = offset + token.len();
        if offset > 0
            && end < id.len()
            && !token.is_empty()
            && token.bytes().all(|b| b.is_ascii_digit())
        {
            return (&id[..offset - 1], &id[end + 1..]);
        }
        offset = end + 1;
    }
    (id, id)
}

/// Derive a genome id from a hit-table path: the file name up to the first `.`
#[must_use]
pub fn genome_id_from_path(path: &Path) -> GenomeId {
    let name = path
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("unknown");
    let stem = name
        .split('.')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(name);
    GenomeId::new(stem)
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

fn read_table(path: &Path) -> Result<String, ParseError> {
    if is_gzipped(path) {
        let file = std::fs::File::open(path)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut content = String::new();
        decoder.read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, column: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid {column}: '{raw}'"))
}

#[allow(clippy::cast_precision_loss)] // Reference lengths are far below 2^52
fn percent_of(part: u64, whole: u64) -> f64 {
    (part as f64 / whole as f64) * 100.0
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn genome() -> GenomeId {
        GenomeId::new("sample1")
    }

    #[test]
    fn test_parse_hits_text() {
        let table = "blaTEM-1B_1_JF910132\tcontig5\t100.00\t861\t1\t861\t3000\t3860\t50000\t861\tplus\tATGAGT\tATGAGT\n\
                     tet(A)_4_AJ517790\tcontig2\t99.85\t1275\t1\t1275\t100\t1374\t40000\t1275\tplus\tGTTAAA\tGTTAAA\n";

        let hits = parse_hits_text(table, &genome(), DatabaseKind::Resfinder).unwrap();
        assert_eq!(hits.len(), 2);

        let first = &hits[0];
        assert_eq!(first.reference_name, "blaTEM-1B");
        assert_eq!(first.accession, "JF910132");
        assert_eq!(first.contig_id, "contig5");
        assert_eq!(first.contig_start, 3000);
        assert_eq!(first.contig_end, 3860);
        assert_eq!(first.percent_identity, 100.0);
        assert_eq!(first.percent_coverage, 100.0);
        assert_eq!(first.strand, Strand::Plus);
        assert_eq!(first.ref_length, 861);
        assert_eq!(first.aligned_ref.as_deref(), Some("ATGAGT"));
    }

    #[test]
    fn test_minus_strand_normalizes_coordinates() {
        let table =
            "blaTEM-1B_1_JF910132\tcontig5\t100.00\t861\t1\t861\t3860\t3000\t50000\t861\tminus\tATG\tATG\n";

        let hits = parse_hits_text(table, &genome(), DatabaseKind::Resfinder).unwrap();
        assert_eq!(hits[0].contig_start, 3000);
        assert_eq!(hits[0].contig_end, 3860);
        assert_eq!(hits[0].strand, Strand::Minus);
    }

    #[test]
    fn test_partial_coverage() {
        // 600 of 1200 reference bases aligned
        let table =
            "blaSHV-12_1_X98105\tcontig1\t98.50\t600\t1\t600\t1\t600\t9000\t1200\tplus\tATG\tATG\n";

        let hits = parse_hits_text(table, &genome(), DatabaseKind::Resfinder).unwrap();
        assert_eq!(hits[0].percent_coverage, 50.0);
    }

    #[test]
    fn test_header_and_comments_skipped() {
        let table = "# produced upstream\n\
                     qseqid\tsseqid\tpident\tlength\tqstart\tqend\tsstart\tsend\tslen\tqlen\tsstrand\tsseq\tqseq\n\
                     gyrA_1_CP015117\tcontig1\t99.90\t2637\t1\t2637\t500\t3136\t80000\t2637\tplus\tATG\tATG\n";

        let hits = parse_hits_text(table, &genome(), DatabaseKind::Pointfinder).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reference_name, "gyrA");
        assert_eq!(hits[0].accession, "CP015117");
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let table = "blaTEM-1B_1_JF910132\tcontig5\tnot-a-number\t861\t1\t861\t3000\t3860\t50000\t861\tplus\tATG\tATG\n\
                     too\tfew\tcolumns\n\
                     blaTEM-1B_1_JF910132\tcontig5\t100.00\t861\t1\t861\t3000\t3860\t50000\t861\tsideways\tATG\tATG\n\
                     tet(A)_4_AJ517790\tcontig2\t99.85\t1275\t1\t1275\t100\t1374\t40000\t1275\tplus\tGTT\tGTT\n";

        let hits = parse_hits_text(table, &genome(), DatabaseKind::Resfinder).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reference_name, "tet(A)");
    }

    #[test]
    fn test_inconsistent_reference_coordinates_skipped() {
        // qend beyond qlen
        let table =
            "blaTEM-1B_1_JF910132\tcontig5\t100.00\t861\t1\t900\t3000\t3860\t50000\t861\tplus\tATG\tATG\n";

        let hits = parse_hits_text(table, &genome(), DatabaseKind::Resfinder).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_empty_table_is_valid() {
        let hits = parse_hits_text("", &genome(), DatabaseKind::Resfinder).unwrap();
        assert!(hits.is_empty());

        let hits = parse_hits_text("# only comments\n\n", &genome(), DatabaseKind::Resfinder)
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_split_reference_id() {
        assert_eq!(
            split_reference_id("blaTEM-1B_1_JF910132"),
            ("blaTEM-1B", "JF910132")
        );
        assert_eq!(
            split_reference_id("aac(6')-Iaa_1_NC_003197"),
            ("aac(6')-Iaa", "NC_003197")
        );
        assert_eq!(split_reference_id("gyrA"), ("gyrA", "gyrA"));
        // No all-digit variant token: id used verbatim
        assert_eq!(
            split_reference_id("ampC_promoter_region"),
            ("ampC_promoter_region", "ampC_promoter_region")
        );
        // A trailing number is a name suffix, not a variant index
        assert_eq!(split_reference_id("sul1_55"), ("sul1_55", "sul1_55"));
    }

    #[test]
    fn test_genome_id_from_path() {
        assert_eq!(
            genome_id_from_path(Path::new("/data/SRR1952908.resfinder.tsv")).to_string(),
            "SRR1952908"
        );
        assert_eq!(
            genome_id_from_path(Path::new("sample2.tsv.gz")).to_string(),
            "sample2"
        );
        assert_eq!(
            genome_id_from_path(Path::new("plain")).to_string(),
            "plain"
        );
    }

    #[test]
    fn test_parse_file_gzipped() {
        let mut file = tempfile::NamedTempFile::with_suffix(".tsv.gz").unwrap();
        let table =
            "blaTEM-1B_1_JF910132\tcontig5\t100.00\t861\t1\t861\t3000\t3860\t50000\t861\tplus\tATG\tATG\n";
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(table.as_bytes()).unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        file.flush().unwrap();

        let (genome_id, hits) =
            parse_hits_file(file.path(), DatabaseKind::Resfinder, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(!genome_id.to_string().is_empty());
    }

    #[test]
    fn test_parse_file_plain_with_override() {
        let mut file = tempfile::NamedTempFile::with_suffix(".tsv").unwrap();
        let table =
            "tet(A)_4_AJ517790\tcontig2\t99.85\t1275\t1\t1275\t100\t1374\t40000\t1275\tplus\tGTT\tGTT\n";
        file.write_all(table.as_bytes()).unwrap();
        file.flush().unwrap();

        let (genome_id, hits) =
            parse_hits_file(file.path(), DatabaseKind::Resfinder, Some(GenomeId::new("g7")))
                .unwrap();
        assert_eq!(genome_id.to_string(), "g7");
        assert_eq!(hits[0].genome_id.to_string(), "g7");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = parse_hits_file(
            Path::new("/nonexistent/hits.tsv"),
            DatabaseKind::Resfinder,
            None,
        );
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
