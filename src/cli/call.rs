use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;

use crate::catalog::{DrugTable, MutationCatalog};
use crate::cli::OutputFormat;
use crate::core::hit::Hit;
use crate::core::types::{DatabaseKind, GenomeId};
use crate::engine::{
    CallEngine, EngineConfig, ExclusionList, ExclusionPolicy, GenomeHits, RunOutput, Thresholds,
};
use crate::parsing::hits::parse_hits_file;

#[derive(Args)]
pub struct CallArgs {
    /// Resistance-gene hit table(s), one per genome (.tsv or .tsv.gz)
    #[arg(long = "resfinder", num_args = 1..)]
    pub resfinder: Vec<PathBuf>,

    /// Point-mutation hit table(s), one per genome (.tsv or .tsv.gz)
    #[arg(long = "pointfinder", num_args = 1..)]
    pub pointfinder: Vec<PathBuf>,

    /// Minimum percent identity, applied to both databases
    #[arg(long, default_value_t = 98.0)]
    pub pid_threshold: f64,

    /// Minimum percent coverage for resistance-gene hits
    #[arg(long, default_value_t = 60.0)]
    pub plength_resfinder: f64,

    /// Minimum percent coverage for point-mutation hits
    #[arg(long, default_value_t = 95.0)]
    pub plength_pointfinder: f64,

    /// Disable the built-in gene exclusion list
    #[arg(long, conflicts_with = "exclude_genes_file")]
    pub no_exclude_genes: bool,

    /// Replace the built-in exclusion list with a file (one gene per line)
    #[arg(long)]
    pub exclude_genes_file: Option<PathBuf>,

    /// Omit genomes with no resistance calls from the results
    #[arg(long)]
    pub exclude_negatives: bool,

    /// Custom drug key TSV (defaults to the embedded table)
    #[arg(long)]
    pub drug_key: Option<PathBuf>,

    /// Custom point-mutation catalog TSV (defaults to the embedded table)
    #[arg(long)]
    pub mutations: Option<PathBuf>,
}

/// Execute call subcommand
///
/// # Errors
///
/// Returns an error for invalid configuration, unreadable reference tables,
/// or hit tables that cannot be read at all. Malformed rows inside a table
/// are skipped with a warning instead.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CallArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if args.resfinder.is_empty() && args.pointfinder.is_empty() {
        anyhow::bail!("No hit tables given. Use --resfinder and/or --pointfinder.");
    }

    let drugs = if let Some(path) = &args.drug_key {
        DrugTable::load_from_file(path)?
    } else {
        DrugTable::load_embedded()?
    };

    let mutations = if let Some(path) = &args.mutations {
        MutationCatalog::load_from_file(path)?
    } else {
        MutationCatalog::load_embedded()?
    };

    if verbose {
        eprintln!(
            "Loaded drug key with {} entries, mutation catalog with {} entries",
            drugs.len(),
            mutations.len()
        );
    }

    let exclusion = if args.no_exclude_genes {
        ExclusionPolicy::Disabled
    } else if let Some(path) = &args.exclude_genes_file {
        ExclusionPolicy::File(path.clone())
    } else {
        ExclusionPolicy::BuiltIn
    };

    let config = EngineConfig {
        resfinder: Thresholds::new(args.pid_threshold, args.plength_resfinder),
        pointfinder: Thresholds::new(args.pid_threshold, args.plength_pointfinder),
        exclusion,
        include_negatives: !args.exclude_negatives,
    };

    // Fails here, before any genome is touched, on bad thresholds or a bad
    // exclusion list
    let engine = CallEngine::with_config(&drugs, &mutations, config)?;

    if verbose {
        eprintln!(
            "Exclusion list ({}): {} gene(s)",
            engine.exclusions().source(),
            engine.exclusions().len()
        );
    }

    let genomes = collect_genomes(&args.resfinder, &args.pointfinder)?;

    if verbose {
        let total_hits: usize = genomes.iter().map(|g| g.hits.len()).sum();
        eprintln!("Parsed {} hits across {} genome(s)", total_hits, genomes.len());
    }

    let output = engine.run(&genomes);

    match format {
        OutputFormat::Text => print_text_results(&output),
        OutputFormat::Json => print_json_results(&output, engine.config(), engine.exclusions())?,
        OutputFormat::Tsv => print_tsv_results(&output),
    }

    Ok(())
}

/// Parse every hit table and group hits per genome.
///
/// Tables whose names share a stem (`SRR1952908.resfinder.tsv`,
/// `SRR1952908.pointfinder.tsv`) merge into one genome. Genomes keep the
/// order their first table was given in.
fn collect_genomes(
    resfinder: &[PathBuf],
    pointfinder: &[PathBuf],
) -> anyhow::Result<Vec<GenomeHits>> {
    let mut order: Vec<GenomeId> = Vec::new();
    let mut by_genome: HashMap<GenomeId, Vec<Hit>> = HashMap::new();

    let inputs = resfinder
        .iter()
        .map(|p| (p, DatabaseKind::Resfinder))
        .chain(pointfinder.iter().map(|p| (p, DatabaseKind::Pointfinder)));

    for (path, database) in inputs {
        let (genome_id, hits) = parse_hits_file(path, database, None)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))?;

        if !by_genome.contains_key(&genome_id) {
            order.push(genome_id.clone());
        }
        by_genome.entry(genome_id).or_default().extend(hits);
    }

    Ok(order
        .into_iter()
        .map(|id| {
            let hits = by_genome.remove(&id).unwrap_or_default();
            GenomeHits::with_hits(id, hits)
        })
        .collect())
}

fn print_text_results(output: &RunOutput) {
    for (i, result) in output.results.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(60));
        }

        println!("\n{}", result.genome_id);

        if result.is_negative() {
            println!("   No resistance determinants found");
            continue;
        }

        // Calculate column widths dynamically
        let name_width = result
            .resistance_calls
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(4)
            .max(4);
        let type_width = result
            .resistance_calls
            .iter()
            .map(|c| c.call_type.to_string().len())
            .max()
            .unwrap_or(4)
            .max(4);

        println!(
            "\n   {:<name_w$}  {:<type_w$}  {:>9}  {:>9}  {}",
            "Name",
            "Type",
            "Identity",
            "Coverage",
            "Location",
            name_w = name_width,
            type_w = type_width,
        );
        for call in &result.resistance_calls {
            println!(
                "   {:<name_w$}  {:<type_w$}  {:>8.2}%  {:>8.2}%  {}",
                call.name,
                call.call_type.to_string(),
                call.percent_identity,
                call.percent_coverage,
                call.location(),
                name_w = name_width,
                type_w = type_width,
            );
        }

        if result.phenotype_predictions.is_empty() {
            println!("\n   No predicted resistance classes");
        } else {
            println!("\n   Predicted resistance:");
            for prediction in &result.phenotype_predictions {
                println!(
                    "   - {}: {}",
                    prediction.drug_class,
                    prediction.supporting_calls.join(", ")
                );
            }
        }
    }

    let d = &output.diagnostics;
    println!("\n{}", "─".repeat(60));
    println!(
        "\nProcessed {} genome(s), {} negative",
        d.genomes_processed, d.negative_genomes
    );
    println!(
        "Hits: {} seen, {} below thresholds, {} excluded, {} merged by overlap",
        d.hits_seen, d.dropped_by_threshold, d.dropped_by_exclusion, d.merged_by_overlap
    );
    if d.names_without_phenotype > 0 {
        println!(
            "Calls without a drug-key entry: {}",
            d.names_without_phenotype
        );
    }
    println!();
}

fn print_json_results(
    output: &RunOutput,
    config: &EngineConfig,
    exclusions: &ExclusionList,
) -> anyhow::Result<()> {
    let json = serde_json::json!({
        "settings": {
            "generated": chrono::Utc::now().to_rfc3339(),
            "resfinder": config.resfinder,
            "pointfinder": config.pointfinder,
            "exclusion": {
                "source": exclusions.source(),
                "genes": exclusions.names(),
            },
            "include_negatives": config.include_negatives,
        },
        "genomes": output.results,
        "diagnostics": output.diagnostics,
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_tsv_results(output: &RunOutput) {
    println!(
        "genome\tname\ttype\tpident\tpcoverage\tcontig\tstart\tend\tstrand\taccession"
    );
    for result in &output.results {
        if result.is_negative() {
            println!("# {}: no resistance determinants", result.genome_id);
            continue;
        }

        let predicted = if result.phenotype_predictions.is_empty() {
            "none".to_string()
        } else {
            result
                .phenotype_predictions
                .iter()
                .map(|p| format!("{} ({})", p.drug_class, p.supporting_calls.join(", ")))
                .collect::<Vec<_>>()
                .join("; ")
        };
        println!("# {}: predicted {}", result.genome_id, predicted);

        for call in &result.resistance_calls {
            println!(
                "{}\t{}\t{}\t{:.2}\t{:.2}\t{}\t{}\t{}\t{}\t{}",
                call.genome_id,
                call.name,
                call.call_type,
                call.percent_identity,
                call.percent_coverage,
                call.contig_id,
                call.contig_start,
                call.contig_end,
                call.strand,
                call.accession,
            );
        }
    }
}
