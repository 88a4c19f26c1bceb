use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::catalog::{DrugTable, MutationCatalog};
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct TablesArgs {
    #[command(subcommand)]
    pub command: TablesCommands,
}

#[derive(Subcommand)]
pub enum TablesCommands {
    /// List the drug key mapping names to drug classes
    Drugs {
        /// Filter by drug class (substring, case-insensitive)
        #[arg(long)]
        class: Option<String>,

        /// Path to custom drug key TSV
        #[arg(long)]
        drug_key: Option<PathBuf>,
    },

    /// List the point-mutation catalog
    Mutations {
        /// Filter by locus (substring, case-insensitive)
        #[arg(long)]
        locus: Option<String>,

        /// Path to custom mutation catalog TSV
        #[arg(long)]
        mutations: Option<PathBuf>,
    },

    /// Export an embedded table to a TSV file for editing
    Export {
        /// Which table to export
        #[arg(required = true, value_enum)]
        table: TableKind,

        /// Output file path
        #[arg(short, long, required = true)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum TableKind {
    Drugs,
    Mutations,
}

/// Execute tables subcommand
///
/// # Errors
///
/// Returns an error if a table cannot be loaded or the export file cannot be
/// written.
pub fn run(args: TablesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        TablesCommands::Drugs { class, drug_key } => {
            run_drugs(class.as_deref(), drug_key, format, verbose)
        }
        TablesCommands::Mutations { locus, mutations } => {
            run_mutations(locus.as_deref(), mutations, format, verbose)
        }
        TablesCommands::Export { table, output } => run_export(table, &output),
    }
}

fn run_drugs(
    class_filter: Option<&str>,
    table_path: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let table = if let Some(path) = table_path {
        DrugTable::load_from_file(&path)?
    } else {
        DrugTable::load_embedded()?
    };

    if verbose {
        eprintln!("Loaded drug key with {} entries", table.len());
    }

    let filtered: Vec<_> = table
        .entries
        .iter()
        .filter(|e| {
            if let Some(class) = class_filter {
                if !e.drug_class.to_lowercase().contains(&class.to_lowercase()) {
                    return false;
                }
            }
            true
        })
        .collect();

    match format {
        OutputFormat::Text => {
            // Calculate column widths dynamically
            let name_width = filtered
                .iter()
                .map(|e| e.name.len())
                .max()
                .unwrap_or(4)
                .max(4);
            let class_width = filtered
                .iter()
                .map(|e| e.drug_class.len())
                .max()
                .unwrap_or(5)
                .max(5);

            println!("Drug Key ({} entries)\n", filtered.len());
            println!(
                "{:<name_w$} {:<class_w$} {}",
                "Name",
                "Class",
                "Requires",
                name_w = name_width,
                class_w = class_width,
            );
            println!("{}", "-".repeat(name_width + class_width + 10));

            for entry in &filtered {
                println!(
                    "{:<name_w$} {:<class_w$} {}",
                    entry.name,
                    entry.drug_class,
                    entry.requires.join(", "),
                    name_w = name_width,
                    class_w = class_width,
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        OutputFormat::Tsv => {
            println!("name\tclass\trequires");
            for entry in &filtered {
                println!(
                    "{}\t{}\t{}",
                    entry.name,
                    entry.drug_class,
                    entry.requires.join(",")
                );
            }
        }
    }

    Ok(())
}

fn run_mutations(
    locus_filter: Option<&str>,
    table_path: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = if let Some(path) = table_path {
        MutationCatalog::load_from_file(&path)?
    } else {
        MutationCatalog::load_embedded()?
    };

    if verbose {
        eprintln!("Loaded mutation catalog with {} entries", catalog.len());
    }

    let filtered: Vec<_> = catalog
        .entries
        .iter()
        .filter(|e| {
            if let Some(locus) = locus_filter {
                if !e.locus.to_lowercase().contains(&locus.to_lowercase()) {
                    return false;
                }
            }
            true
        })
        .collect();

    match format {
        OutputFormat::Text => {
            let locus_width = filtered
                .iter()
                .map(|e| e.locus.len())
                .max()
                .unwrap_or(5)
                .max(5);

            println!("Point-Mutation Catalog ({} entries)\n", filtered.len());
            println!(
                "{:<locus_w$} {:<10} {:>8} {:>9}  {}",
                "Locus",
                "Kind",
                "Position",
                "Wild-type",
                "Resistant",
                locus_w = locus_width,
            );
            println!("{}", "-".repeat(locus_width + 42));

            for entry in &filtered {
                println!(
                    "{:<locus_w$} {:<10} {:>8} {:>9}  {}",
                    entry.locus,
                    entry.kind.to_string(),
                    entry.position,
                    entry.wild_type,
                    entry.resistant.join(", "),
                    locus_w = locus_width,
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        OutputFormat::Tsv => {
            println!("locus\tkind\tposition\twild_type\tresistant");
            for entry in &filtered {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    entry.locus,
                    entry.kind,
                    entry.position,
                    entry.wild_type,
                    entry.resistant.join(",")
                );
            }
        }
    }

    Ok(())
}

fn run_export(table: TableKind, output: &Path) -> anyhow::Result<()> {
    let (tsv, entries) = match table {
        TableKind::Drugs => {
            let table = DrugTable::load_embedded()?;
            (table.to_tsv(), table.len())
        }
        TableKind::Mutations => {
            let catalog = MutationCatalog::load_embedded()?;
            (catalog.to_tsv(), catalog.len())
        }
    };

    std::fs::write(output, tsv)?;
    println!("Exported {} entries to {}", entries, output.display());

    Ok(())
}
