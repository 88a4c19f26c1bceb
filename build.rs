use std::path::Path;

fn main() {
    let drug_entries = validate_drug_key(Path::new("tables/drug_key.tsv"));
    let mutation_entries = validate_mutations(Path::new("tables/point_mutations.tsv"));

    println!(
        "cargo:warning=Validated tables: {drug_entries} drug-key entries, {mutation_entries} mutation entries"
    );

    set_build_dependencies();
}

fn read_table(path: &Path) -> String {
    // Ensure the table exists at build time
    assert!(
        path.exists(),
        "\n\nTABLE BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the table file before building.\n",
        path.display()
    );

    std::fs::read_to_string(path).unwrap_or_else(|e| {
        panic!(
            "\n\nTABLE BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            path.display()
        );
    })
}

/// Rows other than blank lines, comments, and the header
fn data_rows(contents: &str) -> impl Iterator<Item = (usize, &str)> {
    contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| {
            !line.is_empty()
                && !line.starts_with('#')
                && !line.to_lowercase().starts_with("name\t")
                && !line.to_lowercase().starts_with("locus\t")
        })
}

fn validate_drug_key(path: &Path) -> usize {
    let contents = read_table(path);
    let mut entries = 0;

    for (line_num, line) in data_rows(&contents) {
        let fields: Vec<&str> = line.split('\t').collect();
        assert!(
            fields.len() >= 2,
            "\n\nTABLE BUILD ERROR: Drug-key row at line {line_num} has fewer than 2 columns\n\
             Path: {}\n\
             Line: {line}\n\
             Expected: name<TAB>class[<TAB>requires]\n",
            path.display()
        );
        assert!(
            !fields[0].trim().is_empty() && !fields[1].trim().is_empty(),
            "\n\nTABLE BUILD ERROR: Drug-key row at line {line_num} has an empty name or class\n\
             Path: {}\n\
             Line: {line}\n",
            path.display()
        );
        entries += 1;
    }

    assert!(
        entries > 0,
        "\n\nTABLE BUILD ERROR: Drug key has no data rows\n\
         Path: {}\n",
        path.display()
    );

    entries
}

fn validate_mutations(path: &Path) -> usize {
    let contents = read_table(path);
    let mut entries = 0;

    for (line_num, line) in data_rows(&contents) {
        let fields: Vec<&str> = line.split('\t').collect();
        assert!(
            fields.len() >= 5,
            "\n\nTABLE BUILD ERROR: Mutation row at line {line_num} has {} columns, expected 5\n\
             Path: {}\n\
             Line: {line}\n\
             Expected: locus<TAB>kind<TAB>position<TAB>wild_type<TAB>resistant\n",
            fields.len(),
            path.display()
        );

        let kind = fields[1].trim();
        assert!(
            kind == "codon" || kind == "nucleotide",
            "\n\nTABLE BUILD ERROR: Mutation row at line {line_num} has unknown kind '{kind}'\n\
             Path: {}\n\
             Expected 'codon' or 'nucleotide'.\n",
            path.display()
        );

        let position: i64 = fields[2].trim().parse().unwrap_or_else(|e| {
            panic!(
                "\n\nTABLE BUILD ERROR: Mutation row at line {line_num} has invalid position '{}'\n\
                 Path: {}\n\
                 Error: {e}\n",
                fields[2],
                path.display()
            );
        });
        assert!(
            position != 0,
            "\n\nTABLE BUILD ERROR: Mutation row at line {line_num} has position 0\n\
             Path: {}\n\
             Positions are 1-based; promoter positions are negative.\n",
            path.display()
        );
        assert!(
            kind != "codon" || position > 0,
            "\n\nTABLE BUILD ERROR: Mutation row at line {line_num} has negative codon position {position}\n\
             Path: {}\n",
            path.display()
        );

        assert!(
            fields[3].trim().chars().count() == 1,
            "\n\nTABLE BUILD ERROR: Mutation row at line {line_num} wild_type must be a single character\n\
             Path: {}\n\
             Line: {line}\n",
            path.display()
        );
        assert!(
            !fields[4].trim().is_empty(),
            "\n\nTABLE BUILD ERROR: Mutation row at line {line_num} has no resistant states\n\
             Path: {}\n\
             Line: {line}\n",
            path.display()
        );

        entries += 1;
    }

    assert!(
        entries > 0,
        "\n\nTABLE BUILD ERROR: Mutation catalog has no data rows\n\
         Path: {}\n",
        path.display()
    );

    entries
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the embedded tables change
    println!("cargo:rerun-if-changed=tables/drug_key.tsv");
    println!("cargo:rerun-if-changed=tables/point_mutations.tsv");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
