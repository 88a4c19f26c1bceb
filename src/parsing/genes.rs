//! Parser for plain-text gene lists, used for custom exclusion lists.

use std::path::Path;

use crate::parsing::ParseError;
use crate::utils::validation::is_valid_gene_name;

/// Parse a gene list file: one name per line.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` for a line that is not a single gene name.
pub fn parse_gene_list(path: &Path) -> Result<Vec<String>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_gene_list_text(&content)
}

/// Parse gene-list text. Blank lines and `#` comments are skipped; a line
/// with internal whitespace is rejected rather than silently split.
///
/// An empty list parses successfully; whether that is acceptable is the
/// caller's call.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` naming the offending 1-based line.
pub fn parse_gene_list_text(text: &str) -> Result<Vec<String>, ParseError> {
    let mut names = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !is_valid_gene_name(line) {
            return Err(ParseError::InvalidFormat(format!(
                "Line {} is not a single gene name: '{}'",
                i + 1,
                line
            )));
        }

        names.push(line.to_string());
    }

    Ok(names)
}
