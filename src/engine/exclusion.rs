//! Gene exclusion: suppress hits on genes known to be false positives.

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::hit::Hit;
use crate::engine::ConfigError;
use crate::parsing::genes::parse_gene_list;

/// Genes excluded by default.
///
/// `aac(6')-Iaa` is a conserved chromosomal gene in Salmonella that aligns
/// at high identity without conferring clinical aminoglycoside resistance.
pub const DEFAULT_EXCLUDED_GENES: &[&str] = &["aac(6')-Iaa"];

/// Which exclusion list applies to a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionPolicy {
    /// The built-in default list
    BuiltIn,
    /// A replacement list loaded from a file, one gene name per line
    File(PathBuf),
    /// No exclusion at all
    Disabled,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::BuiltIn
    }
}

/// The materialized set of excluded gene names.
///
/// Matching is exact and case-sensitive against `Hit::reference_name`.
#[derive(Debug, Clone, Serialize)]
pub struct ExclusionList {
    names: HashSet<String>,
    /// Where the list came from, for settings output
    source: String,
}

impl ExclusionList {
    /// The built-in default list
    #[must_use]
    pub fn built_in() -> Self {
        Self {
            names: DEFAULT_EXCLUDED_GENES.iter().map(|s| (*s).to_string()).collect(),
            source: "built-in".to_string(),
        }
    }

    /// An empty list (exclusion disabled)
    #[must_use]
    pub fn none() -> Self {
        Self {
            names: HashSet::new(),
            source: "disabled".to_string(),
        }
    }

    /// A list from explicit names (library callers and tests)
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            source: "custom".to_string(),
        }
    }

    /// Load a replacement list from a file, one name per line.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ExclusionUnreadable` if the file cannot be read,
    /// or `ConfigError::ExclusionInvalid` for malformed lines or a list with
    /// no entries. Both abort the run before any genome is processed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let names = parse_gene_list(path).map_err(|e| match e {
            crate::parsing::ParseError::Io(source) => ConfigError::ExclusionUnreadable {
                path: path.to_path_buf(),
                source,
            },
            other => ConfigError::ExclusionInvalid {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        })?;

        if names.is_empty() {
            return Err(ConfigError::ExclusionInvalid {
                path: path.to_path_buf(),
                message: "contains no gene names".to_string(),
            });
        }

        Ok(Self {
            names: names.into_iter().collect(),
            source: path.display().to_string(),
        })
    }

    /// Materialize the list a policy describes.
    ///
    /// # Errors
    ///
    /// Propagates the file errors of [`ExclusionList::from_file`].
    pub fn from_policy(policy: &ExclusionPolicy) -> Result<Self, ConfigError> {
        match policy {
            ExclusionPolicy::BuiltIn => Ok(Self::built_in()),
            ExclusionPolicy::File(path) => Self::from_file(path),
            ExclusionPolicy::Disabled => Ok(Self::none()),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The excluded names, sorted for stable output
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Where the list came from, for settings output
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Drop hits whose reference name is excluded. Order-preserving.
pub fn apply<'h>(hits: Vec<&'h Hit>, list: &ExclusionList) -> (Vec<&'h Hit>, usize) {
    if list.is_empty() {
        return (hits, 0);
    }

    let before = hits.len();
    let kept: Vec<&Hit> = hits
        .into_iter()
        .filter(|hit| {
            let excluded = list.contains(&hit.reference_name);
            if excluded {
                debug!(
                    "excluding {} on {} (list: {})",
                    hit.reference_name,
                    hit.contig_id,
                    list.source()
                );
            }
            !excluded
        })
        .collect();

    let excluded = before - kept.len();
    (kept, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DatabaseKind, GenomeId, Strand};

    fn hit(name: &str) -> Hit {
        Hit {
            genome_id: GenomeId::new("g1"),
            database: DatabaseKind::Resfinder,
            reference_name: name.to_string(),
            accession: name.to_string(),
            contig_id: "contig1".to_string(),
            contig_start: 1,
            contig_end: 1000,
            percent_identity: 100.0,
            percent_coverage: 100.0,
            strand: Strand::Plus,
            ref_start: 1,
            ref_end: 1000,
            ref_length: 1000,
            aligned_ref: None,
            aligned_contig: None,
        }
    }

    #[test]
    fn test_built_in_list() {
        let list = ExclusionList::built_in();
        assert!(list.contains("aac(6')-Iaa"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_disabled_list_keeps_everything() {
        let hits = vec![hit("aac(6')-Iaa"), hit("blaTEM-1B")];
        let refs: Vec<&Hit> = hits.iter().collect();
        let (kept, excluded) = apply(refs, &ExclusionList::none());
        assert_eq!(kept.len(), 2);
        assert_eq!(excluded, 0);
    }

    #[test]
    fn test_default_list_drops_false_positive_gene() {
        let hits = vec![hit("aac(6')-Iaa"), hit("blaTEM-1B")];
        let refs: Vec<&Hit> = hits.iter().collect();
        let (kept, excluded) = apply(refs, &ExclusionList::built_in());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].reference_name, "blaTEM-1B");
        assert_eq!(excluded, 1);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let hits = vec![hit("AAC(6')-IAA")];
        let refs: Vec<&Hit> = hits.iter().collect();
        let (kept, excluded) = apply(refs, &ExclusionList::built_in());
        assert_eq!(kept.len(), 1);
        assert_eq!(excluded, 0);
    }

    #[test]
    fn test_from_names() {
        let list = ExclusionList::from_names(["tet(A)", "sul1"]);
        assert!(list.contains("tet(A)"));
        assert!(list.contains("sul1"));
        assert!(!list.contains("aac(6')-Iaa"));
    }

    #[test]
    fn test_from_policy_disabled() {
        let list = ExclusionList::from_policy(&ExclusionPolicy::Disabled).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_from_file_missing_is_config_error() {
        let result = ExclusionList::from_file(Path::new("/nonexistent/genes.txt"));
        assert!(matches!(
            result,
            Err(ConfigError::ExclusionUnreadable { .. })
        ));
    }
}
