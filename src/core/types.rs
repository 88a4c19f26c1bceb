use serde::{Deserialize, Serialize};

/// Identifier for an input genome.
///
/// Treated as an opaque string end to end. Ids that happen to look numeric
/// (e.g. `"12345"`) are never parsed or coerced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenomeId(pub String);

impl GenomeId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for GenomeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which reference database a hit was aligned against.
///
/// The kind selects the default identity/coverage thresholds and decides
/// whether the mutation resolver applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseKind {
    /// Acquired resistance genes (ResFinder-style).
    Resfinder,
    /// Chromosomal point-mutation loci (PointFinder-style).
    Pointfinder,
}

impl DatabaseKind {
    #[must_use]
    pub fn is_point_mutation(self) -> bool {
        matches!(self, Self::Pointfinder)
    }
}

impl std::fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resfinder => write!(f, "resfinder"),
            Self::Pointfinder => write!(f, "pointfinder"),
        }
    }
}

/// Strand of the contig region a reference sequence aligned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    Plus,
    Minus,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
        }
    }
}

/// What kind of evidence a resistance call asserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    /// An acquired resistance gene is present.
    Gene,
    /// A cataloged resistance-conferring point mutation.
    KnownMutation,
    /// A substitution that differs from wild-type but is not cataloged.
    /// Reported for visibility, excluded from phenotype prediction.
    NovelMutation,
}

impl CallType {
    /// Whether calls of this type participate in phenotype prediction.
    #[must_use]
    pub fn predicts_phenotype(self) -> bool {
        !matches!(self, Self::NovelMutation)
    }
}

impl std::fmt::Display for CallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gene => write!(f, "gene"),
            Self::KnownMutation => write!(f, "known mutation"),
            Self::NovelMutation => write!(f, "novel mutation"),
        }
    }
}
