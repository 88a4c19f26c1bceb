//! Centralized validation and helper functions.

/// Maximum number of hits accepted from a single table (runaway-input guard)
pub const MAX_HITS: usize = 1_000_000;

/// Validate that a value is usable as a percent threshold.
///
/// # Examples
///
/// ```
/// use amr_caller::utils::validation::is_valid_percent;
///
/// assert!(is_valid_percent(98.0));
/// assert!(is_valid_percent(0.0));
/// assert!(!is_valid_percent(100.1));
/// assert!(!is_valid_percent(f64::NAN));
/// ```
#[must_use]
pub fn is_valid_percent(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

/// Validate a single gene name, as read from an exclusion list.
///
/// Gene names never contain whitespace; a line with internal whitespace is a
/// malformed list, not a name.
///
/// # Examples
///
/// ```
/// use amr_caller::utils::validation::is_valid_gene_name;
///
/// assert!(is_valid_gene_name("aac(6')-Iaa"));
/// assert!(!is_valid_gene_name("two genes"));
/// assert!(!is_valid_gene_name(""));
/// ```
#[must_use]
pub fn is_valid_gene_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

/// Check if adding another hit would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new hit.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_hit_limit(count: usize) -> Option<String> {
    if count >= MAX_HITS {
        Some(format!(
            "Too many hits: adding another would exceed maximum of {MAX_HITS}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_percent() {
        assert!(is_valid_percent(0.0));
        assert!(is_valid_percent(100.0));
        assert!(is_valid_percent(98.65));
        assert!(!is_valid_percent(-0.1));
        assert!(!is_valid_percent(100.1));
        assert!(!is_valid_percent(f64::NAN));
        assert!(!is_valid_percent(f64::INFINITY));
    }

    #[test]
    fn test_is_valid_gene_name() {
        assert!(is_valid_gene_name("blaTEM-1B"));
        assert!(is_valid_gene_name("aac(6')-Iaa"));
        assert!(is_valid_gene_name("tet(A)"));
        assert!(!is_valid_gene_name(""));
        assert!(!is_valid_gene_name("two genes"));
        assert!(!is_valid_gene_name("tab\tseparated"));
    }

    #[test]
    fn test_check_hit_limit() {
        assert!(check_hit_limit(100).is_none());
        assert!(check_hit_limit(MAX_HITS - 1).is_none());
        assert!(check_hit_limit(MAX_HITS).is_some());
        assert!(check_hit_limit(MAX_HITS + 1).is_some());
    }
}
