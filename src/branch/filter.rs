//! Branch selection criteria

use regex::Regex;

use crate::error::{Error, Result};
use crate::github::Branch;

/// Chooses which listed branches a bulk operation targets.
#[derive(Debug, Clone)]
pub enum Selection {
    /// The branch whose name equals this literal.
    Exact(String),
    /// Every branch whose name matches this pattern (unanchored).
    Pattern(Regex),
}

impl Selection {
    /// Build a selection from the two mutually exclusive CLI inputs.
    ///
    /// Fails without touching the network when neither or both are given,
    /// or when the pattern does not compile. Empty strings count as absent.
    pub fn from_args(name: Option<&str>, pattern: Option<&str>) -> Result<Self> {
        let name = name.filter(|s| !s.is_empty());
        let pattern = pattern.filter(|s| !s.is_empty());

        match (name, pattern) {
            (None, None) => Err(Error::MissingSelection),
            (Some(_), Some(_)) => Err(Error::ConflictingSelection),
            (Some(name), None) => Ok(Selection::Exact(name.to_string())),
            (None, Some(pattern)) => Regex::new(pattern)
                .map(Selection::Pattern)
                .map_err(|source| Error::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }),
        }
    }

    pub fn matches(&self, branch_name: &str) -> bool {
        match self {
            Selection::Exact(name) => name == branch_name,
            Selection::Pattern(re) => re.is_match(branch_name),
        }
    }

    /// The subset of `branches` this selection targets, in listing order.
    pub fn apply(&self, branches: &[Branch]) -> Vec<Branch> {
        branches
            .iter()
            .filter(|b| self.matches(&b.name))
            .cloned()
            .collect()
    }

    /// Human-readable description for logs and output.
    pub fn describe(&self) -> String {
        match self {
            Selection::Exact(name) => format!("name '{name}'"),
            Selection::Pattern(re) => format!("pattern '{}'", re.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Branch> {
        ["main", "feature/x", "feature/y", "release/1.0", "hotfix/feature/z"]
            .iter()
            .enumerate()
            .map(|(i, n)| Branch::new(*n, format!("sha{i}")))
            .collect()
    }

    fn names(branches: &[Branch]) -> Vec<&str> {
        branches.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn test_neither_criterion_is_missing_selection() {
        assert!(matches!(
            Selection::from_args(None, None),
            Err(Error::MissingSelection)
        ));
        assert!(matches!(
            Selection::from_args(Some(""), Some("")),
            Err(Error::MissingSelection)
        ));
    }

    #[test]
    fn test_both_criteria_conflict() {
        assert!(matches!(
            Selection::from_args(Some("main"), Some("^f")),
            Err(Error::ConflictingSelection)
        ));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = Selection::from_args(None, Some("feature/(")).unwrap_err();
        assert!(err.is_config());
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "feature/("));
    }

    #[test]
    fn test_anchored_pattern_selects_prefix() {
        let selection = Selection::from_args(None, Some("^feature/")).unwrap();
        assert_eq!(names(&selection.apply(&sample())), vec!["feature/x", "feature/y"]);
    }

    #[test]
    fn test_unanchored_pattern_matches_anywhere() {
        let selection = Selection::from_args(None, Some("feature/")).unwrap();
        assert_eq!(
            names(&selection.apply(&sample())),
            vec!["feature/x", "feature/y", "hotfix/feature/z"]
        );
    }

    #[test]
    fn test_exact_selects_requested_name_only() {
        let selection = Selection::from_args(Some("feature/x"), None).unwrap();
        let picked = selection.apply(&sample());
        assert_eq!(names(&picked), vec!["feature/x"]);
        assert_eq!(picked[0].commit_sha, "sha1");
    }

    #[test]
    fn test_exact_is_literal_not_regex() {
        let selection = Selection::from_args(Some("release/1.0"), None).unwrap();
        assert!(selection.matches("release/1.0"));
        assert!(!selection.matches("release/1x0"));
    }
}
