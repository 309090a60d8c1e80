//! Canonical/duplicate file parity gate
//!
//! Each declared pair has a canonical file (source of truth) and a duplicate
//! that is expected to be gone. A pair is:
//! - `ok` when the duplicate is absent
//! - `violation` when the duplicate exists, diverging or not
//! - `error` when the canonical file is missing

mod diff;
mod report;

pub use diff::{line_diff, unified_diff, LineDifference};
pub use report::render_report;

use crate::repo::{ParityPairConfig, Workspace};
use serde::Serialize;

/// Number of differing lines kept in a result
pub const MAX_REPORTED_DIFFERENCES: usize = 5;

/// State of one parity pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParityStatus {
    Ok,
    Violation,
    Error,
}

impl std::fmt::Display for ParityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParityStatus::Ok => write!(f, "ok"),
            ParityStatus::Violation => write!(f, "violation"),
            ParityStatus::Error => write!(f, "error"),
        }
    }
}

/// Verification result for one pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParityResult {
    pub name: String,
    pub canonical: String,
    pub duplicate: String,
    pub canonical_exists: bool,
    pub duplicate_exists: bool,
    pub status: ParityStatus,
    pub issues: Vec<String>,
    /// Total number of differing line positions
    pub difference_count: usize,
    /// The first [`MAX_REPORTED_DIFFERENCES`] differing lines
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<LineDifference>,
    /// Full unified diff, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified: Option<String>,
}

/// Aggregate result of the parity gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParityReport {
    /// True only when every pair is `ok`
    pub success: bool,
    pub results: Vec<ParityResult>,
}

/// Checks the configured parity pairs of a workspace
pub struct ParityVerifier<'a> {
    workspace: &'a Workspace,
    unified: bool,
}

impl<'a> ParityVerifier<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self {
            workspace,
            unified: false,
        }
    }

    /// Also compute a full unified diff for diverging pairs
    pub fn with_unified(mut self, unified: bool) -> Self {
        self.unified = unified;
        self
    }

    /// Verify every configured pair
    pub fn verify(&self) -> ParityReport {
        self.verify_pairs(&self.workspace.config().parity)
    }

    /// Verify an explicit list of pairs
    pub fn verify_pairs(&self, pairs: &[ParityPairConfig]) -> ParityReport {
        let results: Vec<ParityResult> = pairs.iter().map(|pair| self.verify_pair(pair)).collect();
        let success = results.iter().all(|r| r.status == ParityStatus::Ok);

        ParityReport { success, results }
    }

    /// Verify a single pair
    pub fn verify_pair(&self, pair: &ParityPairConfig) -> ParityResult {
        let canonical_path = self.workspace.resolve(&pair.canonical);
        let duplicate_path = self.workspace.resolve(&pair.duplicate);
        let canonical_exists = canonical_path.exists();
        let duplicate_exists = duplicate_path.exists();

        let mut result = ParityResult {
            name: pair.name.clone(),
            canonical: pair.canonical.clone(),
            duplicate: pair.duplicate.clone(),
            canonical_exists,
            duplicate_exists,
            status: ParityStatus::Ok,
            issues: Vec::new(),
            difference_count: 0,
            differences: Vec::new(),
            unified: None,
        };

        if !canonical_exists {
            result.status = ParityStatus::Error;
            result.issues.push("Canonical file missing".to_string());
            return result;
        }

        if !duplicate_exists {
            return result;
        }

        result.status = ParityStatus::Violation;
        result
            .issues
            .push("Duplicate exists (should be removed)".to_string());

        let canonical = std::fs::read_to_string(&canonical_path);
        let duplicate = std::fs::read_to_string(&duplicate_path);
        let (canonical, duplicate) = match (canonical, duplicate) {
            (Ok(c), Ok(d)) => (c, d),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Cannot compare {}: {}", pair.name, e);
                return result;
            }
        };

        if canonical != duplicate {
            let differences = line_diff(&canonical, &duplicate);
            result
                .issues
                .push(format!("Content differs ({} lines)", differences.len()));
            result.difference_count = differences.len();
            result.differences = differences
                .into_iter()
                .take(MAX_REPORTED_DIFFERENCES)
                .collect();

            if self.unified {
                result.unified = Some(unified_diff(
                    &canonical,
                    &duplicate,
                    &pair.canonical,
                    &pair.duplicate,
                ));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn pair() -> ParityPairConfig {
        ParityPairConfig {
            name: "agents.yaml".to_string(),
            canonical: "cfg/agents.yaml".to_string(),
            duplicate: "cfg/fusion/agents.yaml".to_string(),
        }
    }

    #[test]
    fn test_duplicate_absent_is_ok() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "cfg/agents.yaml", "a: 1\n");
        let ws = Workspace::at(dir.path()).unwrap();

        let result = ParityVerifier::new(&ws).verify_pair(&pair());
        assert_eq!(result.status, ParityStatus::Ok);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_identical_duplicate_is_violation_without_differences() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "cfg/agents.yaml", "a: 1\n");
        create_file(dir.path(), "cfg/fusion/agents.yaml", "a: 1\n");
        let ws = Workspace::at(dir.path()).unwrap();

        let result = ParityVerifier::new(&ws).verify_pair(&pair());
        assert_eq!(result.status, ParityStatus::Violation);
        assert_eq!(result.difference_count, 0);
        assert!(result.differences.is_empty());
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn test_missing_canonical_is_error_regardless_of_duplicate() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::at(dir.path()).unwrap();
        assert_eq!(
            ParityVerifier::new(&ws).verify_pair(&pair()).status,
            ParityStatus::Error
        );

        create_file(dir.path(), "cfg/fusion/agents.yaml", "a: 1\n");
        let result = ParityVerifier::new(&ws).verify_pair(&pair());
        assert_eq!(result.status, ParityStatus::Error);
        assert_eq!(result.issues, vec!["Canonical file missing"]);
    }

    #[test]
    fn test_diverging_duplicate_reports_bounded_diff() {
        let dir = TempDir::new().unwrap();
        let canonical: Vec<String> = (1..=10).map(|i| format!("key{}: {}", i, i)).collect();
        let duplicate: Vec<String> = (1..=10).map(|i| format!("key{}: changed", i)).collect();
        create_file(dir.path(), "cfg/agents.yaml", &canonical.join("\n"));
        create_file(dir.path(), "cfg/fusion/agents.yaml", &duplicate.join("\n"));
        let ws = Workspace::at(dir.path()).unwrap();

        let result = ParityVerifier::new(&ws).with_unified(true).verify_pair(&pair());
        assert_eq!(result.status, ParityStatus::Violation);
        assert_eq!(result.difference_count, 10);
        assert_eq!(result.differences.len(), MAX_REPORTED_DIFFERENCES);
        assert!(result.issues.contains(&"Content differs (10 lines)".to_string()));
        assert!(result.unified.is_some());
    }

    #[test]
    fn test_report_success_requires_all_ok() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "cfg/agents.yaml", "a: 1\n");
        let ws = Workspace::at(dir.path()).unwrap();
        let verifier = ParityVerifier::new(&ws);

        assert!(verifier.verify_pairs(&[pair()]).success);

        let mut broken = pair();
        broken.canonical = "cfg/missing.yaml".to_string();
        let report = verifier.verify_pairs(&[pair(), broken]);
        assert!(!report.success);
        assert_eq!(report.results.len(), 2);
    }
}
