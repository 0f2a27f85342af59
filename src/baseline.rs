//! Baseline Codec (B1, §6.4).
//!
//! A kept-at-contract-level collaborator: serializes/deserializes the
//! baseline protocol and filters a current issue list against a loaded
//! baseline by hash. No file-locking or atomic rename; that's a caller
//! concern, same split as the rest of this crate's persistence helpers.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Issue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineIssue {
    pub hash: String,
    pub kind: String,
    pub name: String,
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    pub version: u32,
    pub timestamp: String,
    pub project_root: String,
    pub total_issues: usize,
    pub issues_by_kind: HashMap<String, usize>,
    pub issues: Vec<BaselineIssue>,
}

const BASELINE_VERSION: u32 = 1;

impl Baseline {
    /// Build a baseline snapshot of `issues`, hashed relative to
    /// `project_root` (§3.6, §6.4). `timestamp` is supplied by the caller
    /// since this module never reads the clock itself.
    pub fn create(project_root: &Path, issues: &[Issue], timestamp: impl Into<String>) -> Self {
        let mut issues_by_kind: HashMap<String, usize> = HashMap::new();
        let mut baseline_issues = Vec::with_capacity(issues.len());

        for issue in issues {
            *issues_by_kind.entry(issue.kind.as_str().to_string()).or_default() += 1;
            let relative = issue.file.strip_prefix(project_root).unwrap_or(&issue.file);
            baseline_issues.push(BaselineIssue {
                hash: issue.stable_hash(project_root),
                kind: issue.kind.as_str().to_string(),
                name: issue.name.clone(),
                file: relative.to_string_lossy().to_string(),
                line: issue.line,
                parent: issue.parent.clone(),
            });
        }

        Self {
            version: BASELINE_VERSION,
            timestamp: timestamp.into(),
            project_root: project_root.to_string_lossy().to_string(),
            total_issues: issues.len(),
            issues_by_kind,
            issues: baseline_issues,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    fn hash_set(&self) -> std::collections::HashSet<&str> {
        self.issues.iter().map(|i| i.hash.as_str()).collect()
    }

    /// Filter `issues`, keeping only those whose hash is absent from this
    /// baseline (§6.4, invariant 5 in §8.1: re-baselining the result yields
    /// the empty list).
    pub fn filter_new<'a>(&self, project_root: &Path, issues: &'a [Issue]) -> Vec<&'a Issue> {
        let known = self.hash_set();
        issues.iter().filter(|issue| !known.contains(issue.stable_hash(project_root).as_str())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, IssueKind, SymbolKind};
    use std::path::PathBuf;

    fn mock_issue(name: &str) -> Issue {
        Issue {
            kind: IssueKind::UnusedExport,
            confidence: Confidence::High,
            name: name.to_string(),
            symbol_kind: Some(SymbolKind::Function),
            file: PathBuf::from("/p/src/util.ts"),
            line: 10,
            column: 1,
            message: "unused".to_string(),
            parent: None,
            context: None,
        }
    }

    #[test]
    fn baseline_idempotence_filters_out_every_known_issue() {
        let root = Path::new("/p");
        let issues = vec![mock_issue("a"), mock_issue("b")];
        let baseline = Baseline::create(root, &issues, "2026-01-01T00:00:00Z");
        let remaining = baseline.filter_new(root, &issues);
        assert!(remaining.is_empty());
    }

    #[test]
    fn new_issue_not_in_baseline_survives_filtering() {
        let root = Path::new("/p");
        let baseline = Baseline::create(root, &[mock_issue("a")], "2026-01-01T00:00:00Z");
        let current = vec![mock_issue("a"), mock_issue("c")];
        let remaining = baseline.filter_new(root, &current);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "c");
    }

    #[test]
    fn round_trips_through_json() {
        let root = Path::new("/p");
        let baseline = Baseline::create(root, &[mock_issue("a")], "2026-01-01T00:00:00Z");
        let json = baseline.to_json().unwrap();
        let parsed = Baseline::from_json(&json).unwrap();
        assert_eq!(parsed.total_issues, 1);
        assert_eq!(parsed.issues[0].name, "a");
    }
}
