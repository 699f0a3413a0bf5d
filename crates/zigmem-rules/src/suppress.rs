use std::collections::HashSet;

use crate::types::Issue;

/// Manages suppressed issue codes.
///
/// When a code is suppressed, issues with that code are:
/// - Changed to severity "INFO" and marked suppressed=true
/// - Code changed to "S001"
/// - Given a suppress_hint explaining the suppression
#[derive(Debug, Default)]
pub struct SuppressionManager {
    suppressed_codes: HashSet<String>,
}

impl SuppressionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code to suppress (e.g., "M002", "T001").
    pub fn suppress(&mut self, code: &str) {
        self.suppressed_codes.insert(code.to_string());
    }

    pub fn is_suppressed(&self, code: &str) -> bool {
        self.suppressed_codes.contains(code)
    }

    /// Apply suppression to an issue, returning the modified issue.
    /// If the code is not suppressed, returns the issue unchanged.
    pub fn apply(&self, mut issue: Issue) -> Issue {
        if self.is_suppressed(&issue.code) {
            issue.suppress_hint = Some(format!(
                "Suppressed {} via --suppress flag",
                issue.code
            ));
            issue.suppressed = true;
            issue.code = "S001".to_string();
            issue.severity = "INFO".to_string();
        }
        issue
    }

    pub fn count(&self) -> usize {
        self.suppressed_codes.len()
    }
}
