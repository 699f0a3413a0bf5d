use serde::{Deserialize, Serialize};

use zigmem_core::types::{ContextRegion, Scope};

/// A single finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub code: String,
    pub severity: String, // "ERROR" | "WARNING" | "INFO"
    pub category: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub fingerprint: String,
    pub fix_hint: Option<String>,
    pub suppressed: bool,
    pub suppress_hint: Option<String>,
}

/// Findings for one analyzed file, partitioned by severity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub notes: Vec<Issue>,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.notes.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.notes.len()
    }
}

/// The result of one `zigmem check` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub version: String,
    pub command: String,
    pub status: String, // "ok" | "error" | "warning"
    pub files_analyzed: Vec<String>,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub notes: Vec<Issue>,
}

impl RunReport {
    /// Merge per-file reports (already in file order) into one run result.
    pub fn from_files(reports: Vec<FileReport>) -> Self {
        let mut files_analyzed = Vec::with_capacity(reports.len());
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut notes = Vec::new();
        for report in reports {
            files_analyzed.push(report.file);
            errors.extend(report.errors);
            warnings.extend(report.warnings);
            notes.extend(report.notes);
        }
        let status = if !errors.is_empty() {
            "error"
        } else if !warnings.is_empty() {
            "warning"
        } else {
            "ok"
        };
        Self {
            version: "0.2.0".to_string(),
            command: "check".to_string(),
            status: status.to_string(),
            files_analyzed,
            errors,
            warnings,
            notes,
        }
    }
}

/// Scope-forest dump for `zigmem scopes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeReport {
    pub version: String,
    pub command: String,
    pub file: String,
    pub scopes: Vec<Scope>,
}

/// Context-region dump for `zigmem regions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionReport {
    pub version: String,
    pub command: String,
    pub file: String,
    pub regions: Vec<ContextRegion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(code: &str, severity: &str) -> Issue {
        Issue {
            code: code.to_string(),
            severity: severity.to_string(),
            category: "test".to_string(),
            message: "m".to_string(),
            file: "a.zig".to_string(),
            line: 1,
            column: 0,
            fingerprint: "f".to_string(),
            fix_hint: None,
            suppressed: false,
            suppress_hint: None,
        }
    }

    #[test]
    fn test_run_status_reflects_worst_severity() {
        let clean = RunReport::from_files(vec![FileReport {
            file: "a.zig".to_string(),
            errors: vec![],
            warnings: vec![],
            notes: vec![],
        }]);
        assert_eq!(clean.status, "ok");

        let warn = RunReport::from_files(vec![FileReport {
            file: "a.zig".to_string(),
            errors: vec![],
            warnings: vec![issue("M003", "WARNING")],
            notes: vec![],
        }]);
        assert_eq!(warn.status, "warning");

        let err = RunReport::from_files(vec![FileReport {
            file: "a.zig".to_string(),
            errors: vec![issue("M001", "ERROR")],
            warnings: vec![issue("M003", "WARNING")],
            notes: vec![],
        }]);
        assert_eq!(err.status, "error");
        assert_eq!(err.files_analyzed, vec!["a.zig".to_string()]);
    }
}
