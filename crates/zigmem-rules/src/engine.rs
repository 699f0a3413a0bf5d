use std::path::Path;

use zigmem_analysis::classifier::ContextClassifier;
use zigmem_analysis::tracker::{ScopeTracker, TrackerConfig};
use zigmem_core::config::ZigmemConfig;
use zigmem_core::types::AnalysisError;

use crate::compliance;
use crate::memory;
use crate::suppress::SuppressionManager;
use crate::types::{FileReport, Issue};

/// Orchestrates one analysis pass per file: classifier, tracker, rule sets,
/// suppression, and severity partitioning.
pub struct AnalysisEngine {
    config: ZigmemConfig,
    suppressions: SuppressionManager,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self::with_config(ZigmemConfig::default())
    }

    pub fn with_config(config: ZigmemConfig) -> Self {
        Self {
            config,
            suppressions: SuppressionManager::new(),
        }
    }

    pub fn config(&self) -> &ZigmemConfig {
        &self.config
    }

    /// Suppress a specific issue code for this engine's lifetime.
    pub fn suppress(&mut self, code: &str) {
        self.suppressions.suppress(code);
    }

    /// Read and analyze one file. IO failure is the only error; analysis
    /// itself always produces a report.
    pub fn analyze_file(&self, path: &Path) -> Result<FileReport, AnalysisError> {
        let display = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|e| AnalysisError::Io {
            path: display.clone(),
            source: e,
        })?;
        Ok(self.analyze_source(&display, &source))
    }

    /// Analyze source text under a display name.
    pub fn analyze_source(&self, file: &str, source: &str) -> FileReport {
        let classifier = ContextClassifier::analyze_source(source);
        let mut tracker = ScopeTracker::new(TrackerConfig::from_settings(&self.config.tracker));
        tracker.analyze(source);

        let mut issues: Vec<Issue> = Vec::new();
        if self.config.rules.memory {
            issues.extend(memory::check_missing_cleanup(file, &tracker));
            issues.extend(memory::check_missing_errdefer(file, source, &tracker));
            issues.extend(memory::check_arena_leaks(file, &tracker));
            issues.extend(memory::check_untracked_allocations(
                file,
                source,
                &tracker,
                &classifier,
            ));
        }
        if self.config.rules.test_compliance {
            issues.extend(compliance::check_test_cleanup(file, &tracker));
            issues.extend(compliance::check_test_allocator(
                file,
                source,
                &tracker,
                &classifier,
            ));
        }

        let mut issues: Vec<Issue> = issues
            .into_iter()
            .map(|i| self.suppressions.apply(i))
            .collect();
        issues.sort_by(|a, b| {
            (a.line, a.column, a.code.as_str()).cmp(&(b.line, b.column, b.code.as_str()))
        });

        let mut report = FileReport {
            file: file.to_string(),
            errors: vec![],
            warnings: vec![],
            notes: vec![],
        };
        for issue in issues {
            match issue.severity.as_str() {
                "ERROR" => report.errors.push(issue),
                "WARNING" => report.warnings.push(issue),
                _ => report.notes.push(issue),
            }
        }
        report
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
