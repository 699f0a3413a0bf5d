//! Output formatters for zigmem command results.
//!
//! Provides three output modes:
//! - **Human** (default): formatted output for terminal users
//! - **JSON** (`--json`): machine-readable structured output
//! - **CI** (`--ci`): GitHub Actions workflow-command annotations

pub mod ci;
pub mod human;
pub mod json;

use zigmem_rules::types::{RegionReport, RunReport, ScopeReport};

pub trait OutputFormatter {
    fn format_run(&self, result: &RunReport) -> String;
    fn format_scopes(&self, result: &ScopeReport) -> String;
    fn format_regions(&self, result: &RegionReport) -> String;
}
