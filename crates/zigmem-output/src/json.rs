use crate::OutputFormatter;
use zigmem_rules::types::{RegionReport, RunReport, ScopeReport};

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_run(&self, result: &RunReport) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_scopes(&self, result: &ScopeReport) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
    fn format_regions(&self, result: &RegionReport) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
}
