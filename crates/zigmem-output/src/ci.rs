use crate::OutputFormatter;
use zigmem_rules::types::{Issue, RegionReport, RunReport, ScopeReport};

/// Emits GitHub Actions workflow commands so findings surface as inline
/// annotations on pull requests.
pub struct CiFormatter;

/// Workflow-command messages terminate at a newline; escape the characters
/// the runner treats specially.
fn escape_message(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn annotation(level: &str, issue: &Issue) -> String {
    format!(
        "::{} file={},line={},col={},title={}::{}\n",
        level,
        issue.file,
        issue.line,
        issue.column,
        issue.code,
        escape_message(&issue.message),
    )
}

impl OutputFormatter for CiFormatter {
    fn format_run(&self, result: &RunReport) -> String {
        let mut out = String::new();
        for issue in &result.errors {
            out.push_str(&annotation("error", issue));
        }
        for issue in &result.warnings {
            out.push_str(&annotation("warning", issue));
        }
        for issue in &result.notes {
            out.push_str(&annotation("notice", issue));
        }
        out
    }

    // The dump commands are local debugging aids; CI mode falls back to
    // their JSON forms.
    fn format_scopes(&self, result: &ScopeReport) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }

    fn format_regions(&self, result: &RegionReport) -> String {
        serde_json::to_string_pretty(result).unwrap_or_default()
    }
}
