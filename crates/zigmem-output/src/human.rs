use crate::OutputFormatter;
use zigmem_rules::types::{Issue, RegionReport, RunReport, ScopeReport};

pub struct HumanFormatter;

fn format_issue(issue: &Issue) -> String {
    let mut out = format!(
        "{}[{}]: {}\n  --> {}:{}:{}\n",
        issue.severity.to_lowercase(),
        issue.code,
        issue.message,
        issue.file,
        issue.line,
        issue.column,
    );
    if let Some(hint) = &issue.fix_hint {
        out.push_str(&format!("  hint: {}\n", hint));
    }
    if let Some(hint) = &issue.suppress_hint {
        out.push_str(&format!("  note: {}\n", hint));
    }
    out
}

impl OutputFormatter for HumanFormatter {
    fn format_run(&self, result: &RunReport) -> String {
        if result.errors.is_empty() && result.warnings.is_empty() && result.notes.is_empty() {
            return String::new(); // Clean run = empty stdout
        }

        let mut out = String::new();
        for issue in &result.errors {
            out.push_str(&format_issue(issue));
        }
        for issue in &result.warnings {
            out.push_str(&format_issue(issue));
        }
        for issue in &result.notes {
            out.push_str(&format_issue(issue));
        }

        out.push_str(&format!(
            "\n{} error(s), {} warning(s) in {} file(s)\n",
            result.errors.len(),
            result.warnings.len(),
            result.files_analyzed.len(),
        ));

        out
    }

    fn format_scopes(&self, result: &ScopeReport) -> String {
        let mut out = format!("Scopes in {} ({} total)\n", result.file, result.scopes.len());
        for scope in &result.scopes {
            let indent = "  ".repeat(scope.depth as usize + 1);
            let end = match scope.end_line {
                Some(zigmem_core::types::UNTERMINATED) => "?".to_string(),
                Some(e) => e.to_string(),
                None => "?".to_string(),
            };
            out.push_str(&format!(
                "{}{} `{}` lines {}-{}\n",
                indent, scope.kind, scope.name, scope.start_line, end,
            ));
            for var in scope.variables.values() {
                let mut flags = Vec::new();
                if let Some(kind) = var.allocation_kind {
                    flags.push(format!("alloc:{}", kind));
                }
                if var.has_defer_cleanup {
                    flags.push("defer".to_string());
                }
                if var.has_errdefer_cleanup {
                    flags.push("errdefer".to_string());
                }
                if var.is_ownership_transfer {
                    flags.push("ownership".to_string());
                }
                if var.is_arena_derived {
                    flags.push("arena".to_string());
                }
                let flags = if flags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", flags.join(", "))
                };
                out.push_str(&format!(
                    "{}  var `{}` line {}{}\n",
                    indent, var.name, var.declared_line, flags,
                ));
            }
        }
        out
    }

    fn format_regions(&self, result: &RegionReport) -> String {
        let mut out = format!(
            "Context regions in {} ({} total)\n",
            result.file,
            result.regions.len()
        );
        for region in &result.regions {
            let end_col = if region.end_col == zigmem_core::types::UNTERMINATED {
                "?".to_string()
            } else {
                region.end_col.to_string()
            };
            out.push_str(&format!(
                "  {}:{} .. {}:{} {}\n",
                region.start_line, region.start_col, region.end_line, end_col, region.kind,
            ));
        }
        out
    }
}
