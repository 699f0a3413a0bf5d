use zigmem_analysis::classifier::ContextClassifier;
use zigmem_analysis::patterns::find_allocation;
use zigmem_analysis::tracker::ScopeTracker;
use zigmem_core::fingerprint::issue_fingerprint;
use zigmem_core::types::{AllocationKind, Scope, ScopeKind, VariableInfo};

use crate::types::Issue;

/// Whether scope `idx` is a test function or nested inside one. Test-local
/// allocations are the compliance rules' concern, not the memory rules'.
pub(crate) fn in_test_scope(scopes: &[Scope], idx: usize) -> bool {
    let mut cur = Some(idx);
    while let Some(i) = cur {
        if scopes[i].kind == ScopeKind::TestFunction {
            return true;
        }
        cur = scopes[i].parent;
    }
    false
}

fn issue(
    code: &str,
    severity: &str,
    category: &str,
    message: String,
    file: &str,
    line: u32,
    column: u32,
    target: &str,
    fix_hint: Option<String>,
) -> Issue {
    Issue {
        code: code.to_string(),
        severity: severity.to_string(),
        category: category.to_string(),
        message,
        file: file.to_string(),
        line,
        column,
        fingerprint: issue_fingerprint(code, file, line, target),
        fix_hint,
        suppressed: false,
        suppress_hint: None,
    }
}

fn release_hint(var: &VariableInfo) -> String {
    let allocator = var.allocator_source.as_deref().unwrap_or("allocator");
    match var.allocation_kind {
        Some(AllocationKind::Create) => format!("defer {}.destroy({})", allocator, var.name),
        Some(AllocationKind::CollectionInit) => format!("defer {}.deinit()", var.name),
        _ => format!("defer {}.free({})", allocator, var.name),
    }
}

/// Check M001: missing_cleanup — an allocation with neither scope-exit nor
/// error-path cleanup. Ownership transfers and arena-backed allocations are
/// exempt by policy: their lifetime ends elsewhere.
pub fn check_missing_cleanup(file: &str, tracker: &ScopeTracker) -> Vec<Issue> {
    let mut issues = Vec::new();
    let scopes = tracker.scopes();

    for (idx, scope) in scopes.iter().enumerate() {
        if in_test_scope(scopes, idx) {
            continue;
        }
        for var in scope.variables.values() {
            if var.allocation_kind.is_none() {
                continue;
            }
            if var.is_ownership_transfer || var.is_arena_derived {
                continue;
            }
            if var.has_any_cleanup() {
                continue;
            }
            issues.push(issue(
                "M001",
                "ERROR",
                "missing_cleanup",
                format!(
                    "Allocation `{}` is never released in `{}`",
                    var.name, scope.name
                ),
                file,
                var.declared_line,
                var.declared_col,
                &var.name,
                Some(format!("Add `{}` after the allocation", release_hint(var))),
            ));
        }
    }

    issues
}

/// Check M002: missing_errdefer — a fallible allocation handed back to the
/// caller with no error-path release. If the function fails after the
/// allocation, nobody owns the memory.
pub fn check_missing_errdefer(file: &str, source: &str, tracker: &ScopeTracker) -> Vec<Issue> {
    let mut issues = Vec::new();
    let lines: Vec<&str> = source.lines().collect();
    let scopes = tracker.scopes();

    for (idx, scope) in scopes.iter().enumerate() {
        if in_test_scope(scopes, idx) {
            continue;
        }
        for var in scope.variables.values() {
            if var.allocation_kind.is_none() || !var.is_ownership_transfer {
                continue;
            }
            if var.has_errdefer_cleanup {
                continue;
            }
            let declared = lines
                .get(var.declared_line as usize - 1)
                .copied()
                .unwrap_or("");
            if !declared.contains("try ") {
                continue;
            }
            issues.push(issue(
                "M002",
                "WARNING",
                "missing_errdefer",
                format!(
                    "Fallible allocation `{}` escapes `{}` with no errdefer",
                    var.name, scope.name
                ),
                file,
                var.declared_line,
                var.declared_col,
                &var.name,
                Some(format!(
                    "Add `err{}` so the error path releases it",
                    release_hint(var)
                )),
            ));
        }
    }

    issues
}

/// Check M003: arena_never_freed — an arena root whose variable has no
/// cleanup recorded. Arena contents don't need per-allocation releases, but
/// the arena itself does.
pub fn check_arena_leaks(file: &str, tracker: &ScopeTracker) -> Vec<Issue> {
    let mut issues = Vec::new();
    let scopes = tracker.scopes();

    for (name, root) in tracker.arenas() {
        if name != root {
            continue; // derived handles, not roots
        }
        let var = scopes.iter().rev().find_map(|s| s.variables.get(name));
        let Some(var) = var else { continue };
        if var.has_any_cleanup() {
            continue;
        }
        issues.push(issue(
            "M003",
            "WARNING",
            "arena_never_freed",
            format!("Arena `{}` is never deinitialized", name),
            file,
            var.declared_line,
            var.declared_col,
            name,
            Some(format!("Add `defer {}.deinit()` after creating it", name)),
        ));
    }

    issues
}

/// Check M004: untracked_allocation — a raw-text allocation match the
/// tracker did not bind to a variable (discarded result, multi-call
/// expression). Matches inside comments or strings are rejected through the
/// classifier before they count.
pub fn check_untracked_allocations(
    file: &str,
    source: &str,
    tracker: &ScopeTracker,
    classifier: &ContextClassifier,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx as u32 + 1;
        let Some(m) = find_allocation(line) else {
            continue;
        };
        if !classifier.is_code(line_no, m.col as u32) {
            continue;
        }
        let tracked = tracker.scopes().iter().any(|s| {
            s.variables
                .values()
                .any(|v| v.declared_line == line_no && v.allocation_kind.is_some())
        });
        if tracked {
            continue;
        }
        issues.push(issue(
            "M004",
            "INFO",
            "untracked_allocation",
            format!("Allocation result on line {} is not bound to a tracked variable", line_no),
            file,
            line_no,
            m.col as u32,
            "",
            Some("Bind the result with `const`/`var` so its cleanup can be checked".to_string()),
        ));
    }

    issues
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
