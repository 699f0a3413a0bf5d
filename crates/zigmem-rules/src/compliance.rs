use zigmem_analysis::classifier::ContextClassifier;
use zigmem_analysis::tracker::ScopeTracker;
use zigmem_core::fingerprint::issue_fingerprint;
use zigmem_core::types::{Scope, ScopeKind, UNTERMINATED};

use crate::types::Issue;

/// Global allocators that have no place in tests; `std.testing.allocator`
/// reports leaks, these don't.
const UNMANAGED_ALLOCATORS: &[&str] = &[
    "std.heap.page_allocator",
    "std.heap.c_allocator",
    "std.heap.raw_c_allocator",
];

fn within(scopes: &[Scope], idx: usize, root: usize) -> bool {
    let mut cur = Some(idx);
    while let Some(i) = cur {
        if i == root {
            return true;
        }
        cur = scopes[i].parent;
    }
    false
}

/// Check T001: test_missing_cleanup — a test-local allocation that is never
/// released. Ownership transfer does not excuse a test: the test body IS
/// the final owner. Arena-backed allocations are excused as usual.
pub fn check_test_cleanup(file: &str, tracker: &ScopeTracker) -> Vec<Issue> {
    let mut issues = Vec::new();
    let scopes = tracker.scopes();

    for (test_idx, test) in scopes.iter().enumerate() {
        if test.kind != ScopeKind::TestFunction {
            continue;
        }
        for (idx, scope) in scopes.iter().enumerate() {
            if !within(scopes, idx, test_idx) {
                continue;
            }
            for var in scope.variables.values() {
                if var.allocation_kind.is_none() || var.is_arena_derived {
                    continue;
                }
                if var.has_any_cleanup() {
                    continue;
                }
                issues.push(Issue {
                    code: "T001".to_string(),
                    severity: "WARNING".to_string(),
                    category: "test_missing_cleanup".to_string(),
                    message: format!(
                        "Test \"{}\" never releases allocation `{}`",
                        test.name, var.name
                    ),
                    file: file.to_string(),
                    line: var.declared_line,
                    column: var.declared_col,
                    fingerprint: issue_fingerprint("T001", file, var.declared_line, &var.name),
                    fix_hint: Some(
                        "Release it with `defer` so the testing allocator's leak check passes"
                            .to_string(),
                    ),
                    suppressed: false,
                    suppress_hint: None,
                });
            }
        }
    }

    issues
}

/// Check T002: test_unmanaged_allocator — a test body referencing a global
/// allocator instead of `std.testing.allocator`. One finding per test, at
/// the first occurrence; matches inside comments/strings are rejected via
/// the classifier.
pub fn check_test_allocator(
    file: &str,
    source: &str,
    tracker: &ScopeTracker,
    classifier: &ContextClassifier,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    let lines: Vec<&str> = source.lines().collect();

    for test in tracker.scopes() {
        if test.kind != ScopeKind::TestFunction {
            continue;
        }
        let end = match test.end_line {
            Some(UNTERMINATED) | None => lines.len() as u32,
            Some(e) => e,
        };
        'scan: for line_no in test.start_line..=end {
            let Some(line) = lines.get(line_no as usize - 1) else {
                break;
            };
            for pattern in UNMANAGED_ALLOCATORS {
                let Some(col) = line.find(pattern) else {
                    continue;
                };
                if !classifier.is_code(line_no, col as u32) {
                    continue;
                }
                issues.push(Issue {
                    code: "T002".to_string(),
                    severity: "WARNING".to_string(),
                    category: "test_unmanaged_allocator".to_string(),
                    message: format!(
                        "Test \"{}\" uses {} instead of std.testing.allocator",
                        test.name, pattern
                    ),
                    file: file.to_string(),
                    line: line_no,
                    column: col as u32,
                    fingerprint: issue_fingerprint("T002", file, line_no, pattern),
                    fix_hint: Some(
                        "Use std.testing.allocator so leaks fail the test".to_string(),
                    ),
                    suppressed: false,
                    suppress_hint: None,
                });
                break 'scan;
            }
        }
    }

    issues
}

#[cfg(test)]
#[path = "compliance_tests.rs"]
mod tests;
