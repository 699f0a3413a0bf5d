//! Token tables and identifier-extraction helpers shared by the tracker and
//! the rules layer.
//!
//! Everything here operates on raw line text. The tables are deliberately
//! small and fixed: the goal is low false-negative detection of allocation
//! and release calls, not a grammar.

use zigmem_core::types::AllocationKind;

/// Allocation-call suffixes, most specific first so `.allocSentinel(` is not
/// shadowed by `.alloc(`.
pub const ALLOCATION_SUFFIXES: &[(&str, AllocationKind)] = &[
    (".allocSentinel(", AllocationKind::Alloc),
    (".alignedAlloc(", AllocationKind::Alloc),
    (".alloc(", AllocationKind::Alloc),
    (".create(", AllocationKind::Create),
    (".dupeZ(", AllocationKind::Dupe),
    (".dupe(", AllocationKind::Dupe),
    (".realloc(", AllocationKind::Realloc),
    (".initCapacity(", AllocationKind::CollectionInit),
];

/// Standard-library container types whose `.init(` takes an allocator and
/// therefore needs a matching `deinit`.
pub const COLLECTION_TYPES: &[&str] = &[
    "ArrayList",
    "ArrayListUnmanaged",
    "StringHashMap",
    "AutoHashMap",
    "AutoArrayHashMap",
    "StringArrayHashMap",
    "PriorityQueue",
    "MultiArrayList",
];

/// Function-name fragments that imply the function hands allocated memory
/// back to its caller.
pub const DEFAULT_OWNERSHIP_PATTERNS: &[&str] = &[
    "create", "make", "new", "build", "clone", "dupe", "parse", "load", "convert", "process",
    "format",
];

/// Release methods that name their target as the first argument.
const ARG_RELEASE_METHODS: &[&str] = &["free", "destroy", "release"];

/// Release methods invoked on the target itself.
const RECV_RELEASE_METHODS: &[&str] = &["deinit", "close"];

/// An allocation call found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationMatch {
    pub kind: AllocationKind,
    /// Byte offset of the matched call token within the searched text.
    pub col: usize,
    /// Allocator the call was made through, empty when it could not be
    /// extracted (e.g. a chained call expression).
    pub allocator: String,
}

pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// The identifier ending immediately before byte offset `pos`.
pub fn ident_before(s: &str, pos: usize) -> &str {
    let bytes = s.as_bytes();
    let mut start = pos.min(bytes.len());
    while start > 0 && is_ident_byte(bytes[start - 1]) {
        start -= 1;
    }
    &s[start..pos.min(bytes.len())]
}

/// The identifier starting at byte offset `pos`, after skipping leading
/// whitespace and a `&` borrow sigil.
pub fn ident_at(s: &str, pos: usize) -> &str {
    let bytes = s.as_bytes();
    let mut start = pos.min(bytes.len());
    while start < bytes.len() && (bytes[start].is_ascii_whitespace() || bytes[start] == b'&') {
        start += 1;
    }
    let mut end = start;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    &s[start..end]
}

/// The type name preceding a `.init(` call, looking through one level of
/// parameterization: `ArrayList(u8).init(a)` resolves to `ArrayList`.
fn type_name_before(s: &str, pos: usize) -> &str {
    let bytes = s.as_bytes();
    if pos > 0 && bytes[pos - 1] == b')' {
        let mut depth = 0usize;
        let mut i = pos;
        while i > 0 {
            i -= 1;
            match bytes[i] {
                b')' => depth += 1,
                b'(' => {
                    depth -= 1;
                    if depth == 0 {
                        return ident_before(s, i);
                    }
                }
                _ => {}
            }
        }
        return "";
    }
    ident_before(s, pos)
}

/// Find the first recognized allocation call on `text`, with the allocator
/// (or, for collection initializers, the allocator argument) it goes
/// through.
pub fn find_allocation(text: &str) -> Option<AllocationMatch> {
    let mut best: Option<(usize, AllocationKind, String)> = None;

    for (suffix, kind) in ALLOCATION_SUFFIXES {
        if let Some(pos) = text.find(suffix) {
            let allocator = if *kind == AllocationKind::CollectionInit {
                ident_at(text, pos + suffix.len()).to_string()
            } else {
                ident_before(text, pos).to_string()
            };
            if best.as_ref().map_or(true, |(p, _, _)| pos < *p) {
                best = Some((pos, *kind, allocator));
            }
        }
    }

    // `.init(` counts only on known container types, and takes its
    // allocator from the first argument.
    if let Some(pos) = text.find(".init(") {
        let type_name = type_name_before(text, pos);
        if COLLECTION_TYPES.contains(&type_name)
            && best.as_ref().map_or(true, |(p, _, _)| pos < *p)
        {
            let allocator = ident_at(text, pos + ".init(".len()).to_string();
            best = Some((pos, AllocationKind::CollectionInit, allocator));
        }
    }

    best.map(|(col, kind, allocator)| AllocationMatch {
        kind,
        col,
        allocator,
    })
}

/// Extract the variable a `defer`/`errdefer` statement releases.
///
/// `recv.free(name)` and `recv.destroy(name)` target the argument;
/// `name.deinit()` and `name.close()` target the receiver. Anything else is
/// not a recognized release and yields `None`.
pub fn cleanup_target(stmt: &str) -> Option<String> {
    let open = stmt.find('(')?;
    let method = ident_before(stmt, open);
    if method.is_empty() {
        return None;
    }

    if ARG_RELEASE_METHODS.contains(&method) {
        let arg = ident_at(stmt, open + 1);
        if !arg.is_empty() {
            return Some(arg.to_string());
        }
    }

    if ARG_RELEASE_METHODS.contains(&method) || RECV_RELEASE_METHODS.contains(&method) {
        let dot = open.checked_sub(method.len() + 1)?;
        if stmt.as_bytes()[dot] != b'.' {
            return None;
        }
        let recv = ident_before(stmt, dot);
        if !recv.is_empty() {
            return Some(recv.to_string());
        }
    }

    None
}

/// Byte offset of `token` in `s` at a word boundary (start of string or a
/// non-identifier byte before it).
fn find_token(s: &str, token: &str) -> Option<usize> {
    let mut from = 0usize;
    while let Some(rel) = s[from..].find(token) {
        let pos = from + rel;
        if pos == 0 || !is_ident_byte(s.as_bytes()[pos - 1]) {
            return Some(pos);
        }
        from = pos + token.len();
    }
    None
}

/// Extract the name bound by a `const`/`var` declaration within `stmt`,
/// along with the byte offset of the name. The keyword may sit mid-statement
/// (single-line bodies put it after the opening brace). Requires an `=` so
/// bare field declarations don't register.
pub fn declared_name(stmt: &str) -> Option<(&str, usize)> {
    let const_at = find_token(stmt, "const ");
    let var_at = find_token(stmt, "var ");
    let (kw_at, kw_len) = match (const_at, var_at) {
        (Some(c), Some(v)) if v < c => (v, 4),
        (Some(c), _) => (c, 6),
        (None, Some(v)) => (v, 4),
        (None, None) => return None,
    };
    let bytes = stmt.as_bytes();
    let mut name_start = kw_at + kw_len;
    while name_start < bytes.len() && bytes[name_start].is_ascii_whitespace() {
        name_start += 1;
    }
    let mut name_end = name_start;
    while name_end < bytes.len() && is_ident_byte(bytes[name_end]) {
        name_end += 1;
    }
    if name_end == name_start || !stmt[name_end..].contains('=') {
        return None;
    }
    Some((&stmt[name_start..name_end], name_start))
}

/// Whether a statement creates an arena-style allocator.
pub fn is_arena_init(stmt: &str) -> bool {
    stmt.contains("ArenaAllocator.init(") || stmt.contains("Arena.init(")
}

/// Match a derivation statement of the form `name = base.allocator()`,
/// returning `(derived, base)`.
pub fn allocator_derivation(stmt: &str) -> Option<(String, String)> {
    let pos = stmt.find(".allocator()")?;
    let base = ident_before(stmt, pos);
    if base.is_empty() {
        return None;
    }
    // Declaration form binds the declared name; reassignment form takes the
    // last identifier on the left of `=` (skipping a `: Type` annotation is
    // the declaration form's job).
    let derived = if let Some((name, _)) = declared_name(stmt) {
        name.to_string()
    } else {
        let eq = stmt[..pos].rfind('=')?;
        let lhs = stmt[..eq].trim_end();
        ident_before(lhs, lhs.len()).to_string()
    };
    if derived.is_empty() {
        return None;
    }
    Some((derived, base.to_string()))
}

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;
