//! Line-oriented scope and variable tracking.
//!
//! The tracker scans source text once, maintaining a stack of open scopes.
//! Constructs that introduce a nesting level (functions, tests, blocks,
//! conditionals, loops, switches, `comptime`/`inline` blocks) open a scope;
//! closing braces pop the stack. Variable declarations register into the
//! innermost open scope, allocation calls tag them, and `defer`/`errdefer`
//! statements are resolved against previously declared variables by walking
//! outward through the parent-scope chain.
//!
//! Brace counting deliberately does not consult the context classifier, so
//! a brace inside a string literal can misattribute a scope boundary. See
//! DESIGN.md for the trade-offs this heuristic accepts.

use std::collections::BTreeMap;

use zigmem_core::config::TrackerSettings;
use zigmem_core::types::{Scope, ScopeKind, VariableInfo, UNTERMINATED};

use crate::patterns::{
    allocator_derivation, cleanup_target, declared_name, find_allocation, is_arena_init,
    DEFAULT_OWNERSHIP_PATTERNS,
};

/// Tracker configuration. An immutable value constructed up front; the
/// chaining constructors are an ergonomic layer over plain fields.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub track_variables: bool,
    pub track_arenas: bool,
    pub track_cleanup: bool,
    /// Maximum nesting depth to analyze; 0 means unlimited. Lines beyond
    /// the limit are skipped, not an error.
    pub max_depth: u32,
    /// Skip lines with no scope/variable/cleanup relevance once the input
    /// exceeds `lazy_threshold` lines. Trades completeness for throughput.
    pub lazy: bool,
    pub lazy_threshold: usize,
    /// Lowercase function-name fragments that imply ownership transfer.
    pub ownership_patterns: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            track_variables: true,
            track_arenas: true,
            track_cleanup: true,
            max_depth: 0,
            lazy: false,
            lazy_threshold: 5000,
            ownership_patterns: DEFAULT_OWNERSHIP_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl TrackerConfig {
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_lazy(mut self, threshold: usize) -> Self {
        self.lazy = true;
        self.lazy_threshold = threshold;
        self
    }

    /// Replace the ownership-pattern fragments wholesale. The list is not
    /// validated: duplicates and empty fragments are tolerated.
    pub fn with_ownership_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ownership_patterns = patterns;
        self
    }

    pub fn with_variable_tracking(mut self, on: bool) -> Self {
        self.track_variables = on;
        self
    }

    pub fn with_arena_tracking(mut self, on: bool) -> Self {
        self.track_arenas = on;
        self
    }

    pub fn with_cleanup_tracking(mut self, on: bool) -> Self {
        self.track_cleanup = on;
        self
    }

    /// Bridge from the `zigmem.json` tracker section. An empty
    /// `ownership_patterns` list there means the built-in defaults.
    pub fn from_settings(settings: &TrackerSettings) -> Self {
        let mut config = Self::default()
            .with_max_depth(settings.max_depth);
        if settings.lazy {
            config = config.with_lazy(settings.lazy_threshold);
        }
        if !settings.ownership_patterns.is_empty() {
            config = config.with_ownership_patterns(settings.ownership_patterns.clone());
        }
        config
    }
}

/// Builds and owns the scope forest for one source file.
pub struct ScopeTracker {
    config: TrackerConfig,
    scopes: Vec<Scope>,
    open: Vec<usize>,
    /// allocator-variable name -> arena root it derives from (roots map to
    /// themselves). Rebuilt fresh on every `analyze` call.
    arenas: BTreeMap<String, String>,
    /// Opens swallowed by the depth limit; their closing braces must be
    /// swallowed too or the stack desyncs.
    suppressed_opens: usize,
    line_count: u32,
}

impl ScopeTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            scopes: Vec::new(),
            open: Vec::new(),
            arenas: BTreeMap::new(),
            suppressed_opens: 0,
            line_count: 0,
        }
    }

    /// Build a tracker with the default configuration and analyze `source`.
    pub fn analyze_source(source: &str) -> Self {
        let mut tracker = Self::new(TrackerConfig::default());
        tracker.analyze(source);
        tracker
    }

    /// Scan `source` and rebuild the scope forest. Never fails; malformed
    /// nesting degrades to force-closed scopes at a sentinel end line.
    pub fn analyze(&mut self, source: &str) {
        self.scopes.clear();
        self.open.clear();
        self.arenas.clear();
        self.suppressed_opens = 0;

        let lines: Vec<&str> = source.lines().collect();
        self.line_count = lines.len() as u32;
        let lazy = self.config.lazy && lines.len() > self.config.lazy_threshold;

        for (idx, raw) in lines.iter().enumerate() {
            let line_no = idx as u32 + 1;
            if lazy && !is_relevant(raw) {
                continue;
            }
            self.process_line(line_no, raw);
        }

        // Anything still open means malformed or truncated nesting.
        while let Some(idx) = self.open.pop() {
            self.scopes[idx].end_line = Some(UNTERMINATED);
        }
    }

    /// Scopes in construction order, stable until the next `analyze`.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// The arena-derivation map: allocator name -> arena root name.
    pub fn arenas(&self) -> &BTreeMap<String, String> {
        &self.arenas
    }

    /// Whether an allocator name traces back to an arena.
    pub fn is_arena_backed(&self, allocator: &str) -> bool {
        self.arenas.contains_key(allocator)
            || allocator.to_ascii_lowercase().contains("arena")
    }

    /// Number of lines seen by the last `analyze` call.
    pub fn line_count(&self) -> u32 {
        self.line_count
    }

    /// Innermost scope whose line range contains `line`; on ties the
    /// deepest (most recently opened) scope wins.
    pub fn scope_containing(&self, line: u32) -> Option<&Scope> {
        self.scope_index_containing(line).map(|i| &self.scopes[i])
    }

    /// All scopes containing `line`, outermost to innermost.
    pub fn scope_hierarchy(&self, line: u32) -> Vec<&Scope> {
        let mut chain = Vec::new();
        let mut cur = self.scope_index_containing(line);
        while let Some(i) = cur {
            chain.push(&self.scopes[i]);
            cur = self.scopes[i].parent;
        }
        chain.reverse();
        chain
    }

    /// Whether the named variable, resolved from the scope containing
    /// `from_line`, has scope-exit or error-path cleanup recorded.
    ///
    /// Resolution walks outward through parents first, then through closed
    /// scopes nested under the starting scope, so a cleanup written after
    /// an inner block closed still resolves.
    pub fn has_cleanup(&self, name: &str, from_line: u32) -> bool {
        let Some(start) = self.scope_index_containing(from_line) else {
            return false;
        };
        let mut cur = Some(start);
        while let Some(i) = cur {
            if let Some(v) = self.scopes[i].variables.get(name) {
                return v.has_any_cleanup();
            }
            cur = self.scopes[i].parent;
        }
        for i in (0..self.scopes.len()).rev() {
            if self.is_descendant(i, start) {
                if let Some(v) = self.scopes[i].variables.get(name) {
                    return v.has_any_cleanup();
                }
            }
        }
        false
    }

    // -- Line processing --

    fn process_line(&mut self, line_no: u32, raw: &str) {
        let line = raw.trim();
        // Lightweight comment/string skip; the classifier is not consulted
        // here, so only line-leading markers are recognized.
        if line.is_empty()
            || line.starts_with("//")
            || line.starts_with("/*")
            || line.starts_with('*')
            || line.starts_with("\\\\")
        {
            return;
        }

        let first_open = line.find('{');
        let total_opens = line.matches('{').count();
        let total_closes = line.matches('}').count();
        let leading_closes = match first_open {
            Some(p) => line[..p].matches('}').count(),
            None => total_closes,
        };

        // `} else {` closes the previous arm before opening the next one.
        self.close_scopes(leading_closes, line_no);

        // A new scope's depth would be the current stack height; past the
        // limit its braces are swallowed instead of opened.
        let depth_ok = self.config.max_depth == 0
            || (self.open.len() as u32) < self.config.max_depth;

        if first_open.is_some() {
            if depth_ok && self.suppressed_opens == 0 {
                let opened = self.open_scope_for(line, line_no);
                // Additional unclaimed braces open generic blocks so
                // balanced input keeps opened == closed.
                for _ in opened..total_opens {
                    self.open_scope(ScopeKind::Block, "block", line_no);
                }
            } else {
                self.suppressed_opens += total_opens;
            }
        }

        if self.suppressed_opens == 0 {
            let indent = (raw.len() - raw.trim_start().len()) as u32;
            let has_return = line.contains("return");
            let mut offset = indent;
            for stmt in line.split(';') {
                let trimmed = stmt.trim_start();
                let delta = (stmt.len() - trimmed.len()) as u32;
                self.process_statement(line_no, offset + delta, trimmed, has_return);
                offset += stmt.len() as u32 + 1;
            }
        }

        self.close_scopes(total_closes - leading_closes, line_no);
    }

    /// Declaration, arena, and cleanup detection run per `;`-separated
    /// statement so single-line bodies resolve fully.
    fn process_statement(&mut self, line_no: u32, col: u32, stmt: &str, has_return: bool) {
        if stmt.is_empty() || stmt.starts_with("//") {
            return;
        }
        if self.config.track_arenas {
            self.track_arena(stmt);
        }
        if self.config.track_variables {
            self.register_variable(line_no, col, stmt, has_return);
        }
        if self.config.track_cleanup {
            self.track_cleanup(line_no, stmt);
        }
    }

    // -- Scope management --

    /// Recognize the construct a brace-bearing line introduces and open its
    /// scope. First match wins; returns the number of scopes opened (0 or 1).
    fn open_scope_for(&mut self, line: &str, line_no: u32) -> usize {
        // (1) named test declaration
        if line.starts_with("test")
            && matches!(line.as_bytes().get(4), Some(b' ') | Some(b'"') | Some(b'{'))
        {
            let name = quoted_name(line).unwrap_or("(unnamed)").to_string();
            self.open_scope(ScopeKind::TestFunction, &name, line_no);
            return 1;
        }
        // (2) function declaration
        if let Some(name) = function_name(line) {
            let name = name.to_string();
            self.open_scope(ScopeKind::Function, &name, line_no);
            return 1;
        }
        // (3) keyword-introduced blocks; `else => {` is a switch case, not
        // an else arm, so the case check comes first.
        let (kind, name): (ScopeKind, String) = if line.contains("=> {") {
            let label = line.split("=>").next().unwrap_or("").trim();
            (ScopeKind::SwitchCase, label.to_string())
        } else if line.starts_with("if") {
            (ScopeKind::If, "if".to_string())
        } else if line.contains("else") {
            if line.contains("if") {
                (ScopeKind::If, "else if".to_string())
            } else {
                (ScopeKind::Else, "else".to_string())
            }
        } else if line.starts_with("while") {
            (ScopeKind::While, "while".to_string())
        } else if line.starts_with("for") {
            (ScopeKind::For, "for".to_string())
        } else if line.starts_with("switch") || line.contains("= switch") {
            (ScopeKind::Switch, "switch".to_string())
        } else if line.starts_with("comptime") {
            (ScopeKind::Comptime, "comptime".to_string())
        } else if line.starts_with("inline") {
            (ScopeKind::Inline, "inline".to_string())
        } else if line.starts_with("errdefer") || line.contains("catch") {
            (ScopeKind::ErrorBlock, "catch".to_string())
        } else if line.contains(".{") {
            (ScopeKind::StructInit, "struct_init".to_string())
        } else {
            (ScopeKind::Block, "block".to_string())
        };
        self.open_scope(kind, &name, line_no);
        1
    }

    fn open_scope(&mut self, kind: ScopeKind, name: &str, line_no: u32) {
        let parent = self.open.last().copied();
        let depth = self.open.len() as u32;
        self.scopes.push(Scope {
            kind,
            name: name.to_string(),
            start_line: line_no,
            end_line: None,
            depth,
            variables: BTreeMap::new(),
            parent,
        });
        self.open.push(self.scopes.len() - 1);
    }

    fn close_scopes(&mut self, count: usize, line_no: u32) {
        for _ in 0..count {
            if self.suppressed_opens > 0 {
                self.suppressed_opens -= 1;
                continue;
            }
            // Saturate on malformed input with extra closing braces.
            let Some(idx) = self.open.pop() else { break };
            self.scopes[idx].end_line = Some(line_no);
        }
    }

    // -- Variable registration --

    fn register_variable(&mut self, line_no: u32, col: u32, stmt: &str, has_return: bool) {
        let Some(&top) = self.open.last() else {
            return;
        };
        let Some((name, name_col)) = declared_name(stmt) else {
            return;
        };

        let mut info = VariableInfo::new(name.to_string(), line_no, col + name_col as u32);

        if let Some(m) = find_allocation(stmt) {
            info.allocation_kind = Some(m.kind);
            info.is_arena_derived = !m.allocator.is_empty() && self.is_arena_backed(&m.allocator);
            info.is_ownership_transfer = has_return || self.in_ownership_function();
            if !m.allocator.is_empty() {
                info.allocator_source = Some(m.allocator);
            }
        }

        // An allocator handle derived from an arena carries the flag even
        // without an allocation call of its own.
        if self.arenas.contains_key(name) {
            info.is_arena_derived = true;
        }

        self.scopes[top].variables.insert(info.name.clone(), info);
    }

    /// Whether the nearest enclosing function/test scope name matches an
    /// ownership-pattern fragment.
    fn in_ownership_function(&self) -> bool {
        for &idx in self.open.iter().rev() {
            let scope = &self.scopes[idx];
            if matches!(scope.kind, ScopeKind::Function | ScopeKind::TestFunction) {
                let lname = scope.name.to_ascii_lowercase();
                return self
                    .config
                    .ownership_patterns
                    .iter()
                    .any(|p| !p.is_empty() && lname.contains(&p.to_ascii_lowercase()));
            }
        }
        false
    }

    // -- Arena derivation --

    fn track_arena(&mut self, stmt: &str) {
        if is_arena_init(stmt) {
            if let Some((name, _)) = declared_name(stmt) {
                self.arenas.insert(name.to_string(), name.to_string());
            }
        } else if let Some((derived, base)) = allocator_derivation(stmt) {
            if let Some(root) = self.arenas.get(&base).cloned() {
                // Transitive: a handle derived from a derived handle still
                // points at the original root.
                self.arenas.insert(derived, root);
            }
        }
    }

    // -- Cleanup resolution --

    fn track_cleanup(&mut self, line_no: u32, stmt: &str) {
        let (error_path, body) = if let Some(rest) = stmt.strip_prefix("errdefer") {
            (true, rest)
        } else if let Some(rest) = stmt.strip_prefix("defer") {
            (false, rest)
        } else {
            return;
        };
        let Some(target) = cleanup_target(body) else {
            return;
        };
        self.mark_cleanup(&target, error_path, line_no);
    }

    /// Walk from the currently open scope outward through parents; if the
    /// variable is not on that chain, search closed scopes nested under the
    /// innermost open scope (most recently created first). Sibling branches
    /// of the open chain are never consulted.
    fn mark_cleanup(&mut self, name: &str, error_path: bool, line_no: u32) {
        let Some(&top) = self.open.last() else {
            return;
        };
        let mut found = None;
        let mut cur = Some(top);
        while let Some(i) = cur {
            if self.scopes[i].variables.contains_key(name) {
                found = Some(i);
                break;
            }
            cur = self.scopes[i].parent;
        }
        if found.is_none() {
            for i in (0..self.scopes.len()).rev() {
                if self.is_descendant(i, top) && self.scopes[i].variables.contains_key(name) {
                    found = Some(i);
                    break;
                }
            }
        }
        let Some(idx) = found else { return };
        let Some(var) = self.scopes[idx].variables.get_mut(name) else {
            return;
        };
        if error_path {
            var.has_errdefer_cleanup = true;
            var.error_cleanup_line = Some(line_no);
        } else {
            var.has_defer_cleanup = true;
            var.cleanup_line = Some(line_no);
        }
    }

    // -- Lookup helpers --

    fn scope_index_containing(&self, line: u32) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, scope) in self.scopes.iter().enumerate() {
            if scope.contains_line(line) {
                match best {
                    Some(b) if self.scopes[b].depth > scope.depth => {}
                    _ => best = Some(i),
                }
            }
        }
        best
    }

    fn is_descendant(&self, scope: usize, ancestor: usize) -> bool {
        let mut cur = self.scopes[scope].parent;
        while let Some(i) = cur {
            if i == ancestor {
                return true;
            }
            cur = self.scopes[i].parent;
        }
        false
    }
}

/// Lazy-mode relevance filter: lines with no brace, binding, or cleanup
/// token cannot affect the scope forest.
fn is_relevant(line: &str) -> bool {
    line.contains('{') || line.contains('}') || line.contains('=') || line.contains("defer")
}

/// The quoted name in a test declaration, e.g. `test "leak check" {`.
fn quoted_name(line: &str) -> Option<&str> {
    let start = line.find('"')? + 1;
    let end = start + line[start..].find('"')?;
    Some(&line[start..end])
}

/// The identifier of a function declaration line, e.g. `pub fn parse(` ->
/// `parse`. A declaration with no identifier yields `(anonymous)`.
fn function_name(line: &str) -> Option<&str> {
    let fn_at = if line.starts_with("fn ") {
        0
    } else {
        line.find(" fn ").map(|p| p + 1)?
    };
    let after = &line[fn_at + 3..];
    let paren = after.find('(')?;
    let name = after[..paren].trim();
    if name.is_empty() {
        Some("(anonymous)")
    } else if name.bytes().all(crate::patterns::is_ident_byte) {
        Some(name)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
