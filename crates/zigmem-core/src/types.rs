use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel line/column for unterminated constructs: a block comment that
/// never closes, or a scope force-closed at end of input.
pub const UNTERMINATED: u32 = u32::MAX;

/// Lexical context kinds produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Code,
    LineComment,
    BlockComment,
    DocComment,
    StringLiteral,
    RawString,
    MultilineString,
    EmbeddedFile,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Code => "code",
            ContextKind::LineComment => "line_comment",
            ContextKind::BlockComment => "block_comment",
            ContextKind::DocComment => "doc_comment",
            ContextKind::StringLiteral => "string_literal",
            ContextKind::RawString => "raw_string",
            ContextKind::MultilineString => "multiline_string",
            ContextKind::EmbeddedFile => "embedded_file",
        }
    }

    /// Whether pattern matches at this position should be trusted.
    pub fn is_code(&self) -> bool {
        matches!(self, ContextKind::Code)
    }
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified span of source text.
///
/// Lines are 1-based; columns are 0-based byte offsets within the line with
/// an exclusive `end_col`. Regions spanning multiple lines cover their
/// interior lines entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRegion {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub kind: ContextKind,
}

impl ContextRegion {
    pub fn contains(&self, line: u32, col: u32) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if self.start_line == self.end_line {
            return col >= self.start_col && col < self.end_col;
        }
        if line == self.start_line {
            return col >= self.start_col;
        }
        if line == self.end_line {
            return col < self.end_col;
        }
        true
    }
}

/// Scope kinds recognized by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Function,
    TestFunction,
    Block,
    StructInit,
    ErrorBlock,
    If,
    Else,
    While,
    For,
    Switch,
    SwitchCase,
    Comptime,
    Inline,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Function => "function",
            ScopeKind::TestFunction => "test_function",
            ScopeKind::Block => "block",
            ScopeKind::StructInit => "struct_init",
            ScopeKind::ErrorBlock => "error_block",
            ScopeKind::If => "if",
            ScopeKind::Else => "else",
            ScopeKind::While => "while",
            ScopeKind::For => "for",
            ScopeKind::Switch => "switch",
            ScopeKind::SwitchCase => "switch_case",
            ScopeKind::Comptime => "comptime",
            ScopeKind::Inline => "inline",
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Families of allocation calls the tracker recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationKind {
    Alloc,
    Create,
    Dupe,
    Realloc,
    CollectionInit,
}

impl AllocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationKind::Alloc => "alloc",
            AllocationKind::Create => "create",
            AllocationKind::Dupe => "dupe",
            AllocationKind::Realloc => "realloc",
            AllocationKind::CollectionInit => "collection_init",
        }
    }
}

impl std::fmt::Display for AllocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A variable registered in a scope, with allocation and cleanup state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub declared_line: u32,
    pub declared_col: u32,
    pub allocation_kind: Option<AllocationKind>,
    /// Name of the allocator the allocation call was made through, when it
    /// could be extracted from the declaration line.
    pub allocator_source: Option<String>,
    pub has_defer_cleanup: bool,
    pub has_errdefer_cleanup: bool,
    pub cleanup_line: Option<u32>,
    pub error_cleanup_line: Option<u32>,
    /// The allocation is handed back to the caller (directly returned, or
    /// declared inside a function whose name matches an ownership pattern).
    pub is_ownership_transfer: bool,
    /// The allocator traces back to an arena, so per-allocation cleanup is
    /// not expected.
    pub is_arena_derived: bool,
}

impl VariableInfo {
    pub fn new(name: String, declared_line: u32, declared_col: u32) -> Self {
        Self {
            name,
            declared_line,
            declared_col,
            allocation_kind: None,
            allocator_source: None,
            has_defer_cleanup: false,
            has_errdefer_cleanup: false,
            cleanup_line: None,
            error_cleanup_line: None,
            is_ownership_transfer: false,
            is_arena_derived: false,
        }
    }

    pub fn has_any_cleanup(&self) -> bool {
        self.has_defer_cleanup || self.has_errdefer_cleanup
    }
}

/// A lexical scope: one nesting level with its own variable registry.
///
/// Scopes are stored in creation order; `parent` indexes into that same
/// list and always points at a scope with `depth` exactly one less.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: String,
    pub start_line: u32,
    /// `None` while the scope is still open during analysis;
    /// [`UNTERMINATED`] when the closing brace was never seen.
    pub end_line: Option<u32>,
    pub depth: u32,
    pub variables: BTreeMap<String, VariableInfo>,
    pub parent: Option<usize>,
}

impl Scope {
    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line.unwrap_or(UNTERMINATED)
    }

    /// True when the scope was force-closed at end of input, which signals
    /// malformed or truncated nesting.
    pub fn is_unterminated(&self) -> bool {
        self.end_line == Some(UNTERMINATED)
    }
}

/// Errors that can occur while driving an analysis run.
///
/// The analysis passes themselves never fail on malformed input; only the
/// surrounding file handling does.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("analysis could not complete: {0}")]
    Incomplete(String),
}
