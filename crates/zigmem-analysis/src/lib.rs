//! Scope-aware lexical analysis for Zig source text.
//!
//! Two components make up the engine:
//! - [`classifier`] — a single-pass classifier that tags every span of a
//!   source file as code, comment, doc comment, or string-like content, so
//!   pattern matches inside non-code regions can be rejected.
//! - [`tracker`] — a line-oriented scope and variable tracker that builds
//!   the nesting structure of functions, tests, and control-flow blocks,
//!   registers declarations, and resolves `defer`/`errdefer` cleanup
//!   against them across scope boundaries.
//!
//! Neither component parses Zig. Both are deliberate, best-effort text
//! heuristics: malformed input degrades to partial results, never errors.
//! [`walker`] finds the `.zig` files to feed them, and [`patterns`] holds
//! the token tables both components share.

pub mod classifier;
pub mod patterns;
pub mod tracker;
pub mod walker;
