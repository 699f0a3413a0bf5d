//! Rule engine for zigmem memory-safety findings.
//!
//! Consumes the scope tracker and context classifier and produces issues:
//! - M001: missing cleanup (allocation with no `defer`/`errdefer` release)
//! - M002: missing errdefer (fallible allocation handed to the caller
//!   without an error-path release)
//! - M003: arena never freed (arena root with no `deinit`)
//! - M004: untracked allocation (allocation call the tracker did not bind
//!   to a variable)
//! - T001: test missing cleanup (test-local allocation never released)
//! - T002: test unmanaged allocator (test body uses a global allocator
//!   instead of the testing allocator)

pub mod types;
pub mod suppress;
pub mod memory;
pub mod compliance;
pub mod engine;
