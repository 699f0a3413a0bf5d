//! Core types, configuration, and fingerprinting for zigmem.
//!
//! This crate provides the foundational data structures used across all
//! zigmem crates:
//! - [`types`] — Context regions, scopes, variable records, and error types
//! - [`config`] — Configuration loading from `zigmem.json`
//! - [`fingerprint`] — Deterministic issue fingerprints (base62 of xxhash64)

pub mod config;
pub mod fingerprint;
pub mod types;
