//! Common types and utilities for the retype migration engine.
//!
//! This crate provides foundational types used across all retype crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Traversal and type-nesting limits

// String interning for identifier and qualified-name deduplication
pub mod interner;
pub use interner::{Atom, ShardedInterner};
#[cfg(test)]
#[path = "tests/interner_tests.rs"]
mod interner_tests;

// Centralized limits and thresholds
pub mod limits;
