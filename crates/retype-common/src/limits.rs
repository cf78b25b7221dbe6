//! Centralized limits for the migration engine.
//!
//! Recursive walks over syntax trees and type descriptors are bounded so that
//! pathological input (deeply nested generics, machine-generated expression
//! chains) degrades into "left unchanged" instead of a stack overflow.

/// Maximum nesting depth walked by type descriptor visitors.
///
/// ```java
/// Map<String, List<Set<Map<String, ImmutableList<Integer>>>>> deep;
/// ```
///
/// Each type argument level costs one frame. Beyond this depth the visitor
/// returns the input type unchanged.
pub const MAX_TYPE_NESTING_DEPTH: u32 = 64;

/// Maximum syntax tree depth visited by the rewrite driver.
///
/// Subtrees deeper than this are kept as-is and their call sites are not
/// considered.
pub const MAX_TREE_DEPTH: u32 = 1_000;

/// Maximum number of characters accepted in a serialized type string.
pub const MAX_TYPE_STRING_LEN: usize = 4_096;
