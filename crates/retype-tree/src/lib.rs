//! Syntax tree for the retype migration engine.
//!
//! Nodes live in an append-only `NodeArena` and are addressed by `NodeIndex`.
//! A node is never modified after it is pushed: rewriting a subtree pushes
//! new nodes for the changed path and yields a new root, while the old root
//! and every untouched subtree stay valid and shared.

pub mod document;
pub mod parser;
pub mod printer;

pub use document::{SourceFile, UnitDocument, lower_unit, parse_unit_json};
pub use parser::{NodeArena, NodeIndex, NodeKind, NodeList, node::*};
pub use printer::Printer;

#[cfg(test)]
#[path = "tests/node_arena_tests.rs"]
mod node_arena_tests;
#[cfg(test)]
#[path = "tests/printer_tests.rs"]
mod printer_tests;
