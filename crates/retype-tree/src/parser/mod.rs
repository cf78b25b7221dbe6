//! Node storage: indices, node data, arena construction and access.

pub mod base;
pub mod node;
mod node_access;
mod node_arena;

pub use base::{NodeIndex, NodeList};
pub use node::{Node, NodeArena, NodeKind};
