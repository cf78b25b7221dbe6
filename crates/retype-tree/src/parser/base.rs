//! Node handles.

use serde::Serialize;

/// Index of a node in a `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Absent child (e.g. no initializer, bare `return;`).
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}

/// Ordered list of child nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new() -> Self {
        NodeList { nodes: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn position(&self, idx: NodeIndex) -> Option<usize> {
        self.nodes.iter().position(|&n| n == idx)
    }

    pub(crate) fn map(&self, f: &mut impl FnMut(NodeIndex) -> NodeIndex) -> NodeList {
        NodeList {
            nodes: self.nodes.iter().map(|&n| f(n)).collect(),
        }
    }
}

impl From<Vec<NodeIndex>> for NodeList {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        NodeList { nodes }
    }
}

pub(crate) fn map_opt(idx: NodeIndex, f: &mut impl FnMut(NodeIndex) -> NodeIndex) -> NodeIndex {
    if idx.is_none() { idx } else { f(idx) }
}
