//! NodeArena access methods: typed getters, type and name queries, and
//! ancestor paths.

use super::base::NodeIndex;
use super::node::*;
use retype_common::interner::Atom;
use retype_common::limits::MAX_TREE_DEPTH;
use retype_types::{TypeId, TypeInterner, fully_qualified_name};
use std::sync::Arc;

impl NodeArena {
    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<NodeKind> {
        self.get(index).map(Node::kind)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The type interner shared by every arena of a migration run.
    #[inline]
    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    #[inline]
    pub fn types_arc(&self) -> Arc<TypeInterner> {
        Arc::clone(&self.types)
    }

    /// Resolved type of the node at `index`, UNKNOWN when absent.
    #[inline]
    pub fn type_of(&self, index: NodeIndex) -> TypeId {
        self.get(index).map_or(TypeId::UNKNOWN, Node::ty)
    }

    /// Text of an interned name; empty for `Atom::NONE`.
    pub fn resolve_name(&self, atom: Atom) -> Arc<str> {
        self.types.resolve_name(atom)
    }

    // =========================================================================
    // Typed getters
    // =========================================================================

    #[inline]
    pub fn get_compilation_unit(&self, index: NodeIndex) -> Option<&CompilationUnitData> {
        match self.get(index)? {
            Node::CompilationUnit(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_import(&self, index: NodeIndex) -> Option<&ImportData> {
        match self.get(index)? {
            Node::Import(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_class(&self, index: NodeIndex) -> Option<&ClassData> {
        match self.get(index)? {
            Node::ClassDecl(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_method_decl(&self, index: NodeIndex) -> Option<&MethodDeclData> {
        match self.get(index)? {
            Node::MethodDecl(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_variable_decls(&self, index: NodeIndex) -> Option<&VariableDeclsData> {
        match self.get(index)? {
            Node::VariableDecls(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_named_variable(&self, index: NodeIndex) -> Option<&NamedVariableData> {
        match self.get(index)? {
            Node::NamedVariable(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_identifier(&self, index: NodeIndex) -> Option<&IdentifierData> {
        match self.get(index)? {
            Node::Identifier(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_call(&self, index: NodeIndex) -> Option<&CallData> {
        match self.get(index)? {
            Node::MethodInvocation(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_new_class(&self, index: NodeIndex) -> Option<&NewClassData> {
        match self.get(index)? {
            Node::NewClass(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn get_type_identifier(&self, index: NodeIndex) -> Option<&TypeIdentifierData> {
        match self.get(index)? {
            Node::TypeIdentifier(data) => Some(data),
            _ => None,
        }
    }

    // =========================================================================
    // Paths and traversal
    // =========================================================================

    /// Path `[root, .., target]` of original indices, or `None` when `target`
    /// is not reachable from `root`.
    pub fn find_path(&self, root: NodeIndex, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        // Children always have smaller indices than their parents.
        if root.is_none() || target.is_none() || target > root {
            return None;
        }
        let mut path = vec![root];
        if self.find_path_inner(root, target, &mut path, 0) {
            Some(path)
        } else {
            None
        }
    }

    fn find_path_inner(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        depth: u32,
    ) -> bool {
        if current == target {
            return true;
        }
        if depth >= MAX_TREE_DEPTH {
            return false;
        }
        let Some(node) = self.get(current) else {
            return false;
        };
        for child in node.children() {
            if child > target {
                continue;
            }
            path.push(child);
            if self.find_path_inner(child, target, path, depth + 1) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Every node reachable from `root`, in pre-order.
    pub fn descendants(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let Some(node) = self.get(idx) else {
                continue;
            };
            out.push(idx);
            let children = node.children();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Fully-qualified classes named in type position or as static receivers
    /// under `root`; used to decide whether an import is still needed.
    pub fn referenced_classes(&self, root: NodeIndex) -> Vec<Atom> {
        let mut names = Vec::new();
        for idx in self.descendants(root) {
            let ty = match self.get(idx) {
                Some(Node::TypeIdentifier(data)) => data.ty,
                Some(Node::Identifier(data)) if data.variable_type.is_unknown() => data.ty,
                _ => continue,
            };
            if let Some(name) = fully_qualified_name(&self.types, ty) {
                names.push(name);
            }
        }
        names
    }
}
