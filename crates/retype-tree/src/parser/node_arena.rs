//! NodeArena creation methods (add_* methods) and path-copying replacement.
//!
//! Children are always created before their parents, so every index stored
//! in a node is smaller than the node's own index.

use super::base::NodeIndex;
use super::node::*;
use retype_types::{MethodShape, TypeData, TypeId, TypeInterner, short_name};
use std::sync::Arc;

impl NodeArena {
    pub fn new(types: Arc<TypeInterner>) -> NodeArena {
        NodeArena {
            nodes: Vec::new(),
            types,
        }
    }

    pub fn with_capacity(types: Arc<TypeInterner>, capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            types,
        }
    }

    /// Push a node and return its index.
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        idx
    }

    // ============================================================================
    // Declarations
    // ============================================================================

    pub fn add_compilation_unit(
        &mut self,
        source_path: impl Into<String>,
        java_version: Option<u32>,
        package: Option<&str>,
        imports: Vec<NodeIndex>,
        classes: Vec<NodeIndex>,
    ) -> NodeIndex {
        let package = package.map(|p| self.types.intern_name(p));
        self.add(Node::CompilationUnit(CompilationUnitData {
            source_path: source_path.into(),
            java_version,
            package,
            imports: imports.into(),
            classes: classes.into(),
        }))
    }

    pub fn add_import(&mut self, qualified_name: &str, is_static: bool) -> NodeIndex {
        let qualified_name = self.types.intern_name(qualified_name);
        self.add(Node::Import(ImportData {
            qualified_name,
            is_static,
        }))
    }

    pub fn add_class(&mut self, fq_name: &str, members: Vec<NodeIndex>) -> NodeIndex {
        let ty = self.types.nominal(fq_name);
        let name = self.types.intern_name(short_name(fq_name));
        self.add(Node::ClassDecl(ClassData {
            name,
            ty,
            members: members.into(),
        }))
    }

    /// Method declaration. `return_type` of `None` means `void`.
    pub fn add_method_decl(
        &mut self,
        name: &str,
        return_type: Option<TypeId>,
        params: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        let return_type_expr = match return_type {
            Some(ty) => self.add_type_tree(ty),
            None => NodeIndex::NONE,
        };
        let name = self.types.intern_name(name);
        self.add(Node::MethodDecl(MethodDeclData {
            name,
            return_type_expr,
            params: params.into(),
            body,
            is_constructor: false,
        }))
    }

    pub fn add_constructor(&mut self, name: &str, params: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        let name = self.types.intern_name(name);
        self.add(Node::MethodDecl(MethodDeclData {
            name,
            return_type_expr: NodeIndex::NONE,
            params: params.into(),
            body,
            is_constructor: true,
        }))
    }

    // ============================================================================
    // Statements
    // ============================================================================

    pub fn add_block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::Block(BlockData {
            statements: statements.into(),
        }))
    }

    /// `declared name = initializer;` with a type tree built from `declared`.
    pub fn add_variable(&mut self, declared: TypeId, name: &str, initializer: NodeIndex) -> NodeIndex {
        let variable = self.add_named_variable(name, declared, initializer);
        self.add_variable_decls(declared, vec![variable])
    }

    pub fn add_variable_decls(&mut self, declared: TypeId, variables: Vec<NodeIndex>) -> NodeIndex {
        let type_expr = self.add_type_tree(declared);
        self.add(Node::VariableDecls(VariableDeclsData {
            type_expr,
            variables: variables.into(),
        }))
    }

    pub fn add_named_variable(&mut self, name: &str, ty: TypeId, initializer: NodeIndex) -> NodeIndex {
        let name = self.types.intern_name(name);
        self.add(Node::NamedVariable(NamedVariableData {
            name,
            ty,
            initializer,
        }))
    }

    pub fn add_expression_statement(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(Node::ExpressionStatement(ExprStatementData { expression }))
    }

    pub fn add_return(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(Node::Return(ReturnData { expression }))
    }

    // ============================================================================
    // Expressions
    // ============================================================================

    pub fn add_lambda(&mut self, params: Vec<NodeIndex>, body: NodeIndex, ty: TypeId) -> NodeIndex {
        self.add(Node::Lambda(LambdaData {
            params: params.into(),
            body,
            ty,
        }))
    }

    pub fn add_assignment(&mut self, target: NodeIndex, value: NodeIndex) -> NodeIndex {
        let ty = self.type_of(target);
        self.add(Node::Assignment(AssignmentData { target, value, ty }))
    }

    /// Reference to a variable whose declared type is `ty`.
    pub fn add_variable_ref(&mut self, name: &str, ty: TypeId) -> NodeIndex {
        let name = self.types.intern_name(name);
        self.add(Node::Identifier(IdentifierData {
            name,
            ty,
            variable_type: ty,
        }))
    }

    /// Name that is not a variable, e.g. an unresolved identifier.
    pub fn add_identifier(&mut self, name: &str, ty: TypeId) -> NodeIndex {
        let name = self.types.intern_name(name);
        self.add(Node::Identifier(IdentifierData {
            name,
            ty,
            variable_type: TypeId::UNKNOWN,
        }))
    }

    /// Class name used as the receiver of a static call (`List` in `List.of()`).
    pub fn add_type_reference(&mut self, ty: TypeId) -> NodeIndex {
        let name = match self.types.lookup(ty) {
            Some(TypeData::Nominal(fq)) | Some(TypeData::Parameterized { base: fq, .. }) => {
                let fq = self.types.resolve_name(fq);
                self.types.intern_name(short_name(&fq))
            }
            _ => retype_common::Atom::NONE,
        };
        self.add(Node::Identifier(IdentifierData {
            name,
            ty,
            variable_type: TypeId::UNKNOWN,
        }))
    }

    pub fn add_field_access(&mut self, target: NodeIndex, name: &str, ty: TypeId) -> NodeIndex {
        let name = self.types.intern_name(name);
        self.add(Node::FieldAccess(FieldAccessData { target, name, ty }))
    }

    pub fn add_method_invocation(
        &mut self,
        select: NodeIndex,
        name: &str,
        args: Vec<NodeIndex>,
        method: Option<MethodShape>,
        ty: TypeId,
    ) -> NodeIndex {
        let name = self.types.intern_name(name);
        self.add(Node::MethodInvocation(CallData {
            select,
            name,
            args: args.into(),
            method,
            ty,
        }))
    }

    pub fn add_new_class(
        &mut self,
        ty: TypeId,
        args: Vec<NodeIndex>,
        constructor: Option<MethodShape>,
    ) -> NodeIndex {
        let class_type = self.add_type_tree(ty);
        self.add(Node::NewClass(NewClassData {
            class_type,
            args: args.into(),
            constructor,
            ty,
        }))
    }

    pub fn add_new_array(&mut self, array_ty: TypeId, initializer: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::NewArray(NewArrayData {
            initializer: initializer.into(),
            ty: array_ty,
        }))
    }

    pub fn add_ternary(
        &mut self,
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
        ty: TypeId,
    ) -> NodeIndex {
        self.add(Node::Ternary(TernaryData {
            condition,
            when_true,
            when_false,
            ty,
        }))
    }

    pub fn add_literal(&mut self, source: impl Into<String>, ty: TypeId) -> NodeIndex {
        self.add(Node::Literal(LiteralData {
            source: source.into(),
            ty,
        }))
    }

    pub fn add_empty(&mut self) -> NodeIndex {
        self.add(Node::Empty)
    }

    // ============================================================================
    // Type trees
    // ============================================================================

    /// Build the source type tree for `ty`, using simple class names.
    pub fn add_type_tree(&mut self, ty: TypeId) -> NodeIndex {
        match self.types.lookup(ty) {
            Some(TypeData::Array(element)) => {
                let element = self.add_type_tree(element);
                self.add(Node::ArrayType(ArrayTypeData { element, ty }))
            }
            Some(TypeData::Parameterized { base, args }) => {
                let base_ty = self.types.nominal_atom(base);
                let base = self.add_type_tree(base_ty);
                let args: Vec<NodeIndex> = args.iter().map(|&arg| self.add_type_tree(arg)).collect();
                self.add(Node::ParameterizedType(ParameterizedTypeData {
                    base,
                    args: args.into(),
                    ty,
                }))
            }
            Some(TypeData::Nominal(fq)) => {
                let fq = self.types.resolve_name(fq);
                let name = self.types.intern_name(short_name(&fq));
                self.add(Node::TypeIdentifier(TypeIdentifierData { name, ty }))
            }
            Some(TypeData::Primitive(kind)) => {
                let name = self.types.intern_name(kind.keyword());
                self.add(Node::TypeIdentifier(TypeIdentifierData { name, ty }))
            }
            Some(TypeData::Unknown) | None => {
                let name = self.types.intern_name("var");
                self.add(Node::TypeIdentifier(TypeIdentifierData {
                    name,
                    ty: TypeId::UNKNOWN,
                }))
            }
        }
    }

    // ============================================================================
    // Immutable update
    // ============================================================================

    /// Return a new root in which `target` is replaced by `replacement`.
    ///
    /// Only the ancestors of `target` are copied; every other node is shared
    /// with the old tree, which stays intact. Returns `root` unchanged when
    /// `target` is not reachable from it.
    pub fn replace(&mut self, root: NodeIndex, target: NodeIndex, replacement: NodeIndex) -> NodeIndex {
        if root == target {
            return replacement;
        }
        let Some(path) = self.find_path(root, target) else {
            return root;
        };
        // path = [root, .., parent, target]
        let mut new_child = replacement;
        let mut old_child = target;
        for &ancestor in path.iter().rev().skip(1) {
            let Some(node) = self.get(ancestor) else {
                return root;
            };
            let rebuilt = node.map_children(|child| if child == old_child { new_child } else { child });
            old_child = ancestor;
            new_child = self.add(rebuilt);
        }
        new_child
    }

    /// Push a copy of `idx` whose children are remapped through `f`, or return
    /// `idx` itself when `f` changes nothing.
    pub fn rebuild(&mut self, idx: NodeIndex, mut f: impl FnMut(NodeIndex) -> NodeIndex) -> NodeIndex {
        let Some(node) = self.get(idx) else {
            return idx;
        };
        let mut changed = false;
        let rebuilt = node.map_children(|child| {
            let new = f(child);
            changed |= new != child;
            new
        });
        if changed { self.add(rebuilt) } else { idx }
    }
}
