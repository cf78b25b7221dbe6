//! Node data definitions.
//!
//! The tree models the Java subset the migration engine needs: declarations,
//! the statements that can host a call site, the expressions that can be a
//! call's direct parent, and type trees for declared types. Every expression
//! carries its resolved `TypeId` (`TypeId::UNKNOWN` when unresolved).

use super::base::{NodeIndex, NodeList, map_opt};
use retype_common::interner::Atom;
use retype_types::{MethodShape, TypeId, TypeInterner};
use std::sync::Arc;

/// Append-only node storage for one compilation unit.
///
/// Names are interned in the shared `TypeInterner`, so atoms in nodes and in
/// type data come from the same pool.
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
    pub(crate) types: Arc<TypeInterner>,
}

/// Discriminant of a `Node`, for cheap kind checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    Import,
    ClassDecl,
    MethodDecl,
    Block,
    VariableDecls,
    NamedVariable,
    ExpressionStatement,
    Return,
    Lambda,
    Assignment,
    Identifier,
    FieldAccess,
    MethodInvocation,
    NewClass,
    NewArray,
    Ternary,
    Literal,
    Empty,
    TypeIdentifier,
    ParameterizedType,
    ArrayType,
}

#[derive(Clone, Debug)]
pub enum Node {
    CompilationUnit(CompilationUnitData),
    Import(ImportData),
    ClassDecl(ClassData),
    MethodDecl(MethodDeclData),
    Block(BlockData),
    VariableDecls(VariableDeclsData),
    NamedVariable(NamedVariableData),
    ExpressionStatement(ExprStatementData),
    Return(ReturnData),
    Lambda(LambdaData),
    Assignment(AssignmentData),
    Identifier(IdentifierData),
    FieldAccess(FieldAccessData),
    MethodInvocation(CallData),
    NewClass(NewClassData),
    NewArray(NewArrayData),
    Ternary(TernaryData),
    Literal(LiteralData),
    /// Placeholder argument of a zero-argument call (`of()`).
    Empty,
    TypeIdentifier(TypeIdentifierData),
    ParameterizedType(ParameterizedTypeData),
    ArrayType(ArrayTypeData),
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Clone, Debug)]
pub struct CompilationUnitData {
    pub source_path: String,
    /// Declared language level (`8`, `11`, `17`, ...), if known.
    pub java_version: Option<u32>,
    pub package: Option<Atom>,
    pub imports: NodeList,
    pub classes: NodeList,
}

#[derive(Clone, Debug)]
pub struct ImportData {
    pub qualified_name: Atom,
    pub is_static: bool,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: Atom,
    pub ty: TypeId,
    /// Field declarations (`VariableDecls`) and methods.
    pub members: NodeList,
}

#[derive(Clone, Debug)]
pub struct MethodDeclData {
    pub name: Atom,
    /// Declared return type tree; NONE for constructors and `void`.
    pub return_type_expr: NodeIndex,
    /// One `VariableDecls` per parameter.
    pub params: NodeList,
    /// Body block; NONE for abstract methods.
    pub body: NodeIndex,
    pub is_constructor: bool,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug)]
pub struct BlockData {
    pub statements: NodeList,
}

/// `Type a = init, b;` - the declaration a call site's type propagates into.
#[derive(Clone, Debug)]
pub struct VariableDeclsData {
    pub type_expr: NodeIndex,
    /// `NamedVariable` nodes, in source order.
    pub variables: NodeList,
}

#[derive(Clone, Debug)]
pub struct NamedVariableData {
    pub name: Atom,
    pub ty: TypeId,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExprStatementData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ReturnData {
    /// NONE for a bare `return;`.
    pub expression: NodeIndex,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Clone, Debug)]
pub struct LambdaData {
    /// `NamedVariable` parameters.
    pub params: NodeList,
    /// A `Block` or a single expression.
    pub body: NodeIndex,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct AssignmentData {
    pub target: NodeIndex,
    pub value: NodeIndex,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub name: Atom,
    pub ty: TypeId,
    /// Declared type of the variable this name refers to, UNKNOWN when the
    /// name is not a resolved variable (e.g. a type name used as receiver).
    pub variable_type: TypeId,
}

#[derive(Clone, Debug)]
pub struct FieldAccessData {
    pub target: NodeIndex,
    pub name: Atom,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct CallData {
    /// Receiver expression; NONE for an unqualified call.
    pub select: NodeIndex,
    pub name: Atom,
    pub args: NodeList,
    /// Resolved target method, if the call could be attributed.
    pub method: Option<MethodShape>,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct NewClassData {
    pub class_type: NodeIndex,
    pub args: NodeList,
    pub constructor: Option<MethodShape>,
    pub ty: TypeId,
}

/// Array literal `new T[]{a, b}`; `ty` is the array type.
#[derive(Clone, Debug)]
pub struct NewArrayData {
    pub initializer: NodeList,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct TernaryData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct LiteralData {
    /// Literal exactly as written (`"a"`, `'c'`, `42L`, `true`).
    pub source: String,
    pub ty: TypeId,
}

// =============================================================================
// Type trees
// =============================================================================

#[derive(Clone, Debug)]
pub struct TypeIdentifierData {
    /// Name as written in source (usually the simple name).
    pub name: Atom,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct ParameterizedTypeData {
    /// A `TypeIdentifier`.
    pub base: NodeIndex,
    pub args: NodeList,
    pub ty: TypeId,
}

#[derive(Clone, Debug)]
pub struct ArrayTypeData {
    pub element: NodeIndex,
    pub ty: TypeId,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::CompilationUnit(_) => NodeKind::CompilationUnit,
            Node::Import(_) => NodeKind::Import,
            Node::ClassDecl(_) => NodeKind::ClassDecl,
            Node::MethodDecl(_) => NodeKind::MethodDecl,
            Node::Block(_) => NodeKind::Block,
            Node::VariableDecls(_) => NodeKind::VariableDecls,
            Node::NamedVariable(_) => NodeKind::NamedVariable,
            Node::ExpressionStatement(_) => NodeKind::ExpressionStatement,
            Node::Return(_) => NodeKind::Return,
            Node::Lambda(_) => NodeKind::Lambda,
            Node::Assignment(_) => NodeKind::Assignment,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::FieldAccess(_) => NodeKind::FieldAccess,
            Node::MethodInvocation(_) => NodeKind::MethodInvocation,
            Node::NewClass(_) => NodeKind::NewClass,
            Node::NewArray(_) => NodeKind::NewArray,
            Node::Ternary(_) => NodeKind::Ternary,
            Node::Literal(_) => NodeKind::Literal,
            Node::Empty => NodeKind::Empty,
            Node::TypeIdentifier(_) => NodeKind::TypeIdentifier,
            Node::ParameterizedType(_) => NodeKind::ParameterizedType,
            Node::ArrayType(_) => NodeKind::ArrayType,
        }
    }

    /// Resolved type of an expression or type tree; UNKNOWN for other nodes.
    pub fn ty(&self) -> TypeId {
        match self {
            Node::Lambda(data) => data.ty,
            Node::Assignment(data) => data.ty,
            Node::Identifier(data) => data.ty,
            Node::FieldAccess(data) => data.ty,
            Node::MethodInvocation(data) => data.ty,
            Node::NewClass(data) => data.ty,
            Node::NewArray(data) => data.ty,
            Node::Ternary(data) => data.ty,
            Node::Literal(data) => data.ty,
            Node::TypeIdentifier(data) => data.ty,
            Node::ParameterizedType(data) => data.ty,
            Node::ArrayType(data) => data.ty,
            Node::NamedVariable(data) => data.ty,
            Node::ClassDecl(data) => data.ty,
            _ => TypeId::UNKNOWN,
        }
    }

    /// Children in source order, absent slots skipped.
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        self.for_each_child(|child| out.push(child));
        out
    }

    pub fn for_each_child(&self, mut f: impl FnMut(NodeIndex)) {
        let mut push = |idx: NodeIndex| {
            if idx.is_some() {
                f(idx);
            }
        };
        match self {
            Node::CompilationUnit(data) => {
                data.imports.nodes.iter().for_each(|&n| push(n));
                data.classes.nodes.iter().for_each(|&n| push(n));
            }
            Node::ClassDecl(data) => data.members.nodes.iter().for_each(|&n| push(n)),
            Node::MethodDecl(data) => {
                push(data.return_type_expr);
                data.params.nodes.iter().for_each(|&n| push(n));
                push(data.body);
            }
            Node::Block(data) => data.statements.nodes.iter().for_each(|&n| push(n)),
            Node::VariableDecls(data) => {
                push(data.type_expr);
                data.variables.nodes.iter().for_each(|&n| push(n));
            }
            Node::NamedVariable(data) => push(data.initializer),
            Node::ExpressionStatement(data) => push(data.expression),
            Node::Return(data) => push(data.expression),
            Node::Lambda(data) => {
                data.params.nodes.iter().for_each(|&n| push(n));
                push(data.body);
            }
            Node::Assignment(data) => {
                push(data.target);
                push(data.value);
            }
            Node::FieldAccess(data) => push(data.target),
            Node::MethodInvocation(data) => {
                push(data.select);
                data.args.nodes.iter().for_each(|&n| push(n));
            }
            Node::NewClass(data) => {
                push(data.class_type);
                data.args.nodes.iter().for_each(|&n| push(n));
            }
            Node::NewArray(data) => data.initializer.nodes.iter().for_each(|&n| push(n)),
            Node::Ternary(data) => {
                push(data.condition);
                push(data.when_true);
                push(data.when_false);
            }
            Node::ParameterizedType(data) => {
                push(data.base);
                data.args.nodes.iter().for_each(|&n| push(n));
            }
            Node::ArrayType(data) => push(data.element),
            Node::Import(_)
            | Node::Identifier(_)
            | Node::Literal(_)
            | Node::Empty
            | Node::TypeIdentifier(_) => {}
        }
    }

    /// Copy of this node with every present child slot passed through `f`.
    ///
    /// The traversal order matches `children()`.
    pub fn map_children(&self, mut f: impl FnMut(NodeIndex) -> NodeIndex) -> Node {
        let f = &mut f;
        match self {
            Node::CompilationUnit(data) => Node::CompilationUnit(CompilationUnitData {
                imports: data.imports.map(f),
                classes: data.classes.map(f),
                ..data.clone()
            }),
            Node::ClassDecl(data) => Node::ClassDecl(ClassData {
                members: data.members.map(f),
                ..data.clone()
            }),
            Node::MethodDecl(data) => {
                let return_type_expr = map_opt(data.return_type_expr, f);
                let params = data.params.map(f);
                let body = map_opt(data.body, f);
                Node::MethodDecl(MethodDeclData {
                    return_type_expr,
                    params,
                    body,
                    ..data.clone()
                })
            }
            Node::Block(data) => Node::Block(BlockData {
                statements: data.statements.map(f),
            }),
            Node::VariableDecls(data) => {
                let type_expr = map_opt(data.type_expr, f);
                let variables = data.variables.map(f);
                Node::VariableDecls(VariableDeclsData {
                    type_expr,
                    variables,
                })
            }
            Node::NamedVariable(data) => Node::NamedVariable(NamedVariableData {
                initializer: map_opt(data.initializer, f),
                ..data.clone()
            }),
            Node::ExpressionStatement(data) => Node::ExpressionStatement(ExprStatementData {
                expression: map_opt(data.expression, f),
            }),
            Node::Return(data) => Node::Return(ReturnData {
                expression: map_opt(data.expression, f),
            }),
            Node::Lambda(data) => {
                let params = data.params.map(f);
                let body = map_opt(data.body, f);
                Node::Lambda(LambdaData {
                    params,
                    body,
                    ty: data.ty,
                })
            }
            Node::Assignment(data) => {
                let target = map_opt(data.target, f);
                let value = map_opt(data.value, f);
                Node::Assignment(AssignmentData {
                    target,
                    value,
                    ty: data.ty,
                })
            }
            Node::FieldAccess(data) => Node::FieldAccess(FieldAccessData {
                target: map_opt(data.target, f),
                ..data.clone()
            }),
            Node::MethodInvocation(data) => {
                let select = map_opt(data.select, f);
                let args = data.args.map(f);
                Node::MethodInvocation(CallData {
                    select,
                    args,
                    ..data.clone()
                })
            }
            Node::NewClass(data) => {
                let class_type = map_opt(data.class_type, f);
                let args = data.args.map(f);
                Node::NewClass(NewClassData {
                    class_type,
                    args,
                    ..data.clone()
                })
            }
            Node::NewArray(data) => Node::NewArray(NewArrayData {
                initializer: data.initializer.map(f),
                ty: data.ty,
            }),
            Node::Ternary(data) => {
                let condition = map_opt(data.condition, f);
                let when_true = map_opt(data.when_true, f);
                let when_false = map_opt(data.when_false, f);
                Node::Ternary(TernaryData {
                    condition,
                    when_true,
                    when_false,
                    ty: data.ty,
                })
            }
            Node::ParameterizedType(data) => {
                let base = map_opt(data.base, f);
                let args = data.args.map(f);
                Node::ParameterizedType(ParameterizedTypeData {
                    base,
                    args,
                    ty: data.ty,
                })
            }
            Node::ArrayType(data) => Node::ArrayType(ArrayTypeData {
                element: map_opt(data.element, f),
                ty: data.ty,
            }),
            Node::Import(_)
            | Node::Identifier(_)
            | Node::Literal(_)
            | Node::Empty
            | Node::TypeIdentifier(_) => self.clone(),
        }
    }
}
