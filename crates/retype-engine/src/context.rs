//! Context classification of a matched call site.
//!
//! A call may only be replaced when its value is immediately constrained to
//! a type the replacement also satisfies. The classifier looks at the call's
//! direct syntactic parent, derives the type the parent requires, and
//! `qualifies` decides whether that type accepts the target class.

use crate::driver::SkipReason;
use crate::rule::RewriteRule;
use retype_tree::{Node, NodeArena, NodeIndex};
use retype_types::{TypeId, TypeInterner, fully_qualified_name, innermost_element_type};
use tracing::trace;

/// Direct parent of a call site, as far as classification is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntacticParent {
    /// Initializer of `variable`, declared by `decls` (NONE when unknown).
    VariableBinding { variable: NodeIndex, decls: NodeIndex },
    /// Right-hand side of an assignment.
    Assignment { assignment: NodeIndex },
    ReturnStatement { statement: NodeIndex },
    ArgumentOfCall { outer: NodeIndex, position: usize },
    ConstructorArgument { outer: NodeIndex, position: usize },
    ArrayElement { array: NodeIndex },
    Unsupported,
}

/// Classify the parent of the last node of `path`.
///
/// `path` runs from the root to the call site, using the indices of the
/// tree being traversed.
pub fn syntactic_parent(arena: &NodeArena, path: &[NodeIndex]) -> SyntacticParent {
    let [.., parent, call] = path else {
        return SyntacticParent::Unsupported;
    };
    let (parent, call) = (*parent, *call);
    match arena.get(parent) {
        Some(Node::NamedVariable(data)) if data.initializer == call => {
            let decls = match path {
                [.., decls, _, _] if arena.get_variable_decls(*decls).is_some() => *decls,
                _ => NodeIndex::NONE,
            };
            SyntacticParent::VariableBinding {
                variable: parent,
                decls,
            }
        }
        Some(Node::Assignment(data)) if data.value == call => SyntacticParent::Assignment {
            assignment: parent,
        },
        Some(Node::Return(data)) if data.expression == call => {
            SyntacticParent::ReturnStatement { statement: parent }
        }
        Some(Node::MethodInvocation(data)) => match data.args.position(call) {
            Some(position) => SyntacticParent::ArgumentOfCall {
                outer: parent,
                position,
            },
            // Receiver of a chained call
            None => SyntacticParent::Unsupported,
        },
        Some(Node::NewClass(data)) => match data.args.position(call) {
            Some(position) => SyntacticParent::ConstructorArgument {
                outer: parent,
                position,
            },
            None => SyntacticParent::Unsupported,
        },
        Some(Node::NewArray(data)) if data.initializer.position(call).is_some() => {
            SyntacticParent::ArrayElement { array: parent }
        }
        _ => SyntacticParent::Unsupported,
    }
}

fn known(ty: TypeId) -> Result<TypeId, SkipReason> {
    if ty.is_known() {
        Ok(ty)
    } else {
        Err(SkipReason::UnresolvedType)
    }
}

/// The type the call's parent requires of the call's value.
pub fn classify(
    arena: &NodeArena,
    path: &[NodeIndex],
    rule: &RewriteRule,
) -> Result<TypeId, SkipReason> {
    let parent = syntactic_parent(arena, path);
    trace!(?parent, "classified call site parent");
    match parent {
        SyntacticParent::VariableBinding { variable, decls } => {
            let bound = arena.type_of(variable);
            if bound.is_known() {
                return Ok(bound);
            }
            let declared = arena
                .get_variable_decls(decls)
                .map_or(TypeId::UNKNOWN, |d| arena.type_of(d.type_expr));
            known(declared)
        }
        SyntacticParent::Assignment { assignment } => {
            let Some(Node::Assignment(data)) = arena.get(assignment) else {
                return Err(SkipReason::UnsupportedContext);
            };
            match arena.get(data.target) {
                Some(Node::Identifier(target)) => known(target.variable_type),
                Some(Node::FieldAccess(target)) => known(target.ty),
                _ => Err(SkipReason::UnsupportedContext),
            }
        }
        SyntacticParent::ReturnStatement { .. } => classify_return(arena, path),
        SyntacticParent::ArgumentOfCall { outer, position } => {
            let shape = arena.get_call(outer).and_then(|c| c.method.as_ref());
            match shape {
                Some(method) if !method.params.is_empty() => match method.param(position) {
                    Some(param) => known(param),
                    None => Err(SkipReason::MalformedSignature),
                },
                _ if rule.strict_outer_calls => Err(SkipReason::UnresolvedType),
                // Unresolved outer signature: assume it accepts the source type.
                _ => Ok(rule.source_type(arena.types())),
            }
        }
        SyntacticParent::ConstructorArgument { outer, position } => {
            let Some(constructor) = arena.get_new_class(outer).and_then(|c| c.constructor.as_ref())
            else {
                return Err(SkipReason::UnresolvedType);
            };
            match constructor.param(position) {
                Some(param) => known(param),
                None => Err(SkipReason::MalformedSignature),
            }
        }
        SyntacticParent::ArrayElement { array } => {
            let element = innermost_element_type(arena.types(), arena.type_of(array));
            known(element)
        }
        SyntacticParent::Unsupported => Err(SkipReason::UnsupportedContext),
    }
}

/// Declared return type of the nearest enclosing method. Lambdas stop the
/// search and are not supported.
fn classify_return(arena: &NodeArena, path: &[NodeIndex]) -> Result<TypeId, SkipReason> {
    for &ancestor in path.iter().rev().skip(2) {
        match arena.get(ancestor) {
            Some(Node::MethodDecl(method)) => {
                if method.return_type_expr.is_none() {
                    return Err(SkipReason::UnresolvedType);
                }
                return known(arena.type_of(method.return_type_expr));
            }
            Some(Node::Lambda(_)) | Some(Node::CompilationUnit(_)) => break,
            _ => {}
        }
    }
    Err(SkipReason::UnsupportedContext)
}

/// `true` iff a value of the target class may flow where `required` is
/// expected without changing the program's typing: `required` is the target
/// class, `java.lang.Object`, or the source class itself.
pub fn qualifies(types: &TypeInterner, required: TypeId, rule: &RewriteRule) -> bool {
    match fully_qualified_name(types, required) {
        Some(name) => name == rule.target || name == rule.source || name == types.object_name(),
        None => false,
    }
}
