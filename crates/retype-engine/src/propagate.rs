//! Propagation of a rewritten initializer's type into its declaration.
//!
//! `ImmutableList<String> x = ImmutableList.of("a")` becomes
//! `List<String> x = List.of("a")`: once the initializer is rewritten the
//! declared type still names the source class, so the declaration's type
//! tree and its bound names are rebuilt around the target class.

use crate::rule::RewriteRule;
use retype_common::limits::MAX_TYPE_NESTING_DEPTH;
use retype_tree::{
    ArrayTypeData, NamedVariableData, Node, NodeArena, NodeIndex, NodeList, ParameterizedTypeData,
    TypeIdentifierData, VariableDeclsData,
};
use retype_types::{is_of_class_type, short_name, substitute_nominal};
use tracing::debug;

/// Rewrite the declared type of `decls` from the source class to the target
/// class. Returns the new declaration, or `None` when the declared type is
/// not of the source class.
pub fn propagate(arena: &mut NodeArena, decls: NodeIndex, rule: &RewriteRule) -> Option<NodeIndex> {
    let data = arena.get_variable_decls(decls)?.clone();
    let types = arena.types_arc();
    let declared = arena.type_of(data.type_expr);
    if !is_of_class_type(&types, declared, rule.source) {
        return None;
    }

    let new_declared = substitute_nominal(&types, declared, rule.source, rule.target);
    let type_expr = rewrite_type_tree(arena, data.type_expr, rule, 0);

    let mut variables = Vec::with_capacity(data.variables.len());
    for &variable in &data.variables.nodes {
        let updated = match arena.get_named_variable(variable) {
            Some(var) if var.ty != new_declared => {
                let node = Node::NamedVariable(NamedVariableData {
                    ty: new_declared,
                    ..var.clone()
                });
                arena.add(node)
            }
            _ => variable,
        };
        variables.push(updated);
    }

    debug!(
        decls = decls.0,
        variables = variables.len(),
        "propagated target type into declaration"
    );
    Some(arena.add(Node::VariableDecls(VariableDeclsData {
        type_expr,
        variables: NodeList::from(variables),
    })))
}

/// Rebuild a type tree with every source-class name replaced by the target
/// class's simple name. Unchanged subtrees are shared.
fn rewrite_type_tree(arena: &mut NodeArena, idx: NodeIndex, rule: &RewriteRule, depth: u32) -> NodeIndex {
    if depth >= MAX_TYPE_NESTING_DEPTH {
        return idx;
    }
    let types = arena.types_arc();
    let Some(node) = arena.get(idx).cloned() else {
        return idx;
    };
    match node {
        Node::TypeIdentifier(data) => {
            if !is_of_class_type(&types, data.ty, rule.source) {
                return idx;
            }
            let target = types.resolve_name(rule.target);
            let name = types.intern_name(short_name(&target));
            let ty = substitute_nominal(&types, data.ty, rule.source, rule.target);
            arena.add(Node::TypeIdentifier(TypeIdentifierData { name, ty }))
        }
        Node::ParameterizedType(data) => {
            let base = rewrite_type_tree(arena, data.base, rule, depth + 1);
            let args: Vec<NodeIndex> = data
                .args
                .nodes
                .iter()
                .map(|&arg| rewrite_type_tree(arena, arg, rule, depth + 1))
                .collect();
            if base == data.base && args == data.args.nodes {
                return idx;
            }
            let ty = substitute_nominal(&types, data.ty, rule.source, rule.target);
            arena.add(Node::ParameterizedType(ParameterizedTypeData {
                base,
                args: NodeList::from(args),
                ty,
            }))
        }
        Node::ArrayType(data) => {
            let element = rewrite_type_tree(arena, data.element, rule, depth + 1);
            if element == data.element {
                return idx;
            }
            let ty = substitute_nominal(&types, data.ty, rule.source, rule.target);
            arena.add(Node::ArrayType(ArrayTypeData { element, ty }))
        }
        _ => idx,
    }
}
