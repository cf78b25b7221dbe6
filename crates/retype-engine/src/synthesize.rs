//! Replacement synthesis: `Source.of(a, b)` becomes `Target.of(a, b)`.

use crate::driver::SkipReason;
use crate::rule::RewriteRule;
use retype_tree::{Node, NodeArena, NodeIndex};
use retype_types::{MethodShape, TypeId, TypeList, boxed_type, substitute_nominal};

/// A synthesized call, already pushed into the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replacement {
    pub node: NodeIndex,
    pub method: MethodShape,
    pub ty: TypeId,
}

/// Argument nodes of a call, without the placeholder of an empty list.
fn real_arguments(arena: &NodeArena, args: &[NodeIndex]) -> Vec<NodeIndex> {
    args.iter()
        .copied()
        .filter(|&arg| !matches!(arena.get(arg), Some(Node::Empty)))
        .collect()
}

/// Build the target-class call equivalent to `call`.
///
/// Argument nodes are reused in their original order. Each parameter type of
/// the new method shape is the argument's type, boxed when primitive; an
/// argument of unresolved type aborts synthesis.
pub fn synthesize(
    arena: &mut NodeArena,
    call: NodeIndex,
    rule: &RewriteRule,
) -> Result<Replacement, SkipReason> {
    let Some(data) = arena.get_call(call) else {
        return Err(SkipReason::UnsupportedContext);
    };
    let args = real_arguments(arena, &data.args.nodes);
    let old_return = match &data.method {
        Some(method) if data.ty.is_unknown() => method.return_type,
        _ => data.ty,
    };

    let types = arena.types_arc();
    let mut params = TypeList::with_capacity(args.len());
    for &arg in &args {
        let ty = arena.type_of(arg);
        if ty.is_unknown() {
            return Err(SkipReason::UnresolvedType);
        }
        params.push(boxed_type(&types, ty));
    }

    let target = rule.target_type(&types);
    let return_type = if old_return.is_known() {
        substitute_nominal(&types, old_return, rule.source, rule.target)
    } else {
        target
    };
    let method = MethodShape::new(target, rule.factory_method, params, return_type);

    let receiver = arena.add_type_reference(target);
    let name = types.resolve_name(rule.factory_method);
    let node = arena.add_method_invocation(receiver, &name, args, Some(method.clone()), return_type);
    Ok(Replacement {
        node,
        method,
        ty: return_type,
    })
}
