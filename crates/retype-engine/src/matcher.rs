//! Signature matching of candidate call sites.

use crate::rule::RewriteRule;
use retype_tree::{CallData, NodeArena};
use retype_types::{TypeId, fully_qualified_name};

/// Declaring class of a call: the resolved method's declaring type, or the
/// receiver's type when the receiver is a class name (`ImmutableList.of`).
pub fn declaring_type(arena: &NodeArena, call: &CallData) -> TypeId {
    if let Some(method) = &call.method
        && method.declaring_type.is_known()
    {
        return method.declaring_type;
    }
    match arena.get_identifier(call.select) {
        Some(receiver) if receiver.variable_type.is_unknown() => receiver.ty,
        _ => TypeId::UNKNOWN,
    }
}

/// `true` iff `call` is `rule.source.<factory>(..)` with any number of
/// arguments. The declaring class must be exactly the source class.
pub fn matches(arena: &NodeArena, call: &CallData, rule: &RewriteRule) -> bool {
    if call.name != rule.factory_method {
        return false;
    }
    let declaring = declaring_type(arena, call);
    fully_qualified_name(arena.types(), declaring) == Some(rule.source)
}
