//! Queries and rewrites over type descriptors.
//!
//! These are free functions over `&TypeInterner`, independent of any syntax
//! tree. The recursive walks are bounded by `MAX_TYPE_NESTING_DEPTH` and
//! return their input unchanged past that depth.

use crate::intern::TypeInterner;
use crate::types::{PrimitiveKind, TypeData, TypeId, TypeList};
use retype_common::interner::Atom;
use retype_common::limits::MAX_TYPE_NESTING_DEPTH;

/// Fully-qualified class name of a nominal or parameterized type.
///
/// Primitives, arrays, and unknown types have none.
pub fn fully_qualified_name(db: &TypeInterner, ty: TypeId) -> Option<Atom> {
    match db.lookup(ty)? {
        TypeData::Nominal(name) => Some(name),
        TypeData::Parameterized { base, .. } => Some(base),
        _ => None,
    }
}

/// `true` iff `ty` is the class `fq_name`, raw or parameterized.
pub fn is_of_class_type(db: &TypeInterner, ty: TypeId, fq_name: Atom) -> bool {
    !fq_name.is_none() && fully_qualified_name(db, ty) == Some(fq_name)
}

pub fn primitive_kind(db: &TypeInterner, ty: TypeId) -> Option<PrimitiveKind> {
    match db.lookup(ty)? {
        TypeData::Primitive(kind) => Some(kind),
        _ => None,
    }
}

/// Strip every array dimension: `int[][]` becomes `int`.
pub fn innermost_element_type(db: &TypeInterner, ty: TypeId) -> TypeId {
    let mut current = ty;
    for _ in 0..MAX_TYPE_NESTING_DEPTH {
        match db.lookup(current) {
            Some(TypeData::Array(element)) => current = element,
            _ => return current,
        }
    }
    current
}

/// Boxed nominal for a primitive, the type itself otherwise.
pub fn boxed_type(db: &TypeInterner, ty: TypeId) -> TypeId {
    match primitive_kind(db, ty) {
        Some(kind) => db.nominal(kind.boxed_name()),
        None => ty,
    }
}

/// Replace every occurrence of the class `from` with `to`, at any depth of
/// array element and type argument nesting. Other types are kept as-is.
pub fn substitute_nominal(db: &TypeInterner, ty: TypeId, from: Atom, to: Atom) -> TypeId {
    substitute_nominal_inner(db, ty, from, to, 0)
}

fn substitute_nominal_inner(
    db: &TypeInterner,
    ty: TypeId,
    from: Atom,
    to: Atom,
    depth: u32,
) -> TypeId {
    if depth >= MAX_TYPE_NESTING_DEPTH {
        return ty;
    }
    let Some(data) = db.lookup(ty) else {
        return ty;
    };
    match data {
        TypeData::Nominal(name) if name == from => db.nominal_atom(to),
        TypeData::Array(element) => {
            let new_element = substitute_nominal_inner(db, element, from, to, depth + 1);
            if new_element == element {
                ty
            } else {
                db.array(new_element)
            }
        }
        TypeData::Parameterized { base, args } => {
            let new_args: TypeList = args
                .iter()
                .map(|&arg| substitute_nominal_inner(db, arg, from, to, depth + 1))
                .collect();
            let new_base = if base == from { to } else { base };
            if new_base == base && new_args == args {
                ty
            } else {
                db.parameterized(new_base, new_args)
            }
        }
        TypeData::Unknown | TypeData::Primitive(_) | TypeData::Nominal(_) => ty,
    }
}

/// `true` if the class `fq_name` occurs anywhere inside `ty`.
pub fn contains_nominal(db: &TypeInterner, ty: TypeId, fq_name: Atom) -> bool {
    contains_nominal_inner(db, ty, fq_name, 0)
}

fn contains_nominal_inner(db: &TypeInterner, ty: TypeId, fq_name: Atom, depth: u32) -> bool {
    if depth >= MAX_TYPE_NESTING_DEPTH {
        return false;
    }
    match db.lookup(ty) {
        Some(TypeData::Nominal(name)) => name == fq_name,
        Some(TypeData::Array(element)) => contains_nominal_inner(db, element, fq_name, depth + 1),
        Some(TypeData::Parameterized { base, args }) => {
            base == fq_name
                || args
                    .iter()
                    .any(|&arg| contains_nominal_inner(db, arg, fq_name, depth + 1))
        }
        _ => false,
    }
}

/// Simple name of a fully-qualified class name: `java.util.List` -> `List`.
pub fn short_name(fq_name: &str) -> &str {
    match fq_name.rfind('.') {
        Some(dot) => &fq_name[dot + 1..],
        None => fq_name,
    }
}
