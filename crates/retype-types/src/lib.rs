//! Type Descriptor Model
//!
//! Normalized, interned representation of Java value types:
//!
//! - **`TypeId`**: a u32 handle; structural equality is `TypeId` equality
//! - **`TypeData`**: nominal class, primitive, array, or parameterized type
//! - **`TypeInterner`**: concurrent interner shared by all units of a session
//! - **Visitors**: nominal substitution, reference search, boxing
//!
//! Primitive kinds and `java.lang.Object` live at fixed ids so the engine can
//! compare against them without a lookup.

mod format;
mod intern;
mod parse;
pub mod types;
pub mod visitor;

pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use parse::{TypeParseError, parse_type};
pub use types::{MethodShape, PrimitiveKind, TypeData, TypeId, TypeList};
pub use visitor::{
    boxed_type, contains_nominal, fully_qualified_name, innermost_element_type, is_of_class_type,
    primitive_kind, short_name, substitute_nominal,
};

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod intern_tests;
#[cfg(test)]
#[path = "tests/visitor_tests.rs"]
mod visitor_tests;
#[cfg(test)]
#[path = "tests/parse_tests.rs"]
mod parse_tests;
