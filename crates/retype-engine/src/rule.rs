//! Rewrite rules.

use retype_common::Atom;
use retype_types::{TypeId, TypeInterner};
use std::sync::Arc;

pub const DEFAULT_FACTORY_METHOD: &str = "of";

/// One deprecated factory (`source.factory_method(..)`) and its modern
/// equivalent on `target`.
///
/// Names are atoms in the session's `TypeInterner`, so a rule is only
/// meaningful for arenas sharing that interner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteRule {
    pub source: Atom,
    pub target: Atom,
    pub factory_method: Atom,
    /// Treat an argument of an unresolved outer call as unresolved instead of
    /// assuming the outer parameter accepts the source type.
    pub strict_outer_calls: bool,
}

impl RewriteRule {
    pub fn new(types: &TypeInterner, source: &str, target: &str) -> Self {
        RewriteRule {
            source: types.intern_name(source),
            target: types.intern_name(target),
            factory_method: types.intern_name(DEFAULT_FACTORY_METHOD),
            strict_outer_calls: false,
        }
    }

    pub fn with_factory_method(mut self, types: &TypeInterner, name: &str) -> Self {
        self.factory_method = types.intern_name(name);
        self
    }

    pub fn with_strict_outer_calls(mut self, strict: bool) -> Self {
        self.strict_outer_calls = strict;
        self
    }

    #[inline]
    pub fn source_type(&self, types: &TypeInterner) -> TypeId {
        types.nominal_atom(self.source)
    }

    #[inline]
    pub fn target_type(&self, types: &TypeInterner) -> TypeId {
        types.nominal_atom(self.target)
    }

    pub fn source_name(&self, types: &TypeInterner) -> Arc<str> {
        types.resolve_name(self.source)
    }

    pub fn target_name(&self, types: &TypeInterner) -> Arc<str> {
        types.resolve_name(self.target)
    }
}
