//! Type interning for structural deduplication.
//!
//! Builtin types are registered at fixed ids on construction; everything else
//! gets the next free id the first time it is interned. Lookups by id are a
//! vector index under a read lock, lookups by structure go through a
//! `DashMap`, so a single interner can be shared by units migrated on
//! different threads.

use crate::types::{PrimitiveKind, TypeData, TypeId, TypeList};
use dashmap::DashMap;
use retype_common::interner::{Atom, ShardedInterner};
use rustc_hash::FxBuildHasher;
use std::sync::{PoisonError, RwLock};

const OBJECT_NAME: &str = "java.lang.Object";

pub struct TypeInterner {
    names: ShardedInterner,
    types: RwLock<Vec<TypeData>>,
    ids: DashMap<TypeData, TypeId, FxBuildHasher>,
}

impl TypeInterner {
    pub fn new() -> Self {
        let interner = TypeInterner {
            names: ShardedInterner::new(),
            types: RwLock::new(Vec::with_capacity(64)),
            ids: DashMap::with_hasher(FxBuildHasher),
        };
        interner.names.intern_common();

        let unknown = interner.intern(TypeData::Unknown);
        debug_assert_eq!(unknown, TypeId::UNKNOWN);
        for kind in PrimitiveKind::ALL {
            let id = interner.intern(TypeData::Primitive(kind));
            debug_assert_eq!(id, kind.type_id());
        }
        let object = interner.nominal(OBJECT_NAME);
        debug_assert_eq!(object, TypeId::OBJECT);
        debug_assert_eq!(interner.len() as u32, TypeId::FIRST_USER);

        interner
    }

    // =========================================================================
    // Names
    // =========================================================================

    #[inline]
    pub fn intern_name(&self, name: &str) -> Atom {
        self.names.intern(name)
    }

    #[inline]
    pub fn lookup_name(&self, name: &str) -> Option<Atom> {
        self.names.lookup(name)
    }

    #[inline]
    pub fn resolve_name(&self, atom: Atom) -> std::sync::Arc<str> {
        self.names.resolve(atom)
    }

    /// Atom of `java.lang.Object`.
    pub fn object_name(&self) -> Atom {
        self.names.intern(OBJECT_NAME)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = self.ids.get(&data) {
            return *id;
        }
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have interned the same data while we waited.
        if let Some(id) = self.ids.get(&data) {
            return *id;
        }
        let id = TypeId(types.len() as u32);
        types.push(data.clone());
        self.ids.insert(data, id);
        id
    }

    /// Structural data behind `id`, or `None` for an id this interner never
    /// handed out.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeId {
        kind.type_id()
    }

    pub fn nominal(&self, fq_name: &str) -> TypeId {
        let atom = self.names.intern(fq_name);
        self.nominal_atom(atom)
    }

    pub fn nominal_atom(&self, fq_name: Atom) -> TypeId {
        if fq_name.is_none() {
            return TypeId::UNKNOWN;
        }
        self.intern(TypeData::Nominal(fq_name))
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        if element.is_unknown() {
            return TypeId::UNKNOWN;
        }
        self.intern(TypeData::Array(element))
    }

    /// `base<args..>`. An empty argument list collapses to the raw nominal.
    pub fn parameterized(&self, base: Atom, args: impl Into<TypeList>) -> TypeId {
        let args = args.into();
        if args.is_empty() {
            return self.nominal_atom(base);
        }
        if base.is_none() {
            return TypeId::UNKNOWN;
        }
        self.intern(TypeData::Parameterized { base, args })
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}
