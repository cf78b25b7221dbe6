//! Core type representation.

use retype_common::interner::Atom;
use serde::Serialize;
use smallvec::SmallVec;

/// Interned type handle.
///
/// Two `TypeId`s are equal iff the types they describe are structurally
/// equal, so `==` is the type equality used by every matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The type could not be statically determined.
    pub const UNKNOWN: TypeId = TypeId(0);

    pub const BOOLEAN: TypeId = TypeId(1);
    pub const BYTE: TypeId = TypeId(2);
    pub const CHAR: TypeId = TypeId(3);
    pub const DOUBLE: TypeId = TypeId(4);
    pub const FLOAT: TypeId = TypeId(5);
    pub const INT: TypeId = TypeId(6);
    pub const LONG: TypeId = TypeId(7);
    pub const SHORT: TypeId = TypeId(8);
    /// Type of a string literal before it is widened to `java.lang.String`.
    pub const STRING_LITERAL: TypeId = TypeId(9);

    /// `java.lang.Object`, the universal top type.
    pub const OBJECT: TypeId = TypeId(10);

    /// First id handed out for non-builtin types.
    pub const FIRST_USER: u32 = 11;

    #[inline]
    pub const fn is_unknown(self) -> bool {
        self.0 == Self::UNKNOWN.0
    }

    #[inline]
    pub const fn is_known(self) -> bool {
        !self.is_unknown()
    }
}

/// Primitive kinds. Each has exactly one boxed nominal counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    /// The string-literal type.
    String,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Double,
        PrimitiveKind::Float,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Short,
        PrimitiveKind::String,
    ];

    /// Source keyword. The string-literal kind is spelled `String`; the
    /// nominal `java.lang.String` must be written fully qualified.
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Short => "short",
            PrimitiveKind::String => "String",
        }
    }

    /// Fully-qualified name of the boxed counterpart.
    pub const fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Double => "java.lang.Double",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::String => "java.lang.String",
        }
    }

    /// Fixed id of this primitive in every `TypeInterner`.
    pub const fn type_id(self) -> TypeId {
        match self {
            PrimitiveKind::Boolean => TypeId::BOOLEAN,
            PrimitiveKind::Byte => TypeId::BYTE,
            PrimitiveKind::Char => TypeId::CHAR,
            PrimitiveKind::Double => TypeId::DOUBLE,
            PrimitiveKind::Float => TypeId::FLOAT,
            PrimitiveKind::Int => TypeId::INT,
            PrimitiveKind::Long => TypeId::LONG,
            PrimitiveKind::Short => TypeId::SHORT,
            PrimitiveKind::String => TypeId::STRING_LITERAL,
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
    }
}

/// Ordered type argument / parameter list.
pub type TypeList = SmallVec<[TypeId; 2]>;

/// Structural type data behind a `TypeId`.
///
/// Only `TypeInterner` constructs interned values; callers go through its
/// `nominal`/`array`/`parameterized` constructors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Unknown,
    Primitive(PrimitiveKind),
    /// Class or interface type by fully-qualified name.
    Nominal(Atom),
    Array(TypeId),
    /// Generic application `base<args..>`; `base` is fully qualified.
    Parameterized { base: Atom, args: TypeList },
}

/// Resolved method-reference metadata of a call or constructor invocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodShape {
    pub declaring_type: TypeId,
    pub name: Atom,
    pub params: TypeList,
    pub return_type: TypeId,
}

impl MethodShape {
    pub fn new(
        declaring_type: TypeId,
        name: Atom,
        params: impl IntoIterator<Item = TypeId>,
        return_type: TypeId,
    ) -> Self {
        MethodShape {
            declaring_type,
            name,
            params: params.into_iter().collect(),
            return_type,
        }
    }

    /// Parameter type at `position`, if the signature has one there.
    #[inline]
    pub fn param(&self, position: usize) -> Option<TypeId> {
        self.params.get(position).copied()
    }
}
