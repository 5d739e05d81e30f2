//! Type representation stored in the pool.
//!
//! `TypeData` is the structure behind a `TypeId`. Children are `TypeId`s,
//! so equality of compound types is equality of their ids.

use keel_ir::{Name, TypeId};

/// Builtin types, pre-interned at the fixed ids declared on [`TypeId`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Primitive {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    Char,
    Str,
    Void,
    IntPtr,
    UIntPtr,
    Object,
    Null,
    Type,
}

impl Primitive {
    /// Every builtin, in id order.
    pub const ALL: [Primitive; 20] = [
        Primitive::Bool,
        Primitive::I8,
        Primitive::U8,
        Primitive::I16,
        Primitive::U16,
        Primitive::I32,
        Primitive::U32,
        Primitive::I64,
        Primitive::U64,
        Primitive::F32,
        Primitive::F64,
        Primitive::Decimal,
        Primitive::Char,
        Primitive::Str,
        Primitive::Void,
        Primitive::IntPtr,
        Primitive::UIntPtr,
        Primitive::Object,
        Primitive::Null,
        Primitive::Type,
    ];

    #[inline]
    pub const fn type_id(self) -> TypeId {
        TypeId::from_raw(self as u32)
    }

    /// The builtin an id denotes, if it is pre-interned.
    #[inline]
    pub fn from_type_id(id: TypeId) -> Option<Primitive> {
        if id.is_builtin() {
            Self::ALL.get(id.raw() as usize).copied()
        } else {
            None
        }
    }

    /// Integers, including `char` and the native-size integers.
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Primitive::I8
                | Primitive::U8
                | Primitive::I16
                | Primitive::U16
                | Primitive::I32
                | Primitive::U32
                | Primitive::I64
                | Primitive::U64
                | Primitive::Char
                | Primitive::IntPtr
                | Primitive::UIntPtr
        )
    }

    pub const fn is_floating(self) -> bool {
        matches!(self, Primitive::F32 | Primitive::F64)
    }

    /// Integral, floating or decimal.
    pub const fn is_numeric(self) -> bool {
        self.is_integral() || self.is_floating() || matches!(self, Primitive::Decimal)
    }

    /// Builtins with value semantics.
    pub const fn is_value_type(self) -> bool {
        self.is_numeric() || matches!(self, Primitive::Bool)
    }

    pub const fn is_reference_type(self) -> bool {
        matches!(
            self,
            Primitive::Str | Primitive::Object | Primitive::Null | Primitive::Type
        )
    }
}

/// Library-recognized generic templates.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Template {
    /// `T?`: a value type plus an empty state.
    Nullable,
    /// A value-type value that may be absent, stored by reference.
    Boxed,
    /// A reference statically known not to be null.
    NonNull,
    /// A reference whose dynamic type equals its static type.
    Invariant,
    /// Zero-or-more stream.
    Sequence,
    /// One-or-more stream.
    NonEmptySequence,
    /// Cursor over a sequence.
    Enumerator,
    /// Growable list.
    List,
    /// A user-declared generic type.
    Named(Name),
}

impl Template {
    /// Single-argument wrappers whose values hold exactly one payload.
    pub const fn is_wrapper(self) -> bool {
        matches!(self, Template::Boxed | Template::NonNull | Template::Invariant)
    }

    pub const fn is_stream(self) -> bool {
        matches!(self, Template::Sequence | Template::NonEmptySequence)
    }

    pub const fn is_value_type(self) -> bool {
        matches!(
            self,
            Template::Nullable
                | Template::Boxed
                | Template::NonNull
                | Template::Invariant
                | Template::NonEmptySequence
        )
    }

    pub const fn is_interface(self) -> bool {
        matches!(self, Template::Sequence | Template::Enumerator)
    }
}

/// One tuple field. `name` is [`Name::EMPTY`] for anonymous fields.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TupleField {
    pub name: Name,
    pub ty: TypeId,
}

impl TupleField {
    pub const fn anonymous(ty: TypeId) -> Self {
        TupleField {
            name: Name::EMPTY,
            ty,
        }
    }

    pub const fn named(name: Name, ty: TypeId) -> Self {
        TupleField { name, ty }
    }

    #[inline]
    pub const fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }
}

/// Structure of an interned type.
///
/// Nominal types (`Class`, `Interface`, `Struct`, `Enum`) carry only their
/// name; hierarchy and members are answered by a
/// [`TypeDirectory`](crate::TypeDirectory).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeData {
    /// Builtin (pre-interned at fixed indices).
    Primitive(Primitive),

    /// Unmanaged pointer `T*`.
    Pointer(TypeId),
    /// Managed reference used for `ref`/`out` parameter passing.
    ByRef(TypeId),
    /// `T[]`, `T[,]`, ...
    Array { elem: TypeId, rank: u8 },

    Class { name: Name },
    Interface { name: Name },
    Struct { name: Name },
    Enum { name: Name, underlying: TypeId },

    /// Function-typed value. An empty name marks the type of an
    /// anonymous function expression.
    Delegate {
        name: Name,
        params: Box<[TypeId]>,
        ret: TypeId,
    },

    /// Positional product type.
    Tuple(Box<[TupleField]>),
    /// Tagged sum; members sorted by id and deduplicated.
    Union(Box<[TypeId]>),
    /// Values satisfying every member; sorted by id and deduplicated.
    Intersection(Box<[TypeId]>),

    /// Instantiated generic.
    Generic {
        template: Template,
        args: Box<[TypeId]>,
    },

    TypeParam {
        name: Name,
        constraints: Box<[TypeId]>,
        /// Constrained to reference types.
        reference: bool,
    },

    Alias {
        name: Name,
        target: TypeId,
        /// Conversions into the alias must be written explicitly.
        explicit_only: bool,
    },
}
