//! Pre-computed type metadata flags.
//!
//! `TypeFlags` are computed once when a type is interned, so category
//! queries never walk the type structure.

use bitflags::bitflags;

use crate::data::{Primitive, Template, TypeData};

bitflags! {
    /// Pre-computed type properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u32 {
        // === Category Flags (bits 0-7) ===

        /// Values are copied (structs, enums, numerics, nullable, tuples).
        const IS_VALUE_TYPE = 1 << 0;
        /// Values are references (classes, interfaces, arrays, delegates).
        const IS_REFERENCE_TYPE = 1 << 1;
        /// Builtin type.
        const IS_PRIMITIVE = 1 << 2;
        /// Builtin integer, including `char`.
        const IS_INTEGRAL = 1 << 3;
        /// Builtin integer, float or decimal.
        const IS_NUMERIC = 1 << 4;
        /// Tuple or union.
        const IS_STRUCTURAL = 1 << 5;
        const IS_INTERFACE = 1 << 6;

        // === Template Flags (bits 8-15) ===

        /// `Nullable<T>`.
        const IS_NULLABLE = 1 << 8;
        /// `Boxed<T>`, `NonNull<T>` or `Invariant<T>`.
        const IS_WRAPPER = 1 << 9;
        /// `Sequence<T>` or `NonEmptySequence<T>`.
        const IS_STREAM = 1 << 10;

        // === Presence Flags (bits 16-23) ===

        /// Mentions a type parameter somewhere inside.
        const HAS_TYPE_PARAM = 1 << 16;
    }
}

impl TypeFlags {
    /// Flags inherited from child types via bitwise OR.
    pub const PROPAGATE_MASK: Self = Self::HAS_TYPE_PARAM;

    /// Flags describing the outermost shape of `data`. Children contribute
    /// through `child_flags`.
    pub(crate) fn compute(data: &TypeData, child_flags: TypeFlags) -> TypeFlags {
        let inherited = child_flags & Self::PROPAGATE_MASK;
        let own = match data {
            TypeData::Primitive(p) => Self::for_primitive(*p),
            TypeData::Pointer(_) | TypeData::ByRef(_) => TypeFlags::empty(),
            TypeData::Array { .. } | TypeData::Class { .. } | TypeData::Delegate { .. } => {
                TypeFlags::IS_REFERENCE_TYPE
            }
            TypeData::Interface { .. } => TypeFlags::IS_REFERENCE_TYPE | TypeFlags::IS_INTERFACE,
            TypeData::Struct { .. } | TypeData::Enum { .. } => TypeFlags::IS_VALUE_TYPE,
            TypeData::Tuple(_) | TypeData::Union(_) => {
                TypeFlags::IS_VALUE_TYPE | TypeFlags::IS_STRUCTURAL
            }
            TypeData::Intersection(_) => TypeFlags::IS_REFERENCE_TYPE,
            TypeData::Generic { template, .. } => Self::for_template(*template),
            TypeData::TypeParam { reference, .. } => {
                let base = TypeFlags::HAS_TYPE_PARAM;
                if *reference {
                    base | TypeFlags::IS_REFERENCE_TYPE
                } else {
                    base
                }
            }
            // Aliases take on the flags of what they name.
            TypeData::Alias { .. } => child_flags,
        };
        own | inherited
    }

    fn for_primitive(p: Primitive) -> TypeFlags {
        let mut flags = TypeFlags::IS_PRIMITIVE;
        if p.is_value_type() {
            flags |= TypeFlags::IS_VALUE_TYPE;
        }
        if p.is_reference_type() {
            flags |= TypeFlags::IS_REFERENCE_TYPE;
        }
        if p.is_integral() {
            flags |= TypeFlags::IS_INTEGRAL;
        }
        if p.is_numeric() {
            flags |= TypeFlags::IS_NUMERIC;
        }
        flags
    }

    fn for_template(template: Template) -> TypeFlags {
        let mut flags = if template.is_value_type() {
            TypeFlags::IS_VALUE_TYPE
        } else {
            TypeFlags::IS_REFERENCE_TYPE
        };
        if template.is_interface() {
            flags |= TypeFlags::IS_INTERFACE;
        }
        match template {
            Template::Nullable => flags |= TypeFlags::IS_NULLABLE,
            Template::Boxed | Template::NonNull | Template::Invariant => {
                flags |= TypeFlags::IS_WRAPPER;
            }
            Template::Sequence | Template::NonEmptySequence => flags |= TypeFlags::IS_STREAM,
            Template::Enumerator | Template::List | Template::Named(_) => {}
        }
        flags
    }

    #[inline]
    pub const fn is_value_type(self) -> bool {
        self.contains(Self::IS_VALUE_TYPE)
    }

    #[inline]
    pub const fn is_reference_type(self) -> bool {
        self.contains(Self::IS_REFERENCE_TYPE)
    }

    #[inline]
    pub const fn has_type_param(self) -> bool {
        self.contains(Self::HAS_TYPE_PARAM)
    }
}
