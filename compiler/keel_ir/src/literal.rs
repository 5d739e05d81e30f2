//! Compile-time literal values.
//!
//! A `Literal` pairs a scalar value with its static type. The type usually
//! matches the value's natural type, but enum constants carry an `int`-like
//! value with the enum's type.
//!
//! Floats are stored as raw bits so literals stay `Eq + Hash`.

use crate::{Decimal, Name, TypeId};

/// A literal's value, drawn from the standard numeric tower plus bool,
/// char, string, type and null.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum LitValue {
    Null,
    Bool(bool),
    /// UTF-16 code unit.
    Char(u16),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    /// `f32` bits.
    F32(u32),
    /// `f64` bits.
    F64(u64),
    Decimal(Decimal),
    /// Interned string contents.
    Str(Name),
    /// The operand of `typeof`.
    Type(TypeId),
}

impl LitValue {
    /// The builtin type a value of this shape has on its own.
    pub const fn natural_type(self) -> TypeId {
        match self {
            LitValue::Null => TypeId::NULL,
            LitValue::Bool(_) => TypeId::BOOL,
            LitValue::Char(_) => TypeId::CHAR,
            LitValue::I8(_) => TypeId::I8,
            LitValue::U8(_) => TypeId::U8,
            LitValue::I16(_) => TypeId::I16,
            LitValue::U16(_) => TypeId::U16,
            LitValue::I32(_) => TypeId::I32,
            LitValue::U32(_) => TypeId::U32,
            LitValue::I64(_) => TypeId::I64,
            LitValue::U64(_) => TypeId::U64,
            LitValue::F32(_) => TypeId::F32,
            LitValue::F64(_) => TypeId::F64,
            LitValue::Decimal(_) => TypeId::DECIMAL,
            LitValue::Str(_) => TypeId::STR,
            LitValue::Type(_) => TypeId::TYPE,
        }
    }

    /// Integral value widened to `i128`; `None` for non-integral values.
    pub fn as_i128(self) -> Option<i128> {
        Some(match self {
            LitValue::Char(v) | LitValue::U16(v) => i128::from(v),
            LitValue::I8(v) => i128::from(v),
            LitValue::U8(v) => i128::from(v),
            LitValue::I16(v) => i128::from(v),
            LitValue::I32(v) => i128::from(v),
            LitValue::U32(v) => i128::from(v),
            LitValue::I64(v) => i128::from(v),
            LitValue::U64(v) => i128::from(v),
            _ => return None,
        })
    }

    /// Floating value; `None` for non-floating values.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            LitValue::F32(bits) => Some(f64::from(f32::from_bits(bits))),
            LitValue::F64(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }
}

/// A typed literal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    pub value: LitValue,
    pub ty: TypeId,
}

impl Literal {
    /// Literal whose type is the value's natural type.
    pub const fn new(value: LitValue) -> Self {
        Literal {
            ty: value.natural_type(),
            value,
        }
    }

    pub const fn with_type(value: LitValue, ty: TypeId) -> Self {
        Literal { value, ty }
    }

    pub const fn null() -> Self {
        Self::new(LitValue::Null)
    }

    pub const fn bool(v: bool) -> Self {
        Self::new(LitValue::Bool(v))
    }

    pub const fn i32(v: i32) -> Self {
        Self::new(LitValue::I32(v))
    }

    pub const fn u32(v: u32) -> Self {
        Self::new(LitValue::U32(v))
    }

    pub const fn i64(v: i64) -> Self {
        Self::new(LitValue::I64(v))
    }

    pub const fn u64(v: u64) -> Self {
        Self::new(LitValue::U64(v))
    }

    pub fn f32(v: f32) -> Self {
        Self::new(LitValue::F32(v.to_bits()))
    }

    pub fn f64(v: f64) -> Self {
        Self::new(LitValue::F64(v.to_bits()))
    }

    pub const fn decimal(v: Decimal) -> Self {
        Self::new(LitValue::Decimal(v))
    }

    pub const fn type_of(ty: TypeId) -> Self {
        Self::new(LitValue::Type(ty))
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self.value, LitValue::Null)
    }
}
