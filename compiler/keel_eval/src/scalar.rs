//! Typed views of literal scalars.
//!
//! Folding works on native Rust integers of the promoted width. [`FoldInt`]
//! gives the folders one generic surface over the eight fixed-width
//! integer types.

use std::ops::{BitAnd, BitOr, BitXor, Not};

use keel_ir::{LitValue, TypeId};

use crate::errors::FoldError;

pub(crate) trait FoldInt:
    Copy
    + Ord
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + TryFrom<i128>
    + Into<i128>
{
    const BITS: u32;
    const ZERO: Self;
    /// Builtin type of values of this width.
    const TYPE: TypeId;

    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn wrapping_add(self, rhs: Self) -> Self;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn checked_mul(self, rhs: Self) -> Option<Self>;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn checked_div(self, rhs: Self) -> Option<Self>;
    fn checked_rem(self, rhs: Self) -> Option<Self>;
    fn wrapping_shl(self, count: u32) -> Self;
    fn wrapping_shr(self, count: u32) -> Self;
    /// Two's-complement truncation of `value` to this width.
    fn wrap_from(value: i128) -> Self;
    fn into_value(self) -> LitValue;
}

macro_rules! impl_fold_int {
    ($($ty:ty => $variant:ident, $type_id:ident;)*) => {$(
        impl FoldInt for $ty {
            const BITS: u32 = <$ty>::BITS;
            const ZERO: Self = 0;
            const TYPE: TypeId = TypeId::$type_id;

            #[inline]
            fn checked_add(self, rhs: Self) -> Option<Self> {
                <$ty>::checked_add(self, rhs)
            }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$ty>::wrapping_add(self, rhs)
            }

            #[inline]
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                <$ty>::checked_sub(self, rhs)
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$ty>::wrapping_sub(self, rhs)
            }

            #[inline]
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                <$ty>::checked_mul(self, rhs)
            }

            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$ty>::wrapping_mul(self, rhs)
            }

            #[inline]
            fn checked_div(self, rhs: Self) -> Option<Self> {
                <$ty>::checked_div(self, rhs)
            }

            #[inline]
            fn checked_rem(self, rhs: Self) -> Option<Self> {
                <$ty>::checked_rem(self, rhs)
            }

            #[inline]
            fn wrapping_shl(self, count: u32) -> Self {
                <$ty>::wrapping_shl(self, count)
            }

            #[inline]
            fn wrapping_shr(self, count: u32) -> Self {
                <$ty>::wrapping_shr(self, count)
            }

            #[inline]
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "unchecked conversions truncate to the target width"
            )]
            fn wrap_from(value: i128) -> Self {
                value as $ty
            }

            #[inline]
            fn into_value(self) -> LitValue {
                LitValue::$variant(self)
            }
        }
    )*};
}

impl_fold_int! {
    i8 => I8, I8;
    u8 => U8, U8;
    i16 => I16, I16;
    u16 => U16, U16;
    i32 => I32, I32;
    u32 => U32, U32;
    i64 => I64, I64;
    u64 => U64, U64;
}

/// An integral literal value as `T`, if it is in range.
#[inline]
pub(crate) fn to_int<T: FoldInt>(value: LitValue) -> Option<T> {
    value.as_i128().and_then(|v| T::try_from(v).ok())
}

/// Fit `value` into `T`: out of range is an overflow when checked and
/// wraps otherwise.
pub(crate) fn narrow<T: FoldInt>(value: i128, checked: bool) -> Result<T, FoldError> {
    match T::try_from(value) {
        Ok(v) => Ok(v),
        Err(_) if checked => Err(FoldError::Overflow { ty: T::TYPE }),
        Err(_) => Ok(T::wrap_from(value)),
    }
}

/// A numeric literal value widened to `f64`. Integers round to nearest.
#[expect(
    clippy::cast_precision_loss,
    reason = "integer to floating conversion rounds by definition"
)]
pub(crate) fn to_f64(value: LitValue) -> Option<f64> {
    match value {
        LitValue::F32(_) | LitValue::F64(_) => value.as_f64(),
        LitValue::Decimal(d) => Some(d.to_f64()),
        _ => value.as_i128().map(|v| v as f64),
    }
}

/// A numeric literal value as `f32`, rounding once from the source.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "conversion to single precision rounds by definition"
)]
pub(crate) fn to_f32(value: LitValue) -> Option<f32> {
    match value {
        LitValue::F32(bits) => Some(f32::from_bits(bits)),
        LitValue::F64(bits) => Some(f64::from_bits(bits) as f32),
        LitValue::Decimal(d) => Some(d.to_f64() as f32),
        _ => value.as_i128().map(|v| v as f32),
    }
}

/// Integer part of a finite float, if it fits `i128`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the magnitude is checked against the i128 range first"
)]
pub(crate) fn float_trunc(value: f64) -> Option<i128> {
    // 2^127, exactly representable.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    let t = value.trunc();
    if t.is_finite() && t > -LIMIT && t < LIMIT {
        Some(t as i128)
    } else {
        None
    }
}
