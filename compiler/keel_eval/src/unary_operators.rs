//! Unary operator folding.

use keel_ir::{LitValue, Literal, TypeId, UnaryOp};
use keel_types::numeric::{promote_unary, size_of};
use keel_types::Primitive;

use crate::conversion::fold_conversion;
use crate::errors::FoldError;
use crate::operators::FoldResult;
use crate::scalar::{to_int, FoldInt};

/// Fold `op operand`.
///
/// Negation promotes narrow integers to `i32` and `u32` to `i64`; a `u64`
/// operand has no signed type to negate into and is not foldable.
#[tracing::instrument(level = "trace")]
pub fn fold_unary(op: UnaryOp, operand: Literal, overflow_checked: bool) -> FoldResult {
    let value = operand.value;
    match op {
        UnaryOp::Not => Ok(match value {
            LitValue::Bool(b) => Some(Literal::bool(!b)),
            _ => None,
        }),
        UnaryOp::SizeOf => Ok(match value {
            LitValue::Type(ty) => fold_sizeof(ty),
            _ => None,
        }),
        UnaryOp::Plus => match promoted(value) {
            Some(p) => fold_conversion(Literal::new(value), p, false),
            None => Ok(None),
        },
        UnaryOp::Neg => fold_neg(value, overflow_checked),
        UnaryOp::BitNot => Ok(match promoted(value) {
            Some(Primitive::I32) => complement::<i32>(value),
            Some(Primitive::U32) => complement::<u32>(value),
            Some(Primitive::I64) => complement::<i64>(value),
            Some(Primitive::U64) => complement::<u64>(value),
            _ => None,
        }),
    }
}

/// `sizeof(ty)` for builtins with a fixed size, as an `i32`.
pub fn fold_sizeof(ty: TypeId) -> Option<Literal> {
    let size = Primitive::from_type_id(ty).and_then(size_of)?;
    i32::try_from(size).ok().map(Literal::i32)
}

fn promoted(value: LitValue) -> Option<Primitive> {
    Primitive::from_type_id(value.natural_type()).and_then(promote_unary)
}

fn fold_neg(value: LitValue, overflow_checked: bool) -> FoldResult {
    match value {
        LitValue::F32(bits) => Ok(Some(Literal::f32(-f32::from_bits(bits)))),
        LitValue::F64(bits) => Ok(Some(Literal::f64(-f64::from_bits(bits)))),
        LitValue::Decimal(d) => Ok(Some(Literal::decimal(d.neg()))),
        LitValue::U64(_) => Ok(None),
        LitValue::U32(_) | LitValue::I64(_) => negate::<i64>(value, overflow_checked),
        _ => match promoted(value) {
            Some(Primitive::I32) => negate::<i32>(value, overflow_checked),
            _ => Ok(None),
        },
    }
}

fn negate<T: FoldInt>(value: LitValue, overflow_checked: bool) -> FoldResult {
    let Some(v) = to_int::<T>(value) else {
        return Ok(None);
    };
    let negated = match T::ZERO.checked_sub(v) {
        Some(n) => n,
        None if overflow_checked => return Err(FoldError::Overflow { ty: T::TYPE }),
        None => T::ZERO.wrapping_sub(v),
    };
    Ok(Some(Literal::new(negated.into_value())))
}

fn complement<T: FoldInt>(value: LitValue) -> Option<Literal> {
    to_int::<T>(value).map(|v| Literal::new((!v).into_value()))
}

#[cfg(test)]
mod tests;
