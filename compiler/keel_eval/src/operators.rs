//! Binary operator folding.
//!
//! Both operands are first converted to the type chosen by the numeric
//! promotion table, then the operation runs in that native type.
//! `Ok(None)` means the pair is not foldable and must be left to the
//! runtime; `Err` means folding proved the operation invalid.

use keel_ir::{BinaryOp, Decimal, LitValue, Literal, Name};
use keel_types::numeric::{promote, promote_unary};
use keel_types::Primitive;

use crate::errors::FoldError;
use crate::scalar::{to_f32, to_f64, to_int, FoldInt};

/// Outcome of folding one operation.
pub type FoldResult = Result<Option<Literal>, FoldError>;

/// Checked arithmetic: overflow is an error when `overflow_checked`, and
/// otherwise the wrapped result is kept.
#[inline]
fn checked_arith<T: FoldInt>(checked: Option<T>, wrapped: T, overflow_checked: bool) -> Result<T, FoldError> {
    match checked {
        Some(v) => Ok(v),
        None if overflow_checked => Err(FoldError::Overflow { ty: T::TYPE }),
        None => Ok(wrapped),
    }
}

/// Division or remainder with zero guard.
///
/// `MIN / -1` overflows whatever the context.
#[inline]
fn checked_div<T, F>(is_zero: bool, op: F) -> Result<T, FoldError>
where
    T: FoldInt,
    F: FnOnce() -> Option<T>,
{
    if is_zero {
        Err(FoldError::DivisionByZero)
    } else {
        op().ok_or(FoldError::Overflow { ty: T::TYPE })
    }
}

/// Fold `lhs op rhs`.
#[tracing::instrument(level = "trace")]
pub fn fold_binary(lhs: Literal, rhs: Literal, op: BinaryOp, overflow_checked: bool) -> FoldResult {
    if op == BinaryOp::Comma {
        return Ok(Some(rhs));
    }
    match (lhs.value, rhs.value) {
        (LitValue::Bool(a), LitValue::Bool(b)) => Ok(fold_bool(a, b, op)),
        (LitValue::Str(a), LitValue::Str(b)) => Ok(fold_str(a, b, op)),
        (a, b) if op.is_shift() => fold_shift(a, b, op),
        (a, b) => {
            let (Some(pa), Some(pb)) = (
                Primitive::from_type_id(a.natural_type()),
                Primitive::from_type_id(b.natural_type()),
            ) else {
                return Ok(None);
            };
            match promote(pa, pb) {
                Some(target) => fold_numeric(a, b, target, op, overflow_checked),
                None => Ok(None),
            }
        }
    }
}

fn fold_numeric(a: LitValue, b: LitValue, target: Primitive, op: BinaryOp, overflow_checked: bool) -> FoldResult {
    match target {
        Primitive::I32 => fold_int_pair::<i32>(a, b, op, overflow_checked),
        Primitive::U32 => fold_int_pair::<u32>(a, b, op, overflow_checked),
        Primitive::I64 => fold_int_pair::<i64>(a, b, op, overflow_checked),
        Primitive::U64 => fold_int_pair::<u64>(a, b, op, overflow_checked),
        Primitive::F32 => Ok(to_f32(a)
            .zip(to_f32(b))
            .and_then(|(x, y)| fold_f32(x, y, op))
            .map(Literal::f32)),
        Primitive::F64 => Ok(to_f64(a)
            .zip(to_f64(b))
            .and_then(|(x, y)| fold_f64(x, y, op))
            .map(Literal::f64)),
        Primitive::Decimal => match (to_decimal(a), to_decimal(b)) {
            (Some(x), Some(y)) => fold_decimal(x, y, op),
            _ => Ok(None),
        },
        _ => Ok(None),
    }
}

/// Both operands must be representable in `T`; a `u64` above `i64::MAX`
/// paired with a signed operand is not.
fn fold_int_pair<T: FoldInt>(a: LitValue, b: LitValue, op: BinaryOp, overflow_checked: bool) -> FoldResult {
    match (to_int::<T>(a), to_int::<T>(b)) {
        (Some(x), Some(y)) => fold_int(x, y, op, overflow_checked),
        _ => Ok(None),
    }
}

fn fold_int<T: FoldInt>(a: T, b: T, op: BinaryOp, overflow_checked: bool) -> FoldResult {
    let value = match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), a.wrapping_add(b), overflow_checked)?,
        BinaryOp::Sub => checked_arith(a.checked_sub(b), a.wrapping_sub(b), overflow_checked)?,
        BinaryOp::Mul => checked_arith(a.checked_mul(b), a.wrapping_mul(b), overflow_checked)?,
        BinaryOp::Div => checked_div(b == T::ZERO, || a.checked_div(b))?,
        BinaryOp::Rem => checked_div(b == T::ZERO, || a.checked_rem(b))?,
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        BinaryOp::Eq => return Ok(Some(Literal::bool(a == b))),
        BinaryOp::NotEq => return Ok(Some(Literal::bool(a != b))),
        BinaryOp::Lt => return Ok(Some(Literal::bool(a < b))),
        BinaryOp::LtEq => return Ok(Some(Literal::bool(a <= b))),
        BinaryOp::Gt => return Ok(Some(Literal::bool(a > b))),
        BinaryOp::GtEq => return Ok(Some(Literal::bool(a >= b))),
        _ => return Ok(None),
    };
    Ok(Some(Literal::new(value.into_value())))
}

// Comparisons of approximate values are left to the runtime.

fn fold_f32(a: f32, b: f32, op: BinaryOp) -> Option<f32> {
    Some(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        _ => return None,
    })
}

fn fold_f64(a: f64, b: f64, op: BinaryOp) -> Option<f64> {
    Some(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        _ => return None,
    })
}

fn to_decimal(value: LitValue) -> Option<Decimal> {
    match value {
        LitValue::Decimal(d) => Some(d),
        _ => value.as_i128().and_then(Decimal::from_i128),
    }
}

/// Decimal arithmetic always traps on overflow.
fn fold_decimal(a: Decimal, b: Decimal, op: BinaryOp) -> FoldResult {
    let overflow = FoldError::Overflow {
        ty: keel_ir::TypeId::DECIMAL,
    };
    let value = match op {
        BinaryOp::Add => a.checked_add(b).ok_or(overflow)?,
        BinaryOp::Sub => a.checked_sub(b).ok_or(overflow)?,
        BinaryOp::Mul => a.checked_mul(b).ok_or(overflow)?,
        BinaryOp::Div | BinaryOp::Rem if b.is_zero() => return Err(FoldError::DivisionByZero),
        BinaryOp::Div => a.checked_div(b).ok_or(overflow)?,
        BinaryOp::Rem => a.checked_rem(b).ok_or(overflow)?,
        _ => return Ok(None),
    };
    Ok(Some(Literal::decimal(value)))
}

fn fold_bool(a: bool, b: bool, op: BinaryOp) -> Option<Literal> {
    let value = match op {
        BinaryOp::BitAnd | BinaryOp::LogicalAnd => a & b,
        BinaryOp::BitOr | BinaryOp::LogicalOr => a | b,
        BinaryOp::BitXor | BinaryOp::NotEq => a ^ b,
        BinaryOp::Eq => a == b,
        _ => return None,
    };
    Some(Literal::bool(value))
}

/// Interned names are equal exactly when their contents are.
fn fold_str(a: Name, b: Name, op: BinaryOp) -> Option<Literal> {
    match op {
        BinaryOp::Eq => Some(Literal::bool(a == b)),
        BinaryOp::NotEq => Some(Literal::bool(a != b)),
        _ => None,
    }
}

/// Shifts take the unary-promoted type of the left operand; the count is
/// masked to that type's width.
fn fold_shift(value: LitValue, count: LitValue, op: BinaryOp) -> FoldResult {
    let Some(count) = count.as_i128() else {
        return Ok(None);
    };
    let Some(left) = Primitive::from_type_id(value.natural_type()).and_then(promote_unary) else {
        return Ok(None);
    };
    match left {
        Primitive::I32 => Ok(shift::<i32>(value, count, op)),
        Primitive::U32 => Ok(shift::<u32>(value, count, op)),
        Primitive::I64 => Ok(shift::<i64>(value, count, op)),
        Primitive::U64 => Ok(shift::<u64>(value, count, op)),
        _ => Ok(None),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the count is masked below 64"
)]
fn shift<T: FoldInt>(value: LitValue, count: i128, op: BinaryOp) -> Option<Literal> {
    let value = to_int::<T>(value)?;
    let count = (count & i128::from(T::BITS - 1)) as u32;
    let shifted = match op {
        BinaryOp::Shl => value.wrapping_shl(count),
        _ => value.wrapping_shr(count),
    };
    Some(Literal::new(shifted.into_value()))
}
