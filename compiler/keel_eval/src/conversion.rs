//! Numeric conversion folding.
//!
//! Folds `(T)literal` between any two numeric builtins. Integer targets
//! are reached by truncating toward zero; an out-of-range source wraps
//! when unchecked and overflows when checked. Decimal sources always
//! overflow instead of wrapping, and a floating source that is NaN or out
//! of range is only foldable in a checked context, where it overflows.

use keel_ir::{Decimal, LitValue, Literal, TypeId};
use keel_types::Primitive;

use crate::errors::FoldError;
use crate::operators::FoldResult;
use crate::scalar::{float_trunc, narrow, to_f32, to_f64};

/// Fold a conversion of `lit` to `target`.
///
/// `Ok(None)` for targets without a fixed representation (the native-size
/// integers) and for non-numeric sources other than an identity
/// conversion.
#[tracing::instrument(level = "trace")]
pub fn fold_conversion(lit: Literal, target: Primitive, checked: bool) -> FoldResult {
    let source = lit.value;
    if source.natural_type() == target.type_id() {
        return Ok(Some(Literal::new(source)));
    }
    let value = match target {
        Primitive::F32 => to_f32(source).map(|v| LitValue::F32(v.to_bits())),
        Primitive::F64 => to_f64(source).map(|v| LitValue::F64(v.to_bits())),
        Primitive::Decimal => return to_decimal(source).map(|d| d.map(Literal::decimal)),
        _ if target.is_integral() => return to_integral(source, target, checked),
        _ => None,
    };
    Ok(value.map(Literal::new))
}

fn to_decimal(source: LitValue) -> Result<Option<Decimal>, FoldError> {
    let overflow = FoldError::Overflow {
        ty: TypeId::DECIMAL,
    };
    match source {
        LitValue::F32(_) | LitValue::F64(_) => source
            .as_f64()
            .and_then(Decimal::from_f64)
            .map(Some)
            .ok_or(overflow),
        _ => match source.as_i128() {
            Some(v) => Decimal::from_i128(v).map(Some).ok_or(overflow),
            None => Ok(None),
        },
    }
}

fn to_integral(source: LitValue, target: Primitive, checked: bool) -> FoldResult {
    let (value, checked) = match source {
        LitValue::Decimal(d) => (Some(d.trunc()), true),
        LitValue::F32(_) | LitValue::F64(_) => {
            match source.as_f64().and_then(float_trunc) {
                Some(v) => (Some(v), checked),
                None if checked => return Err(FoldError::Overflow { ty: target.type_id() }),
                None => return Ok(None),
            }
        }
        _ => (source.as_i128(), checked),
    };
    let Some(value) = value else {
        return Ok(None);
    };
    let folded = match target {
        Primitive::I8 => LitValue::I8(narrow(value, checked)?),
        Primitive::U8 => LitValue::U8(narrow(value, checked)?),
        Primitive::I16 => LitValue::I16(narrow(value, checked)?),
        Primitive::U16 => LitValue::U16(narrow(value, checked)?),
        Primitive::Char => LitValue::Char(narrow(value, checked).map_err(|_| FoldError::Overflow {
            ty: TypeId::CHAR,
        })?),
        Primitive::I32 => LitValue::I32(narrow(value, checked)?),
        Primitive::U32 => LitValue::U32(narrow(value, checked)?),
        Primitive::I64 => LitValue::I64(narrow(value, checked)?),
        Primitive::U64 => LitValue::U64(narrow(value, checked)?),
        _ => return Ok(None),
    };
    Ok(Some(Literal::new(folded)))
}
