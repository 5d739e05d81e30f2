use keel_ir::Decimal;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn negation_promotes() {
    assert_eq!(
        fold_unary(UnaryOp::Neg, Literal::new(LitValue::U8(5)), false),
        Ok(Some(Literal::i32(-5)))
    );
    assert_eq!(
        fold_unary(UnaryOp::Neg, Literal::u32(u32::MAX), false),
        Ok(Some(Literal::i64(-i64::from(u32::MAX))))
    );
    assert_eq!(fold_unary(UnaryOp::Neg, Literal::u64(1), false), Ok(None));
}

#[test]
fn negating_min() {
    assert_eq!(
        fold_unary(UnaryOp::Neg, Literal::i32(i32::MIN), false),
        Ok(Some(Literal::i32(i32::MIN)))
    );
    assert_eq!(
        fold_unary(UnaryOp::Neg, Literal::i64(i64::MIN), true),
        Err(FoldError::Overflow { ty: TypeId::I64 })
    );
}

#[test]
fn negating_floats_and_decimals() {
    assert_eq!(
        fold_unary(UnaryOp::Neg, Literal::f64(1.5), false),
        Ok(Some(Literal::f64(-1.5)))
    );
    assert_eq!(
        fold_unary(UnaryOp::Neg, Literal::decimal(Decimal::from(2i64)), false),
        Ok(Some(Literal::decimal(Decimal::from(-2i64))))
    );
}

#[test]
fn complement_is_integral_only() {
    assert_eq!(
        fold_unary(UnaryOp::BitNot, Literal::i32(0), false),
        Ok(Some(Literal::i32(-1)))
    );
    assert_eq!(
        fold_unary(UnaryOp::BitNot, Literal::u64(0), false),
        Ok(Some(Literal::u64(u64::MAX)))
    );
    assert_eq!(
        fold_unary(UnaryOp::BitNot, Literal::new(LitValue::U8(0)), false),
        Ok(Some(Literal::i32(-1)))
    );
    assert_eq!(fold_unary(UnaryOp::BitNot, Literal::f64(1.0), false), Ok(None));
    assert_eq!(fold_unary(UnaryOp::BitNot, Literal::bool(true), false), Ok(None));
}

#[test]
fn logical_not() {
    assert_eq!(
        fold_unary(UnaryOp::Not, Literal::bool(true), false),
        Ok(Some(Literal::bool(false)))
    );
    assert_eq!(fold_unary(UnaryOp::Not, Literal::i32(0), false), Ok(None));
}

#[test]
fn unary_plus_promotes() {
    assert_eq!(
        fold_unary(UnaryOp::Plus, Literal::new(LitValue::I16(-3)), false),
        Ok(Some(Literal::i32(-3)))
    );
    assert_eq!(
        fold_unary(UnaryOp::Plus, Literal::u64(9), false),
        Ok(Some(Literal::u64(9)))
    );
    assert_eq!(fold_unary(UnaryOp::Plus, Literal::bool(true), false), Ok(None));
}

#[test]
fn sizeof_builtins() {
    let size = |ty| fold_unary(UnaryOp::SizeOf, Literal::type_of(ty), false);
    assert_eq!(size(TypeId::BOOL), Ok(Some(Literal::i32(1))));
    assert_eq!(size(TypeId::CHAR), Ok(Some(Literal::i32(2))));
    assert_eq!(size(TypeId::F32), Ok(Some(Literal::i32(4))));
    assert_eq!(size(TypeId::U64), Ok(Some(Literal::i32(8))));
    assert_eq!(size(TypeId::DECIMAL), Ok(Some(Literal::i32(16))));
    assert_eq!(size(TypeId::STR), Ok(None));
    assert_eq!(fold_sizeof(TypeId::INTPTR), None);
}
