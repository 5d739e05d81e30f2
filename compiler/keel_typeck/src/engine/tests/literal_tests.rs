use keel_ir::{CoercionKind, LitValue, Literal, TypeId};
use keel_types::SemanticError;
use pretty_assertions::assert_eq;

use super::Fixture;

#[test]
fn widening_a_constant_folds_it() {
    let mut f = Fixture::new();
    let five = f.lit(Literal::i32(5));
    let wide = f.ok(five, TypeId::I64);
    assert_ne!(wide, five);
    assert_eq!(f.arena.literal(wide), Some(Literal::i64(5)));
    assert_eq!(f.arena.span(wide), f.arena.span(five));
}

#[test]
fn widening_a_variable_inserts_a_conversion() {
    let mut f = Fixture::new();
    let x = f.var(TypeId::I32);
    let wide = f.ok(x, TypeId::F64);
    assert_eq!(f.coercion(wide), (x, CoercionKind::NumericWiden));
}

#[test]
fn constants_narrow_when_they_fit() {
    let mut f = Fixture::new();
    let hundred = f.lit(Literal::i32(100));
    let byte = f.ok(hundred, TypeId::U8);
    assert_eq!(
        f.arena.literal(byte),
        Some(Literal::with_type(LitValue::U8(100), TypeId::U8))
    );
}

#[test]
fn constants_that_do_not_fit_are_rejected() {
    let mut f = Fixture::new();
    let big = f.lit(Literal::i32(300));
    let (result, errors) = f.implicit(big, TypeId::U8);
    assert_eq!(result, None);
    assert_eq!(
        errors,
        vec![(
            big,
            SemanticError::NoImplicitCoercionFromConstant {
                value: Literal::i32(300),
                to: TypeId::U8,
            }
        )]
    );
}

#[test]
fn narrowing_a_variable_needs_a_cast() {
    let mut f = Fixture::new();
    let x = f.var(TypeId::I64);
    let (result, errors) = f.implicit(x, TypeId::I32);
    assert_eq!(result, None);
    assert_eq!(
        errors,
        vec![(x, SemanticError::NoImplicitCoercion { from: TypeId::I64, to: TypeId::I32 })]
    );
    let narrow = f.cast(x, TypeId::I32);
    assert_eq!(
        f.coercion(narrow),
        (x, CoercionKind::NumericNarrow { checked: false })
    );

    let mut f = Fixture::new().checked();
    let x = f.var(TypeId::I64);
    let narrow = f.cast(x, TypeId::I32);
    assert_eq!(
        f.coercion(narrow),
        (x, CoercionKind::NumericNarrow { checked: true })
    );
}

#[test]
fn checked_cast_of_an_overflowing_constant() {
    let mut f = Fixture::new().checked();
    let big = f.lit(Literal::i32(70000));
    let (result, errors) = f.explicit(big, TypeId::I16);
    assert_eq!(result, None);
    assert_eq!(
        errors,
        vec![(big, SemanticError::ConstantOverflow { ty: TypeId::I16 })]
    );
}

#[test]
fn unchecked_cast_of_an_overflowing_constant_wraps() {
    let mut f = Fixture::new();
    let big = f.lit(Literal::i32(70000));
    let short = f.cast(big, TypeId::I16);
    assert_eq!(
        f.arena.literal(short),
        Some(Literal::with_type(LitValue::I16(4464), TypeId::I16))
    );
}

#[test]
fn enums_accept_fitting_constants_only() {
    let mut f = Fixture::new();
    let color = f.pool.enum_type(f.name("Color"), TypeId::I32);
    let two = f.lit(Literal::i32(2));
    let red = f.ok(two, color);
    assert_eq!(
        f.arena.literal(red),
        Some(Literal::with_type(LitValue::I32(2), color))
    );

    let x = f.var(TypeId::I32);
    let (result, errors) = f.implicit(x, color);
    assert_eq!(result, None);
    assert_eq!(
        errors,
        vec![(x, SemanticError::NoImplicitCoercion { from: TypeId::I32, to: color })]
    );
    let cast = f.cast(x, color);
    assert_eq!(f.coercion(cast), (x, CoercionKind::Retype));

    let c = f.var(color);
    let wide = f.cast(c, TypeId::I64);
    assert_eq!(f.coercion(wide), (c, CoercionKind::NumericWiden));
}
