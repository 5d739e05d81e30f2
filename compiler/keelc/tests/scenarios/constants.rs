use keel_diagnostic::ErrorCode;
use keel_ir::{BinaryOp, FieldId, LitValue, Literal, TypeId};
use keelc::{Session, SessionConfig};
use pretty_assertions::assert_eq;

use crate::common::{binary, field, lit, session};

const A: FieldId = FieldId::new(0);
const B: FieldId = FieldId::new(1);

#[test]
fn mixed_arithmetic_promotes_to_the_floating_type() {
    let mut s = session();
    let three = lit(&mut s, Literal::i32(3));
    let four_and_a_half = lit(&mut s, Literal::f64(4.5));
    let sum = binary(&mut s, BinaryOp::Add, three, four_and_a_half);
    assert_eq!(s.evaluate(sum), Some(Literal::f64(7.5)));
}

#[test]
fn checked_overflow_is_reported() {
    let mut s = Session::new(SessionConfig::checked());
    let max = lit(&mut s, Literal::i32(i32::MAX));
    let one = lit(&mut s, Literal::i32(1));
    let sum = binary(&mut s, BinaryOp::Add, max, one);
    assert_eq!(s.evaluate(sum), None);
    let diagnostics = s.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E6001);
    assert_eq!(diagnostics[0].primary_span(), Some(s.arena().span(sum)));
}

#[test]
fn unchecked_overflow_wraps() {
    let mut s = session();
    let max = lit(&mut s, Literal::i32(i32::MAX));
    let one = lit(&mut s, Literal::i32(1));
    let sum = binary(&mut s, BinaryOp::Add, max, one);
    assert_eq!(s.evaluate(sum), Some(Literal::i32(i32::MIN)));
    assert_eq!(s.error_count(), 0);
}

#[test]
fn division_by_zero_is_reported() {
    let mut s = session();
    let one = lit(&mut s, Literal::i32(1));
    let zero = lit(&mut s, Literal::i32(0));
    let quotient = binary(&mut s, BinaryOp::Div, one, zero);
    assert_eq!(s.evaluate(quotient), None);
    let codes: Vec<_> = s.take_diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E6002]);
}

#[test]
fn constants_follow_other_constants() {
    let mut s = session();
    let two = lit(&mut s, Literal::i32(2));
    s.declare_constant(A, two, TypeId::I32);
    let a = field(&mut s, A, TypeId::I32);
    let three = lit(&mut s, Literal::i32(3));
    let product = binary(&mut s, BinaryOp::Mul, a, three);
    s.declare_constant(B, product, TypeId::I32);

    assert_eq!(s.evaluate_field(B), Some(Literal::i32(6)));
    assert_eq!(s.constant_cache().get(A), Some(Literal::i32(2)));
}

#[test]
fn circular_constants_report_once() {
    let mut s = session();
    // A = B + 1; B = A
    let b = field(&mut s, B, TypeId::I32);
    let one = lit(&mut s, Literal::i32(1));
    let a_init = binary(&mut s, BinaryOp::Add, b, one);
    s.declare_constant(A, a_init, TypeId::I32);
    let a = field(&mut s, A, TypeId::I32);
    s.declare_constant(B, a, TypeId::I32);

    assert_eq!(s.evaluate_field(A), None);
    assert_eq!(s.evaluate_field(A), None);
    assert_eq!(s.evaluate_field(B), None);
    let codes: Vec<_> = s.take_diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E6003]);
    assert_eq!(s.constant_cache().get(A), None);
    assert!(s.constant_cache().is_circular(A));
}

#[test]
fn casts_fold_before_evaluation() {
    let mut s = session();
    let big = lit(&mut s, Literal::i32(300));
    let byte = s.explicit_coercion(big, TypeId::U8).unwrap();
    assert_eq!(
        s.evaluate(byte).map(|l| l.value),
        Some(LitValue::U8(44))
    );
}

#[test]
fn a_wrapped_nullable_reads_back_its_value() {
    let mut s = session();
    let maybe = s.pool().nullable(TypeId::I32);
    let five = lit(&mut s, Literal::i32(5));
    let wrapped = s.implicit_coercion(five, maybe).unwrap();
    let value = s.explicit_coercion(wrapped, TypeId::I32).unwrap();
    assert_eq!(s.evaluate(value), Some(Literal::i32(5)));
    assert_eq!(
        s.evaluate(wrapped),
        Some(Literal::with_type(LitValue::I32(5), maybe))
    );
    assert_eq!(s.error_count(), 0);
}
