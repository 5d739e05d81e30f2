use keel_diagnostic::{DiagnosticConfig, ErrorCode};
use keel_ir::{CoercionKind, ExprKind, LitValue, Literal, TypeId};
use keel_types::TupleField;
use keelc::{Session, SessionConfig};
use pretty_assertions::assert_eq;

use crate::common::{lit, session, var};

fn kind_of(session: &Session, id: keel_ir::ExprId) -> ExprKind {
    *session.arena().kind(id)
}

#[test]
fn identity_inserts_nothing() {
    let mut s = session();
    let maybe = s.pool().nullable(TypeId::I64);
    let pair = s.pool().tuple(&[
        TupleField::named(s.intern("a"), TypeId::I32),
        TupleField::named(s.intern("b"), TypeId::STR),
    ]);
    for ty in [TypeId::BOOL, TypeId::I32, TypeId::F64, TypeId::STR, TypeId::OBJECT, maybe, pair] {
        let x = var(&mut s, ty);
        let before = s.arena().len();
        assert_eq!(s.implicit_coercion(x, ty), Some(x));
        assert_eq!(s.arena().len(), before);
    }
    assert_eq!(s.error_count(), 0);
}

#[test]
fn widening_is_implicit_and_narrowing_is_a_cast() {
    let mut s = session();
    let short = var(&mut s, TypeId::I16);
    let wide = s.implicit_coercion(short, TypeId::I32).unwrap();
    assert_eq!(
        kind_of(&s, wide),
        ExprKind::Coerce {
            operand: short,
            kind: CoercionKind::NumericWiden
        }
    );

    let int = var(&mut s, TypeId::I32);
    assert_eq!(s.implicit_coercion(int, TypeId::I16), None);
    let narrow = s.explicit_coercion(int, TypeId::I16).unwrap();
    assert_eq!(s.arena().ty(narrow), TypeId::I16);

    let diagnostics = s.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E2001);
    assert_eq!(diagnostics[0].primary_span(), Some(s.arena().span(int)));
}

#[test]
fn checked_cast_of_an_overflowing_constant() {
    let mut s = Session::new(SessionConfig::checked());
    let big = lit(&mut s, Literal::i32(70000));
    assert_eq!(s.explicit_coercion(big, TypeId::I16), None);
    let diagnostics = s.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E6001);

    let mut s = session();
    let big = lit(&mut s, Literal::i32(70000));
    let short = s.explicit_coercion(big, TypeId::I16).unwrap();
    assert_eq!(s.arena().literal(short).map(|l| l.value), Some(LitValue::I16(4464)));
}

#[test]
fn nullable_wraps_and_unwraps() {
    let mut s = session();
    let maybe = s.pool().nullable(TypeId::I32);

    let null = lit(&mut s, Literal::null());
    let empty = s.implicit_coercion(null, maybe).unwrap();
    assert!(s.arena().is_null_literal(empty));
    assert_eq!(s.arena().ty(empty), maybe);

    let five = lit(&mut s, Literal::i32(5));
    let wrapped = s.implicit_coercion(five, maybe).unwrap();
    let ExprKind::Coerce { operand, kind } = kind_of(&s, wrapped) else {
        panic!("expected a coercion");
    };
    assert_eq!(kind, CoercionKind::NullableWrap);
    assert_eq!(s.arena().literal(operand), Some(Literal::i32(5)));

    assert_eq!(s.implicit_coercion(wrapped, TypeId::I32), None);
    let value = s.explicit_coercion(wrapped, TypeId::I32).unwrap();
    assert_eq!(
        kind_of(&s, value),
        ExprKind::Coerce {
            operand: wrapped,
            kind: CoercionKind::NullableValue
        }
    );

    let null = lit(&mut s, Literal::null());
    assert_eq!(s.implicit_coercion(null, TypeId::I32), None);
    let codes: Vec<_> = s.take_diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2001, ErrorCode::E2003]);
}

#[test]
fn union_dispatch_is_closed_over_its_alternatives() {
    let mut s = session();
    let small = s.pool().union(&[TypeId::I16, TypeId::I32]);
    let mixed = s.pool().union(&[TypeId::I32, TypeId::STR]);

    let u = var(&mut s, small);
    let dispatch = s.implicit_coercion(u, TypeId::I64).unwrap();
    assert!(matches!(kind_of(&s, dispatch), ExprKind::UnionDispatch { .. }));

    let m = var(&mut s, mixed);
    assert_eq!(s.implicit_coercion(m, TypeId::I64), None);
    let cast = s.explicit_coercion(m, TypeId::I64).unwrap();
    let ExprKind::UnionDispatch { source, arms } = kind_of(&s, cast) else {
        panic!("expected a dispatch");
    };
    assert_eq!(source, m);
    let arms = s.arena().list(arms);
    assert_eq!(arms.len(), 2);
    assert!(arms.iter().all(|&arm| s.arena().ty(arm) == TypeId::I64));
    assert_eq!(*s.arena().kind(arms[1]), ExprKind::CastFailure);
}

#[test]
fn index_expressions_are_normalized() {
    let mut s = Session::new(SessionConfig::checked());
    let byte = var(&mut s, TypeId::U8);
    let index = s.coerce_to_index(byte).unwrap();
    assert_eq!(s.arena().ty(index), TypeId::I32);

    let long = var(&mut s, TypeId::U64);
    let index = s.coerce_to_index(long).unwrap();
    assert_eq!(s.arena().ty(index), TypeId::INTPTR);

    let text = var(&mut s, TypeId::STR);
    assert_eq!(s.coerce_to_index(text), None);
    assert_eq!(s.error_count(), 1);
}

#[test]
fn unsafe_context_widens_to_native_integers() {
    let mut s = session();
    let x = var(&mut s, TypeId::I32);
    assert_eq!(s.implicit_coercion(x, TypeId::INTPTR), None);

    let mut s = Session::new(SessionConfig::default().with_unsafe_context(true));
    let x = var(&mut s, TypeId::I32);
    let native = s.implicit_coercion(x, TypeId::INTPTR).unwrap();
    assert_eq!(s.arena().ty(native), TypeId::INTPTR);
}

#[test]
fn each_failed_request_on_one_node_is_reported() {
    let mut s = session();
    let int = var(&mut s, TypeId::I32);
    assert_eq!(s.implicit_coercion(int, TypeId::I16), None);
    assert_eq!(s.implicit_coercion(int, TypeId::U8), None);
    let messages: Vec<_> = s.take_diagnostics().into_iter().map(|d| d.message).collect();
    assert_eq!(messages.len(), 2);
    assert_ne!(messages[0], messages[1]);
}

#[test]
fn errors_past_the_limit_end_with_a_notice() {
    let mut s = session();
    for _ in 0..12 {
        let int = var(&mut s, TypeId::I32);
        assert_eq!(s.implicit_coercion(int, TypeId::I16), None);
    }
    assert_eq!(s.take_diagnostics().len(), 12);

    let limited = DiagnosticConfig {
        error_limit: 10,
        ..DiagnosticConfig::default()
    };
    let mut s = Session::new(SessionConfig::default().with_diagnostics(limited));
    for _ in 0..12 {
        let int = var(&mut s, TypeId::I32);
        assert_eq!(s.implicit_coercion(int, TypeId::I16), None);
    }
    let codes: Vec<_> = s.take_diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes.len(), 11);
    assert!(codes[..10].iter().all(|&c| c == ErrorCode::E2001));
    assert_eq!(codes[10], ErrorCode::E9002);
}
