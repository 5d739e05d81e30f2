use keel_ir::{Literal, TypeId};
use keel_types::{Cardinality, Primitive};
use keelc::Session;
use pretty_assertions::assert_eq;

use crate::common::{lit, session, var};

/// `Root <- Mid <- Leaf`, and `Root <- Other`.
struct Chain {
    root: TypeId,
    mid: TypeId,
    leaf: TypeId,
    other: TypeId,
}

fn chain(s: &mut Session) -> Chain {
    let root = s.pool().class(s.intern("Root"));
    let mid = s.pool().class(s.intern("Mid"));
    let leaf = s.pool().class(s.intern("Leaf"));
    let other = s.pool().class(s.intern("Other"));
    s.registry_mut()
        .set_base(root, TypeId::OBJECT)
        .set_base(mid, root)
        .set_base(leaf, mid)
        .set_base(other, root);
    Chain {
        root,
        mid,
        leaf,
        other,
    }
}

#[test]
fn least_upper_bound_of_a_class_chain() {
    let mut s = session();
    let c = chain(&mut s);
    assert_eq!(s.unify(&[c.leaf, c.mid]), c.mid);
    assert_eq!(s.unify(&[c.mid, c.leaf]), c.mid);
    assert_eq!(s.unify(&[c.leaf, c.leaf, c.leaf]), c.leaf);
    assert_eq!(s.unify(&[c.leaf, c.other]), c.root);
    assert_eq!(s.unify(&[c.leaf, TypeId::OBJECT]), TypeId::OBJECT);
    assert_eq!(s.unify(&[]), TypeId::OBJECT);
}

#[test]
fn least_upper_bound_of_primitives() {
    let s = session();
    assert_eq!(s.unify(&[TypeId::I32, TypeId::F64]), TypeId::F64);
    assert_eq!(s.unify(&[TypeId::I16, TypeId::U8]), TypeId::I32);
}

#[test]
fn cardinality_of_streams_and_values() {
    let mut s = session();
    let ints = s.pool().sequence(TypeId::I32);
    let some_ints = s.pool().non_empty_sequence(TypeId::I32);
    let maybe = s.pool().nullable(TypeId::I32);
    assert_eq!(s.cardinality(TypeId::I32), Cardinality::One);
    assert_eq!(s.cardinality(maybe), Cardinality::ZeroOrOne);
    assert_eq!(s.cardinality(ints), Cardinality::ZeroOrMore);
    assert_eq!(s.cardinality(some_ints), Cardinality::OneOrMore);
    assert_eq!(s.element_type(ints), Some(TypeId::I32));
    assert_eq!(s.element_type(TypeId::I32), None);

    let xs = var(&mut s, ints);
    assert_eq!(s.expr_cardinality(xs), Cardinality::ZeroOrMore);
    let type_of = lit(&mut s, Literal::type_of(ints));
    assert_eq!(s.expr_cardinality(type_of), Cardinality::One);
}

#[test]
fn better_match_prefers_the_tighter_target() {
    let s = session();
    assert!(s.is_better_match(TypeId::I16, TypeId::I32, TypeId::I8));
    assert!(!s.is_better_match(TypeId::I32, TypeId::I16, TypeId::I8));
    assert!(s.is_better_match(TypeId::I32, TypeId::U32, TypeId::U16));
}

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_unify {
    use super::*;
    use proptest::prelude::*;

    /// The numeric, boolean and text primitives.
    fn primitive() -> impl Strategy<Value = TypeId> {
        proptest::sample::select(Primitive::ALL[..14].to_vec()).prop_map(Primitive::type_id)
    }

    proptest! {
        #[test]
        fn unify_is_symmetric(a in primitive(), b in primitive()) {
            let s = session();
            prop_assert_eq!(s.unify(&[a, b]), s.unify(&[b, a]));
        }

        #[test]
        fn unify_is_idempotent(a in primitive()) {
            let s = session();
            prop_assert_eq!(s.unify(&[a, a, a]), a);
        }
    }
}
