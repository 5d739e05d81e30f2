use pretty_assertions::assert_eq;

use super::*;
use crate::data::TupleField;
use crate::directory::TypeRegistry;
use keel_ir::{Literal, Span, StringInterner};

#[test]
fn template_and_array_elements() {
    let pool = Pool::new();
    let registry = TypeRegistry::new();
    let an = StreamAnalyzer::new(&pool, &registry);

    assert_eq!(an.element_type(pool.sequence(TypeId::I32)), Some(TypeId::I32));
    assert_eq!(an.element_type(pool.non_empty_sequence(TypeId::STR)), Some(TypeId::STR));
    assert_eq!(an.element_type(pool.array(TypeId::CHAR, 1)), Some(TypeId::CHAR));
    assert_eq!(an.element_type(pool.boxed(TypeId::F64)), Some(TypeId::F64));
    assert_eq!(an.element_type(TypeId::I32), None);
    assert_eq!(an.element_type(pool.nullable(TypeId::I32)), None);
}

#[test]
fn aliases_are_transparent() {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let registry = TypeRegistry::new();
    let an = StreamAnalyzer::new(&pool, &registry);
    let ints = pool.alias(interner.intern("Ints"), pool.sequence(TypeId::I32), false);

    assert_eq!(an.stream_element_type(ints), TypeId::I32);
    assert_eq!(an.cardinality(ints), Cardinality::ZeroOrMore);
}

#[test]
fn stream_element_through_interfaces() {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let bag = pool.class(interner.intern("Bag"));
    let mut registry = TypeRegistry::new();
    registry
        .set_base(bag, TypeId::OBJECT)
        .add_interface(bag, pool.sequence(TypeId::STR));
    let an = StreamAnalyzer::new(&pool, &registry);

    assert_eq!(an.stream_element_type(bag), TypeId::STR);
    assert_eq!(an.element_type(bag), Some(TypeId::STR));
    assert_eq!(an.cardinality(bag), Cardinality::ZeroOrMore);
}

#[test]
fn collection_pattern_prefers_specific_elements() {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let untyped = pool.class(interner.intern("Untyped"));
    let typed = pool.class(interner.intern("Typed"));
    let derived = pool.class(interner.intern("Derived"));
    let mut registry = TypeRegistry::new();
    registry
        .set_indexer(untyped, TypeId::OBJECT)
        .set_indexer(typed, TypeId::OBJECT)
        .set_enumerator_element(typed, TypeId::I64)
        .set_base(derived, typed);
    let an = StreamAnalyzer::new(&pool, &registry);

    assert_eq!(an.collection_element_type(untyped), Some(TypeId::OBJECT));
    assert_eq!(an.collection_element_type(typed), Some(TypeId::I64));
    assert_eq!(an.collection_element_type(derived), Some(TypeId::I64));
    assert_eq!(an.collection_element_type(TypeId::STR), None);
}

#[test]
fn strings_and_tuples_are_not_collections() {
    let pool = Pool::new();
    let mut registry = TypeRegistry::new();
    registry.set_indexer(TypeId::STR, TypeId::CHAR);
    let an = StreamAnalyzer::new(&pool, &registry);
    let pair = pool.tuple(&[TupleField::anonymous(TypeId::I32), TupleField::anonymous(TypeId::I32)]);

    assert_eq!(an.collection_element_type(TypeId::STR), None);
    assert_eq!(an.collection_element_type(pair), None);
}

#[test]
fn cardinality_of_shapes() {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let registry = TypeRegistry::new();
    let an = StreamAnalyzer::new(&pool, &registry);
    let widget = pool.class(interner.intern("Widget"));
    let pair = pool.tuple(&[TupleField::anonymous(TypeId::I32), TupleField::anonymous(TypeId::STR)]);

    assert_eq!(an.cardinality(TypeId::I32), Cardinality::One);
    assert_eq!(an.cardinality(widget), Cardinality::None);
    assert_eq!(an.cardinality(pair), Cardinality::One);
    assert_eq!(an.cardinality(pool.boxed(TypeId::I32)), Cardinality::ZeroOrOne);
    assert_eq!(an.cardinality(pool.nullable(TypeId::I32)), Cardinality::ZeroOrOne);
    assert_eq!(an.cardinality(pool.non_null(widget)), Cardinality::One);
    assert_eq!(an.cardinality(pool.non_empty_sequence(TypeId::I32)), Cardinality::OneOrMore);
    assert_eq!(an.cardinality(pool.sequence(TypeId::I32)), Cardinality::ZeroOrMore);
    assert_eq!(an.cardinality(pool.array(TypeId::I32, 1)), Cardinality::ZeroOrMore);
}

#[test]
fn union_cardinality_combines_alternatives() {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let registry = TypeRegistry::new();
    let an = StreamAnalyzer::new(&pool, &registry);
    let widget = pool.class(interner.intern("Widget"));

    let one_or_opt = pool.union(&[TypeId::I32, pool.nullable(TypeId::I64)]);
    assert_eq!(an.cardinality(one_or_opt), Cardinality::ZeroOrOne);

    let none_or_one = pool.union(&[widget, TypeId::I32]);
    assert_eq!(an.cardinality(none_or_one), Cardinality::None);

    let with_stream = pool.union(&[TypeId::I32, pool.non_empty_sequence(TypeId::I32)]);
    assert_eq!(an.cardinality(with_stream), Cardinality::OneOrMore);
}

#[test]
fn expression_cardinality() {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let bag = pool.class(interner.intern("Bag"));
    let mut registry = TypeRegistry::new();
    registry.set_enumerator_element(bag, TypeId::STR);
    let an = StreamAnalyzer::new(&pool, &registry);

    let mut arena = ExprArena::new();
    let ty_lit = arena.alloc_literal(Literal::type_of(pool.sequence(TypeId::I32)), Span::DUMMY);
    let int_lit = arena.alloc_literal(Literal::i32(1), Span::DUMMY);
    let bag_var = arena.alloc(keel_ir::ExprKind::Variable(keel_ir::SlotId::new(0)), Span::DUMMY, bag);

    assert_eq!(an.expr_cardinality(&arena, ty_lit), Cardinality::One);
    assert_eq!(an.expr_cardinality(&arena, int_lit), Cardinality::One);
    // The type alone says nothing; the enumerator pattern makes it a stream.
    assert_eq!(an.cardinality(bag), Cardinality::None);
    assert_eq!(an.expr_cardinality(&arena, bag_var), Cardinality::ZeroOrMore);
    assert_eq!(an.expr_element_type(&arena, bag_var), TypeId::STR);
}

#[test]
fn root_types() {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let registry = TypeRegistry::new();
    let an = StreamAnalyzer::new(&pool, &registry);
    let widget = pool.class(interner.intern("Widget"));

    assert_eq!(an.root_type(TypeId::I32), TypeId::I32);
    assert_eq!(an.root_type(widget), widget);
    assert_eq!(an.root_type(pool.non_null(widget)), widget);
    assert_eq!(an.root_type(pool.nullable(TypeId::I32)), pool.nullable(TypeId::I32));
    assert_eq!(an.root_type(pool.boxed(TypeId::I32)), TypeId::I32);
    assert_eq!(an.root_type(pool.sequence(TypeId::STR)), TypeId::STR);
}

#[test]
fn cyclic_interfaces_terminate() {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let a = pool.class(interner.intern("A"));
    let b = pool.class(interner.intern("B"));
    let mut registry = TypeRegistry::new();
    registry.set_base(a, b).set_base(b, a);
    let an = StreamAnalyzer::new(&pool, &registry);

    assert_eq!(an.collection_element_type(a), None);
    assert_eq!(an.stream_element_type(a), a);
}
