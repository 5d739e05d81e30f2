use keel_diagnostic::{DiagnosticQueue, ErrorCode};
use keel_ir::{
    CoercionKind, ExprArena, ExprId, ExprKind, Literal, SlotId, Span, StringInterner, TypeId,
};
use keel_types::{DiagnosticSink, Pool, SemanticError, TypeRegistry};
use pretty_assertions::assert_eq;

use crate::{CoercionConfig, CoercionEngine};

mod literal_tests;

type Errors = Vec<(ExprId, SemanticError)>;

/// Types and an arena to coerce in. `Animal <- Dog`, `Dog` implements
/// `IPet`, `Stone` implements nothing.
struct Fixture {
    pool: Pool,
    interner: StringInterner,
    registry: TypeRegistry,
    arena: ExprArena,
    config: CoercionConfig,
    next_slot: u32,
    animal: TypeId,
    dog: TypeId,
    pet: TypeId,
    stone: TypeId,
}

impl Fixture {
    fn new() -> Self {
        let pool = Pool::new();
        let interner = StringInterner::new();
        let animal = pool.class(interner.intern("Animal"));
        let dog = pool.class(interner.intern("Dog"));
        let pet = pool.interface(interner.intern("IPet"));
        let stone = pool.class(interner.intern("Stone"));
        let mut registry = TypeRegistry::new();
        registry
            .set_base(animal, TypeId::OBJECT)
            .set_base(dog, animal)
            .add_interface(dog, pet)
            .set_base(stone, TypeId::OBJECT);
        Fixture {
            pool,
            interner,
            registry,
            arena: ExprArena::new(),
            config: CoercionConfig::default(),
            next_slot: 0,
            animal,
            dog,
            pet,
            stone,
        }
    }

    fn checked(mut self) -> Self {
        self.config = CoercionConfig::checked();
        self
    }

    fn span(&self) -> Span {
        let start = u32::try_from(self.arena.len()).unwrap() * 4;
        Span::new(start, start + 3)
    }

    fn lit(&mut self, literal: Literal) -> ExprId {
        let span = self.span();
        self.arena.alloc_literal(literal, span)
    }

    fn null(&mut self) -> ExprId {
        self.lit(Literal::null())
    }

    /// A local variable of type `ty`.
    fn var(&mut self, ty: TypeId) -> ExprId {
        let slot = SlotId::new(self.next_slot);
        self.next_slot += 1;
        let span = self.span();
        self.arena.alloc(ExprKind::Variable(slot), span, ty)
    }

    fn name(&self, text: &str) -> keel_ir::Name {
        self.interner.intern(text)
    }

    fn engine(&mut self) -> CoercionEngine<'_> {
        CoercionEngine::new(&self.pool, &self.registry, &mut self.arena, self.config)
    }

    fn implicit(&mut self, source: ExprId, target: TypeId) -> (Option<ExprId>, Errors) {
        let mut errors = Errors::new();
        let result = self.engine().implicit_coercion(source, target, &mut errors);
        (result, errors)
    }

    fn explicit(&mut self, source: ExprId, target: TypeId) -> (Option<ExprId>, Errors) {
        let mut errors = Errors::new();
        let result = self.engine().explicit_coercion(source, target, &mut errors);
        (result, errors)
    }

    /// Implicit coercion that must succeed without errors.
    fn ok(&mut self, source: ExprId, target: TypeId) -> ExprId {
        let (result, errors) = self.implicit(source, target);
        assert_eq!(errors, Vec::new());
        let result = result.expect("implicit coercion");
        assert_eq!(self.arena.ty(result), target);
        result
    }

    /// Explicit coercion that must succeed without errors.
    fn cast(&mut self, source: ExprId, target: TypeId) -> ExprId {
        let (result, errors) = self.explicit(source, target);
        assert_eq!(errors, Vec::new());
        let result = result.expect("explicit coercion");
        assert_eq!(self.arena.ty(result), target);
        result
    }

    /// The operand and kind of a `Coerce` node.
    fn coercion(&self, id: ExprId) -> (ExprId, CoercionKind) {
        match *self.arena.kind(id) {
            ExprKind::Coerce { operand, kind } => (operand, kind),
            other => panic!("expected a coercion, found {other:?}"),
        }
    }
}

// === General ===

#[test]
fn identity_returns_the_source() {
    let mut f = Fixture::new();
    let x = f.var(TypeId::I32);
    let before = f.arena.len();
    assert_eq!(f.ok(x, TypeId::I32), x);
    assert_eq!(f.cast(x, TypeId::I32), x);
    assert_eq!(f.arena.len(), before);
}

#[test]
fn aliases_are_retyped() {
    let mut f = Fixture::new();
    let count = f.pool.alias(f.name("Count"), TypeId::I32, false);
    let meters = f.pool.alias(f.name("Meters"), TypeId::F64, true);
    let x = f.var(TypeId::I32);
    let to_count = f.ok(x, count);
    assert_eq!(f.coercion(to_count), (x, CoercionKind::Retype));

    let d = f.var(TypeId::F64);
    let (result, errors) = f.implicit(d, meters);
    assert_eq!(result, None);
    assert_eq!(
        errors,
        vec![(d, SemanticError::NoImplicitCoercion { from: TypeId::F64, to: meters })]
    );
    let to_meters = f.cast(d, meters);
    assert_eq!(f.coercion(to_meters), (d, CoercionKind::Retype));
}

#[test]
fn reference_upcasts_and_boxing() {
    let mut f = Fixture::new();
    let dog = f.var(f.dog);
    let as_animal = f.ok(dog, f.animal);
    assert_eq!(f.coercion(as_animal), (dog, CoercionKind::Retype));
    let as_pet = f.ok(dog, f.pet);
    assert_eq!(f.coercion(as_pet), (dog, CoercionKind::Retype));

    let x = f.var(TypeId::I32);
    let boxed = f.ok(x, TypeId::OBJECT);
    assert_eq!(f.coercion(boxed), (x, CoercionKind::Box));
}

#[test]
fn casts_down_and_across() {
    let mut f = Fixture::new();
    let animal = f.var(f.animal);
    let dog = f.cast(animal, f.dog);
    assert_eq!(f.coercion(dog), (animal, CoercionKind::Downcast));

    let object = f.var(TypeId::OBJECT);
    let unboxed = f.cast(object, TypeId::I32);
    assert_eq!(f.coercion(unboxed), (object, CoercionKind::UnboxAny));

    let stone = f.var(f.stone);
    let pet = f.cast(stone, f.pet);
    assert_eq!(f.coercion(pet), (stone, CoercionKind::InterfaceCast));
}

#[test]
fn by_ref_values_are_dereferenced() {
    let mut f = Fixture::new();
    let by_ref = f.pool.by_ref(TypeId::I32);
    let x = f.var(by_ref);
    let wide = f.ok(x, TypeId::I64);
    let (deref, kind) = f.coercion(wide);
    assert_eq!(kind, CoercionKind::NumericWiden);
    assert_eq!(f.coercion(deref), (x, CoercionKind::Deref));
    assert_eq!(f.arena.ty(deref), TypeId::I32);
}

#[test]
fn failure_reports_exactly_once() {
    let mut f = Fixture::new();
    let s = f.var(TypeId::STR);
    let (result, errors) = f.implicit(s, TypeId::I32);
    assert_eq!(result, None);
    assert_eq!(
        errors,
        vec![(s, SemanticError::NoImplicitCoercion { from: TypeId::STR, to: TypeId::I32 })]
    );
    let (result, errors) = f.explicit(s, TypeId::I32);
    assert_eq!(result, None);
    assert_eq!(
        errors,
        vec![(s, SemanticError::NoExplicitCoercion { from: TypeId::STR, to: TypeId::I32 })]
    );
}

#[test]
fn try_implicit_is_silent() {
    let mut f = Fixture::new();
    let s = f.var(TypeId::STR);
    assert_eq!(f.engine().try_implicit_coercion(s, TypeId::I32), None);
    let x = f.var(TypeId::I16);
    let widened = f.engine().try_implicit_coercion(x, TypeId::I32).unwrap();
    assert_eq!(f.coercion(widened), (x, CoercionKind::NumericWiden));
}

#[test]
fn errors_render_as_diagnostics() {
    let mut f = Fixture::new();
    let s = f.var(TypeId::STR);
    let mut queue = DiagnosticQueue::new();
    {
        let mut sink = DiagnosticSink::new(&mut queue, &f.pool, &f.interner);
        let mut engine =
            CoercionEngine::new(&f.pool, &f.registry, &mut f.arena, f.config);
        assert_eq!(engine.implicit_coercion(s, TypeId::I32, &mut sink), None);
    }
    let diagnostics = queue.flush();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E2001);
    assert_eq!(diagnostics[0].primary_span(), Some(f.arena.span(s)));
}

// === Index normalization ===

#[test]
fn index_types_are_normalized() {
    let mut f = Fixture::new().checked();
    let i = f.var(TypeId::I32);
    let native = f.var(TypeId::UINTPTR);
    let mut errors = Errors::new();
    assert_eq!(f.engine().coerce_to_index(i, &mut errors), Some(i));
    assert_eq!(f.engine().coerce_to_index(native, &mut errors), Some(native));

    let small = f.var(TypeId::U8);
    let index = f.engine().coerce_to_index(small, &mut errors).unwrap();
    assert_eq!(f.arena.ty(index), TypeId::I32);
    assert_eq!(f.coercion(index), (small, CoercionKind::NumericWiden));

    let unsigned = f.var(TypeId::U32);
    let index = f.engine().coerce_to_index(unsigned, &mut errors).unwrap();
    assert_eq!(f.arena.ty(index), TypeId::UINTPTR);
    assert_eq!(f.coercion(index), (unsigned, CoercionKind::NumericWiden));

    let long = f.var(TypeId::I64);
    let index = f.engine().coerce_to_index(long, &mut errors).unwrap();
    assert_eq!(f.arena.ty(index), TypeId::INTPTR);
    assert_eq!(
        f.coercion(index),
        (long, CoercionKind::NumericNarrow { checked: true })
    );
    assert_eq!(errors, Vec::new());
}

#[test]
fn non_numeric_index_is_rejected() {
    let mut f = Fixture::new();
    let s = f.var(TypeId::STR);
    let mut errors = Errors::new();
    assert_eq!(f.engine().coerce_to_index(s, &mut errors), None);
    assert_eq!(
        errors,
        vec![(s, SemanticError::NoImplicitCoercion { from: TypeId::STR, to: TypeId::I32 })]
    );
}
