use pretty_assertions::assert_eq;

use super::*;
use crate::directory::TypeRegistry;
use keel_ir::StringInterner;

/// `Root <- Mid <- Leaf`, `Root <- Other`; `Mid` and `Other` implement
/// `IShape`, which extends `IDrawable`; `Leaf` also implements `IPrintable`.
struct World {
    pool: Pool,
    interner: StringInterner,
    registry: TypeRegistry,
    root: TypeId,
    mid: TypeId,
    leaf: TypeId,
    other: TypeId,
    shape: TypeId,
    drawable: TypeId,
    printable: TypeId,
}

fn world() -> World {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let root = pool.class(interner.intern("Root"));
    let mid = pool.class(interner.intern("Mid"));
    let leaf = pool.class(interner.intern("Leaf"));
    let other = pool.class(interner.intern("Other"));
    let shape = pool.interface(interner.intern("IShape"));
    let drawable = pool.interface(interner.intern("IDrawable"));
    let printable = pool.interface(interner.intern("IPrintable"));
    let mut registry = TypeRegistry::new();
    registry
        .set_base(root, TypeId::OBJECT)
        .set_base(mid, root)
        .set_base(leaf, mid)
        .set_base(other, root)
        .add_interface(mid, shape)
        .add_interface(other, shape)
        .add_interface(shape, drawable)
        .add_interface(leaf, printable);
    World {
        pool,
        interner,
        registry,
        root,
        mid,
        leaf,
        other,
        shape,
        drawable,
        printable,
    }
}

#[test]
fn class_chain_lowest_common_ancestor() {
    let w = world();
    let u = TypeUnifier::new(&w.pool, &w.registry);

    assert_eq!(u.unify(&[w.leaf, w.mid]), w.mid);
    assert_eq!(u.unify(&[w.mid, w.leaf]), w.mid);
    assert_eq!(u.unify(&[w.leaf, w.leaf, w.leaf]), w.leaf);
    assert_eq!(u.unify(&[w.leaf, w.other]), w.root);
    assert_eq!(u.unify(&[w.leaf, w.root, w.mid]), w.root);
}

#[test]
fn object_and_empty_inputs() {
    let w = world();
    let u = TypeUnifier::new(&w.pool, &w.registry);

    assert_eq!(u.unify(&[]), TypeId::OBJECT);
    assert_eq!(u.unify(&[w.leaf, TypeId::OBJECT]), TypeId::OBJECT);
    assert_eq!(u.unify(&[w.leaf, TypeId::STR]), TypeId::OBJECT);
}

#[test]
fn interfaces_pick_deepest_common_interface() {
    let w = world();
    let u = TypeUnifier::new(&w.pool, &w.registry);

    assert_eq!(u.unify(&[w.leaf, w.shape]), w.shape);
    assert_eq!(u.unify(&[w.shape, w.drawable]), w.drawable);
    assert_eq!(u.unify(&[w.leaf, w.printable]), w.printable);
    assert_eq!(u.unify(&[w.printable, w.shape]), TypeId::OBJECT);
}

#[test]
fn unrelated_classes_meet_at_shared_interface() {
    let pool = Pool::new();
    let interner = StringInterner::new();
    let a = pool.class(interner.intern("A"));
    let b = pool.class(interner.intern("B"));
    let shape = pool.interface(interner.intern("IShape"));
    let mut registry = TypeRegistry::new();
    registry.add_interface(a, shape).add_interface(b, shape);
    let u = TypeUnifier::new(&pool, &registry);

    assert_eq!(u.unify_pair(a, b), shape);
}

#[test]
fn inherited_interfaces_count() {
    let w = world();
    let u = TypeUnifier::new(&w.pool, &w.registry);
    let loner = w.pool.class(w.interner.intern("Loner"));
    let mut registry = w.registry.clone();
    registry.add_interface(loner, w.drawable);
    let u2 = TypeUnifier::new(&w.pool, &registry);

    // Leaf gets IShape (and so IDrawable) from Mid.
    assert_eq!(u2.unify_pair(w.leaf, loner), w.drawable);
    assert_eq!(u.unify_pair(w.leaf, loner), TypeId::OBJECT);
}

#[test]
fn aliases_and_refs_are_stripped() {
    let w = world();
    let u = TypeUnifier::new(&w.pool, &w.registry);
    let named = w.pool.alias(w.interner.intern("Named"), w.leaf, false);

    assert_eq!(u.unify_pair(named, w.mid), w.mid);
    assert_eq!(u.unify_pair(w.pool.by_ref(w.leaf), w.leaf), w.leaf);
}

#[test]
fn primitive_promotion() {
    let w = world();
    let u = TypeUnifier::new(&w.pool, &w.registry);

    assert_eq!(u.unify(&[TypeId::I32, TypeId::F64]), TypeId::F64);
    assert_eq!(u.unify(&[TypeId::I32, TypeId::U32]), TypeId::I64);
    assert_eq!(u.unify(&[TypeId::U8, TypeId::I16, TypeId::I64]), TypeId::I64);
    assert_eq!(u.unify(&[TypeId::BOOL, TypeId::BOOL]), TypeId::BOOL);
    assert_eq!(u.unify(&[TypeId::BOOL, TypeId::I32]), TypeId::OBJECT);
    assert_eq!(u.unify(&[TypeId::DECIMAL, TypeId::F64]), TypeId::OBJECT);
}

#[test]
fn pointer_elements_unify() {
    let w = world();
    let u = TypeUnifier::new(&w.pool, &w.registry);
    let pi = w.pool.pointer(TypeId::I32);
    let pl = w.pool.pointer(TypeId::I64);
    let pb = w.pool.pointer(TypeId::BOOL);

    assert_eq!(u.unify_primitive(pi, pl), Some(pl));
    assert_eq!(u.unify_primitive(pi, pb), Some(w.pool.pointer(TypeId::VOID)));
    assert_eq!(u.unify(&[pi, pb]), w.pool.pointer(TypeId::VOID));
}

#[test]
fn value_type_parameters_have_no_primitive_unifier() {
    let w = world();
    let u = TypeUnifier::new(&w.pool, &w.registry);
    let t = w.pool.type_param(w.interner.intern("T"), &[], false);
    let r = w.pool.type_param(w.interner.intern("R"), &[], true);

    assert_eq!(u.unify_primitive(t, w.leaf), None);
    assert_eq!(u.unify_primitive(w.leaf, t), None);
    assert_eq!(u.unify_primitive(r, w.leaf), Some(TypeId::OBJECT));
    assert_eq!(u.unify_primitive(t, t), Some(t));
}

// === Property tests ===

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_unify {
    use super::world;
    use crate::TypeUnifier;
    use keel_ir::TypeId;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unify_is_symmetric(i in 0usize..14, j in 0usize..14) {
            let w = world();
            let candidates = [
                w.root, w.mid, w.leaf, w.other, w.shape, w.drawable, w.printable,
                TypeId::I8, TypeId::U32, TypeId::I64, TypeId::F32, TypeId::BOOL,
                TypeId::STR, TypeId::OBJECT,
            ];
            let u = TypeUnifier::new(&w.pool, &w.registry);
            let (a, b) = (candidates[i], candidates[j]);
            prop_assert_eq!(u.unify(&[a, b]), u.unify(&[b, a]));
        }

        #[test]
        fn unify_is_idempotent(i in 0usize..7, n in 1usize..5) {
            let w = world();
            let candidates = [w.root, w.mid, w.leaf, w.other, w.shape, w.drawable, w.printable];
            let u = TypeUnifier::new(&w.pool, &w.registry);
            let many = vec![candidates[i]; n];
            prop_assert_eq!(u.unify(&many), candidates[i]);
        }
    }
}
