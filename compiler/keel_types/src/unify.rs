//! Least-upper-bound computation.
//!
//! Used wherever several expressions must share one static type: the
//! branches of a conditional, the elements of an array literal, the
//! members of an anonymous aggregate.
//!
//! # Algorithm
//!
//! 1. `object` among the inputs short-circuits to `object`.
//! 2. Builtin value types and pointers fold pairwise through
//!    [`TypeUnifier::unify_primitive`].
//! 3. Without interfaces among the inputs, the base chains are walked in
//!    lock-step from the root; the deepest common entry wins.
//! 4. If that yields `object`, or an input is an interface, the upward
//!    interface closures are intersected and a candidate that no other
//!    candidate derives from is chosen.

use keel_ir::TypeId;
use keel_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::data::{Primitive, TypeData};
use crate::directory::TypeDirectory;
use crate::numeric::promote;
use crate::pool::Pool;

/// Computes common supertypes.
#[derive(Copy, Clone)]
pub struct TypeUnifier<'a> {
    pool: &'a Pool,
    directory: &'a dyn TypeDirectory,
}

impl<'a> TypeUnifier<'a> {
    pub fn new(pool: &'a Pool, directory: &'a dyn TypeDirectory) -> Self {
        TypeUnifier { pool, directory }
    }

    /// Least upper bound of `types`. `object` for an empty list.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn unify(&self, types: &[TypeId]) -> TypeId {
        let types: SmallVec<[TypeId; 4]> = types
            .iter()
            .map(|&t| self.pool.strip_alias_and_ref(t))
            .collect();
        let Some((&first, rest)) = types.split_first() else {
            return TypeId::OBJECT;
        };
        if types.contains(&TypeId::OBJECT) {
            return TypeId::OBJECT;
        }
        if rest.iter().all(|&t| t == first) {
            return first;
        }

        if types.iter().all(|&t| self.is_primitive_like(t)) {
            let folded = rest.iter().try_fold(first, |acc, &t| self.unify_primitive(acc, t));
            if let Some(ty) = folded.filter(|&ty| ty != TypeId::OBJECT) {
                return ty;
            }
        }

        let any_interface = types.iter().any(|&t| self.pool.is_interface(t));
        let mut unified = TypeId::OBJECT;
        if !any_interface {
            unified = self.common_base(&types);
        }
        if unified == TypeId::OBJECT || any_interface {
            if let Some(iface) = self.common_interface(&types) {
                tracing::debug!(?iface, "unified through interface closure");
                unified = iface;
            }
        }
        unified
    }

    /// Least upper bound of two types.
    #[inline]
    pub fn unify_pair(&self, a: TypeId, b: TypeId) -> TypeId {
        self.unify(&[a, b])
    }

    /// Common type of two builtins or two pointers.
    ///
    /// Numeric pairs follow the arithmetic promotion table; two pointers
    /// unify their elements (an `object` element becomes `void`). `None`
    /// when either side is a type parameter not constrained to reference
    /// types, which has no useful common type with anything else.
    pub fn unify_primitive(&self, t1: TypeId, t2: TypeId) -> Option<TypeId> {
        let t1 = self.pool.strip_alias_and_ref(t1);
        let t2 = self.pool.strip_alias_and_ref(t2);
        if t1 == t2 {
            return Some(t1);
        }
        if let (Some(p1), Some(p2)) = (self.pool.primitive(t1), self.pool.primitive(t2)) {
            return Some(promote(p1, p2).map_or(TypeId::OBJECT, Primitive::type_id));
        }
        match (self.pool.data(t1), self.pool.data(t2)) {
            (TypeData::Pointer(e1), TypeData::Pointer(e2)) => {
                let elem = ensure_sufficient_stack(|| self.unify_pair(e1, e2));
                let elem = if elem == TypeId::OBJECT { TypeId::VOID } else { elem };
                Some(self.pool.pointer(elem))
            }
            (TypeData::TypeParam { reference: false, .. }, _)
            | (_, TypeData::TypeParam { reference: false, .. }) => None,
            _ => Some(TypeId::OBJECT),
        }
    }

    fn is_primitive_like(&self, ty: TypeId) -> bool {
        match self.pool.primitive(ty) {
            Some(p) => p.is_value_type(),
            None => matches!(self.pool.data(ty), TypeData::Pointer(_)),
        }
    }

    /// Deepest entry shared by every root-first base chain.
    fn common_base(&self, types: &[TypeId]) -> TypeId {
        let chains: SmallVec<[SmallVec<[TypeId; 8]>; 4]> = types
            .iter()
            .map(|&t| {
                let mut chain = self.directory.base_chain(t);
                chain.reverse();
                chain.push(t);
                chain
            })
            .collect();
        let mut unified = TypeId::OBJECT;
        for (depth, &candidate) in chains[0].iter().enumerate() {
            if chains.iter().all(|c| c.get(depth) == Some(&candidate)) {
                unified = candidate;
            } else {
                break;
            }
        }
        unified
    }

    /// Deepest interface implemented by every type. Among several
    /// unrelated deepest candidates the lowest id wins, so the result does
    /// not depend on input order.
    fn common_interface(&self, types: &[TypeId]) -> Option<TypeId> {
        let closures: SmallVec<[Vec<TypeId>; 4]> =
            types.iter().map(|&t| self.interface_closure(t)).collect();
        let intersection: SmallVec<[TypeId; 8]> = closures[0]
            .iter()
            .copied()
            .filter(|iface| closures[1..].iter().all(|c| c.contains(iface)))
            .collect();
        intersection
            .iter()
            .copied()
            .filter(|&candidate| {
                !intersection.iter().any(|&other| {
                    other != candidate && self.directory.is_assignable_to(other, candidate)
                })
            })
            .min()
    }

    /// `ty` (if an interface) followed by every interface it implements,
    /// directly, through other interfaces or through its base classes.
    fn interface_closure(&self, ty: TypeId) -> Vec<TypeId> {
        let mut closure = Vec::new();
        let mut seen = FxHashSet::default();
        self.collect_interfaces(ty, &mut closure, &mut seen);
        closure
    }

    fn collect_interfaces(&self, ty: TypeId, out: &mut Vec<TypeId>, seen: &mut FxHashSet<TypeId>) {
        ensure_sufficient_stack(|| {
            let ty = self.pool.strip_alias(ty);
            if !seen.insert(ty) {
                return;
            }
            if self.pool.is_interface(ty) {
                out.push(ty);
            }
            for &iface in self.directory.interfaces(ty) {
                self.collect_interfaces(iface, out, seen);
            }
            if let Some(base) = self.directory.base_type(ty) {
                self.collect_interfaces(base, out, seen);
            }
        });
    }
}

#[cfg(test)]
mod tests;
