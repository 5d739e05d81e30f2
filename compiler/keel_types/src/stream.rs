//! Element types and cardinality of sequence-like types.
//!
//! Two notions of "element" are tracked:
//!
//! - the *stream* element, from library templates (`Sequence<T>`,
//!   `NonEmptySequence<T>`, wrappers, `List<T>`, enumerators), arrays and
//!   implemented interfaces;
//! - the *collection* element, from the indexer and enumerator members
//!   a type declares in the [`TypeDirectory`].
//!
//! [`StreamAnalyzer::element_type`] combines both.

use keel_ir::{ExprArena, ExprId, LitValue, TypeId};
use keel_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use crate::cardinality::Cardinality;
use crate::data::{Template, TypeData};
use crate::directory::TypeDirectory;
use crate::pool::Pool;

/// Element and cardinality queries over a pool and a directory.
#[derive(Copy, Clone)]
pub struct StreamAnalyzer<'a> {
    pool: &'a Pool,
    directory: &'a dyn TypeDirectory,
}

impl<'a> StreamAnalyzer<'a> {
    pub fn new(pool: &'a Pool, directory: &'a dyn TypeDirectory) -> Self {
        StreamAnalyzer { pool, directory }
    }

    /// Element of a template instance or array, ignoring the directory.
    fn template_element(&self, ty: TypeId) -> Option<TypeId> {
        match self.pool.data(ty) {
            TypeData::Array { elem, .. } => Some(elem),
            TypeData::Generic { template, args } => match template {
                Template::Sequence
                | Template::NonEmptySequence
                | Template::Boxed
                | Template::NonNull
                | Template::Invariant
                | Template::Enumerator
                | Template::List => args.first().copied(),
                Template::Nullable | Template::Named(_) => None,
            },
            _ => None,
        }
    }

    /// Stream element of `ty`, or `ty` itself when it is not a stream.
    pub fn stream_element_type(&self, ty: TypeId) -> TypeId {
        let mut visited = FxHashSet::default();
        self.stream_element_in(ty, &mut visited)
    }

    fn stream_element_in(&self, original: TypeId, visited: &mut FxHashSet<TypeId>) -> TypeId {
        ensure_sufficient_stack(|| {
            let ty = self.pool.strip_alias(original);
            if let Some(elem) = self.template_element(ty) {
                return elem;
            }
            // Named interfaces only contribute through the types that
            // implement them.
            if self.pool.is_interface(ty) || !visited.insert(ty) {
                return original;
            }
            for &iface in self.directory.interfaces(ty) {
                let elem = self.stream_element_in(iface, visited);
                if elem != iface {
                    return elem;
                }
            }
            original
        })
    }

    /// Element type found through declared indexer and enumerator members.
    ///
    /// `string` and tuples are never collections here. An `object` element
    /// is only returned when nothing more specific is found.
    pub fn collection_element_type(&self, ty: TypeId) -> Option<TypeId> {
        let mut visited = FxHashSet::default();
        self.collection_element_in(ty, &mut visited)
    }

    fn collection_element_in(
        &self,
        ty: TypeId,
        visited: &mut FxHashSet<TypeId>,
    ) -> Option<TypeId> {
        ensure_sufficient_stack(|| {
            let ty = self.pool.strip_alias(ty);
            if ty == TypeId::STR || self.pool.tuple_fields(ty).is_some() || !visited.insert(ty) {
                return None;
            }
            let mut found_object = false;
            let members = [self.directory.indexer(ty), self.directory.enumerator_element(ty)];
            for elem in members.into_iter().flatten() {
                if elem != TypeId::OBJECT {
                    return Some(elem);
                }
                found_object = true;
            }
            for &iface in self.directory.interfaces(ty) {
                match self.collection_element_in(iface, visited) {
                    Some(TypeId::OBJECT) => found_object = true,
                    Some(elem) => return Some(elem),
                    None => {}
                }
            }
            if found_object {
                return Some(TypeId::OBJECT);
            }
            match self.directory.base_type(ty) {
                Some(base) if base != TypeId::OBJECT => self.collection_element_in(base, visited),
                _ => None,
            }
        })
    }

    /// Element type of a sequence-like type.
    ///
    /// Templates and arrays first, then the declared collection pattern
    /// (which covers interfaces and the base type), then streams reached
    /// through implemented interfaces. `None` if nothing is sequence-like.
    pub fn element_type(&self, ty: TypeId) -> Option<TypeId> {
        let stripped = self.pool.strip_alias(ty);
        if let Some(elem) = self.template_element(stripped) {
            return Some(elem);
        }
        if let Some(elem) = self.collection_element_type(stripped) {
            return Some(elem);
        }
        let elem = self.stream_element_type(stripped);
        (elem != stripped).then_some(elem)
    }

    /// Multiplicity of values of `ty`.
    pub fn cardinality(&self, ty: TypeId) -> Cardinality {
        ensure_sufficient_stack(|| {
            let ty = self.pool.strip_alias(ty);
            match self.pool.data(ty) {
                TypeData::Tuple(_) => return Cardinality::One,
                TypeData::Generic { template, .. } => match template {
                    Template::Boxed | Template::Nullable => return Cardinality::ZeroOrOne,
                    Template::NonNull => return Cardinality::One,
                    Template::NonEmptySequence => return Cardinality::OneOrMore,
                    _ => {}
                },
                TypeData::Union(members) => {
                    if let Some((&first, rest)) = members.split_first() {
                        return rest
                            .iter()
                            .fold(self.cardinality(first), |acc, &m| acc.or(self.cardinality(m)));
                    }
                }
                _ => {}
            }
            if self.stream_element_type(ty) != ty {
                Cardinality::ZeroOrMore
            } else if self.pool.is_value_type(ty) {
                Cardinality::One
            } else {
                Cardinality::None
            }
        })
    }

    /// Element type of an expression's value, by its static type.
    ///
    /// Prefers a specific collection element, then a specific stream
    /// element; falls back to the (possibly `object`) stream element.
    pub fn expr_element_type(&self, arena: &ExprArena, expr: ExprId) -> TypeId {
        let ty = arena.ty(expr);
        match self.collection_element_type(ty) {
            Some(elem) if elem != TypeId::OBJECT => elem,
            _ => self.stream_element_type(ty),
        }
    }

    /// Multiplicity of an expression's value.
    ///
    /// A `typeof` literal is a single value. Otherwise the static type's
    /// cardinality, widened to `ZeroOrMore` for a non-structural single
    /// value whose expression has a distinct element type.
    pub fn expr_cardinality(&self, arena: &ExprArena, expr: ExprId) -> Cardinality {
        if arena
            .literal(expr)
            .is_some_and(|lit| matches!(lit.value, LitValue::Type(_)))
        {
            return Cardinality::One;
        }
        let ty = self.pool.strip_alias(arena.ty(expr));
        let card = self.cardinality(ty);
        let single = matches!(card, Cardinality::None | Cardinality::One);
        let non_null = matches!(self.pool.template_arg(ty), Some((Template::NonNull, _)));
        if single
            && !self.pool.is_structural(ty)
            && !non_null
            && self.expr_element_type(arena, expr) != ty
        {
            return Cardinality::ZeroOrMore;
        }
        card
    }

    /// The element a stream or optional type is made of.
    ///
    /// Single values and `Nullable<T>` are their own root; `NonNull<T>`,
    /// boxes and streams reduce to their element.
    pub fn root_type(&self, ty: TypeId) -> TypeId {
        match self.cardinality(ty) {
            Cardinality::None | Cardinality::One
                if !matches!(self.pool.template_arg(ty), Some((Template::NonNull, _))) =>
            {
                ty
            }
            Cardinality::ZeroOrOne if self.pool.is_nullable(ty) => ty,
            _ => self.stream_element_type(ty),
        }
    }
}

#[cfg(test)]
mod tests;
