//! Type-level coercion rules.
//!
//! `CoercionRules` answers "does a conversion exist" without building
//! anything: the predicates used by best-match ranking, overload
//! resolution and the user-defined conversion search. The engine consults
//! the same rules before it allocates coercion nodes.

mod better_match;
mod user_defined;

use keel_stack::ensure_sufficient_stack;
use keel_types::numeric::{is_explicit_numeric, is_implicit_widening, is_native_widening};
use keel_types::{Pool, Primitive, StreamAnalyzer, Template, TypeData, TypeDirectory};

use keel_ir::TypeId;

use crate::CoercionConfig;

/// Type-level coercion queries over a pool and a directory.
#[derive(Copy, Clone)]
pub struct CoercionRules<'a> {
    pub(crate) pool: &'a Pool,
    pub(crate) directory: &'a dyn TypeDirectory,
    pub(crate) config: CoercionConfig,
}

impl<'a> CoercionRules<'a> {
    pub fn new(pool: &'a Pool, directory: &'a dyn TypeDirectory, config: CoercionConfig) -> Self {
        CoercionRules {
            pool,
            directory,
            config,
        }
    }

    #[inline]
    pub fn pool(&self) -> &'a Pool {
        self.pool
    }

    #[inline]
    pub(crate) fn streams(&self) -> StreamAnalyzer<'a> {
        StreamAnalyzer::new(self.pool, self.directory)
    }

    /// Strip the aliases a value may enter implicitly. Stops at an alias
    /// that requires an explicit conversion from its underlying type.
    pub(crate) fn strip_implicit_alias(&self, mut ty: TypeId) -> TypeId {
        while let TypeData::Alias {
            target,
            explicit_only: false,
            ..
        } = self.pool.data(ty)
        {
            ty = target;
        }
        ty
    }

    /// The primitive an enum or builtin numeric type is represented by.
    pub(crate) fn underlying_primitive(&self, ty: TypeId) -> Option<Primitive> {
        let ty = self.pool.strip_alias(ty);
        match self.pool.data(ty) {
            TypeData::Primitive(p) => Some(p),
            TypeData::Enum { underlying, .. } => self.pool.primitive(underlying),
            _ => None,
        }
    }

    pub(crate) fn is_enum(&self, ty: TypeId) -> bool {
        matches!(self.pool.data(ty), TypeData::Enum { .. })
    }

    /// A builtin value type: the domain of the numeric conversion table.
    pub(crate) fn is_scalar_primitive(&self, ty: TypeId) -> bool {
        self.pool.primitive(ty).is_some_and(Primitive::is_value_type)
    }

    /// Numeric widening between builtins, including native-size widening
    /// in an unsafe context.
    pub(crate) fn is_primitive_widening(&self, from: Primitive, to: Primitive) -> bool {
        is_implicit_widening(from, to)
            || (self.config.unsafe_context && is_native_widening(from, to))
    }

    /// Whether a reference of type `from` is a `to` without conversion.
    ///
    /// Nominal types defer to the directory. Structural facts the directory
    /// cannot know are answered here: type parameters through their
    /// constraints, intersections through any member, arrays and
    /// single-payload templates as sequences of their element.
    pub fn is_assignable(&self, from: TypeId, to: TypeId) -> bool {
        ensure_sufficient_stack(|| {
            let from = self.pool.strip_alias(from);
            let to = self.pool.strip_alias(to);
            if from == to {
                return true;
            }
            match self.pool.data(from) {
                TypeData::Pointer(_) => {
                    return matches!(self.pool.data(to), TypeData::Pointer(TypeId::VOID));
                }
                TypeData::ByRef(_) | TypeData::Primitive(Primitive::Void) => return false,
                _ => {}
            }
            if to == TypeId::OBJECT {
                return true;
            }
            match self.pool.data(from) {
                TypeData::Primitive(Primitive::Null) => {
                    return self.pool.is_compatible_with_null(to)
                        && self.pool.wrapper_inner(to).is_none();
                }
                TypeData::TypeParam { constraints, .. } => {
                    return constraints.iter().any(|&c| self.is_assignable(c, to));
                }
                TypeData::Intersection(members) => {
                    if members.iter().any(|&m| self.is_assignable(m, to)) {
                        return true;
                    }
                }
                TypeData::Array { elem, rank: 1 } => {
                    if to == self.pool.sequence(elem) {
                        return true;
                    }
                }
                TypeData::Generic {
                    template:
                        Template::NonEmptySequence
                        | Template::Boxed
                        | Template::NonNull
                        | Template::Invariant,
                    args,
                } => {
                    if let Some(&elem) = args.first() {
                        if to == self.pool.sequence(elem) {
                            return true;
                        }
                    }
                }
                _ => {}
            }
            self.directory.is_assignable_to(from, to)
        })
    }

    /// Implicit conversion from `source` to `target`, user-defined
    /// conversions included.
    pub fn implicit_coercion_from_to(&self, source: TypeId, target: TypeId) -> bool {
        if source == target {
            return true;
        }
        if let (Some(s), Some(t)) = (
            self.pool.nullable_inner(source),
            self.pool.nullable_inner(target),
        ) {
            if self.implicit_coercion_from_to(s, t) {
                return true;
            }
        }
        self.standard_implicit_from_to(source, target)
            || self.user_defined_coercion(source, target, true).is_some()
    }

    /// Implicit conversion built into the language, without user-defined
    /// conversion operators at the top level.
    pub fn standard_implicit_from_to(&self, source: TypeId, target: TypeId) -> bool {
        ensure_sufficient_stack(|| self.standard_implicit_in(source, target))
    }

    fn standard_implicit_in(&self, source: TypeId, target: TypeId) -> bool {
        let mut source = self.pool.strip_alias(source);
        let target = self.strip_implicit_alias(target);
        if source == target {
            return true;
        }
        if matches!(self.pool.data(target), TypeData::Alias { .. }) {
            return false;
        }
        if source == TypeId::NULL {
            return self.null_converts_to(target);
        }
        if source != TypeId::OBJECT && !self.pool.is_nullable(source) {
            if let Some(inner) = self.pool.nullable_inner(target) {
                return self.standard_implicit_from_to(source, inner);
            }
        }
        if let TypeData::ByRef(elem) = self.pool.data(source) {
            source = self.pool.strip_alias(elem);
            if source == target {
                return true;
            }
        }
        if let (Some(s), Some(t)) = (self.pool.primitive(source), self.pool.primitive(target)) {
            if s.is_value_type() && t != Primitive::Object {
                return self.is_primitive_widening(s, t);
            }
        }
        if self.is_assignable(source, target) {
            return true;
        }
        match (self.pool.data(source), self.pool.data(target)) {
            (
                TypeData::Delegate { params, ret, .. },
                TypeData::Delegate {
                    params: t_params,
                    ret: t_ret,
                    ..
                },
            ) => return params == t_params && self.implicit_coercion_from_to(ret, t_ret),
            (TypeData::Union(alternatives), _) => {
                return alternatives
                    .iter()
                    .all(|&alt| self.implicit_coercion_from_to(alt, target));
            }
            (_, TypeData::Union(alternatives)) => {
                return alternatives
                    .iter()
                    .any(|&alt| self.implicit_coercion_from_to(source, alt));
            }
            (_, TypeData::Intersection(members)) => {
                return members.iter().all(|&m| self.is_assignable(source, m));
            }
            _ => {}
        }
        self.implicit_stream_from_to(source, target) || self.tuple_from_to(source, target, false)
    }

    /// Whether the `null` literal converts to `target`.
    pub(crate) fn null_converts_to(&self, target: TypeId) -> bool {
        let target = self.pool.strip_alias(target);
        match self.pool.data(target) {
            TypeData::Generic {
                template: Template::NonNull,
                ..
            } => false,
            TypeData::Generic {
                template: Template::Boxed,
                ..
            } => true,
            _ => self.pool.is_compatible_with_null(target),
        }
    }

    fn implicit_stream_from_to(&self, source: TypeId, target: TypeId) -> bool {
        if let Some((template, inner)) = self.pool.template_arg(target) {
            let streams = self.streams();
            match template {
                Template::Boxed => return self.implicit_coercion_from_to(source, inner),
                Template::NonNull => {
                    return self.pool.is_reference_type(source)
                        && self.implicit_coercion_from_to(source, inner);
                }
                Template::Sequence if source != TypeId::OBJECT => {
                    let elem = streams.stream_element_type(source);
                    return self.implicit_coercion_from_to(elem, inner);
                }
                Template::NonEmptySequence if source != TypeId::OBJECT => {
                    let elem = streams.stream_element_type(source);
                    let scalar_value = elem == source && self.pool.is_value_type(source);
                    let non_empty = matches!(
                        self.pool.template_arg(source),
                        Some((Template::NonEmptySequence | Template::Invariant, _))
                    );
                    return (scalar_value || non_empty) && self.implicit_coercion_from_to(elem, inner);
                }
                _ => {}
            }
        }
        match self.pool.wrapper_inner(source) {
            Some((_, inner)) => self.implicit_coercion_from_to(inner, target),
            None => false,
        }
    }

    /// Field-wise tuple conversion, and the transparent one-field tuple.
    fn tuple_from_to(&self, source: TypeId, target: TypeId, explicit: bool) -> bool {
        let convert = |s: TypeId, t: TypeId| {
            if explicit {
                self.explicit_coercion_from_to(s, t)
            } else {
                self.implicit_coercion_from_to(s, t)
            }
        };
        match (self.pool.tuple_fields(source), self.pool.tuple_fields(target)) {
            (Some(s_fields), Some(t_fields)) => {
                s_fields.len() == t_fields.len()
                    && s_fields.iter().zip(t_fields.iter()).all(|(s, t)| {
                        (explicit || t.is_anonymous() || s.is_anonymous() || s.name == t.name)
                            && convert(s.ty, t.ty)
                    })
            }
            (Some(s_fields), None) => match &*s_fields {
                [field] => convert(field.ty, target),
                _ => false,
            },
            (None, Some(t_fields)) => match &*t_fields {
                [field] => convert(source, field.ty),
                _ => false,
            },
            (None, None) => false,
        }
    }

    /// Conversion by cast from `source` to `target`.
    pub fn explicit_coercion_from_to(&self, source: TypeId, target: TypeId) -> bool {
        self.implicit_coercion_from_to(source, target)
            || self.standard_explicit_from_to(source, target)
            || self.user_defined_explicit_coercion(source, target, true).is_some()
    }

    /// Cast built into the language, without user-defined conversion
    /// operators at the top level.
    pub fn standard_explicit_from_to(&self, source: TypeId, target: TypeId) -> bool {
        ensure_sufficient_stack(|| self.standard_explicit_in(source, target))
    }

    fn standard_explicit_in(&self, source: TypeId, target: TypeId) -> bool {
        let mut source = self.pool.strip_alias(source);
        let target = self.pool.strip_alias(target);
        if source == target || self.standard_implicit_from_to(source, target) {
            return true;
        }
        if let TypeData::ByRef(elem) = self.pool.data(source) {
            source = self.pool.strip_alias(elem);
        }
        if let Some(inner) = self.pool.nullable_inner(source) {
            return self.explicit_coercion_from_to(inner, target);
        }
        if let Some(inner) = self.pool.nullable_inner(target) {
            if self.pool.is_value_type(source) {
                return self.explicit_coercion_from_to(source, inner);
            }
        }
        if source == TypeId::NULL {
            return self.null_converts_to(target)
                || self
                    .pool
                    .wrapper_inner(target)
                    .is_some_and(|(_, inner)| self.null_converts_to(inner));
        }
        if let Some(alternatives) = self.pool.union_members(source) {
            return alternatives
                .iter()
                .any(|&alt| self.explicit_coercion_from_to(alt, target));
        }
        if self.is_assignable(source, target) || self.is_downcast(source, target) {
            return true;
        }
        if self.is_interface_cast(source, target) {
            return true;
        }
        if let (Some(s), Some(t)) = (
            self.underlying_primitive(source),
            self.underlying_primitive(target),
        ) {
            if is_explicit_numeric(s, t) {
                return true;
            }
        }
        if let Some((_, inner)) = self.pool.wrapper_inner(target) {
            return self.explicit_coercion_from_to(source, inner);
        }
        if let Some((_, inner)) = self.pool.wrapper_inner(source) {
            return self.explicit_coercion_from_to(inner, target);
        }
        let streams = self.streams();
        if let Some((_, t_elem)) = self.pool.stream_inner(target) {
            return source != TypeId::OBJECT
                && self.explicit_coercion_from_to(streams.stream_element_type(source), t_elem);
        }
        if let Some((_, s_elem)) = self.pool.stream_inner(source) {
            return streams.stream_element_type(target) == target
                && self.explicit_coercion_from_to(s_elem, target);
        }
        match (self.pool.data(source), self.pool.data(target)) {
            (
                TypeData::Delegate { params, ret, .. },
                TypeData::Delegate {
                    params: t_params,
                    ret: t_ret,
                    ..
                },
            ) => params == t_params && self.explicit_coercion_from_to(ret, t_ret),
            (_, TypeData::Union(alternatives)) => alternatives
                .iter()
                .any(|&alt| self.explicit_coercion_from_to(source, alt)),
            (_, TypeData::Intersection(_)) => true,
            _ => self.tuple_from_to(source, target, true),
        }
    }

    /// `target` derives from the reference type `source`, so a run-time
    /// type test can succeed.
    pub(crate) fn is_downcast(&self, source: TypeId, target: TypeId) -> bool {
        let pointer = |ty| matches!(self.pool.data(ty), TypeData::Pointer(_));
        !pointer(source)
            && !pointer(target)
            && !self.pool.is_value_type(source)
            && self.is_assignable(target, source)
    }

    /// Casts to and from interfaces a sealed type cannot be hiding.
    pub(crate) fn is_interface_cast(&self, source: TypeId, target: TypeId) -> bool {
        let s_data = self.pool.data(source);
        if matches!(s_data, TypeData::Interface { .. }) && !self.directory.is_sealed(target) {
            return true;
        }
        if !self.pool.is_interface(target) {
            return false;
        }
        let blocked = self.directory.is_sealed(source)
            || matches!(s_data, TypeData::Pointer(_))
            || (matches!(s_data, TypeData::Array { .. })
                && self.streams().stream_element_type(target) == target);
        !blocked
    }
}
