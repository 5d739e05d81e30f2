//! Coercion engine: rewrites an expression into one of a target type.
//!
//! # Architecture
//!
//! Every conversion is materialized as new arena nodes wrapping the source
//! expression (`Coerce`, `NullableLift`, `UnionDispatch`, ...); the source
//! itself is never modified, except that the `return`s of an anonymous
//! function converted to a delegate are rewritten in place.
//!
//! The public entry points report exactly one error for a failed request.
//! The most specific error is reported where it is found; when nothing was
//! reported on the way, the entry point reports `NoImplicitCoercion` or
//! `NoExplicitCoercion` for the whole request. Speculative attempts (union
//! arms, element adapters) report to a `NullSink`.
//!
//! # Modules
//!
//! - `literals`: constant narrowing and folded numeric casts
//! - `nullable`: the `null` literal and lifted conversions
//! - `templates`: `Boxed`/`NonNull`/`Invariant` and stream adaptation
//! - `tuples`, `unions` (and intersections), `delegates`

mod delegates;
mod literals;
mod nullable;
mod templates;
mod tuples;
mod unions;

use keel_ir::{CoercionKind, ExprArena, ExprId, ExprKind, Literal, Span, TypeId};
use keel_stack::ensure_sufficient_stack;
use keel_types::numeric::is_explicit_numeric;
use keel_types::{
    ConversionMethod, ErrorSink, NullSink, Pool, Primitive, SemanticError, TypeData,
    TypeDirectory,
};

use crate::{CoercionConfig, CoercionRules};

/// Whether a conversion is applied implicitly or requested by a cast.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Implicit,
    Explicit,
}

/// Counts what passes through to the caller's sink.
struct Tracked<'s, S: ?Sized> {
    inner: &'s mut S,
    reported: usize,
}

impl<S: ErrorSink + ?Sized> ErrorSink for Tracked<'_, S> {
    fn report(&mut self, node: ExprId, span: Span, error: SemanticError) {
        self.reported += 1;
        self.inner.report(node, span, error);
    }
}

/// Builds coercions over one expression arena.
pub struct CoercionEngine<'a> {
    rules: CoercionRules<'a>,
    arena: &'a mut ExprArena,
}

impl<'a> CoercionEngine<'a> {
    pub fn new(
        pool: &'a Pool,
        directory: &'a dyn TypeDirectory,
        arena: &'a mut ExprArena,
        config: CoercionConfig,
    ) -> Self {
        CoercionEngine {
            rules: CoercionRules::new(pool, directory, config),
            arena,
        }
    }

    #[inline]
    pub fn arena(&self) -> &ExprArena {
        self.arena
    }

    /// The type-level rules the engine builds from.
    #[inline]
    pub fn rules(&self) -> CoercionRules<'a> {
        self.rules
    }

    /// Convert `source` to `target` without a cast.
    ///
    /// Returns the rewritten expression (the source itself for an
    /// identity), or `None` after reporting one error to `sink`.
    #[tracing::instrument(level = "trace", skip(self, sink))]
    pub fn implicit_coercion(
        &mut self,
        source: ExprId,
        target: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        self.coerce_reporting(source, target, Mode::Implicit, sink)
    }

    /// Convert `source` to `target` as a cast.
    #[tracing::instrument(level = "trace", skip(self, sink))]
    pub fn explicit_coercion(
        &mut self,
        source: ExprId,
        target: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        self.coerce_reporting(source, target, Mode::Explicit, sink)
    }

    /// Implicit coercion that reports nothing on failure.
    pub fn try_implicit_coercion(&mut self, source: ExprId, target: TypeId) -> Option<ExprId> {
        self.coerce(source, target, Mode::Implicit, &mut NullSink)
    }

    /// Normalize an array index.
    ///
    /// `i32` and the native-size integers are kept. Anything reaching
    /// `i32` implicitly is converted to it; `u32` widens to `uintptr`;
    /// 64-bit integers narrow to `intptr`, range-checked when overflow
    /// checking is on.
    #[tracing::instrument(level = "trace", skip(self, sink))]
    pub fn coerce_to_index(&mut self, source: ExprId, sink: &mut dyn ErrorSink) -> Option<ExprId> {
        let ty = self.rules.pool().strip_alias(self.arena.ty(source));
        if matches!(ty, TypeId::I32 | TypeId::INTPTR | TypeId::UINTPTR) {
            return Some(source);
        }
        if self.rules.implicit_coercion_from_to(ty, TypeId::I32) {
            return self.implicit_coercion(source, TypeId::I32, sink);
        }
        if self.rules.implicit_coercion_from_to(ty, TypeId::U32) {
            let index = self.implicit_coercion(source, TypeId::U32, sink)?;
            return Some(self.wrap(index, CoercionKind::NumericWiden, TypeId::UINTPTR));
        }
        for wide in [TypeId::I64, TypeId::U64] {
            if self.rules.implicit_coercion_from_to(ty, wide) {
                let index = self.implicit_coercion(source, wide, sink)?;
                let checked = self.rules.config.overflow_checked;
                return Some(self.wrap(
                    index,
                    CoercionKind::NumericNarrow { checked },
                    TypeId::INTPTR,
                ));
            }
        }
        self.implicit_coercion(source, TypeId::I32, sink)
    }

    /// See [`CoercionRules::is_better_match`].
    pub fn is_better_match(&self, t1: TypeId, t2: TypeId, t3: TypeId) -> bool {
        self.rules.is_better_match(t1, t2, t3)
    }

    /// See [`CoercionRules::user_defined_coercion`].
    pub fn user_defined_coercion(
        &self,
        source: TypeId,
        target: TypeId,
        try_standard: bool,
    ) -> Option<ConversionMethod> {
        self.rules.user_defined_coercion(source, target, try_standard)
    }

    fn coerce_reporting(
        &mut self,
        source: ExprId,
        target: TypeId,
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let mut tracked = Tracked {
            inner: sink,
            reported: 0,
        };
        let result = self.coerce(source, target, mode, &mut tracked);
        if result.is_none() && tracked.reported == 0 {
            let from = self.arena.ty(source);
            let error = match mode {
                Mode::Implicit => SemanticError::NoImplicitCoercion { from, to: target },
                Mode::Explicit => SemanticError::NoExplicitCoercion { from, to: target },
            };
            self.report(&mut tracked, source, error);
        }
        result
    }

    fn coerce(
        &mut self,
        source: ExprId,
        target: TypeId,
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        ensure_sufficient_stack(|| match mode {
            Mode::Implicit => self.implicit_in(source, target, sink),
            Mode::Explicit => self.explicit_in(source, target, sink),
        })
    }

    fn implicit_in(
        &mut self,
        source: ExprId,
        target: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        if let ExprKind::AnonymousFunction { params, body } = *self.arena.kind(source) {
            return self.coerce_function(source, params, body, target, Mode::Implicit, sink);
        }
        if let Some(result) = self.standard_implicit(source, target, sink) {
            return Some(result);
        }
        let pool = self.rules.pool();
        let ty = self.arena.ty(source);
        if let (Some(s), Some(t)) = (pool.nullable_inner(ty), pool.nullable_inner(target)) {
            return self.lift(source, s, target, t, Mode::Implicit);
        }
        let method = self.rules.user_defined_coercion(ty, target, true)?;
        self.apply_user_defined(source, method, target, Mode::Implicit, sink)
    }

    fn explicit_in(
        &mut self,
        source: ExprId,
        target: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        if let ExprKind::AnonymousFunction { params, body } = *self.arena.kind(source) {
            return self.coerce_function(source, params, body, target, Mode::Explicit, sink);
        }
        if let Some(result) = self.standard_explicit(source, target, sink) {
            return Some(result);
        }
        let pool = self.rules.pool();
        let ty = self.arena.ty(source);
        if let (Some(s), Some(t)) = (pool.nullable_inner(ty), pool.nullable_inner(target)) {
            if let Some(lifted) = self.lift(source, s, target, t, Mode::Explicit) {
                return Some(lifted);
            }
        }
        if let Some(method) = self.rules.user_defined_explicit_coercion(ty, target, true) {
            return self.apply_user_defined(source, method, target, Mode::Explicit, sink);
        }
        if self.arena.is_null_literal(source) && pool.is_value_type(pool.strip_alias(target)) {
            self.report(sink, source, SemanticError::CannotCoerceNullToValueType { to: target });
        }
        None
    }

    /// Standard conversion into the operator's parameter, the call, and a
    /// standard conversion of its result.
    fn apply_user_defined(
        &mut self,
        source: ExprId,
        method: ConversionMethod,
        target: TypeId,
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        tracing::debug!(conversion = ?method.id, ?target, "applying user-defined conversion");
        let argument = self.standard(source, method.param, mode, sink)?;
        let call = self.wrap(argument, CoercionKind::UserDefined(method.id), method.ret);
        self.standard(call, target, mode, sink)
    }

    fn standard(
        &mut self,
        source: ExprId,
        target: TypeId,
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        match mode {
            Mode::Implicit => self.standard_implicit(source, target, sink),
            Mode::Explicit => self.standard_explicit(source, target, sink),
        }
    }

    /// Built-in implicit conversion. Aliases are stripped on the way in
    /// and restored with a `Retype` on the way out.
    fn standard_implicit(
        &mut self,
        source: ExprId,
        target: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        if self.arena.ty(source) == target {
            return Some(source);
        }
        let s = pool.strip_alias(self.arena.ty(source));
        let t = self.rules.strip_implicit_alias(target);
        if matches!(pool.data(t), TypeData::Alias { .. }) {
            return None;
        }
        let converted = ensure_sufficient_stack(|| self.standard_implicit_in(source, s, t, sink))?;
        Some(self.retype(converted, target))
    }

    fn standard_implicit_in(
        &mut self,
        source: ExprId,
        s: TypeId,
        t: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        if s == t {
            return Some(self.retype(source, t));
        }
        if self.arena.is_null_literal(source) {
            return self.implicit_null(source, t, sink);
        }
        if let TypeData::ByRef(elem) = pool.data(s) {
            let value = self.wrap(source, CoercionKind::Deref, elem);
            return self.standard_implicit(value, t, sink);
        }
        if s != TypeId::OBJECT && !pool.is_nullable(s) {
            if let Some(inner) = pool.nullable_inner(t) {
                let value = self.standard_implicit(source, inner, sink)?;
                return Some(self.wrap(value, CoercionKind::NullableWrap, t));
            }
        }
        if self.rules.is_scalar_primitive(s)
            && (pool.primitive(t).is_some_and(|p| p != Primitive::Object)
                || self.rules.is_enum(t))
        {
            return self.implicit_numeric(source, s, t, sink);
        }
        if self.rules.is_assignable(s, t) {
            return Some(self.upcast(source, s, t));
        }
        match (pool.data(s), pool.data(t)) {
            (TypeData::Delegate { .. }, TypeData::Delegate { .. }) => {
                return self.convert_delegate(source, s, t, Mode::Implicit);
            }
            (TypeData::Union(alternatives), _) => {
                return self.coerce_from_union(source, &alternatives, t, Mode::Implicit);
            }
            (_, TypeData::Union(alternatives)) => {
                return self.coerce_to_union(source, s, t, &alternatives, Mode::Implicit, sink);
            }
            (_, TypeData::Intersection(members)) => {
                return self.coerce_to_intersection(source, s, t, &members, Mode::Implicit);
            }
            _ => {}
        }
        if let Some(converted) = self.coerce_template(source, s, t, Mode::Implicit, sink) {
            return Some(converted);
        }
        self.coerce_tuple(source, s, t, Mode::Implicit, sink)
    }

    /// Built-in cast.
    fn standard_explicit(
        &mut self,
        source: ExprId,
        target: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        let s = pool.strip_alias(self.arena.ty(source));
        let t = pool.strip_alias(target);
        let converted = ensure_sufficient_stack(|| self.standard_explicit_in(source, s, t, sink))?;
        Some(self.retype(converted, target))
    }

    fn standard_explicit_in(
        &mut self,
        source: ExprId,
        s: TypeId,
        t: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        if s == t {
            return Some(self.retype(source, t));
        }
        if let Some(converted) = self.standard_implicit(source, t, &mut NullSink) {
            return Some(converted);
        }
        if let TypeData::ByRef(elem) = pool.data(s) {
            let value = self.wrap(source, CoercionKind::Deref, elem);
            return self.standard_explicit(value, t, sink);
        }
        if self.arena.is_null_literal(source) {
            return self.explicit_null(source, t);
        }
        if let Some(inner) = pool.nullable_inner(s) {
            if pool.is_nullable(t) {
                return None;
            }
            let value = self.wrap(source, CoercionKind::NullableValue, inner);
            return self.coerce(value, t, Mode::Explicit, sink);
        }
        if let Some(inner) = pool.nullable_inner(t) {
            if pool.is_value_type(s) {
                let value = self.coerce(source, inner, Mode::Explicit, sink)?;
                return Some(self.wrap(value, CoercionKind::NullableWrap, t));
            }
        }
        if let Some(alternatives) = pool.union_members(s) {
            return self.coerce_from_union(source, &alternatives, t, Mode::Explicit);
        }
        if let Some(converted) = self.coerce_template(source, s, t, Mode::Explicit, sink) {
            return Some(converted);
        }
        if self.rules.is_downcast(s, t) || self.rules.is_interface_cast(s, t) {
            return Some(self.downcast(source, s, t));
        }
        if let (Some(sp), Some(tp)) = (
            self.rules.underlying_primitive(s),
            self.rules.underlying_primitive(t),
        ) {
            if is_explicit_numeric(sp, tp) {
                return self.numeric_cast(source, sp, tp, t, sink);
            }
        }
        match (pool.data(s), pool.data(t)) {
            (TypeData::Delegate { .. }, TypeData::Delegate { .. }) => {
                self.convert_delegate(source, s, t, Mode::Explicit)
            }
            (_, TypeData::Union(alternatives)) => {
                self.coerce_to_union(source, s, t, &alternatives, Mode::Explicit, sink)
            }
            (_, TypeData::Intersection(members)) => {
                self.coerce_to_intersection(source, s, t, &members, Mode::Explicit)
            }
            _ => self.coerce_tuple(source, s, t, Mode::Explicit, sink),
        }
    }

    /// A conversion to a supertype: boxing for value types, a retype for
    /// references.
    fn upcast(&mut self, source: ExprId, s: TypeId, t: TypeId) -> ExprId {
        let pool = self.rules.pool();
        let kind = match pool.data(s) {
            TypeData::Union(_) if t == TypeId::OBJECT => CoercionKind::UnionToObject,
            TypeData::Intersection(_) if t == TypeId::OBJECT => CoercionKind::IntersectionToObject,
            TypeData::TypeParam {
                reference: false, ..
            } => CoercionKind::Box,
            _ if pool.is_value_type(s) && !pool.is_value_type(t) => CoercionKind::Box,
            _ => return self.retype(source, t),
        };
        self.wrap(source, kind, t)
    }

    /// A conversion to a subtype, tested at run time.
    fn downcast(&mut self, source: ExprId, s: TypeId, t: TypeId) -> ExprId {
        let pool = self.rules.pool();
        let unbox = pool.is_value_type(t)
            || matches!(
                pool.data(t),
                TypeData::TypeParam {
                    reference: false,
                    ..
                }
            );
        let kind = if unbox {
            CoercionKind::UnboxAny
        } else if self.rules.is_downcast(s, t) {
            CoercionKind::Downcast
        } else {
            CoercionKind::InterfaceCast
        };
        self.wrap(source, kind, t)
    }

    // === Node helpers ===

    fn wrap(&mut self, operand: ExprId, kind: CoercionKind, ty: TypeId) -> ExprId {
        let span = self.arena.span(operand);
        self.arena.alloc(ExprKind::Coerce { operand, kind }, span, ty)
    }

    /// `operand` typed as `ty`, wrapped in a `Retype` only if needed.
    fn retype(&mut self, operand: ExprId, ty: TypeId) -> ExprId {
        if self.arena.ty(operand) == ty {
            operand
        } else {
            self.wrap(operand, CoercionKind::Retype, ty)
        }
    }

    fn hole(&mut self, ty: TypeId, span: Span) -> ExprId {
        self.arena.alloc(ExprKind::Hole, span, ty)
    }

    /// A new literal at `source`'s location, typed as `ty`.
    fn literal_as(&mut self, source: ExprId, literal: Literal, ty: TypeId) -> ExprId {
        let span = self.arena.span(source);
        self.arena
            .alloc_literal(Literal::with_type(literal.value, ty), span)
    }

    fn report(&self, sink: &mut dyn ErrorSink, node: ExprId, error: SemanticError) {
        sink.report(node, self.arena.span(node), error);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
