//! The `null` literal and conversions between nullable types.

use keel_ir::{CoercionKind, ExprId, ExprKind, Literal, TypeId};
use keel_types::{ErrorSink, NullSink, SemanticError, Template, TypeData};

use super::{CoercionEngine, Mode};

impl CoercionEngine<'_> {
    /// `null` where `t` is expected without a cast.
    ///
    /// A type that admits `null` gets a `null` literal of that type; for
    /// `T?` this is the empty value.
    pub(super) fn implicit_null(
        &mut self,
        source: ExprId,
        t: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        let error = match pool.data(t) {
            TypeData::TypeParam {
                reference: false, ..
            } => SemanticError::TypeVarCannotBeNull { param: t },
            TypeData::Generic {
                template: Template::NonNull,
                ..
            } => SemanticError::CannotCoerceNullToNonNullType { to: t },
            _ if self.rules.null_converts_to(t) => {
                return Some(self.literal_as(source, Literal::null(), t));
            }
            // A conversion operator may still accept `null`.
            _ if self.rules.user_defined_coercion(TypeId::NULL, t, true).is_some() => {
                return None;
            }
            _ => SemanticError::CannotCoerceNullToValueType { to: t },
        };
        self.report(sink, source, error);
        None
    }

    /// `null` cast to `t`. A cast to `NonNull<T>` asserts at run time.
    pub(super) fn explicit_null(&mut self, source: ExprId, t: TypeId) -> Option<ExprId> {
        let pool = self.rules.pool();
        if self.rules.null_converts_to(t) {
            return Some(self.literal_as(source, Literal::null(), t));
        }
        let (template, inner) = pool.wrapper_inner(t)?;
        let inner = pool.strip_alias(inner);
        if !self.rules.null_converts_to(inner) {
            return None;
        }
        let null = self.literal_as(source, Literal::null(), inner);
        let kind = match template {
            Template::NonNull => CoercionKind::NonNullAssert,
            _ => CoercionKind::WrapperConstruct,
        };
        Some(self.wrap(null, kind, t))
    }

    /// `S?` to `T?` by converting the payload: the empty value stays
    /// empty.
    pub(super) fn lift(
        &mut self,
        source: ExprId,
        s_inner: TypeId,
        t: TypeId,
        t_inner: TypeId,
        mode: Mode,
    ) -> Option<ExprId> {
        let span = self.arena.span(source);
        let payload = self.hole(s_inner, span);
        let convert = self.coerce(payload, t_inner, mode, &mut NullSink)?;
        tracing::debug!(?s_inner, ?t_inner, "lifted nullable conversion");
        Some(
            self.arena
                .alloc(ExprKind::NullableLift { source, convert }, span, t),
        )
    }
}
