//! Numeric conversions, with constants folded on the spot.

use keel_eval::fold_conversion;
use keel_ir::{CoercionKind, ExprId, TypeId};
use keel_types::numeric::is_implicit_widening;
use keel_types::{ErrorSink, Primitive, SemanticError};

use super::CoercionEngine;

impl CoercionEngine<'_> {
    /// Implicit conversion from a builtin value type `s` to a builtin or
    /// an enum `t`.
    ///
    /// Widening always succeeds; a widened constant is folded. An integer
    /// constant also converts to a narrower integer (or an enum) when its
    /// value fits. Any other constant reports
    /// `NoImplicitCoercionFromConstant`.
    pub(super) fn implicit_numeric(
        &mut self,
        source: ExprId,
        s: TypeId,
        t: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let sp = self.rules.underlying_primitive(s)?;
        let tp = self.rules.underlying_primitive(t)?;
        let widening = !self.rules.is_enum(t) && self.rules.is_primitive_widening(sp, tp);
        let Some(literal) = self.arena.literal(source) else {
            return widening.then(|| self.wrap(source, CoercionKind::NumericWiden, t));
        };
        if widening {
            return Some(match fold_conversion(literal, tp, false) {
                Ok(Some(folded)) => self.literal_as(source, folded, t),
                _ => self.wrap(source, CoercionKind::NumericWiden, t),
            });
        }
        let integral = |p: Primitive| p.is_integral() && p != Primitive::Char;
        if integral(sp) && integral(tp) {
            if let Ok(Some(folded)) = fold_conversion(literal, tp, true) {
                tracing::debug!(?literal, ?t, "constant narrowed");
                return Some(self.literal_as(source, folded, t));
            }
        }
        if sp.is_numeric() && tp.is_numeric() {
            let error = SemanticError::NoImplicitCoercionFromConstant {
                value: literal,
                to: t,
            };
            self.report(sink, source, error);
        }
        None
    }

    /// Cast between numeric builtins or enums.
    ///
    /// A constant is folded under the configured overflow checking; a
    /// checked fold that leaves the target range reports
    /// `ConstantOverflow`.
    pub(super) fn numeric_cast(
        &mut self,
        source: ExprId,
        sp: Primitive,
        tp: Primitive,
        t: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let checked = self.rules.config.overflow_checked;
        if let Some(literal) = self.arena.literal(source) {
            match fold_conversion(literal, tp, checked) {
                Ok(Some(folded)) => return Some(self.literal_as(source, folded, t)),
                Ok(None) => {}
                Err(error) => {
                    tracing::debug!(?literal, ?t, "constant cast overflows");
                    self.report(sink, source, error.into());
                    return None;
                }
            }
        }
        let kind = if sp == tp {
            CoercionKind::Retype
        } else if is_implicit_widening(sp, tp) {
            CoercionKind::NumericWiden
        } else {
            CoercionKind::NumericNarrow { checked }
        };
        Some(self.wrap(source, kind, t))
    }
}
