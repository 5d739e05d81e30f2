//! Unions and intersections.
//!
//! A union value carries the tag of its alternative: the alternative's
//! position in the union's canonical member order.

use keel_ir::{CoercionKind, ExprId, ExprKind, TypeId};
use keel_types::{ErrorSink, NullSink};
use smallvec::SmallVec;

use super::{CoercionEngine, Mode};

impl CoercionEngine<'_> {
    /// A union to a non-union target, by dispatch on the tag.
    ///
    /// Without a cast every alternative must convert. With one, the
    /// alternatives that cannot convert fail at run time, and the cast is
    /// rejected only when none can.
    pub(super) fn coerce_from_union(
        &mut self,
        source: ExprId,
        alternatives: &[TypeId],
        t: TypeId,
        mode: Mode,
    ) -> Option<ExprId> {
        let span = self.arena.span(source);
        let mut arms: SmallVec<[ExprId; 4]> = SmallVec::new();
        let mut reachable = false;
        for &alternative in alternatives {
            let payload = self.hole(alternative, span);
            match self.coerce(payload, t, mode, &mut NullSink) {
                Some(arm) => {
                    reachable = true;
                    arms.push(arm);
                }
                None if mode == Mode::Explicit => {
                    arms.push(self.arena.alloc(ExprKind::CastFailure, span, t));
                }
                None => return None,
            }
        }
        if !reachable {
            return None;
        }
        let arms = self.arena.alloc_list(arms);
        Some(
            self.arena
                .alloc(ExprKind::UnionDispatch { source, arms }, span, t),
        )
    }

    /// A value to the union `t`.
    ///
    /// An alternative's own type is tagged directly. Otherwise the value is
    /// converted to the best alternative it reaches implicitly, or with a
    /// cast to the first alternative it reaches at all.
    pub(super) fn coerce_to_union(
        &mut self,
        source: ExprId,
        s: TypeId,
        t: TypeId,
        alternatives: &[TypeId],
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let mut best: Option<TypeId> = None;
        if alternatives.contains(&s) {
            best = Some(s);
        } else {
            for &alternative in alternatives {
                if !self.rules.implicit_coercion_from_to(s, alternative) {
                    continue;
                }
                best = match best {
                    Some(current) if !self.rules.is_better_match(alternative, current, s) => {
                        Some(current)
                    }
                    _ => Some(alternative),
                };
            }
        }
        if best.is_none() && mode == Mode::Explicit {
            best = alternatives
                .iter()
                .copied()
                .find(|&alternative| self.rules.explicit_coercion_from_to(s, alternative));
        }
        let alternative = best?;
        let tag = alternatives.iter().position(|&a| a == alternative)?;
        let tag = u32::try_from(tag).ok()?;
        tracing::debug!(?s, ?alternative, tag, "union alternative selected");
        let payload = self.coerce(source, alternative, mode, sink)?;
        Some(self.wrap(payload, CoercionKind::UnionTag { tag }, t))
    }

    /// A value to the intersection `t`.
    ///
    /// A value of a type that is every member is boxed or retyped. A cast
    /// otherwise goes through `object` and re-checks membership at run
    /// time.
    pub(super) fn coerce_to_intersection(
        &mut self,
        source: ExprId,
        s: TypeId,
        t: TypeId,
        members: &[TypeId],
        mode: Mode,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        let boxed = pool.is_value_type(s);
        if members.iter().all(|&m| self.rules.is_assignable(s, m)) {
            return Some(if boxed {
                self.wrap(source, CoercionKind::Box, t)
            } else {
                self.retype(source, t)
            });
        }
        if mode == Mode::Implicit {
            return None;
        }
        let object = if boxed {
            self.wrap(source, CoercionKind::Box, TypeId::OBJECT)
        } else {
            source
        };
        Some(self.wrap(object, CoercionKind::IntersectionFromObject, t))
    }
}
