//! Tuple conversions.

use keel_ir::{CoercionKind, ExprId, ExprKind, TypeId};
use keel_types::ErrorSink;
use smallvec::SmallVec;

use super::{CoercionEngine, Mode};

impl CoercionEngine<'_> {
    /// Field-by-field conversion between tuples of the same arity.
    ///
    /// Without a cast, a named target field needs a source field of the
    /// same name or an anonymous one. A one-field tuple converts as its
    /// field in both directions.
    pub(super) fn coerce_tuple(
        &mut self,
        source: ExprId,
        s: TypeId,
        t: TypeId,
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        match (pool.tuple_fields(s), pool.tuple_fields(t)) {
            (Some(s_fields), Some(t_fields)) if s_fields.len() == t_fields.len() => {
                let mut elements: SmallVec<[ExprId; 4]> = SmallVec::new();
                for (index, (from, to)) in s_fields.iter().zip(t_fields.iter()).enumerate() {
                    if mode == Mode::Implicit
                        && !to.is_anonymous()
                        && !from.is_anonymous()
                        && from.name != to.name
                    {
                        return None;
                    }
                    let field = self.tuple_field(source, index, from.ty)?;
                    elements.push(self.coerce(field, to.ty, mode, sink)?);
                }
                let span = self.arena.span(source);
                let elements = self.arena.alloc_list(elements);
                Some(self.arena.alloc(ExprKind::Tuple(elements), span, t))
            }
            (Some(s_fields), None) if s_fields.len() == 1 => {
                let field = self.tuple_field(source, 0, s_fields[0].ty)?;
                self.coerce(field, t, mode, sink)
            }
            (None, Some(t_fields)) if t_fields.len() == 1 => {
                let value = self.coerce(source, t_fields[0].ty, mode, sink)?;
                Some(self.wrap(value, CoercionKind::SingletonTuple, t))
            }
            _ => None,
        }
    }

    fn tuple_field(&mut self, tuple: ExprId, index: usize, ty: TypeId) -> Option<ExprId> {
        let index = u32::try_from(index).ok()?;
        let span = self.arena.span(tuple);
        Some(
            self.arena
                .alloc(ExprKind::TupleField { tuple, index }, span, ty),
        )
    }
}
