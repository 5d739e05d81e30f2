//! Wrapper templates and stream adaptation.
//!
//! Converting into `Boxed<T>`, `NonNull<T>` or `Invariant<T>` converts to
//! `T` and wraps; converting out of one extracts the payload and carries
//! on. Streams are adapted element-wise, scalars become singletons, and a
//! cast from a stream to a scalar takes the first element of a stream
//! proven non-empty.

use keel_ir::{CoercionKind, ExprId, ExprKind, TypeId};
use keel_types::{ErrorSink, NullSink, Template};

use super::{CoercionEngine, Mode};

impl CoercionEngine<'_> {
    /// Conversions driven by a wrapper or stream template on either side.
    /// `None` also when neither side has one.
    pub(super) fn coerce_template(
        &mut self,
        source: ExprId,
        s: TypeId,
        t: TypeId,
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        if let Some((template, inner)) = pool.template_arg(t) {
            match template {
                Template::Boxed => {
                    let value = self.coerce(source, inner, mode, sink)?;
                    return Some(self.wrap(value, CoercionKind::WrapperConstruct, t));
                }
                Template::NonNull => {
                    if mode == Mode::Implicit && !pool.is_reference_type(s) {
                        return None;
                    }
                    let value = self.coerce(source, inner, mode, sink)?;
                    return Some(self.wrap(value, CoercionKind::NonNullAssert, t));
                }
                Template::Invariant if mode == Mode::Explicit => {
                    let value = self.coerce(source, inner, mode, sink)?;
                    return Some(self.wrap(value, CoercionKind::WrapperConstruct, t));
                }
                Template::Sequence | Template::NonEmptySequence => {
                    return self.coerce_into_stream(source, s, template, inner, t, mode, sink);
                }
                _ => {}
            }
        }
        if let Some((template, inner)) = pool.wrapper_inner(s) {
            let kind = if template == Template::Boxed {
                CoercionKind::Unbox
            } else {
                CoercionKind::WrapperExtract
            };
            let payload = self.wrap(source, kind, inner);
            return self.coerce(payload, t, mode, sink);
        }
        if mode == Mode::Explicit {
            if let Some((template, elem)) = pool.stream_inner(s) {
                if self.rules.streams().stream_element_type(t) == t {
                    return self.first_element(source, template, elem, t, sink);
                }
            }
        }
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn coerce_into_stream(
        &mut self,
        source: ExprId,
        s: TypeId,
        template: Template,
        t_elem: TypeId,
        t: TypeId,
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        if s == TypeId::OBJECT {
            return None;
        }
        if let Some((Template::Invariant, inner)) = pool.template_arg(s) {
            let payload = self.wrap(source, CoercionKind::WrapperExtract, inner);
            return self.coerce(payload, t, mode, sink);
        }
        let s_elem = self.rules.streams().stream_element_type(s);
        if s_elem == s {
            // A one-or-more singleton is only implicit for values, which
            // cannot be null.
            if template == Template::NonEmptySequence
                && mode == Mode::Implicit
                && !pool.is_value_type(s)
            {
                return None;
            }
            let elem = self.coerce(source, t_elem, mode, sink)?;
            return Some(self.wrap(elem, CoercionKind::Singleton, t));
        }
        match (template, pool.stream_inner(s)) {
            (Template::Sequence, _)
            | (Template::NonEmptySequence, Some((Template::NonEmptySequence, _))) => {
                self.adapt(source, s_elem, t_elem, t, mode)
            }
            (Template::NonEmptySequence, _) if mode == Mode::Explicit => {
                let sequence = pool.sequence(t_elem);
                let adapted = self.adapt(source, s_elem, t_elem, sequence, mode)?;
                Some(self.wrap(adapted, CoercionKind::NonEmpty, t))
            }
            _ => None,
        }
    }

    /// A stream of `s_elem` viewed as the stream `t` of `t_elem`.
    fn adapt(
        &mut self,
        source: ExprId,
        s_elem: TypeId,
        t_elem: TypeId,
        t: TypeId,
        mode: Mode,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        if s_elem == t_elem {
            return Some(if pool.is_value_type(self.arena.ty(source)) {
                self.wrap(source, CoercionKind::Box, t)
            } else {
                self.retype(source, t)
            });
        }
        let span = self.arena.span(source);
        let elem = self.hole(s_elem, span);
        let convert = self.coerce(elem, t_elem, mode, &mut NullSink)?;
        Some(
            self.arena
                .alloc(ExprKind::StreamAdapter { source, convert }, span, t),
        )
    }

    /// First element of a stream, failing at run time when it is empty.
    fn first_element(
        &mut self,
        source: ExprId,
        template: Template,
        elem: TypeId,
        t: TypeId,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let non_empty = match template {
            Template::NonEmptySequence => source,
            _ => {
                let ty = self.rules.pool().non_empty_sequence(elem);
                self.wrap(source, CoercionKind::NonEmpty, ty)
            }
        };
        let first = self.wrap(non_empty, CoercionKind::FirstElement, elem);
        self.coerce(first, t, Mode::Explicit, sink)
    }
}
