//! Anonymous functions and delegates.

use keel_ir::{CoercionKind, ExprId, ExprKind, ParamRange, TypeId};
use keel_stack::ensure_sufficient_stack;
use keel_types::{ErrorSink, SemanticError, TypeData};
use smallvec::SmallVec;

use super::{CoercionEngine, Mode};

impl CoercionEngine<'_> {
    /// Delegate to delegate: the parameter lists must be equal and the
    /// return type must convert.
    pub(super) fn convert_delegate(
        &mut self,
        source: ExprId,
        s: TypeId,
        t: TypeId,
        mode: Mode,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        let (
            TypeData::Delegate { params, ret, .. },
            TypeData::Delegate {
                params: t_params,
                ret: t_ret,
                ..
            },
        ) = (pool.data(s), pool.data(t))
        else {
            return None;
        };
        let returns = match mode {
            Mode::Implicit => self.rules.implicit_coercion_from_to(ret, t_ret),
            Mode::Explicit => self.rules.explicit_coercion_from_to(ret, t_ret),
        };
        (params == t_params && returns).then(|| self.wrap(source, CoercionKind::DelegateConvert, t))
    }

    /// An anonymous function where `target` is expected.
    ///
    /// Against a delegate type the parameters must match exactly. When the
    /// function's return type differs from the delegate's, every `return`
    /// in the body is converted and the function is retyped. Against any
    /// other type, a function without parameters is invoked and its result
    /// converted.
    pub(super) fn coerce_function(
        &mut self,
        source: ExprId,
        params: ParamRange,
        body: ExprId,
        target: TypeId,
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<ExprId> {
        let pool = self.rules.pool();
        let function = self.arena.ty(source);
        let TypeData::Delegate { ret: body_ret, .. } = pool.data(function) else {
            return None;
        };
        if pool.strip_alias(target) == function {
            return Some(self.retype(source, target));
        }
        let param_types: SmallVec<[TypeId; 4]> =
            self.arena.params(params).iter().map(|p| p.ty).collect();

        let TypeData::Delegate { params: d_params, ret, .. } = pool.data(pool.strip_alias(target))
        else {
            if !param_types.is_empty() {
                return None;
            }
            let call = self.wrap(source, CoercionKind::Invoke, body_ret);
            return self.coerce(call, target, mode, sink);
        };

        let mismatch = SemanticError::NestedFunctionSignatureMismatch {
            delegate: target,
            function,
        };
        if *d_params != *param_types {
            self.report(sink, source, mismatch);
            return None;
        }
        let converted = if body_ret == ret {
            source
        } else {
            let returns = match mode {
                Mode::Implicit => self.rules.implicit_coercion_from_to(body_ret, ret),
                Mode::Explicit => self.rules.explicit_coercion_from_to(body_ret, ret),
            };
            if !returns {
                self.report(sink, source, mismatch);
                return None;
            }
            let body = if matches!(self.arena.kind(body), ExprKind::Block(_)) {
                self.convert_returns(body, ret, mode, sink)?;
                body
            } else {
                self.coerce(body, ret, mode, sink)?
            };
            let span = self.arena.span(source);
            let ty = pool.function(&param_types, ret);
            tracing::debug!(?function, ?ty, "anonymous function retyped");
            self.arena
                .alloc(ExprKind::AnonymousFunction { params, body }, span, ty)
        };
        Some(self.wrap(converted, CoercionKind::AnonymousToDelegate, target))
    }

    /// Convert the value of every `return` reachable through blocks.
    /// Nested functions have their own returns and are left alone.
    fn convert_returns(
        &mut self,
        node: ExprId,
        ret: TypeId,
        mode: Mode,
        sink: &mut dyn ErrorSink,
    ) -> Option<()> {
        ensure_sufficient_stack(|| match *self.arena.kind(node) {
            ExprKind::Block(items) => {
                let items: SmallVec<[ExprId; 8]> = self.arena.list(items).iter().copied().collect();
                for item in items {
                    self.convert_returns(item, ret, mode, sink)?;
                }
                Some(())
            }
            ExprKind::Return(value) if value.is_valid() => {
                let value = self.coerce(value, ret, mode, sink)?;
                self.arena.set_kind(node, ExprKind::Return(value));
                Some(())
            }
            _ => Some(()),
        })
    }
}
