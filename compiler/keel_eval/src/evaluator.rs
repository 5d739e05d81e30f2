//! Constant-field evaluation.
//!
//! A constant field's value is its initializer folded down to a literal.
//! Initializers may name other constant fields, so evaluation recurses
//! through them and memoizes every result in a [`ConstCache`].
//!
//! # Cycles
//!
//! A field is entered into the evaluator's in-progress set before its
//! initializer is evaluated and removed on the way out, whatever the
//! outcome. Reaching a field that is already in progress raises
//! [`ConstEvalError::CircularConstant`], which every frame propagates
//! unchanged. Only [`ConstEvaluator::evaluate_field`], the non-reentrant
//! entry point, turns it into a diagnostic, so a cycle is reported once
//! and none of the fields on it gets a cached value.

use keel_ir::{BinaryOp, CoercionKind, ExprArena, ExprId, ExprKind, FieldId, LitValue, Literal, Span, TypeId};
use keel_stack::ensure_sufficient_stack;
use keel_types::{ErrorSink, Pool, SemanticError, TypeData};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::conversion::fold_conversion;
use crate::errors::{ConstEvalError, FoldError};
use crate::operators::{fold_binary, FoldResult};
use crate::unary_operators::fold_unary;

/// Constant evaluation settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalConfig {
    /// Arithmetic overflow is an error rather than wrapping.
    pub overflow_checked: bool,
}

/// Where constant fields come from.
pub trait ConstantTable {
    /// Initializer of `field`; `None` when the field is not a constant.
    fn initializer(&self, field: FieldId) -> Option<ExprId>;

    /// Declared type of `field`.
    fn field_type(&self, field: FieldId) -> TypeId;
}

impl ConstantTable for FxHashMap<FieldId, (ExprId, TypeId)> {
    fn initializer(&self, field: FieldId) -> Option<ExprId> {
        self.get(&field).map(|&(init, _)| init)
    }

    fn field_type(&self, field: FieldId) -> TypeId {
        self.get(&field).map_or(TypeId::OBJECT, |&(_, ty)| ty)
    }
}

/// Memoized constant-field values.
///
/// `None` is cached too: a field whose initializer is not constant, or
/// whose evaluation reported an error, is not evaluated (or reported)
/// again. Fields found to be circular are remembered separately and keep
/// no value.
#[derive(Clone, Debug, Default)]
pub struct ConstCache {
    values: FxHashMap<FieldId, Option<Literal>>,
    circular: FxHashSet<FieldId>,
}

impl ConstCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value of `field`; `None` when unset or not constant.
    pub fn get(&self, field: FieldId) -> Option<Literal> {
        self.values.get(&field).copied().flatten()
    }

    /// Whether `field` has been evaluated, with or without a value.
    pub fn contains(&self, field: FieldId) -> bool {
        self.values.contains_key(&field)
    }

    pub fn is_circular(&self, field: FieldId) -> bool {
        self.circular.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, field: FieldId, value: Option<Literal>) {
        self.values.insert(field, value);
    }
}

/// Evaluates constant fields of one compilation unit.
///
/// Owns its in-progress set, so an evaluator must not be shared across
/// threads; create one per unit.
pub struct ConstEvaluator<'a> {
    arena: &'a ExprArena,
    pool: &'a Pool,
    constants: &'a dyn ConstantTable,
    cache: &'a mut ConstCache,
    in_progress: FxHashSet<FieldId>,
    config: EvalConfig,
}

type EvalResult = Result<Option<Literal>, ConstEvalError>;

impl<'a> ConstEvaluator<'a> {
    pub fn new(
        arena: &'a ExprArena,
        pool: &'a Pool,
        constants: &'a dyn ConstantTable,
        cache: &'a mut ConstCache,
        config: EvalConfig,
    ) -> Self {
        ConstEvaluator {
            arena,
            pool,
            constants,
            cache,
            in_progress: FxHashSet::default(),
            config,
        }
    }

    /// Value of the constant `field`, or `None` if it has none.
    ///
    /// Every problem found on the way is reported to `sink` exactly once.
    #[tracing::instrument(level = "trace", skip(self, sink))]
    pub fn evaluate_field(&mut self, field: FieldId, sink: &mut dyn ErrorSink) -> Option<Literal> {
        match self.field_value(field, sink) {
            Ok(value) => value,
            Err(error @ ConstEvalError::CircularConstant { field: cyclic }) => {
                tracing::debug!(?field, ?cyclic, "circular constant");
                self.cache.circular.insert(cyclic);
                let node = self.constants.initializer(cyclic).unwrap_or(ExprId::INVALID);
                let span = if node.is_valid() { self.arena.span(node) } else { Span::DUMMY };
                sink.report(node, span, error.into());
                None
            }
        }
    }

    /// Fold an arbitrary expression, following constant fields it names.
    pub fn evaluate_expr(&mut self, expr: ExprId, sink: &mut dyn ErrorSink) -> Option<Literal> {
        match self.eval(expr, sink) {
            Ok(value) => value,
            Err(error @ ConstEvalError::CircularConstant { field }) => {
                self.cache.circular.insert(field);
                sink.report(expr, self.arena.span(expr), error.into());
                None
            }
        }
    }

    fn field_value(&mut self, field: FieldId, sink: &mut dyn ErrorSink) -> EvalResult {
        if self.cache.contains(field) || self.cache.is_circular(field) {
            return Ok(self.cache.get(field));
        }
        let Some(init) = self.constants.initializer(field) else {
            return Ok(None);
        };
        if !self.in_progress.insert(field) {
            return Err(ConstEvalError::CircularConstant { field });
        }
        let result = self.eval(init, sink);
        self.in_progress.remove(&field);

        let value = result?.map(|lit| self.retype_for_field(lit, field));
        self.cache.insert(field, value);
        Ok(value)
    }

    /// Enum constants carry their underlying value with the enum's type.
    fn retype_for_field(&self, lit: Literal, field: FieldId) -> Literal {
        let ty = self.constants.field_type(field);
        match self.pool.data(self.pool.strip_alias(ty)) {
            TypeData::Enum { .. } => Literal::with_type(lit.value, ty),
            _ => lit,
        }
    }

    fn eval(&mut self, expr: ExprId, sink: &mut dyn ErrorSink) -> EvalResult {
        ensure_sufficient_stack(|| match *self.arena.kind(expr) {
            ExprKind::Literal(_) => Ok(self.arena.literal(expr)),
            ExprKind::MemberAccess { field, .. } => self.field_value(field, sink),
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left, sink)?;
                let right = self.eval(right, sink)?;
                let (Some(left), Some(right)) = (left, right) else {
                    return Ok(None);
                };
                let folded = fold_binary(left, right, op, self.config.overflow_checked)
                    .and_then(|value| self.keep_enum_type(left, right, op, value));
                Ok(self.check(expr, folded, sink))
            }
            ExprKind::Unary { op, operand } => {
                let Some(operand) = self.eval(operand, sink)? else {
                    return Ok(None);
                };
                let folded = fold_unary(op, operand, self.config.overflow_checked);
                Ok(self.check(expr, folded, sink))
            }
            ExprKind::Coerce { operand, kind } => {
                let Some(operand) = self.eval(operand, sink)? else {
                    return Ok(None);
                };
                let ty = self.arena.ty(expr);
                match kind {
                    CoercionKind::Retype | CoercionKind::NullableWrap => {
                        Ok(Some(Literal::with_type(operand.value, ty)))
                    }
                    CoercionKind::NullableDefault => Ok(Some(Literal::with_type(LitValue::Null, ty))),
                    // Reading the value of a null fails at run time.
                    CoercionKind::NullableValue if operand.is_null() => Ok(None),
                    CoercionKind::NullableValue => Ok(Some(Literal::with_type(operand.value, ty))),
                    CoercionKind::NumericWiden | CoercionKind::NumericNarrow { .. } => {
                        let Some(target) = self.pool.primitive(ty) else {
                            return Ok(None);
                        };
                        let checked = matches!(kind, CoercionKind::NumericNarrow { checked: true });
                        Ok(self.check(expr, fold_conversion(operand, target, checked), sink))
                    }
                    _ => Ok(None),
                }
            }
            _ => Ok(None),
        })
    }

    /// `&`, `|` and `^` over two values of one enum type stay in that
    /// enum. Every other operator yields the promoted underlying type.
    fn keep_enum_type(&self, left: Literal, right: Literal, op: BinaryOp, folded: Option<Literal>) -> FoldResult {
        let bitwise = matches!(op, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor);
        let Some(result) = folded.filter(|_| bitwise && left.ty == right.ty) else {
            return Ok(folded);
        };
        let TypeData::Enum { underlying, .. } = self.pool.data(self.pool.strip_alias(left.ty)) else {
            return Ok(folded);
        };
        let Some(kind) = self.pool.primitive(underlying) else {
            return Ok(folded);
        };
        Ok(fold_conversion(result, kind, false)?.map(|lit| Literal::with_type(lit.value, left.ty)))
    }

    /// Report a fold error at `expr`; the expression is then not constant.
    fn check(&self, expr: ExprId, folded: FoldResult, sink: &mut dyn ErrorSink) -> Option<Literal> {
        match folded {
            Ok(value) => value,
            Err(error) => {
                if let FoldError::Overflow { ty } = error {
                    tracing::debug!(?expr, ?ty, "constant overflow");
                }
                sink.report(expr, self.arena.span(expr), SemanticError::from(error));
                None
            }
        }
    }
}
