//! Semantic errors and the sinks they are reported to.
//!
//! Analyses never fail loudly: a coercion that cannot be built returns
//! `None` and reports one [`SemanticError`] for the offending node to an
//! [`ErrorSink`]. What happens to the report is up to the sink.

use keel_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use keel_ir::{ExprId, FieldId, LitValue, Literal, Span, StringInterner, TypeId};

use crate::pool::Pool;

/// A semantic error found while coercing or evaluating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SemanticError {
    /// No implicit conversion from `from` to `to`.
    NoImplicitCoercion { from: TypeId, to: TypeId },
    /// Not even a cast converts `from` to `to`.
    NoExplicitCoercion { from: TypeId, to: TypeId },
    /// `null` where a value type is expected.
    CannotCoerceNullToValueType { to: TypeId },
    /// `null` where a `NonNull<T>` is expected.
    CannotCoerceNullToNonNullType { to: TypeId },
    /// `null` for a type parameter without a reference constraint.
    TypeVarCannotBeNull { param: TypeId },
    /// An anonymous function or delegate does not fit a delegate type.
    NestedFunctionSignatureMismatch { delegate: TypeId, function: TypeId },
    /// A constant does not fit the target type without a cast.
    NoImplicitCoercionFromConstant { value: Literal, to: TypeId },
    /// Checked constant arithmetic or conversion left the range of `ty`.
    ConstantOverflow { ty: TypeId },
    /// Integral constant division or remainder by zero.
    DivisionByConstantZero,
    /// A constant's initializer depends on itself.
    CircularConstant { field: FieldId },
}

impl SemanticError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SemanticError::NoImplicitCoercion { .. } => ErrorCode::E2001,
            SemanticError::NoExplicitCoercion { .. } => ErrorCode::E2002,
            SemanticError::CannotCoerceNullToValueType { .. } => ErrorCode::E2003,
            SemanticError::CannotCoerceNullToNonNullType { .. } => ErrorCode::E2004,
            SemanticError::TypeVarCannotBeNull { .. } => ErrorCode::E2005,
            SemanticError::NestedFunctionSignatureMismatch { .. } => ErrorCode::E2006,
            SemanticError::NoImplicitCoercionFromConstant { .. } => ErrorCode::E2007,
            SemanticError::ConstantOverflow { .. } => ErrorCode::E6001,
            SemanticError::DivisionByConstantZero => ErrorCode::E6002,
            SemanticError::CircularConstant { .. } => ErrorCode::E6003,
        }
    }

    /// Convert to a diagnostic labelled at `span`.
    pub fn to_diagnostic(&self, span: Span, pool: &Pool, interner: &StringInterner) -> Diagnostic {
        let ty = |id: TypeId| pool.format_type(id, interner);
        let diag = Diagnostic::error(self.code());
        match self {
            SemanticError::NoImplicitCoercion { from, to } => {
                let (from, to) = (ty(*from), ty(*to));
                diag.with_message(format!("cannot implicitly convert `{from}` to `{to}`"))
                    .with_label(span, format!("expected `{to}`"))
            }
            SemanticError::NoExplicitCoercion { from, to } => {
                let (from, to) = (ty(*from), ty(*to));
                diag.with_message(format!("cannot convert `{from}` to `{to}`"))
                    .with_label(span, format!("no conversion to `{to}`"))
            }
            SemanticError::CannotCoerceNullToValueType { to } => {
                let to = ty(*to);
                diag.with_message(format!("cannot convert null to `{to}`"))
                    .with_label(span, "null used here")
                    .with_note(format!("`{to}` is a value type"))
                    .with_suggestion(format!("use `{to}?` to allow an empty value"))
            }
            SemanticError::CannotCoerceNullToNonNullType { to } => {
                let to = ty(*to);
                diag.with_message(format!("cannot convert null to non-null type `{to}`"))
                    .with_label(span, "null used here")
            }
            SemanticError::TypeVarCannotBeNull { param } => {
                let param = ty(*param);
                diag.with_message(format!(
                    "cannot convert null to type parameter `{param}`"
                ))
                .with_label(span, "null used here")
                .with_note(format!("`{param}` could be instantiated with a value type"))
                .with_suggestion(format!("constrain `{param}` to reference types"))
            }
            SemanticError::NestedFunctionSignatureMismatch { delegate, function } => {
                let (delegate, function) = (ty(*delegate), ty(*function));
                diag.with_message(format!(
                    "`{function}` does not match the signature of delegate `{delegate}`"
                ))
                .with_label(span, format!("expected `{delegate}`"))
            }
            SemanticError::NoImplicitCoercionFromConstant { value, to } => {
                let (value, to) = (format_literal(value, interner), ty(*to));
                diag.with_message(format!("constant value `{value}` cannot be converted to `{to}`"))
                    .with_label(span, format!("does not fit in `{to}`"))
                    .with_suggestion(format!("use an explicit `({to})` conversion"))
            }
            SemanticError::ConstantOverflow { ty: overflowed } => {
                let overflowed = ty(*overflowed);
                diag.with_message(format!(
                    "the operation overflows at compile time in `{overflowed}`"
                ))
                .with_label(span, "overflows")
                .with_note("constant arithmetic is checked in this context")
            }
            SemanticError::DivisionByConstantZero => diag
                .with_message("division by constant zero")
                .with_label(span, "divisor is zero"),
            SemanticError::CircularConstant { field } => diag
                .with_message(format!(
                    "the value of constant #{} involves a circular definition",
                    field.raw()
                ))
                .with_label(span, "refers to itself"),
        }
    }
}

/// Source-like rendering of a literal for messages.
pub fn format_literal(lit: &Literal, interner: &StringInterner) -> String {
    match lit.value {
        LitValue::Null => "null".to_owned(),
        LitValue::Bool(b) => b.to_string(),
        LitValue::Char(c) => match char::from_u32(u32::from(c)) {
            Some(ch) => format!("'{ch}'"),
            None => format!("'\\u{c:04x}'"),
        },
        LitValue::I8(v) => v.to_string(),
        LitValue::U8(v) => v.to_string(),
        LitValue::I16(v) => v.to_string(),
        LitValue::U16(v) => v.to_string(),
        LitValue::I32(v) => v.to_string(),
        LitValue::U32(v) => v.to_string(),
        LitValue::I64(v) => v.to_string(),
        LitValue::U64(v) => v.to_string(),
        LitValue::F32(bits) => f32::from_bits(bits).to_string(),
        LitValue::F64(bits) => f64::from_bits(bits).to_string(),
        LitValue::Decimal(d) => d.to_string(),
        LitValue::Str(name) => format!("{:?}", interner.lookup(name)),
        LitValue::Type(id) => format!("typeof({id:?})"),
    }
}

/// Receiver of semantic errors.
pub trait ErrorSink {
    /// Record `error` against `node`, located at `span`.
    fn report(&mut self, node: ExprId, span: Span, error: SemanticError);
}

/// Discards every report. Used for speculative coercions.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl ErrorSink for NullSink {
    fn report(&mut self, _node: ExprId, _span: Span, _error: SemanticError) {}
}

/// Collects reports in order.
impl ErrorSink for Vec<(ExprId, SemanticError)> {
    fn report(&mut self, node: ExprId, _span: Span, error: SemanticError) {
        self.push((node, error));
    }
}

/// Renders reports into a [`DiagnosticQueue`].
pub struct DiagnosticSink<'a> {
    queue: &'a mut DiagnosticQueue,
    pool: &'a Pool,
    interner: &'a StringInterner,
}

impl<'a> DiagnosticSink<'a> {
    pub fn new(queue: &'a mut DiagnosticQueue, pool: &'a Pool, interner: &'a StringInterner) -> Self {
        DiagnosticSink {
            queue,
            pool,
            interner,
        }
    }
}

impl ErrorSink for DiagnosticSink<'_> {
    fn report(&mut self, node: ExprId, span: Span, error: SemanticError) {
        tracing::debug!(?node, code = %error.code(), "semantic error");
        self.queue.add(error.to_diagnostic(span, self.pool, self.interner));
    }
}
