//! Expression kinds.

use crate::{
    BinaryOp, CoercionKind, ExprId, ExprRange, FieldId, LitId, Name, ParamRange, SlotId, Span,
    TypeId, UnaryOp,
};

/// One expression, before it is pushed into an arena.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: TypeId,
}

impl ExprNode {
    pub const fn new(kind: ExprKind, span: Span, ty: TypeId) -> Self {
        ExprNode { kind, span, ty }
    }
}

/// An anonymous function parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: TypeId,
}

/// Expression variants.
///
/// The first group is produced by the front end; the second group only
/// appears after coercion rewriting.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Literal(LitId),
    /// Field access. `target` is [`ExprId::INVALID`] for a static field.
    MemberAccess {
        target: ExprId,
        field: FieldId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Call {
        callee: ExprId,
        args: ExprRange,
    },
    Variable(SlotId),
    AnonymousFunction {
        params: ParamRange,
        body: ExprId,
    },
    Block(ExprRange),
    /// `value` is [`ExprId::INVALID`] for a bare `return`.
    Return(ExprId),

    /// Tuple construction.
    Tuple(ExprRange),
    /// Positional tuple element.
    TupleField {
        tuple: ExprId,
        index: u32,
    },
    /// Placeholder bound to the value being converted inside a lifted or
    /// per-element conversion.
    Hole,
    Coerce {
        operand: ExprId,
        kind: CoercionKind,
    },
    /// Applies `convert` (which reads [`Hole`](ExprKind::Hole)) to the
    /// payload of a non-empty nullable `source`; empty stays empty.
    NullableLift {
        source: ExprId,
        convert: ExprId,
    },
    /// Switch on the tag of a union `source`. `arms` holds one converted
    /// expression per alternative, in canonical order.
    UnionDispatch {
        source: ExprId,
        arms: ExprRange,
    },
    /// Maps `convert` over each element of the stream `source`.
    StreamAdapter {
        source: ExprId,
        convert: ExprId,
    },
    /// Throws an invalid-cast error when reached.
    CastFailure,
}

impl ExprKind {
    /// Nodes that only exist after coercion rewriting.
    pub const fn is_synthetic(&self) -> bool {
        matches!(
            self,
            ExprKind::Tuple(_)
                | ExprKind::TupleField { .. }
                | ExprKind::Hole
                | ExprKind::Coerce { .. }
                | ExprKind::NullableLift { .. }
                | ExprKind::UnionDispatch { .. }
                | ExprKind::StreamAdapter { .. }
                | ExprKind::CastFailure
        )
    }
}
