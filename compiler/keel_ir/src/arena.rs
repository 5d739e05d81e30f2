//! Flat expression storage.
//!
//! [`ExprArena`] uses struct-of-arrays layout: parallel `kinds`, `spans`
//! and `types` arrays indexed by [`ExprId`], plus side tables for id lists,
//! literals and parameters.

use crate::ast::{ExprKind, ExprNode, Param};
use crate::{ExprId, ExprRange, LitId, Literal, ParamRange, Span, TypeId};

/// Convert a length to `u32`, panicking on overflow.
#[inline]
pub(crate) fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what} (exceeds u32::MAX)"))
}

/// Arena for expressions.
///
/// # Index Spaces
///
/// - `kinds`/`spans`/`types`: parallel arrays indexed by [`ExprId`]
/// - `expr_lists`: flat `Vec<ExprId>` indexed by [`ExprRange`]
/// - `literals`: indexed by [`LitId`]
/// - `params`: indexed by [`ParamRange`]
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    kinds: Vec<ExprKind>,
    spans: Vec<Span>,
    types: Vec<TypeId>,
    expr_lists: Vec<ExprId>,
    literals: Vec<Literal>,
    params: Vec<Param>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of expressions.
    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Allocate an expression, returning its ID.
    pub fn push(&mut self, node: ExprNode) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(node.kind);
        self.spans.push(node.span);
        self.types.push(node.ty);
        id
    }

    /// Allocate an expression from its parts.
    #[inline]
    pub fn alloc(&mut self, kind: ExprKind, span: Span, ty: TypeId) -> ExprId {
        self.push(ExprNode::new(kind, span, ty))
    }

    /// Allocate a literal expression typed by the literal.
    pub fn alloc_literal(&mut self, literal: Literal, span: Span) -> ExprId {
        let lit = LitId::new(to_u32(self.literals.len(), "literals"));
        self.literals.push(literal);
        self.alloc(ExprKind::Literal(lit), span, literal.ty)
    }

    /// Allocate a contiguous list of expression ids.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression list entries");
        self.expr_lists.extend(ids);
        let len = to_u32(self.expr_lists.len(), "expression list entries") - start;
        ExprRange { start, len }
    }

    /// Allocate an anonymous function parameter list.
    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let start = to_u32(self.params.len(), "parameters");
        self.params.extend(params);
        let len = to_u32(self.params.len(), "parameters") - start;
        ParamRange { start, len }
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.kinds[id.index()]
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.spans[id.index()]
    }

    #[inline]
    pub fn ty(&self, id: ExprId) -> TypeId {
        self.types[id.index()]
    }

    /// Record a new type for an expression (e.g. a retyped literal).
    #[inline]
    pub fn set_ty(&mut self, id: ExprId, ty: TypeId) {
        self.types[id.index()] = ty;
    }

    /// Replace a node's kind, keeping its span and type. Used to swap a
    /// child for its coerced form.
    #[inline]
    pub fn set_kind(&mut self, id: ExprId, kind: ExprKind) {
        self.kinds[id.index()] = kind;
    }

    #[inline]
    pub fn list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.to_range()]
    }

    #[inline]
    pub fn params(&self, range: ParamRange) -> &[Param] {
        &self.params[range.to_range()]
    }

    #[inline]
    pub fn literal_at(&self, lit: LitId) -> &Literal {
        &self.literals[lit.raw() as usize]
    }

    /// The literal an expression denotes, if it is a literal node.
    ///
    /// The literal's type is overridden by the node's recorded type so that
    /// retyped literals read back consistently.
    pub fn literal(&self, id: ExprId) -> Option<Literal> {
        match *self.kind(id) {
            ExprKind::Literal(lit) => {
                let literal = self.literal_at(lit);
                Some(Literal::with_type(literal.value, self.ty(id)))
            }
            _ => None,
        }
    }

    /// `true` for the `null` literal.
    pub fn is_null_literal(&self, id: ExprId) -> bool {
        self.literal(id).is_some_and(|lit| lit.is_null())
    }

    /// Strip any number of wrapping [`Coerce`](ExprKind::Coerce) nodes.
    pub fn strip_coercions(&self, mut id: ExprId) -> ExprId {
        while let ExprKind::Coerce { operand, .. } = *self.kind(id) {
            id = operand;
        }
        id
    }
}
