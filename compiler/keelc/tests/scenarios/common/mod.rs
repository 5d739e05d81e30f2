//! Expression builders over a session's arena.
//!
//! Every node gets a fresh span, so diagnostics sort in build order.

use keel_ir::{BinaryOp, ExprId, ExprKind, FieldId, Literal, SlotId, Span, TypeId};
use keelc::Session;

pub fn session() -> Session {
    keelc::init_tracing();
    Session::default()
}

fn next_span(session: &Session) -> Span {
    let start = u32::try_from(session.arena().len()).unwrap() * 8;
    Span::new(start, start + 5)
}

pub fn lit(session: &mut Session, literal: Literal) -> ExprId {
    let span = next_span(session);
    session.arena_mut().alloc_literal(literal, span)
}

/// A local of type `ty`; each call is a distinct slot.
pub fn var(session: &mut Session, ty: TypeId) -> ExprId {
    let span = next_span(session);
    let slot = SlotId::new(u32::try_from(session.arena().len()).unwrap());
    session.arena_mut().alloc(ExprKind::Variable(slot), span, ty)
}

/// `left op right`, typed like `left`.
pub fn binary(session: &mut Session, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
    let span = next_span(session);
    let ty = session.arena().ty(left);
    session
        .arena_mut()
        .alloc(ExprKind::Binary { op, left, right }, span, ty)
}

/// A read of the static field `field`.
pub fn field(session: &mut Session, field: FieldId, ty: TypeId) -> ExprId {
    let span = next_span(session);
    session.arena_mut().alloc(
        ExprKind::MemberAccess {
            target: ExprId::INVALID,
            field,
        },
        span,
        ty,
    )
}
