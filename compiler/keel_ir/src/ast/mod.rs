//! Expression tree nodes.
//!
//! Nodes live in [`ExprArena`](crate::ExprArena) and refer to each other by
//! [`ExprId`](crate::ExprId). The coercion engine rewrites the tree by
//! allocating new nodes that wrap the original expression; nothing is ever
//! removed.

mod coercion;
mod expr;
mod operators;

pub use coercion::CoercionKind;
pub use expr::{ExprKind, ExprNode, Param};
pub use operators::{BinaryOp, UnaryOp};
