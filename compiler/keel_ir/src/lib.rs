//! Keel IR - shared data types for the semantic core.
//!
//! This crate contains the core data structures consumed by the type and
//! evaluation passes:
//! - Spans for source locations
//! - Names for interned identifiers
//! - `TypeId` handles and pre-interned builtin ids
//! - Literals, including a 96-bit `Decimal`
//! - Expression nodes in a flat arena
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32), Types → TypeId(u32)
//! - **Flatten Everything**: No Box<Expr>, use ExprId(u32) indices
//!
//! Types that contain floats store them as bits for Hash compatibility.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod decimal;
mod expr_id;
mod interner;
mod literal;
mod name;
mod span;
mod type_id;

pub use arena::ExprArena;
pub use ast::{BinaryOp, CoercionKind, ExprKind, ExprNode, Param, UnaryOp};
pub use decimal::Decimal;
pub use expr_id::{ConversionId, ExprId, ExprRange, FieldId, LitId, ParamRange, SlotId};
pub use interner::{InternError, StringInterner};
pub use literal::{LitValue, Literal};
pub use name::Name;
pub use span::Span;
pub use type_id::TypeId;
