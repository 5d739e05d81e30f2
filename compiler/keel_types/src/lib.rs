//! Type model and type analyses for Keel.
//!
//! - `Pool`: sharded interner of `TypeData`, handing out `TypeId`s with
//!   pre-computed `TypeFlags`
//! - `TypeDirectory`: hierarchy and member facts about nominal types
//! - Numeric tower: promotion and widening over `NumKind`
//! - `StreamAnalyzer`: element types and `Cardinality`
//! - `TypeUnifier`: least upper bounds
//! - `SemanticError` and the `ErrorSink`s it is reported to
//!
//! Types are immutable once interned; two types are equal exactly when
//! their ids are equal.

mod cardinality;
mod data;
mod directory;
mod error;
mod flags;
pub mod numeric;
mod pool;
mod stream;
mod unify;

pub use cardinality::Cardinality;
pub use data::{Primitive, Template, TupleField, TypeData};
pub use directory::{ConversionKind, ConversionMethod, TypeDef, TypeDirectory, TypeRegistry};
pub use error::{format_literal, DiagnosticSink, ErrorSink, NullSink, SemanticError};
pub use flags::TypeFlags;
pub use numeric::{NumClass, NumKind};
pub use pool::{Pool, TypeInternError};
pub use stream::StreamAnalyzer;
pub use unify::TypeUnifier;

// Handles are copied everywhere; keep them small.
mod size_asserts {
    use super::{Cardinality, Primitive, TypeFlags};
    keel_ir::static_assert_size!(keel_ir::TypeId, 4);
    keel_ir::static_assert_size!(Cardinality, 1);
    keel_ir::static_assert_size!(Primitive, 1);
    keel_ir::static_assert_size!(TypeFlags, 4);
}
