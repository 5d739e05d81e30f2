//! Keel Eval - compile-time evaluation of constant expressions.
//!
//! # Architecture
//!
//! - `fold_binary` / `fold_unary` / `fold_conversion`: pure folding of
//!   literals, dispatched on the promoted numeric type
//! - `ConstEvaluator`: folds constant-field initializers, following
//!   references to other constant fields with cycle detection
//!
//! Folding never panics. A pair of operands the compiler cannot evaluate
//! exactly as the runtime would (approximate comparisons, mixed decimal
//! and floating operands) is reported as not foldable with `Ok(None)`.

mod conversion;
pub mod errors;
mod evaluator;
mod operators;
mod scalar;
mod unary_operators;

pub use conversion::fold_conversion;
pub use errors::{ConstEvalError, FoldError};
pub use evaluator::{ConstCache, ConstEvaluator, ConstantTable, EvalConfig};
pub use operators::{fold_binary, FoldResult};
pub use unary_operators::{fold_sizeof, fold_unary};
