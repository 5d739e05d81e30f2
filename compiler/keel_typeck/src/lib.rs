//! Keel Typeck - the coercion engine.
//!
//! # Architecture
//!
//! - `CoercionRules`: type-level predicates. Which conversions exist,
//!   which of two targets is the better match, and which user-defined
//!   conversion operator applies. Nothing is allocated.
//! - `CoercionEngine`: builds the conversion of an expression into the
//!   arena, reporting a `SemanticError` to the caller's `ErrorSink` when
//!   none exists.
//!
//! Both are parameterized by the type `Pool`, a `TypeDirectory` answering
//! questions about nominal types, and a `CoercionConfig`.

mod config;
mod engine;
mod rules;

pub use config::CoercionConfig;
pub use engine::CoercionEngine;
pub use rules::CoercionRules;
