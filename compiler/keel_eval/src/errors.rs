//! Constant evaluation errors.

use keel_ir::{FieldId, TypeId};
use keel_types::SemanticError;

/// Why a foldable operation produced no value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FoldError {
    /// Checked arithmetic or conversion left the range of `ty`.
    #[error("constant arithmetic overflows {ty:?}")]
    Overflow { ty: TypeId },
    /// Integral or decimal division or remainder by zero.
    #[error("division by constant zero")]
    DivisionByZero,
}

impl From<FoldError> for SemanticError {
    fn from(error: FoldError) -> Self {
        match error {
            FoldError::Overflow { ty } => SemanticError::ConstantOverflow { ty },
            FoldError::DivisionByZero => SemanticError::DivisionByConstantZero,
        }
    }
}

/// Condition that unwinds every nested constant-field evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConstEvalError {
    /// `field` was reached again while its own initializer was being
    /// evaluated.
    #[error("constant field #{} depends on itself", field.raw())]
    CircularConstant { field: FieldId },
}

impl From<ConstEvalError> for SemanticError {
    fn from(error: ConstEvalError) -> Self {
        match error {
            ConstEvalError::CircularConstant { field } => SemanticError::CircularConstant { field },
        }
    }
}
