use criteria_syntax::{Operator, SyntaxError};
use model::{core::kind::ValueKind, shape::error::ResolveError};
use thiserror::Error;

/// Failure turning criteria into a predicate or comparator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("invalid operand '{text}' for column '{column}': expected {kind}")]
    InvalidOperand {
        column: String,
        kind: ValueKind,
        text: String,
    },

    #[error("invalid range for column '{column}': lower bound '{lower}' is greater than upper bound '{upper}'")]
    InvalidRange {
        column: String,
        lower: String,
        upper: String,
    },

    #[error("operator '{operator}' cannot be applied to column '{column}' of kind {kind}")]
    TypeMismatch {
        column: String,
        operator: Operator,
        kind: ValueKind,
    },
}

/// Batch evaluation stopped by its cancellation token.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("evaluation cancelled after {processed} records")]
pub struct Cancelled {
    pub processed: usize,
}

pub type Result<T> = std::result::Result<T, BuildError>;
