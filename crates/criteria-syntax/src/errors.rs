use crate::ast::operator::{Arity, Operator};
use thiserror::Error;

/// Pattern of a single filter criterion, quoted in error messages.
pub const FILTER_PATTERN: &str = "column:operator(operand[,operand...]) or column:value";

/// Pattern of a logical group, quoted in error messages.
pub const GROUP_PATTERN: &str = "and(criterion[,criterion...]), or(criterion[,criterion...]) or not(criterion)";

/// Pattern of a sort criterion, quoted in error messages.
pub const SORT_PATTERN: &str = "column:asc|desc";

/// Malformed criterion text or a structurally invalid criterion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("empty criterion in '{input}'")]
    EmptyCriterion { input: String },

    #[error("malformed criterion '{segment}': expected {expected}")]
    Malformed {
        segment: String,
        expected: &'static str,
    },

    #[error("invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: &'static str },

    #[error(
        "unknown operator '{operator}' in '{segment}': expected {pattern}; \
         to compare against a literal value write '{column}:eq(...)'",
        pattern = FILTER_PATTERN
    )]
    UnknownOperator {
        segment: String,
        column: String,
        operator: String,
    },

    #[error("operator '{operator}' in '{segment}' takes {expected}, found {found}")]
    Arity {
        segment: String,
        operator: Operator,
        expected: Arity,
        found: usize,
    },

    #[error("group '{segment}' has no criteria: expected {pattern}", pattern = GROUP_PATTERN)]
    EmptyGroup { segment: String },

    #[error("'{segment}': not(...) takes exactly one criterion, found {found}")]
    NotArity { segment: String, found: usize },

    #[error("unknown sort direction '{direction}' in '{segment}': expected {pattern}", pattern = SORT_PATTERN)]
    UnknownDirection { segment: String, direction: String },

    #[error("criterion '{segment}' exceeds the maximum nesting depth of {max_depth}")]
    TooDeep { segment: String, max_depth: usize },

    #[error("simplified equality '{segment}' is disabled: expected column:eq(value)")]
    SimplifiedEqualityDisabled { segment: String },
}

impl SyntaxError {
    /// The criterion text the error points at, when there is one.
    pub fn segment(&self) -> Option<&str> {
        match self {
            SyntaxError::EmptyCriterion { .. } | SyntaxError::InvalidColumn { .. } => None,
            SyntaxError::Malformed { segment, .. }
            | SyntaxError::UnknownOperator { segment, .. }
            | SyntaxError::Arity { segment, .. }
            | SyntaxError::EmptyGroup { segment }
            | SyntaxError::NotArity { segment, .. }
            | SyntaxError::UnknownDirection { segment, .. }
            | SyntaxError::TooDeep { segment, .. }
            | SyntaxError::SimplifiedEqualityDisabled { segment } => Some(segment),
        }
    }
}
