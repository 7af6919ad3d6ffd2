use thiserror::Error;

/// Failures produced while resolving a formula.
///
/// Every variant propagates unchanged through bracket recursion and
/// cell references: one bad subexpression invalidates the whole formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Unbalanced brackets")]
    UnbalancedBrackets,
    #[error("Operator '{operator}' is missing a numeric operand")]
    MalformedOperand { operator: char },
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),
    #[error("Reference chain deeper than {limit} cells (circular reference?)")]
    RecursionLimit { limit: usize },
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Dimensions or storage a grid is not allowed to have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("width must be between 1 and 26, got {0}")]
    Width(usize),
    #[error("height must be at least 1")]
    Height,
    #[error("{cells} cells for a {width}x{height} grid")]
    CellCount { width: usize, height: usize, cells: usize },
}
