//! Error types for the hydro-forecast-eval library.

use thiserror::Error;

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur while scoring or ranking forecasts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Observed and predicted data disagree in length or shape.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// A metric denominator is exactly zero for this input
    /// (constant observations, zero observed volume, ...).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Not enough rows or values for the requested operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Column name not present in a table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// A fold expected in a cross-validation record is absent.
    #[error("missing fold {0}")]
    MissingFold(u32),
}
