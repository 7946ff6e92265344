use thiserror::Error;

/// Result alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, LossError>;

/// Precondition failures reported by the loss functions.
///
/// All of these are detected before any arithmetic runs, so a returned error
/// never leaves a half-computed gradient behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LossError {
    /// Two dimensions that must agree do not.
    #[error("shape mismatch: {what} (expected {expected}, got {actual})")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A label falls outside [0, num_classes).
    #[error("label {label} at index {index} is out of range for {num_classes} classes")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        num_classes: usize,
    },

    /// The batch holds no examples, so the mean loss is undefined.
    #[error("batch is empty")]
    EmptyBatch,

    /// The weight matrix has no class columns.
    #[error("weight matrix has no classes")]
    NoClasses,

    #[error("regularization strength must be finite and non-negative, got {0}")]
    InvalidRegularization(f64),

    /// A configured dimension is zero where at least one is required.
    #[error("{what} must be at least 1")]
    InvalidDimension { what: &'static str },

    /// Ragged or empty row data, or data that disagrees with the declared shape.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),
}
