//! Error types.
//!
//! - `ValidationError`: precondition failures on tabular input
//! - `TransformError`: transform lookup/configuration failures
//! - `DataError`: labeled-array shape and coordinate mismatches
//! - `AppError`: what the `mmm` binary reports (message + exit code)

use thiserror::Error;

/// Result alias for validators.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result alias for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// A violated precondition on a tabular input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{attribute} {column} not in data")]
    MissingColumn { attribute: &'static str, column: String },

    #[error("{attribute} {subject} contains duplicates")]
    DuplicateValues { attribute: &'static str, subject: String },

    #[error("{attribute} must not be empty")]
    EmptyCollection { attribute: &'static str },

    #[error("{attribute} {reason}")]
    InvalidType { attribute: &'static str, reason: String },

    #[error("{attribute} {columns:?} contains negative values")]
    NegativeValue { attribute: &'static str, columns: Vec<String> },
}

/// A transform could not be resolved, configured, or evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("Unknown saturation function: {name}. Choose from: {}", choices.join(", "))]
    UnknownTransform { name: String, choices: Vec<String> },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Data(#[from] DataError),
}

impl TransformError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TransformError::InvalidConfiguration(message.into())
    }
}

/// Shape or coordinate mismatch in a labeled array or dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("dims {dims:?} do not match array rank {ndim}")]
    RankMismatch { dims: Vec<String>, ndim: usize },

    #[error("dimension `{0}` appears more than once")]
    DuplicateDim(String),

    #[error("coordinate for `{dim}` has {got} labels, dimension has length {expected}")]
    CoordLength { dim: String, expected: usize, got: usize },

    #[error("dimension `{dim}` has conflicting lengths {left} and {right}")]
    DimConflict { dim: String, left: usize, right: usize },

    #[error("dimension `{dim}` is not among target dims {target:?}")]
    UnknownDim { dim: String, target: Vec<String> },

    #[error("cannot broadcast shape {from:?} to {to:?}")]
    Broadcast { from: Vec<usize>, to: Vec<usize> },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        let exit_code = match err {
            TransformError::Data(_) => 4,
            _ => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(2, err.to_string())
    }
}
