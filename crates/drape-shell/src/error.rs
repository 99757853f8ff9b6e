//! Error types for garment shell operations.
//!
//! Codes follow the pattern `DRAPE-XXXX`:
//! - 1xxx = input validation errors
//! - 2xxx = upstream fitting errors

use miette::Diagnostic;
use thiserror::Error;

use drape_core::FitError;

/// Result type alias for shell operations.
pub type DrapeResult<T> = Result<T, DrapeError>;

/// Machine-readable error codes for shell operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrapeErrorCode {
    /// DRAPE-1001: Invalid pipeline parameters
    InvalidParams = 1001,
    /// DRAPE-1002: Pipeline produced an empty garment
    EmptyGarment = 1002,
    /// DRAPE-2001: Underlying fitting error
    FitFailed = 2001,
}

impl DrapeErrorCode {
    /// Returns the error code as a string in the format `DRAPE-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DrapeErrorCode::InvalidParams => "DRAPE-1001",
            DrapeErrorCode::EmptyGarment => "DRAPE-1002",
            DrapeErrorCode::FitFailed => "DRAPE-2001",
        }
    }
}

impl std::fmt::Display for DrapeErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during garment shell generation.
#[derive(Debug, Error, Diagnostic)]
pub enum DrapeError {
    /// Invalid pipeline parameters.
    #[error("invalid drape parameters: {details}")]
    #[diagnostic(
        code(drape::params::invalid),
        help("Check parameter values: clearances > 0, lambda in (0, 1], etc.")
    )]
    InvalidParams { details: String },

    /// The pipeline produced an empty garment mesh.
    #[error("pipeline produced an empty garment mesh")]
    #[diagnostic(
        code(drape::garment::empty),
        help("The torso band may not cover the body mesh; check garment kind and units")
    )]
    EmptyGarment,

    /// Underlying fitting error.
    #[error("fitting failed: {0}")]
    #[diagnostic(code(drape::fit::error))]
    Fit(#[from] FitError),
}

impl DrapeError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> DrapeErrorCode {
        match self {
            DrapeError::InvalidParams { .. } => DrapeErrorCode::InvalidParams,
            DrapeError::EmptyGarment => DrapeErrorCode::EmptyGarment,
            DrapeError::Fit(_) => DrapeErrorCode::FitFailed,
        }
    }

    /// Create an invalid params error.
    pub fn invalid_params(details: impl Into<String>) -> Self {
        DrapeError::InvalidParams {
            details: details.into(),
        }
    }
}
