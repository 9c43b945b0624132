//! Core error types for the Wealthdesk risk core.
//!
//! The computations in this crate are total over their inputs and never fail.
//! Errors only arise when building engines from configuration or when parsing
//! open strings supplied by the host application (categories, signal tags).

use thiserror::Error;

use crate::alerts::AlertError;
use crate::risk::RiskError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the risk core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Risk limit error: {0}")]
    Risk(#[from] RiskError),

    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Validation errors for configuration documents supplied by the host.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::Json(err))
    }
}
