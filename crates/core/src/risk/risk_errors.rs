//! Risk limit error types.

use thiserror::Error;

/// Errors raised while configuring the risk limit engine or parsing
/// host-supplied category tags.
#[derive(Error, Debug, PartialEq)]
pub enum RiskError {
    /// The limit configuration failed validation.
    #[error("Invalid risk limit configuration: {0}")]
    InvalidConfig(String),

    /// A category tag did not match any known holding category.
    #[error("Unknown holding category: {0}")]
    UnknownCategory(String),
}

impl RiskError {
    /// Creates an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
