use thiserror::Error;

/// Errors raised while parsing alert payloads or configuring the classifier.
#[derive(Error, Debug, PartialEq)]
pub enum AlertError {
    #[error("Unknown signal direction: {0}")]
    UnknownSignal(String),

    #[error("Invalid deviation configuration: {0}")]
    InvalidConfig(String),
}
