//! Common error types and handling for Practica

use crate::state::StateError;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Practica workspace
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the workflow can carry on editing after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Resource(_) | Error::State(_)
        )
    }

    /// Get the stable error code used in logs and notifications
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::State(_) => "STATE_ERROR",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Resource(_) => "RESOURCE_ERROR",
            Error::Configuration(_) => "CONFIGURATION_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
