use miette::Diagnostic;
use thiserror::Error;

/// Core error type for Proxima operations
#[derive(Error, Debug, Diagnostic)]
pub enum ProximaError {
    /// Watch event that cannot be interpreted
    #[error("Malformed event: {reason}")]
    #[diagnostic(
        code(proxima::malformed_event),
        help("The event is dropped; check the API server's watch wire format")
    )]
    MalformedEvent { reason: String },

    /// Internal error
    #[error("Internal error: {message}")]
    #[diagnostic(
        code(proxima::internal_error),
        help("This is likely a bug. Please report it")
    )]
    InternalError { message: String },
}

/// Result type alias for Proxima operations
pub type Result<T> = std::result::Result<T, ProximaError>;

impl ProximaError {
    /// Create a MalformedEvent error
    pub fn malformed_event(reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            reason: reason.into(),
        }
    }

    /// Create an InternalError
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
