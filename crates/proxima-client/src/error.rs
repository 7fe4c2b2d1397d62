use miette::Diagnostic;
use thiserror::Error;

/// Client error type for cluster API operations
#[derive(Error, Debug, Diagnostic)]
pub enum ClientError {
    /// Configuration could not be loaded
    #[error("Cluster configuration error: {message}")]
    #[diagnostic(
        code(client::config_error),
        help("Check KUBERNETES_SERVICE_HOST/PORT and the mounted service account token")
    )]
    ConfigError { message: String },

    /// HTTP transport failure (connection refused, DNS, timeout)
    #[error("Request failed: {message}")]
    #[diagnostic(
        code(client::request_failed),
        help("Check connectivity to the API server")
    )]
    RequestFailed { message: String },

    /// API server returned a non-success status
    #[error("API error ({status}): {message}")]
    #[diagnostic(
        code(client::api_error),
        help("Inspect the API server response body for details")
    )]
    ApiError { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Decode error: {message}")]
    #[diagnostic(
        code(client::decode_error),
        help("The API server response did not match the expected wire format")
    )]
    DecodeError { message: String },

    /// Watch stream broke mid-subscription
    #[error("Watch stream error: {message}")]
    #[diagnostic(
        code(client::stream_error),
        help("The subscription will be reopened by the caller")
    )]
    StreamError { message: String },
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Create a ConfigError
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a RequestFailed error
    pub fn request(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            message: message.into(),
        }
    }

    /// Create an ApiError
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a DecodeError
    pub fn decode(message: impl Into<String>) -> Self {
        Self::DecodeError {
            message: message.into(),
        }
    }

    /// Create a StreamError
    pub fn stream(message: impl Into<String>) -> Self {
        Self::StreamError {
            message: message.into(),
        }
    }
}
