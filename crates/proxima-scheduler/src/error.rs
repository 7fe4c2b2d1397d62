use miette::Diagnostic;
use thiserror::Error;

/// Scheduler error type
#[derive(Error, Debug, Diagnostic)]
pub enum SchedulerError {
    /// No node passed the eligibility filter this cycle
    #[error("No eligible nodes found for pod {pod}")]
    #[diagnostic(
        code(scheduler::no_eligible_nodes),
        help("Check node readiness, cordon flags, taints, and the opt-out label")
    )]
    NoEligibleNodes { pod: String },

    /// Pending pod is missing the required service-name label
    #[error("Pod {pod} has no serviceName label")]
    #[diagnostic(
        code(scheduler::missing_service_label),
        help("Pods opting into this scheduler must carry a serviceName label")
    )]
    MissingServiceLabel { pod: String },

    /// Cluster API error
    #[error("Cluster API error: {0}")]
    #[diagnostic(
        code(scheduler::client_error),
        help("Transient API failures are absorbed by the watch loop")
    )]
    ClientError(#[from] proxima_client::ClientError),

    /// Core error
    #[error("Core error: {0}")]
    #[diagnostic(
        code(scheduler::core_error),
        help("This is an internal error")
    )]
    CoreError(#[from] proxima_core::ProximaError),

    /// Internal error
    #[error("Internal error: {message}")]
    #[diagnostic(
        code(scheduler::internal_error),
        help("This is likely a bug. Please report it")
    )]
    InternalError { message: String },
}

/// Result type for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;

impl SchedulerError {
    /// Create a NoEligibleNodes error
    pub fn no_eligible_nodes(pod: impl Into<String>) -> Self {
        Self::NoEligibleNodes { pod: pod.into() }
    }

    /// Create a MissingServiceLabel error
    pub fn missing_service_label(pod: impl Into<String>) -> Self {
        Self::MissingServiceLabel { pod: pod.into() }
    }

    /// Create an InternalError
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
