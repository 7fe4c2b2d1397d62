//! Proxima Core - Fundamental types for the Proxima custom pod scheduler
//!
//! This crate provides:
//! - Node and pod view types derived from live cluster state
//! - Watch event types shared by the client and the scheduler
//! - Well-known labels and taint effects
//! - Error types with miette diagnostics

pub mod error;
pub mod events;
pub mod labels;
pub mod types;

// Re-export commonly used types
pub use error::{ProximaError, Result};
pub use events::{SchedulingEvent, WatchEvent, WatchEventType};
pub use types::{BindingDecision, NodeView, PodRef, TaintView};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::api::core::v1::{Binding, Node, Pod};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
