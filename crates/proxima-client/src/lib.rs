//! Proxima Client - Cluster API collaborator for the scheduler
//!
//! This crate provides:
//! - In-cluster configuration bootstrap (service host env + mounted token)
//! - The `ClusterApi` trait consumed by the scheduler
//! - An HTTP implementation over reqwest (node listing, pod watch
//!   subscription, binding creation)
//! - A mock implementation for tests

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;

// Re-export commonly used types
pub use api::{BindingAck, ClusterApi, PodEventStream};
pub use config::ClusterConfig;
pub use error::{ClientError, Result};
pub use http::HttpClusterClient;
pub use mock::MockClusterApi;
