//! Proxima Scheduler - the watch-filter-select-bind decision loop
//!
//! This crate provides:
//! - Node eligibility predicates (opt-out label, cordon flag, taints,
//!   readiness)
//! - Uniform random node selection
//! - Pod-to-node binding
//! - The resilient event watch loop that drives them

pub mod binder;
pub mod error;
pub mod filter;
pub mod scheduler;
pub mod select;
pub mod types;

// Re-export commonly used types
pub use binder::Binder;
pub use error::{Result, SchedulerError};
pub use filter::{default_predicates, eligible_nodes, EligibilityPredicate};
pub use scheduler::{Scheduler, SchedulerConfig};
pub use select::select_node;
pub use types::{EventOutcome, FilterResult, StreamOutcome};
