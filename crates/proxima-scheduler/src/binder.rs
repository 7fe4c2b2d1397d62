use crate::error::Result;
use proxima_client::{BindingAck, ClusterApi};
use proxima_core::BindingDecision;
use std::sync::Arc;
use tracing::info;

/// Commits a scheduling decision by creating a binding record for the
/// pod. Errors are not retried here — binding failure (pod already
/// bound, node vanished) is an event-scoped outcome owned by the watch
/// loop.
pub struct Binder {
    client: Arc<dyn ClusterApi>,
}

impl Binder {
    pub fn new(client: Arc<dyn ClusterApi>) -> Self {
        Self { client }
    }

    /// Submit the binding and return the API acknowledgment.
    pub async fn bind(&self, decision: &BindingDecision) -> Result<BindingAck> {
        info!(
            "Binding pod {} to node {}",
            decision.pod, decision.node_name
        );

        let ack = self
            .client
            .create_binding(
                &decision.pod.namespace,
                &decision.pod.name,
                &decision.node_name,
            )
            .await?;

        Ok(ack)
    }
}
