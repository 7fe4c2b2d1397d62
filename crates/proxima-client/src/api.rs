use crate::error::Result;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use k8s_openapi::api::core::v1::{Node, Pod};
use proxima_core::WatchEvent;
use std::time::Duration;

/// Acknowledgment body returned by the binding creation call. The API
/// server's response shape varies, so it is carried as raw JSON and
/// only logged.
pub type BindingAck = serde_json::Value;

/// A time-bounded stream of pod watch events. Individual items may be
/// errors (broken frame, transport hiccup); the stream ending means the
/// subscription is exhausted and must be reopened.
pub type PodEventStream = BoxStream<'static, Result<WatchEvent<Pod>>>;

/// Operations the scheduler consumes from the cluster API server.
///
/// Injected as `Arc<dyn ClusterApi>` into every component that talks to
/// the cluster, enabling substitution with [`crate::MockClusterApi`] in
/// tests.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// List all nodes in the cluster.
    async fn list_nodes(&self) -> Result<Vec<Node>>;

    /// Open a watch subscription for pods matching the label selector.
    /// The server closes the stream after `timeout` even if no events
    /// arrive, so stale long-poll connections are naturally recycled.
    async fn watch_pods(&self, label_selector: &str, timeout: Duration) -> Result<PodEventStream>;

    /// Create a binding assigning the named pod to the named node. Not
    /// retried here — binding failure is an event-scoped outcome owned
    /// by the caller.
    async fn create_binding(
        &self,
        namespace: &str,
        pod_name: &str,
        node_name: &str,
    ) -> Result<BindingAck>;
}
