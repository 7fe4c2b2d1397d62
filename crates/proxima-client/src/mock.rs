use crate::api::{BindingAck, ClusterApi, PodEventStream};
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use futures_util::stream;
use k8s_openapi::api::core::v1::{Node, Pod};
use proxima_core::{BindingDecision, PodRef, WatchEvent};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// In-memory cluster API for testing the scheduler without a server.
///
/// Nodes are a fixed snapshot; watch subscriptions drain scripted event
/// batches (one batch per subscription, the stream ending when the
/// batch is exhausted, which models the server-side watch timeout);
/// bindings are recorded for assertion.
#[derive(Default)]
pub struct MockClusterApi {
    nodes: Mutex<Vec<Node>>,
    event_batches: Mutex<VecDeque<Vec<WatchEvent<Pod>>>>,
    bindings: Mutex<Vec<BindingDecision>>,
    watch_opens: AtomicUsize,
    fail_list_nodes: AtomicBool,
    fail_bindings: AtomicBool,
}

impl MockClusterApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the node snapshot returned by `list_nodes`.
    pub fn set_nodes(&self, nodes: Vec<Node>) {
        *self.nodes.lock().unwrap() = nodes;
    }

    /// Queue one watch subscription's worth of events.
    pub fn push_events(&self, batch: Vec<WatchEvent<Pod>>) {
        self.event_batches.lock().unwrap().push_back(batch);
    }

    /// Bindings recorded so far, in creation order.
    pub fn bindings(&self) -> Vec<BindingDecision> {
        self.bindings.lock().unwrap().clone()
    }

    /// How many watch subscriptions have been opened.
    pub fn watch_opens(&self) -> usize {
        self.watch_opens.load(Ordering::SeqCst)
    }

    /// Make `list_nodes` fail until reset.
    pub fn set_fail_list_nodes(&self, fail: bool) {
        self.fail_list_nodes.store(fail, Ordering::SeqCst);
    }

    /// Make `create_binding` fail until reset.
    pub fn set_fail_bindings(&self, fail: bool) {
        self.fail_bindings.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ClusterApi for MockClusterApi {
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        if self.fail_list_nodes.load(Ordering::SeqCst) {
            return Err(ClientError::api(500, "mock: node listing unavailable"));
        }
        Ok(self.nodes.lock().unwrap().clone())
    }

    async fn watch_pods(
        &self,
        _label_selector: &str,
        _timeout: Duration,
    ) -> Result<PodEventStream> {
        self.watch_opens.fetch_add(1, Ordering::SeqCst);
        let batch = self
            .event_batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        debug!("Mock: watch opened with {} scripted events", batch.len());
        let events: Vec<Result<WatchEvent<Pod>>> = batch.into_iter().map(Ok).collect();
        Ok(Box::pin(stream::iter(events)))
    }

    async fn create_binding(
        &self,
        namespace: &str,
        pod_name: &str,
        node_name: &str,
    ) -> Result<BindingAck> {
        if self.fail_bindings.load(Ordering::SeqCst) {
            return Err(ClientError::api(
                409,
                format!("mock: pod {} already bound", pod_name),
            ));
        }
        self.bindings.lock().unwrap().push(BindingDecision::new(
            PodRef::new(namespace, pod_name),
            node_name,
        ));
        debug!("Mock: bound {}/{} to {}", namespace, pod_name, node_name);
        Ok(json!({ "kind": "Status", "status": "Success" }))
    }
}
