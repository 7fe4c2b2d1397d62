use crate::binder::Binder;
use crate::error::{Result, SchedulerError};
use crate::filter::{default_predicates, eligible_nodes, EligibilityPredicate};
use crate::select::select_node;
use crate::types::{EventOutcome, StreamOutcome};
use futures_util::StreamExt;
use k8s_openapi::api::core::v1::Pod;
use proxima_client::ClusterApi;
use proxima_core::labels::STRATEGY_SELECTOR;
use proxima_core::{BindingDecision, NodeView, SchedulingEvent, WatchEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Configuration for the scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Label selector scoping the pod watch subscription
    pub label_selector: String,
    /// Server-side watch timeout; forces periodic re-subscription even
    /// absent errors, so stale long-poll connections are recycled
    pub watch_timeout: Duration,
    /// Pause before retrying after a failed subscription open
    pub reconnect_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            label_selector: STRATEGY_SELECTOR.to_string(),
            watch_timeout: Duration::from_secs(20),
            reconnect_delay: Duration::from_millis(500),
        }
    }
}

/// The watch-filter-select-bind loop.
///
/// One sequential thread of control: events are handled strictly in
/// arrival order, and no state is carried across events. All failures
/// are treated as transient; the loop never exits except through
/// cancellation.
pub struct Scheduler {
    client: Arc<dyn ClusterApi>,
    binder: Binder,
    config: SchedulerConfig,
    predicates: Vec<Box<dyn EligibilityPredicate>>,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new(client: Arc<dyn ClusterApi>, config: SchedulerConfig) -> Self {
        Self {
            binder: Binder::new(client.clone()),
            client,
            config,
            predicates: default_predicates(),
        }
    }

    /// Run the watch loop until the token is cancelled.
    ///
    /// Outermost containment boundary: whatever a connection cycle
    /// reports, the loop logs it and starts a fresh cycle.
    pub async fn run(&self, token: CancellationToken) -> Result<()> {
        info!(
            "Starting scheduler (selector: {}, watch timeout: {:?})",
            self.config.label_selector, self.config.watch_timeout
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Scheduler shutting down");
                    return Ok(());
                }
                outcome = self.watch_cycle() => {
                    match outcome {
                        StreamOutcome::Ended => {
                            info!("Watch stream ended, reopening subscription");
                        }
                        StreamOutcome::ConnectFailed => {
                            sleep(self.config.reconnect_delay).await;
                        }
                    }
                }
            }
        }
    }

    /// One watch connection cycle: open a subscription, drain it, and
    /// report how it finished. Per-event failures never escape here.
    async fn watch_cycle(&self) -> StreamOutcome {
        debug!("Opening pod watch subscription");

        let mut stream = match self
            .client
            .watch_pods(&self.config.label_selector, self.config.watch_timeout)
            .await
        {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to open watch subscription: {}", e);
                return StreamOutcome::ConnectFailed;
            }
        };

        while let Some(item) = stream.next().await {
            match item {
                Ok(event) => {
                    self.handle_event(&event).await;
                }
                Err(e) => {
                    error!("Watch stream error: {}", e);
                }
            }
        }

        StreamOutcome::Ended
    }

    /// Handle one watch event, resolving it to a named transition.
    pub async fn handle_event(&self, event: &WatchEvent<Pod>) -> EventOutcome {
        let scheduling = match SchedulingEvent::from_watch(event) {
            Ok(scheduling) => scheduling,
            Err(e) => {
                error!("Dropping event: {}", e);
                return EventOutcome::Dropped {
                    reason: e.to_string(),
                };
            }
        };

        info!(
            "Event: {} Pod {} phase {:?}",
            scheduling.kind, scheduling.pod, scheduling.phase
        );

        if !scheduling.is_pending() {
            // Already scheduled, running, or terminated — nothing to do
            return EventOutcome::Ignored {
                phase: scheduling.phase.clone(),
            };
        }

        info!("{} needs scheduling", scheduling.pod);

        match self.schedule(&scheduling).await {
            Ok(node) => EventOutcome::Bound {
                pod: scheduling.pod.clone(),
                node,
            },
            Err(e @ SchedulerError::MissingServiceLabel { .. }) => {
                error!("Dropping event: {}", e);
                EventOutcome::Dropped {
                    reason: e.to_string(),
                }
            }
            Err(SchedulerError::NoEligibleNodes { .. }) => {
                error!("Found no valid node to schedule {}", scheduling.pod);
                EventOutcome::Unschedulable {
                    pod: scheduling.pod.clone(),
                }
            }
            Err(e) => {
                error!("Failed to schedule {}: {}", scheduling.pod, e);
                EventOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Filter, select, and bind for one pending pod. The service-name
    /// label is required for the cycle to make sense.
    async fn schedule(&self, event: &SchedulingEvent) -> Result<String> {
        let service_name = event
            .service_name
            .as_deref()
            .ok_or_else(|| SchedulerError::missing_service_label(event.pod.to_string()))?;

        info!("Processing pod {} (service: {})", event.pod, service_name);

        let nodes = self.node_views().await;
        let eligible = eligible_nodes(&nodes, &self.predicates);

        let node_name = select_node(&eligible)
            .ok_or_else(|| SchedulerError::no_eligible_nodes(event.pod.to_string()))?;

        let decision = BindingDecision::new(event.pod.clone(), &node_name);
        let ack = self.binder.bind(&decision).await?;
        info!("Binding response: {}", ack);

        Ok(node_name)
    }

    /// Snapshot the cluster's nodes for one decision cycle. A failed
    /// listing yields an empty snapshot ("no eligible nodes this
    /// cycle") rather than an error.
    async fn node_views(&self) -> Vec<NodeView> {
        match self.client.list_nodes().await {
            Ok(nodes) => nodes.iter().map(NodeView::from_node).collect(),
            Err(e) => {
                error!("Node listing failed: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{Node, NodeCondition, NodeSpec, NodeStatus, PodStatus, Taint};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use proxima_client::MockClusterApi;
    use proxima_core::labels::SERVICE_NAME_LABEL;
    use proxima_core::PodRef;
    use std::collections::BTreeMap;

    fn make_node(name: &str) -> Node {
        Node {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(NodeSpec::default()),
            status: Some(NodeStatus {
                conditions: Some(vec![NodeCondition {
                    type_: "Ready".to_string(),
                    status: "True".to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
        }
    }

    fn cordon(mut node: Node) -> Node {
        node.spec.as_mut().unwrap().unschedulable = Some(true);
        node
    }

    fn taint_no_schedule(mut node: Node) -> Node {
        node.spec.as_mut().unwrap().taints = Some(vec![Taint {
            key: "maintenance".to_string(),
            effect: "NoSchedule".to_string(),
            ..Default::default()
        }]);
        node
    }

    fn make_pending_pod(name: &str, namespace: &str) -> Pod {
        let mut labels = BTreeMap::new();
        labels.insert(SERVICE_NAME_LABEL.to_string(), "web".to_string());
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                labels: Some(labels),
                ..Default::default()
            },
            status: Some(PodStatus {
                phase: Some("Pending".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn make_scheduler(mock: Arc<MockClusterApi>) -> Scheduler {
        Scheduler::new(mock, SchedulerConfig::default())
    }

    /// Ready node A and cordoned node B: the pod must land on A
    #[tokio::test]
    async fn test_binds_to_the_only_schedulable_node() {
        let mock = Arc::new(MockClusterApi::new());
        mock.set_nodes(vec![make_node("node-a"), cordon(make_node("node-b"))]);
        let scheduler = make_scheduler(mock.clone());

        let event = WatchEvent::added(make_pending_pod("web-0", "prod"));
        let outcome = scheduler.handle_event(&event).await;

        assert_eq!(
            outcome,
            EventOutcome::Bound {
                pod: PodRef::new("prod", "web-0"),
                node: "node-a".to_string(),
            }
        );
        let bindings = mock.bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].node_name, "node-a");
    }

    /// NoSchedule-tainted node A and ready node B: the pod must land on B
    #[tokio::test]
    async fn test_tainted_node_is_never_selected() {
        let mock = Arc::new(MockClusterApi::new());
        mock.set_nodes(vec![
            taint_no_schedule(make_node("node-a")),
            make_node("node-b"),
        ]);
        let scheduler = make_scheduler(mock.clone());

        let event = WatchEvent::added(make_pending_pod("web-0", "prod"));
        let outcome = scheduler.handle_event(&event).await;

        assert_eq!(
            outcome,
            EventOutcome::Bound {
                pod: PodRef::new("prod", "web-0"),
                node: "node-b".to_string(),
            }
        );
    }

    /// All nodes ineligible: no binding call is issued
    #[tokio::test]
    async fn test_no_eligible_nodes_issues_no_binding() {
        let mock = Arc::new(MockClusterApi::new());
        mock.set_nodes(vec![
            cordon(make_node("node-a")),
            taint_no_schedule(make_node("node-b")),
        ]);
        let scheduler = make_scheduler(mock.clone());

        let event = WatchEvent::added(make_pending_pod("web-0", "prod"));
        let outcome = scheduler.handle_event(&event).await;

        assert_eq!(
            outcome,
            EventOutcome::Unschedulable {
                pod: PodRef::new("prod", "web-0"),
            }
        );
        assert!(mock.bindings().is_empty());
    }

    /// Pending pod without the serviceName label: dropped, no filter or
    /// bind work done
    #[tokio::test]
    async fn test_missing_service_label_drops_the_event() {
        let mock = Arc::new(MockClusterApi::new());
        mock.set_nodes(vec![make_node("node-a")]);
        let scheduler = make_scheduler(mock.clone());

        let mut pod = make_pending_pod("web-0", "prod");
        pod.metadata.labels = None;

        let outcome = scheduler.handle_event(&WatchEvent::added(pod)).await;

        assert!(matches!(outcome, EventOutcome::Dropped { .. }));
        assert!(mock.bindings().is_empty());
    }

    /// Non-Pending pods are observed and skipped
    #[tokio::test]
    async fn test_running_pod_is_ignored() {
        let mock = Arc::new(MockClusterApi::new());
        mock.set_nodes(vec![make_node("node-a")]);
        let scheduler = make_scheduler(mock.clone());

        let mut pod = make_pending_pod("web-0", "prod");
        pod.status.as_mut().unwrap().phase = Some("Running".to_string());

        let outcome = scheduler.handle_event(&WatchEvent::modified(pod)).await;

        assert_eq!(
            outcome,
            EventOutcome::Ignored {
                phase: Some("Running".to_string()),
            }
        );
        assert!(mock.bindings().is_empty());
    }

    /// A pod event with no name is malformed and dropped without a crash
    #[tokio::test]
    async fn test_unnamed_pod_event_is_dropped() {
        let mock = Arc::new(MockClusterApi::new());
        let scheduler = make_scheduler(mock.clone());

        let mut pod = make_pending_pod("web-0", "prod");
        pod.metadata.name = None;

        let outcome = scheduler.handle_event(&WatchEvent::added(pod)).await;
        assert!(matches!(outcome, EventOutcome::Dropped { .. }));
    }

    /// A failed node listing behaves as "zero eligible nodes", not as a
    /// loop-killing error
    #[tokio::test]
    async fn test_listing_failure_is_absorbed_as_unschedulable() {
        let mock = Arc::new(MockClusterApi::new());
        mock.set_fail_list_nodes(true);
        let scheduler = make_scheduler(mock.clone());

        let event = WatchEvent::added(make_pending_pod("web-0", "prod"));
        let outcome = scheduler.handle_event(&event).await;

        assert_eq!(
            outcome,
            EventOutcome::Unschedulable {
                pod: PodRef::new("prod", "web-0"),
            }
        );
        assert!(mock.bindings().is_empty());
    }

    /// A binding API failure is an event-scoped outcome, not a crash
    #[tokio::test]
    async fn test_bind_failure_yields_failed_outcome() {
        let mock = Arc::new(MockClusterApi::new());
        mock.set_nodes(vec![make_node("node-a")]);
        mock.set_fail_bindings(true);
        let scheduler = make_scheduler(mock.clone());

        let event = WatchEvent::added(make_pending_pod("web-0", "prod"));
        let outcome = scheduler.handle_event(&event).await;

        assert!(matches!(outcome, EventOutcome::Failed { .. }));
    }

    /// An exhausted stream reports Ended, and each cycle opens a fresh
    /// subscription
    #[tokio::test]
    async fn test_stream_exhaustion_reopens_subscription() {
        let mock = Arc::new(MockClusterApi::new());
        mock.set_nodes(vec![make_node("node-a")]);
        mock.push_events(vec![WatchEvent::added(make_pending_pod("web-0", "prod"))]);
        let scheduler = make_scheduler(mock.clone());

        assert_eq!(scheduler.watch_cycle().await, StreamOutcome::Ended);
        assert_eq!(scheduler.watch_cycle().await, StreamOutcome::Ended);
        assert_eq!(mock.watch_opens(), 2);
        assert_eq!(mock.bindings().len(), 1);
    }

    /// The run loop keeps re-subscribing until cancelled, then exits
    /// cleanly
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_loop_survives_until_cancelled() {
        let mock = Arc::new(MockClusterApi::new());
        mock.set_nodes(vec![make_node("node-a")]);
        mock.push_events(vec![WatchEvent::added(make_pending_pod("web-0", "prod"))]);
        let scheduler = Arc::new(make_scheduler(mock.clone()));

        let token = CancellationToken::new();
        let run_token = token.clone();
        let handle = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.run(run_token).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        let result = handle.await.unwrap();
        assert!(result.is_ok());
        assert!(mock.watch_opens() >= 2);
        assert_eq!(mock.bindings().len(), 1);
    }
}
