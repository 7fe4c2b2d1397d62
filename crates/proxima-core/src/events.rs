use crate::error::ProximaError;
use crate::labels::{PHASE_PENDING, SERVICE_NAME_LABEL};
use crate::types::PodRef;
use k8s_openapi::api::core::v1::Pod;
use serde::{Deserialize, Serialize};

/// Watch event type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WatchEventType {
    Added,
    Modified,
    Deleted,
    Error,
}

impl std::fmt::Display for WatchEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WatchEventType::Added => "ADDED",
            WatchEventType::Modified => "MODIFIED",
            WatchEventType::Deleted => "DELETED",
            WatchEventType::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Watch event as carried on the wire: a type tag plus the full object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchEvent<T> {
    #[serde(rename = "type")]
    pub event_type: WatchEventType,
    pub object: T,
}

impl<T> WatchEvent<T> {
    pub fn added(object: T) -> Self {
        Self {
            event_type: WatchEventType::Added,
            object,
        }
    }

    pub fn modified(object: T) -> Self {
        Self {
            event_type: WatchEventType::Modified,
            object,
        }
    }

    pub fn deleted(object: T) -> Self {
        Self {
            event_type: WatchEventType::Deleted,
            object,
        }
    }
}

/// A pod lifecycle event reduced to the fields the scheduler acts on.
///
/// Produced once per received watch event and discarded after the
/// decision; no cross-event state is kept.
#[derive(Debug, Clone)]
pub struct SchedulingEvent {
    pub kind: WatchEventType,
    pub pod: PodRef,
    pub phase: Option<String>,
    pub service_name: Option<String>,
}

impl SchedulingEvent {
    /// Reduce a wire event to a scheduling event. A pod without a name
    /// is malformed and yields an error; a missing namespace falls back
    /// to "default".
    pub fn from_watch(event: &WatchEvent<Pod>) -> Result<Self, ProximaError> {
        let pod = &event.object;

        let name = pod
            .metadata
            .name
            .clone()
            .ok_or_else(|| ProximaError::malformed_event("pod event has no name"))?;
        let namespace = pod
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| "default".to_string());

        let phase = pod.status.as_ref().and_then(|s| s.phase.clone());

        let service_name = pod
            .metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(SERVICE_NAME_LABEL))
            .cloned();

        Ok(Self {
            kind: event.event_type.clone(),
            pod: PodRef::new(namespace, name),
            phase,
            service_name,
        })
    }

    /// Whether the pod is awaiting placement.
    pub fn is_pending(&self) -> bool {
        self.phase.as_deref() == Some(PHASE_PENDING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::PodStatus;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn make_pod(name: &str, namespace: &str, phase: &str) -> Pod {
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
                phase: Some(phase.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_event_type_wire_format() {
        let json = serde_json::to_string(&WatchEventType::Added).unwrap();
        assert_eq!(json, "\"ADDED\"");

        let parsed: WatchEventType = serde_json::from_str("\"MODIFIED\"").unwrap();
        assert_eq!(parsed, WatchEventType::Modified);
    }

    #[test]
    fn test_from_watch_pending_pod() {
        let event = WatchEvent::added(make_pod("web-0", "prod", "Pending"));
        let scheduling = SchedulingEvent::from_watch(&event).unwrap();

        assert_eq!(scheduling.kind, WatchEventType::Added);
        assert_eq!(scheduling.pod, PodRef::new("prod", "web-0"));
        assert!(scheduling.is_pending());
        assert_eq!(scheduling.service_name.as_deref(), Some("web"));
    }

    #[test]
    fn test_from_watch_running_pod_is_not_pending() {
        let event = WatchEvent::modified(make_pod("web-0", "prod", "Running"));
        let scheduling = SchedulingEvent::from_watch(&event).unwrap();
        assert!(!scheduling.is_pending());
    }

    #[test]
    fn test_from_watch_unnamed_pod_is_malformed() {
        let mut pod = make_pod("web-0", "prod", "Pending");
        pod.metadata.name = None;

        let event = WatchEvent::added(pod);
        let result = SchedulingEvent::from_watch(&event);
        assert!(matches!(
            result.unwrap_err(),
            ProximaError::MalformedEvent { .. }
        ));
    }

    #[test]
    fn test_from_watch_missing_namespace_defaults() {
        let mut pod = make_pod("web-0", "prod", "Pending");
        pod.metadata.namespace = None;

        let event = WatchEvent::added(pod);
        let scheduling = SchedulingEvent::from_watch(&event).unwrap();
        assert_eq!(scheduling.pod.namespace, "default");
    }

    #[test]
    fn test_from_watch_without_service_label() {
        let mut pod = make_pod("web-0", "prod", "Pending");
        pod.metadata.labels = None;

        let event = WatchEvent::added(pod);
        let scheduling = SchedulingEvent::from_watch(&event).unwrap();
        assert!(scheduling.service_name.is_none());
    }
}
