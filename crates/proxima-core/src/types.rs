use crate::labels::{NO_SCHEDULE_TAINT_EFFECT, OPT_OUT_LABEL, OPT_OUT_VALUE};
use k8s_openapi::api::core::v1::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node taint as seen by the eligibility filter: key plus effect.
/// Values and toleration matching are deliberately not modelled — any
/// `NoSchedule` effect disqualifies a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaintView {
    pub key: String,
    pub effect: String,
}

impl TaintView {
    pub fn new(key: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            effect: effect.into(),
        }
    }

    /// Whether this taint repels all new placements.
    pub fn is_no_schedule(&self) -> bool {
        self.effect == NO_SCHEDULE_TAINT_EFFECT
    }
}

/// Snapshot of a node taken from a single listing call.
///
/// Constructed fresh per decision cycle and discarded after selection;
/// eligibility is never cached across events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    /// Node name (may be empty if the record carried none)
    pub name: String,
    /// Whether a Ready condition with status "True" was reported
    pub ready: bool,
    /// The spec-level unschedulable cordon flag
    pub unschedulable: bool,
    /// Taints in the order the API reported them
    pub taints: Vec<TaintView>,
    /// Whether the node carries the custom-scheduling opt-out label
    pub opted_out: bool,
}

impl NodeView {
    /// Build a view from a raw node record. Total: every record yields
    /// a view, even unnamed or unready ones — disqualification is the
    /// eligibility filter's job, not the constructor's.
    pub fn from_node(node: &Node) -> Self {
        let name = node.metadata.name.clone().unwrap_or_default();

        let opted_out = node
            .metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(OPT_OUT_LABEL))
            .is_some_and(|v| v == OPT_OUT_VALUE);

        let spec = node.spec.as_ref();

        let unschedulable = spec.and_then(|s| s.unschedulable).unwrap_or(false);

        let taints = spec
            .and_then(|s| s.taints.as_ref())
            .map(|taints| {
                taints
                    .iter()
                    .map(|t| TaintView::new(&t.key, &t.effect))
                    .collect()
            })
            .unwrap_or_default();

        let ready = node
            .status
            .as_ref()
            .and_then(|s| s.conditions.as_ref())
            .map(|conditions| {
                conditions
                    .iter()
                    .any(|c| c.type_ == "Ready" && c.status == "True")
            })
            .unwrap_or(false);

        Self {
            name,
            ready,
            unschedulable,
            taints,
            opted_out,
        }
    }

    /// Whether any taint on this node carries the NoSchedule effect.
    pub fn has_no_schedule_taint(&self) -> bool {
        self.taints.iter().any(|t| t.is_no_schedule())
    }
}

/// Identity of a pod: namespace plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PodRef {
    pub namespace: String,
    pub name: String,
}

impl PodRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A committed placement: which pod goes to which node. Constructed
/// immediately before the bind call and not retained afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDecision {
    pub pod: PodRef,
    pub node_name: String,
}

impl BindingDecision {
    pub fn new(pod: PodRef, node_name: impl Into<String>) -> Self {
        Self {
            pod,
            node_name: node_name.into(),
        }
    }
}
