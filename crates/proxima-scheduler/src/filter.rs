use crate::types::FilterResult;
use proxima_core::NodeView;
use std::collections::BTreeSet;
use tracing::{error, info};

/// Eligibility predicate trait
pub trait EligibilityPredicate: Send + Sync {
    /// Evaluate a node snapshot
    fn evaluate(&self, node: &NodeView) -> FilterResult;

    /// Name of the predicate
    fn name(&self) -> &str;
}

/// Excludes nodes carrying the operator opt-out label
pub struct NotOptedOut;

impl EligibilityPredicate for NotOptedOut {
    fn evaluate(&self, node: &NodeView) -> FilterResult {
        if node.opted_out {
            FilterResult::fail(&node.name, "node has the noCustomScheduler label")
        } else {
            FilterResult::pass(&node.name)
        }
    }

    fn name(&self) -> &str {
        "NotOptedOut"
    }
}

/// Excludes cordoned nodes (spec.unschedulable)
pub struct Schedulable;

impl EligibilityPredicate for Schedulable {
    fn evaluate(&self, node: &NodeView) -> FilterResult {
        if node.unschedulable {
            FilterResult::fail(&node.name, "scheduling disabled on node")
        } else {
            FilterResult::pass(&node.name)
        }
    }

    fn name(&self) -> &str {
        "Schedulable"
    }
}

/// Excludes nodes with any NoSchedule taint. Tolerations are never
/// inspected; any such taint disqualifies unconditionally.
pub struct NoBlockingTaint;

impl EligibilityPredicate for NoBlockingTaint {
    fn evaluate(&self, node: &NodeView) -> FilterResult {
        if node.has_no_schedule_taint() {
            FilterResult::fail(&node.name, "NoSchedule taint effect on node")
        } else {
            FilterResult::pass(&node.name)
        }
    }

    fn name(&self) -> &str {
        "NoBlockingTaint"
    }
}

/// Requires a Ready condition with status "True"
pub struct NodeReady;

impl EligibilityPredicate for NodeReady {
    fn evaluate(&self, node: &NodeView) -> FilterResult {
        if node.ready {
            FilterResult::pass(&node.name)
        } else {
            FilterResult::fail(&node.name, "node is not Ready")
        }
    }

    fn name(&self) -> &str {
        "NodeReady"
    }
}

/// Requires a non-empty node name
pub struct NamedNode;

impl EligibilityPredicate for NamedNode {
    fn evaluate(&self, node: &NodeView) -> FilterResult {
        if node.name.is_empty() {
            FilterResult::fail(&node.name, "node has no name")
        } else {
            FilterResult::pass(&node.name)
        }
    }

    fn name(&self) -> &str {
        "NamedNode"
    }
}

/// The eligibility policy in evaluation order, short-circuiting on the
/// first disqualification
pub fn default_predicates() -> Vec<Box<dyn EligibilityPredicate>> {
    vec![
        Box::new(NotOptedOut),
        Box::new(Schedulable),
        Box::new(NoBlockingTaint),
        Box::new(NodeReady),
        Box::new(NamedNode),
    ]
}

/// Apply the predicates to a node snapshot and return the names of the
/// nodes that passed all of them. Each disqualification is logged with
/// its reason; the logging is observability only, never control flow.
pub fn eligible_nodes(
    nodes: &[NodeView],
    predicates: &[Box<dyn EligibilityPredicate>],
) -> BTreeSet<String> {
    let mut eligible = BTreeSet::new();

    for node in nodes {
        let mut passed = true;

        for predicate in predicates {
            let result = predicate.evaluate(node);
            if !result.passed {
                let reason = result.reason.unwrap_or_default();
                // The opt-out label is an explicit operator choice, not a fault
                if predicate.name() == "NotOptedOut" {
                    info!("Skipping node {}: {}", result.node_name, reason);
                } else {
                    error!(
                        "Node {} disqualified by {}: {}",
                        result.node_name,
                        predicate.name(),
                        reason
                    );
                }
                passed = false;
                break;
            }
        }

        if passed {
            eligible.insert(node.name.clone());
        }
    }

    info!("Eligible nodes: {:?}", eligible);
    eligible
}
