use proxima_core::PodRef;

/// Result of evaluating one eligibility predicate against one node
#[derive(Debug, Clone)]
pub struct FilterResult {
    /// Node name
    pub node_name: String,
    /// Whether the node passed the predicate
    pub passed: bool,
    /// Reason for disqualification (if any)
    pub reason: Option<String>,
}

impl FilterResult {
    /// Create a passing filter result
    pub fn pass(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            passed: true,
            reason: None,
        }
    }

    /// Create a failing filter result
    pub fn fail(node_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            passed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Named transition taken after handling one watch event. Every event
/// resolves to exactly one of these; none of them terminates the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Pod was bound to a node
    Bound { pod: PodRef, node: String },
    /// Pod is not Pending; observed and skipped
    Ignored { phase: Option<String> },
    /// Event data was unusable (malformed, or missing the service label)
    Dropped { reason: String },
    /// No eligible node existed this cycle
    Unschedulable { pod: PodRef },
    /// Filter/select/bind failed on an API call
    Failed { reason: String },
}

/// Named transition taken when a watch connection cycle finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// Subscription exhausted (server timeout or stream closed); reopen
    Ended,
    /// Subscription could not be opened; pause briefly, then reopen
    ConnectFailed,
}
