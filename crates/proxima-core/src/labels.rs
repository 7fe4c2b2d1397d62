//! Well-known labels, phases, and taint effects used by the scheduler.

/// Label key that opts a pod into Proxima scheduling.
pub const STRATEGY_LABEL_KEY: &str = "schedulingStrategy";

/// Label value identifying pods handled by this scheduler.
pub const STRATEGY_LABEL_VALUE: &str = "proxima";

/// Label selector used to scope the pod watch subscription.
pub const STRATEGY_SELECTOR: &str = "schedulingStrategy=proxima";

/// Pod label naming the service a pending pod belongs to. Required on
/// every pod this scheduler places.
pub const SERVICE_NAME_LABEL: &str = "serviceName";

/// Node label that opts a node out of custom scheduling entirely.
pub const OPT_OUT_LABEL: &str = "noCustomScheduler";

/// Value of [`OPT_OUT_LABEL`] that activates the opt-out.
pub const OPT_OUT_VALUE: &str = "yes";

/// Taint effect that disqualifies a node unconditionally.
pub const NO_SCHEDULE_TAINT_EFFECT: &str = "NoSchedule";

/// Pod phase that marks a pod as awaiting placement.
pub const PHASE_PENDING: &str = "Pending";
