//! Process-wide call telemetry
//!
//! Every analysis call ends with one [`TelemetryStore::record`]: the cost
//! measured by its probe and, when the collaborator assesses itself, a
//! [`QualityRecord`]. The store keeps per-function timing, counter and
//! accuracy-histogram aggregates plus process totals.
//!
//! Stores are explicit objects: construct one with [`TelemetryStore::new`]
//! and hand clones to collaborators. [`global_telemetry`] provides a lazily
//! created process-wide instance for callers that want a single sink.

pub mod params;
pub mod quality;
pub mod stats;
pub mod store;

pub use params::{CallParams, ParamValue};
pub use quality::QualityRecord;
pub use stats::{FunctionStats, GlobalTelemetry, QualityDistribution, ResourceTotals};
pub use store::{
    global_snapshot, global_telemetry, record_function_call, reset_global_telemetry,
    TelemetryStore,
};
