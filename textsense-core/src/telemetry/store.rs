//! Concurrency-safe telemetry store

use super::params::CallParams;
use super::quality::QualityRecord;
use super::stats::GlobalTelemetry;
use crate::probe::CostRecord;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// Shared handle to one telemetry aggregate
///
/// Cloning is cheap and every clone feeds the same aggregate. All
/// mutation takes the write lock; readers copy the aggregate out under
/// the read lock, so no caller ever holds a view that a writer can
/// change underneath it.
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    inner: Arc<RwLock<GlobalTelemetry>>,
}

impl TelemetryStore {
    /// Create an empty, independent store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed call
    ///
    /// `quality` is `None` when the collaborator performs no
    /// self-assessment; only the timing aggregates move in that case.
    pub fn record(
        &self,
        function_name: &str,
        params: &CallParams,
        cost: &CostRecord,
        quality: Option<QualityRecord>,
    ) {
        if let Some(q) = quality.filter(QualityRecord::is_out_of_range) {
            tracing::warn!(
                function = function_name,
                accuracy = q.accuracy,
                confidence = q.confidence,
                coverage = q.coverage,
                "quality outside [0, 1], clamping"
            );
        }

        tracing::debug!(
            function = function_name,
            elapsed_us = cost.elapsed.as_micros() as u64,
            steps = cost.steps,
            cache_hits = cost.cache_hits,
            params = %params,
            "telemetry record"
        );

        let mut telemetry = self.inner.write();
        telemetry
            .functions
            .entry(function_name.to_string())
            .or_default()
            .observe(cost, params, false);
        if let Some(quality) = quality {
            telemetry
                .quality
                .entry(function_name.to_string())
                .or_default()
                .observe(&quality);
        }
        telemetry.totals.observe(cost, false);
    }

    /// Record a call that failed before producing a result
    pub fn record_failure(&self, function_name: &str, params: &CallParams, cost: &CostRecord) {
        tracing::debug!(function = function_name, params = %params, "telemetry failure");

        let mut telemetry = self.inner.write();
        telemetry
            .functions
            .entry(function_name.to_string())
            .or_default()
            .observe(cost, params, true);
        telemetry.totals.observe(cost, true);
    }

    /// Deep copy of every aggregate
    pub fn snapshot(&self) -> GlobalTelemetry {
        self.inner.read().clone()
    }

    /// Calls recorded for one function (0 if never seen)
    pub fn call_count(&self, function_name: &str) -> u64 {
        self.inner
            .read()
            .functions
            .get(function_name)
            .map_or(0, |stats| stats.call_count)
    }

    /// Replace all aggregates with empty ones
    pub fn reset(&self) {
        *self.inner.write() = GlobalTelemetry::default();
        tracing::debug!("telemetry reset");
    }
}

static GLOBAL_TELEMETRY: OnceLock<TelemetryStore> = OnceLock::new();

/// Process-wide store, created on first use
pub fn global_telemetry() -> &'static TelemetryStore {
    GLOBAL_TELEMETRY.get_or_init(TelemetryStore::new)
}

/// Record a call into the process-wide store
pub fn record_function_call(
    function_name: &str,
    params: &CallParams,
    cost: &CostRecord,
    quality: Option<QualityRecord>,
) {
    global_telemetry().record(function_name, params, cost, quality);
}

/// Snapshot of the process-wide store
pub fn global_snapshot() -> GlobalTelemetry {
    global_telemetry().snapshot()
}

/// Clear the process-wide store
pub fn reset_global_telemetry() {
    global_telemetry().reset();
}
