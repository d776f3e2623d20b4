//! Cost measurement, telemetry and adaptive strategy selection for text
//! analysis
//!
//! The crate holds the feedback loop that sits around every analysis call:
//!
//! - **Probe**: a [`CostProbe`] measures one call's time, memory delta and
//!   work counters
//! - **Telemetry**: a [`TelemetryStore`] aggregates every call's cost and
//!   self-assessed quality per function
//! - **Strategy**: a [`StrategySelector`] picks how much work to do for a
//!   given input and learns from reported outcomes
//!
//! The analyzers themselves live in `textsense-engine`; they only need the
//! [`Strategy`] they were handed and a probe to report into.
//!
//! # Example
//!
//! ```rust
//! use textsense_core::{
//!     CallParams, QualityRecord, RequirementSpec, StrategySelector, TelemetryStore,
//!     TextCharacteristics,
//! };
//!
//! let selector = StrategySelector::new();
//! let telemetry = TelemetryStore::new();
//!
//! let input = TextCharacteristics::new(40, "en", "chat", 0.2);
//! let strategy = selector
//!     .select_strategy(&input, &RequirementSpec::default())
//!     .unwrap();
//!
//! let probe = textsense_core::start_probe();
//! probe.add_steps(40);
//! let cost = probe.finalize();
//!
//! telemetry.record(
//!     "word_count",
//!     &strategy.call_params(),
//!     &cost,
//!     Some(QualityRecord::new(0.9, 0.8, 1.0)),
//! );
//! assert_eq!(telemetry.call_count("word_count"), 1);
//! # let _ = CallParams::new();
//! ```

pub mod config;
pub mod error;
pub mod probe;
pub mod strategy;
pub mod telemetry;

pub use config::{SelectorConfig, SelectorConfigBuilder};
pub use error::{CoreError, Result};
pub use probe::{Checkpoint, CostProbe, CostRecord, MemorySampler, ProcessMemorySampler};
pub use strategy::{
    Algorithm, InsightsReport, OptimizationScore, Outcome, PreferencePolicy, Recommendation,
    RequirementSpec, SharedSelector, Strategy, StrategyCatalog, StrategyName, StrategySelector,
    TextCharacteristics,
};
pub use telemetry::{
    global_snapshot, global_telemetry, record_function_call, reset_global_telemetry, CallParams,
    FunctionStats, GlobalTelemetry, ParamValue, QualityDistribution, QualityRecord,
    TelemetryStore,
};

/// Open a probe that samples this process's resident memory
pub fn start_probe() -> CostProbe {
    CostProbe::start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_feeds_telemetry() {
        let selector = StrategySelector::new();
        let telemetry = TelemetryStore::new();
        let input = TextCharacteristics::new(20_000, "en", "general", 0.5);
        let strategy = selector
            .select_strategy(&input, &RequirementSpec::default())
            .unwrap();

        let probe = start_probe();
        probe.increment_steps();
        telemetry.record("segment", &strategy.call_params(), &probe.finalize(), None);

        let snapshot = telemetry.snapshot();
        let stats = snapshot.function("segment").unwrap();
        assert_eq!(stats.call_count, 1);
        assert_eq!(stats.total_steps, 1);
        assert!(stats.parameter_usage.contains_key("strategy"));
    }
}
