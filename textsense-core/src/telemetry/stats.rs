//! Aggregates kept per function and process-wide

use super::params::CallParams;
use super::quality::QualityRecord;
use crate::config::defaults;
use crate::probe::CostRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timing and counter aggregates for one function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionStats {
    /// Calls recorded, successful or not
    pub call_count: u64,
    /// Calls recorded as failures
    pub error_count: u64,
    /// Fastest call in milliseconds
    pub min_time_ms: f64,
    /// Slowest call in milliseconds
    pub max_time_ms: f64,
    /// Running mean of call durations in milliseconds
    pub average_time_ms: f64,
    /// Sum of call durations in milliseconds
    pub total_time_ms: f64,
    /// Algorithm steps summed over all calls
    pub total_steps: u64,
    /// Cache hits summed over all calls
    pub total_cache_hits: u64,
    /// Calls that reported at least one cache hit
    pub calls_with_cache_hits: u64,
    /// `calls_with_cache_hits / call_count`
    pub cache_hit_rate: f64,
    /// Highest single-call memory delta in bytes
    pub peak_memory_bytes: u64,
    /// How often each parameter key was supplied
    pub parameter_usage: BTreeMap<String, u64>,
}

impl FunctionStats {
    /// Fold one call into the aggregate
    pub(crate) fn observe(&mut self, cost: &CostRecord, params: &CallParams, failed: bool) {
        let elapsed_ms = cost.elapsed_ms();

        self.call_count += 1;
        let n = self.call_count as f64;

        if self.call_count == 1 {
            self.min_time_ms = elapsed_ms;
            self.max_time_ms = elapsed_ms;
        } else {
            self.min_time_ms = self.min_time_ms.min(elapsed_ms);
            self.max_time_ms = self.max_time_ms.max(elapsed_ms);
        }
        self.average_time_ms = (self.average_time_ms * (n - 1.0) + elapsed_ms) / n;
        self.total_time_ms += elapsed_ms;

        if failed {
            self.error_count += 1;
        }

        self.total_steps = self.total_steps.saturating_add(cost.steps);
        self.total_cache_hits = self.total_cache_hits.saturating_add(cost.cache_hits);
        if cost.cache_hits > 0 {
            self.calls_with_cache_hits += 1;
        }
        self.cache_hit_rate = self.calls_with_cache_hits as f64 / n;
        self.peak_memory_bytes = self.peak_memory_bytes.max(cost.peak_memory_bytes);

        for key in params.keys() {
            *self.parameter_usage.entry(key.to_string()).or_insert(0) += 1;
        }
    }

    /// Share of calls that failed
    pub fn error_rate(&self) -> f64 {
        self.error_count as f64 / self.call_count.max(1) as f64
    }
}

/// Bucketed distribution of reported accuracy for one function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityDistribution {
    /// Quality samples folded in; equals the bucket total
    pub count: u64,
    /// Lowest clamped accuracy seen
    pub min: f64,
    /// Highest clamped accuracy seen
    pub max: f64,
    /// Histogram-weighted midpoint average
    pub mean: f64,
    /// Accuracy histogram; bucket `i` holds `floor(accuracy * 5) == i`
    pub buckets: [u64; defaults::QUALITY_BUCKETS],
    /// Running mean of clamped confidence
    pub mean_confidence: f64,
    /// Running mean of clamped coverage
    pub mean_coverage: f64,
}

impl QualityDistribution {
    /// Bucket index for an accuracy value, clamped to the last bucket
    pub fn bucket_index(accuracy: f64) -> usize {
        let accuracy = super::quality::clamp_unit(accuracy);
        ((accuracy * 5.0).floor() as usize).min(defaults::QUALITY_BUCKETS - 1)
    }

    /// Representative value of a bucket
    pub fn bucket_midpoint(index: usize) -> f64 {
        ((index as f64 + 0.5) / 5.0).min(1.0)
    }

    /// Fold one quality sample into the distribution
    pub(crate) fn observe(&mut self, quality: &QualityRecord) {
        let quality = quality.clamped();

        self.count += 1;
        let n = self.count as f64;

        if self.count == 1 {
            self.min = quality.accuracy;
            self.max = quality.accuracy;
        } else {
            self.min = self.min.min(quality.accuracy);
            self.max = self.max.max(quality.accuracy);
        }

        self.buckets[Self::bucket_index(quality.accuracy)] += 1;
        self.mean = self.weighted_midpoint_mean();

        self.mean_confidence = (self.mean_confidence * (n - 1.0) + quality.confidence) / n;
        self.mean_coverage = (self.mean_coverage * (n - 1.0) + quality.coverage) / n;
    }

    fn weighted_midpoint_mean(&self) -> f64 {
        let total: u64 = self.buckets.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let weighted: f64 = self
            .buckets
            .iter()
            .enumerate()
            .map(|(i, &c)| Self::bucket_midpoint(i) * c as f64)
            .sum();
        weighted / total as f64
    }

    /// Sum of all bucket counts
    pub fn bucket_total(&self) -> u64 {
        self.buckets.iter().sum()
    }
}

/// Process-wide resource totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTotals {
    /// Calls across all functions
    pub total_calls: u64,
    /// Failures across all functions
    pub total_errors: u64,
    /// Elapsed time across all calls in milliseconds
    pub total_time_ms: f64,
    /// Memory deltas summed across all calls
    pub total_memory_bytes: u64,
    /// Largest single-call memory delta
    pub peak_memory_bytes: u64,
    /// Algorithm steps across all calls
    pub total_steps: u64,
    /// Cache hits across all calls
    pub total_cache_hits: u64,
}

impl ResourceTotals {
    pub(crate) fn observe(&mut self, cost: &CostRecord, failed: bool) {
        self.total_calls += 1;
        if failed {
            self.total_errors += 1;
        }
        self.total_time_ms += cost.elapsed_ms();
        self.total_memory_bytes = self
            .total_memory_bytes
            .saturating_add(cost.peak_memory_bytes);
        self.peak_memory_bytes = self.peak_memory_bytes.max(cost.peak_memory_bytes);
        self.total_steps = self.total_steps.saturating_add(cost.steps);
        self.total_cache_hits = self.total_cache_hits.saturating_add(cost.cache_hits);
    }

    /// Mean call duration across every function
    pub fn average_time_ms(&self) -> f64 {
        self.total_time_ms / self.total_calls.max(1) as f64
    }
}

/// Aggregate root: every function's stats plus the process totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalTelemetry {
    /// Per-function timing and counters
    pub functions: BTreeMap<String, FunctionStats>,
    /// Per-function accuracy distributions
    pub quality: BTreeMap<String, QualityDistribution>,
    /// Process-wide totals
    pub totals: ResourceTotals,
}

impl GlobalTelemetry {
    /// Stats for one function, if it was ever recorded
    pub fn function(&self, name: &str) -> Option<&FunctionStats> {
        self.functions.get(name)
    }

    /// Quality distribution for one function, if any quality was reported
    pub fn quality_for(&self, name: &str) -> Option<&QualityDistribution> {
        self.quality.get(name)
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.quality.is_empty() && self.totals.total_calls == 0
    }

    /// Function names ordered by descending call count
    pub fn busiest_functions(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .functions
            .iter()
            .map(|(name, stats)| (name.as_str(), stats.call_count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Render as pretty JSON
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cost_ms(ms: u64) -> CostRecord {
        CostRecord::from_elapsed(Duration::from_millis(ms))
    }

    #[test]
    fn test_function_stats_incremental_mean() {
        let mut stats = FunctionStats::default();
        for ms in [10, 20, 60] {
            stats.observe(&cost_ms(ms), &CallParams::new(), false);
        }
        assert_eq!(stats.call_count, 3);
        assert!((stats.average_time_ms - 30.0).abs() < 1e-9);
        assert_eq!(stats.min_time_ms, 10.0);
        assert_eq!(stats.max_time_ms, 60.0);
        assert_eq!(stats.total_time_ms, 90.0);
    }

    #[test]
    fn test_function_stats_errors_and_cache() {
        let mut stats = FunctionStats::default();
        let hit = CostRecord {
            cache_hits: 3,
            steps: 5,
            ..Default::default()
        };
        stats.observe(&hit, &CallParams::new().with("depth", 1u8), false);
        stats.observe(&cost_ms(1), &CallParams::new().with("depth", 2u8), true);

        assert_eq!(stats.error_count, 1);
        assert_eq!(stats.error_rate(), 0.5);
        assert_eq!(stats.cache_hit_rate, 0.5);
        assert_eq!(stats.total_cache_hits, 3);
        assert_eq!(stats.total_steps, 5);
        assert_eq!(stats.parameter_usage.get("depth"), Some(&2));
    }

    #[test]
    fn test_error_rate_without_calls() {
        assert_eq!(FunctionStats::default().error_rate(), 0.0);
    }

    #[test]
    fn test_bucket_index() {
        assert_eq!(QualityDistribution::bucket_index(0.0), 0);
        assert_eq!(QualityDistribution::bucket_index(0.19), 0);
        assert_eq!(QualityDistribution::bucket_index(0.2), 1);
        assert_eq!(QualityDistribution::bucket_index(0.99), 4);
        assert_eq!(QualityDistribution::bucket_index(1.0), 5);
        assert_eq!(QualityDistribution::bucket_index(1.7), 5);
        assert_eq!(QualityDistribution::bucket_index(-0.3), 0);
    }

    #[test]
    fn test_quality_distribution_mean_uses_midpoints() {
        let mut dist = QualityDistribution::default();
        dist.observe(&QualityRecord::new(0.05, 1.0, 1.0)); // bucket 0, midpoint 0.1
        dist.observe(&QualityRecord::new(0.85, 0.0, 0.5)); // bucket 4, midpoint 0.9

        assert_eq!(dist.count, 2);
        assert_eq!(dist.bucket_total(), 2);
        assert!((dist.mean - 0.5).abs() < 1e-9);
        assert_eq!(dist.min, 0.05);
        assert_eq!(dist.max, 0.85);
        assert!((dist.mean_confidence - 0.5).abs() < 1e-9);
        assert!((dist.mean_coverage - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_top_bucket_midpoint_capped() {
        let mut dist = QualityDistribution::default();
        dist.observe(&QualityRecord::new(1.3, 1.0, 1.0));
        assert_eq!(dist.buckets[5], 1);
        assert_eq!(dist.mean, 1.0);
        assert_eq!(dist.max, 1.0);
    }

    #[test]
    fn test_busiest_functions_order() {
        let mut telemetry = GlobalTelemetry::default();
        telemetry.functions.insert(
            "sentiment".into(),
            FunctionStats {
                call_count: 2,
                ..Default::default()
            },
        );
        telemetry.functions.insert(
            "keywords".into(),
            FunctionStats {
                call_count: 5,
                ..Default::default()
            },
        );
        let ranked = telemetry.busiest_functions();
        assert_eq!(ranked, vec![("keywords", 5), ("sentiment", 2)]);
    }
}
