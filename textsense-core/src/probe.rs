//! Per-call cost measurement
//!
//! A [`CostProbe`] is opened at the start of one analysis call and
//! finalized at the end. It tracks wall-clock time, the resident memory
//! high-water mark relative to the baseline, and two counters that the
//! collaborator bumps while it works: algorithm steps and cache hits.
//!
//! ```rust
//! use textsense_core::probe::CostProbe;
//!
//! let probe = CostProbe::start();
//! for _ in 0..3 {
//!     probe.increment_steps();
//! }
//! probe.record_cache_hit();
//! probe.checkpoint("tokenized");
//!
//! let cost = probe.finalize();
//! assert_eq!(cost.steps, 3);
//! assert_eq!(cost.cache_hits, 1);
//! assert_eq!(cost.checkpoints.len(), 1);
//! ```

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use sysinfo::{Pid, Process, ProcessesToUpdate, System};

/// Source of resident-memory readings
pub trait MemorySampler: Send + Sync {
    /// Current resident memory in bytes (0 when unavailable)
    fn resident_bytes(&self) -> u64;
}

/// Resident set size of the current process, read through `sysinfo`
///
/// Reports 0 when the platform cannot resolve the current process, which
/// makes every memory delta 0 rather than failing the call.
pub struct ProcessMemorySampler {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl std::fmt::Debug for ProcessMemorySampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessMemorySampler")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl Default for ProcessMemorySampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessMemorySampler {
    /// Sampler bound to the current process
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Process-wide sampler shared by every [`CostProbe::start`]
    pub fn shared() -> Arc<ProcessMemorySampler> {
        static SHARED: OnceLock<Arc<ProcessMemorySampler>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(ProcessMemorySampler::new())))
    }
}

impl MemorySampler for ProcessMemorySampler {
    fn resident_bytes(&self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };
        let mut system = self.system.lock();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).map_or(0, Process::memory)
    }
}

/// Diagnostic marker captured by [`CostProbe::checkpoint`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Caller-supplied label
    pub label: String,
    /// Time since the probe started
    pub offset: Duration,
    /// Resident memory sampled at the checkpoint
    pub memory_bytes: u64,
}

/// Immutable cost summary of one call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    /// Wall-clock time between start and finalize
    pub elapsed: Duration,
    /// Highest sampled memory minus the baseline, floored at 0
    pub peak_memory_bytes: u64,
    /// Algorithm steps reported by the collaborator
    pub steps: u64,
    /// Cache hits reported by the collaborator
    pub cache_hits: u64,
    /// Diagnostic checkpoints in the order they were taken
    pub checkpoints: Vec<Checkpoint>,
}

impl CostRecord {
    /// Cost record with only an elapsed time, used by tests and replays
    pub fn from_elapsed(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Default::default()
        }
    }

    /// Elapsed time in fractional milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Peak memory delta in fractional megabytes
    pub fn peak_memory_mb(&self) -> f64 {
        self.peak_memory_bytes as f64 / (1024.0 * 1024.0)
    }
}

#[derive(Debug)]
struct ProbeState {
    max_sample: u64,
    steps: u64,
    cache_hits: u64,
    checkpoints: Vec<Checkpoint>,
}

/// Measurement scope for a single analysis call
///
/// All methods take `&self`; counters sit behind a mutex so a probe shared
/// through an `Arc` stays race-free, although one probe normally lives on
/// one call path.
pub struct CostProbe {
    started: Instant,
    baseline_memory: u64,
    sampler: Arc<dyn MemorySampler>,
    state: Mutex<ProbeState>,
}

impl std::fmt::Debug for CostProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostProbe")
            .field("started", &self.started)
            .field("baseline_memory", &self.baseline_memory)
            .finish_non_exhaustive()
    }
}

impl CostProbe {
    /// Start a probe that samples the current process
    pub fn start() -> Self {
        Self::with_sampler(ProcessMemorySampler::shared())
    }

    /// Start a probe with a custom memory sampler
    pub fn with_sampler(sampler: Arc<dyn MemorySampler>) -> Self {
        let baseline_memory = sampler.resident_bytes();
        Self {
            started: Instant::now(),
            baseline_memory,
            sampler,
            state: Mutex::new(ProbeState {
                max_sample: baseline_memory,
                steps: 0,
                cache_hits: 0,
                checkpoints: Vec::new(),
            }),
        }
    }

    /// Time since the probe started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Take a memory sample and fold it into the high-water mark
    pub fn sample_memory(&self) -> u64 {
        let reading = self.sampler.resident_bytes();
        let mut state = self.state.lock();
        state.max_sample = state.max_sample.max(reading);
        reading
    }

    /// Record a labelled diagnostic marker
    pub fn checkpoint(&self, label: impl Into<String>) {
        let label = label.into();
        let offset = self.started.elapsed();
        let memory_bytes = self.sampler.resident_bytes();

        tracing::trace!(label = %label, offset_us = offset.as_micros() as u64, "probe checkpoint");

        let mut state = self.state.lock();
        state.max_sample = state.max_sample.max(memory_bytes);
        state.checkpoints.push(Checkpoint {
            label,
            offset,
            memory_bytes,
        });
    }

    /// Count one algorithm step
    pub fn increment_steps(&self) {
        self.add_steps(1);
    }

    /// Count several algorithm steps at once
    pub fn add_steps(&self, count: u64) {
        let mut state = self.state.lock();
        state.steps = state.steps.saturating_add(count);
    }

    /// Count one cache hit
    pub fn record_cache_hit(&self) {
        let mut state = self.state.lock();
        state.cache_hits = state.cache_hits.saturating_add(1);
    }

    /// Produce the cost record for everything observed so far
    pub fn finalize(&self) -> CostRecord {
        let final_sample = self.sampler.resident_bytes();
        let elapsed = self.started.elapsed();

        let mut state = self.state.lock();
        state.max_sample = state.max_sample.max(final_sample);

        CostRecord {
            elapsed,
            peak_memory_bytes: state.max_sample.saturating_sub(self.baseline_memory),
            steps: state.steps,
            cache_hits: state.cache_hits,
            checkpoints: state.checkpoints.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sampler that replays a fixed sequence, repeating the last value
    pub(crate) struct ScriptedSampler {
        readings: Vec<u64>,
        cursor: AtomicUsize,
    }

    impl ScriptedSampler {
        pub(crate) fn new(readings: Vec<u64>) -> Self {
            Self {
                readings,
                cursor: AtomicUsize::new(0),
            }
        }
    }

    impl MemorySampler for ScriptedSampler {
        fn resident_bytes(&self) -> u64 {
            let index = self.cursor.fetch_add(1, Ordering::SeqCst);
            let last = self.readings.len().saturating_sub(1);
            self.readings.get(index.min(last)).copied().unwrap_or(0)
        }
    }

    #[test]
    fn test_peak_memory_is_max_minus_baseline() {
        // baseline, checkpoint, checkpoint, finalize
        let sampler = Arc::new(ScriptedSampler::new(vec![1_000, 5_000, 3_000, 2_000]));
        let probe = CostProbe::with_sampler(sampler);
        probe.checkpoint("a");
        probe.checkpoint("b");

        let cost = probe.finalize();
        assert_eq!(cost.peak_memory_bytes, 4_000);
        assert_eq!(cost.checkpoints[0].label, "a");
        assert_eq!(cost.checkpoints[1].memory_bytes, 3_000);
    }

    #[test]
    fn test_process_sampler_reads_resident_bytes() {
        let sampler = ProcessMemorySampler::shared();
        assert!(Arc::ptr_eq(&sampler, &ProcessMemorySampler::shared()));
        if sysinfo::IS_SUPPORTED_SYSTEM {
            // any live test binary holds well over a megabyte resident
            assert!(sampler.resident_bytes() > 1 << 20);
        }
    }

    #[test]
    fn test_peak_memory_floored_at_zero() {
        let sampler = Arc::new(ScriptedSampler::new(vec![10_000, 4_000, 2_000]));
        let probe = CostProbe::with_sampler(sampler);
        probe.sample_memory();

        let cost = probe.finalize();
        assert_eq!(cost.peak_memory_bytes, 0);
    }

    #[test]
    fn test_counters() {
        let probe = CostProbe::with_sampler(Arc::new(ScriptedSampler::new(vec![0])));
        probe.increment_steps();
        probe.add_steps(9);
        probe.record_cache_hit();
        probe.record_cache_hit();

        let cost = probe.finalize();
        assert_eq!(cost.steps, 10);
        assert_eq!(cost.cache_hits, 2);
        assert!(cost.checkpoints.is_empty());
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let probe = CostProbe::start();
        std::thread::sleep(Duration::from_millis(2));
        let first = probe.finalize();
        let second = probe.finalize();
        assert!(first.elapsed >= Duration::from_millis(2));
        assert!(second.elapsed >= first.elapsed);
    }

    #[test]
    fn test_shared_probe_counts_every_increment() {
        let probe = Arc::new(CostProbe::with_sampler(Arc::new(ScriptedSampler::new(
            vec![0],
        ))));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let probe = Arc::clone(&probe);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        probe.increment_steps();
                        probe.record_cache_hit();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let cost = probe.finalize();
        assert_eq!(cost.steps, 4_000);
        assert_eq!(cost.cache_hits, 4_000);
    }

    #[test]
    fn test_cost_record_unit_helpers() {
        let cost = CostRecord {
            elapsed: Duration::from_millis(1500),
            peak_memory_bytes: 2 * 1024 * 1024,
            ..Default::default()
        };
        assert_eq!(cost.elapsed_ms(), 1500.0);
        assert_eq!(cost.peak_memory_mb(), 2.0);
    }
}
