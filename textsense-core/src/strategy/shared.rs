//! Thread-safe handle around a [`StrategySelector`]

use super::characteristics::{RequirementSpec, TextCharacteristics};
use super::insights::{InsightsReport, Recommendation};
use super::outcome::OptimizationScore;
use super::selector::StrategySelector;
use super::types::{Strategy, StrategyName};
use crate::config::SelectorConfig;
use crate::error::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable selector handle for concurrent callers
///
/// Selections take a read lock; outcome recording takes the write lock, so
/// every preference update and history append is applied atomically.
#[derive(Debug, Clone, Default)]
pub struct SharedSelector {
    inner: Arc<RwLock<StrategySelector>>,
}

impl SharedSelector {
    /// Wrap an existing selector
    pub fn new(selector: StrategySelector) -> Self {
        Self {
            inner: Arc::new(RwLock::new(selector)),
        }
    }

    /// Handle around a fresh selector built from `config`
    pub fn with_config(config: SelectorConfig) -> Self {
        Self::new(StrategySelector::with_config(config))
    }

    /// See [`StrategySelector::select_strategy`]
    pub fn select_strategy(
        &self,
        characteristics: &TextCharacteristics,
        requirements: &RequirementSpec,
    ) -> Result<Strategy> {
        self.inner.read().select_strategy(characteristics, requirements)
    }

    /// See [`StrategySelector::record_outcome`]
    pub fn record_outcome(
        &self,
        characteristics: TextCharacteristics,
        strategy: Strategy,
        score: OptimizationScore,
        success: bool,
    ) {
        self.inner
            .write()
            .record_outcome(characteristics, strategy, score, success);
    }

    /// See [`StrategySelector::recommendations`]
    pub fn recommendations(&self, characteristics: &TextCharacteristics) -> Vec<Recommendation> {
        self.inner.read().recommendations(characteristics)
    }

    /// See [`StrategySelector::insights`]
    pub fn insights(&self) -> InsightsReport {
        self.inner.read().insights()
    }

    /// See [`StrategySelector::preference`]
    pub fn preference(&self, name: StrategyName) -> f64 {
        self.inner.read().preference(name)
    }

    /// Outcomes currently retained
    pub fn history_len(&self) -> usize {
        self.inner.read().history_len()
    }

    /// Run `f` with shared access to the selector
    pub fn read<R>(&self, f: impl FnOnce(&StrategySelector) -> R) -> R {
        f(&self.inner.read())
    }

    /// Forget all outcomes and preferences
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}
