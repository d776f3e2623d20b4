//! Configuration for the strategy selector
//!
//! Thresholds that define the selection heuristic are compiled-in
//! constants in [`defaults`]. The knobs that shape learning (history size,
//! similarity cut-off, preference policy) and the strategy bundles
//! themselves live in [`SelectorConfig`], which can be built in code or
//! loaded from TOML.

use crate::error::{CoreError, Result};
use crate::strategy::{PreferencePolicy, StrategyCatalog};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Compiled-in constants
pub mod defaults {
    /// Outcomes retained before FIFO eviction
    pub const HISTORY_CAPACITY: usize = 1000;

    /// Similarity above which a past outcome counts as comparable
    pub const SIMILARITY_THRESHOLD: f64 = 0.7;

    /// Buckets in each accuracy histogram
    pub const QUALITY_BUCKETS: usize = 6;

    /// Texts shorter than this (in chars) use the fast strategy
    pub const SHORT_TEXT_CHARS: usize = 100;

    /// Texts longer than this (in chars) use the comprehensive strategy
    pub const LONG_TEXT_CHARS: usize = 10_000;

    /// Complexity above which the comprehensive strategy is used
    pub const HIGH_COMPLEXITY: f64 = 0.8;

    /// Shallowest processing depth
    pub const MIN_DEPTH: u8 = 1;

    /// Deepest processing depth
    pub const MAX_DEPTH: u8 = 5;

    /// Ceiling on expected quality after a requirement-driven upgrade
    pub const EXPECTED_QUALITY_CAP: f64 = 0.95;

    /// Expected-quality bump applied with a depth upgrade
    pub const QUALITY_UPGRADE_STEP: f64 = 0.1;

    /// Sub-algorithms kept when a time budget forces a downgrade
    pub const TIME_LIMITED_ALGORITHMS: usize = 2;

    /// Score above which a successful outcome raises a preference
    pub const SUCCESS_PIVOT: f64 = 0.7;

    /// Multiplier on `score - pivot` for strategy preferences
    pub const SUCCESS_GAIN: f64 = 10.0;

    /// Penalty on a strategy preference for a failed outcome
    pub const FAILURE_PENALTY: f64 = 5.0;

    /// Multiplier on `score - pivot` for domain preferences
    pub const DOMAIN_SUCCESS_GAIN: f64 = 5.0;

    /// Penalty on a domain preference for a failed outcome
    pub const DOMAIN_FAILURE_PENALTY: f64 = 2.0;

    /// Preference value that doubles expected quality (factor = pref / scale)
    pub const PREFERENCE_SCALE: f64 = 100.0;

    /// Similar outcomes needed for full recommendation confidence
    pub const RECOMMENDATION_SATURATION: f64 = 10.0;

    /// Score change treated as noise when classifying a trend
    pub const TREND_DEAD_BAND: f64 = 0.05;

    /// Outcomes needed before a trend is reported
    pub const TREND_MIN_SAMPLES: usize = 4;
}

/// Tunable selector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Outcomes kept in history
    pub history_capacity: usize,
    /// Similarity cut-off for recommendations
    pub similarity_threshold: f64,
    /// How learned preferences decay and are bounded
    pub preference: PreferencePolicy,
    /// Strategy bundles available to the selector
    pub strategies: StrategyCatalog,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            history_capacity: defaults::HISTORY_CAPACITY,
            similarity_threshold: defaults::SIMILARITY_THRESHOLD,
            preference: PreferencePolicy::default(),
            strategies: StrategyCatalog::default(),
        }
    }
}

impl SelectorConfig {
    /// Creates a new builder for SelectorConfig
    pub fn builder() -> SelectorConfigBuilder {
        SelectorConfigBuilder::new()
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "history_capacity must be greater than 0".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(CoreError::InvalidConfig {
                reason: format!(
                    "similarity_threshold must be within [0, 1], got {}",
                    self.similarity_threshold
                ),
            });
        }

        self.preference.validate()?;
        self.strategies.validate()?;
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SelectorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Builder for SelectorConfig with fluent API
#[derive(Debug, Clone, Default)]
pub struct SelectorConfigBuilder {
    config: SelectorConfig,
}

impl SelectorConfigBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the outcome history capacity
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Sets the similarity threshold
    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Sets the preference policy
    pub fn preference(mut self, policy: PreferencePolicy) -> Self {
        self.config.preference = policy;
        self
    }

    /// Replaces the strategy catalog
    pub fn strategies(mut self, catalog: StrategyCatalog) -> Self {
        self.config.strategies = catalog;
        self
    }

    /// Builds the configuration, validating parameters
    pub fn build(self) -> Result<SelectorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Builds the configuration without validation (for testing)
    pub fn build_unchecked(self) -> SelectorConfig {
        self.config
    }
}
