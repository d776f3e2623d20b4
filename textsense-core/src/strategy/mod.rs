//! Adaptive strategy selection
//!
//! A [`StrategySelector`] maps [`TextCharacteristics`] and a
//! [`RequirementSpec`] to one of three parameter bundles (fast, balanced,
//! comprehensive), tunes it to the caller's quality, time and memory
//! bounds, and biases it by preferences learned from reported
//! [`Outcome`]s.
//!
//! # Example
//!
//! ```rust
//! use textsense_core::strategy::{
//!     OptimizationScore, RequirementSpec, StrategyName, StrategySelector, TextCharacteristics,
//! };
//!
//! let mut selector = StrategySelector::new();
//! let input = TextCharacteristics::new(2_000, "en", "news", 0.4);
//!
//! let strategy = selector
//!     .select_strategy(&input, &RequirementSpec::default())
//!     .unwrap();
//! assert_eq!(strategy.name, StrategyName::Balanced);
//!
//! selector.record_outcome(input, strategy, OptimizationScore::uniform(0.9), true);
//! assert!(selector.preference(StrategyName::Balanced) > 0.0);
//! ```

pub mod characteristics;
pub mod insights;
pub mod outcome;
pub mod preference;
pub mod selector;
pub mod shared;
pub mod similarity;
pub mod types;

pub use characteristics::{RequirementSpec, TextCharacteristics};
pub use insights::{InsightsReport, Recommendation, ScoreTrend, StrategyInsight};
pub use outcome::{OptimizationScore, Outcome};
pub use preference::{PreferencePolicy, PreferenceTable};
pub use selector::StrategySelector;
pub use shared::SharedSelector;
pub use similarity::{calculate_similarity, find_similar_outcomes};
pub use types::{
    Algorithm, AlgorithmSet, ResourceEnvelope, Strategy, StrategyCatalog, StrategyName,
    StrategyParameters,
};
