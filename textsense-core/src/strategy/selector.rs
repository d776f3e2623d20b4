//! Strategy selection with outcome feedback

use super::characteristics::{RequirementSpec, TextCharacteristics};
use super::insights::{self, InsightsReport, Recommendation};
use super::outcome::{OptimizationScore, Outcome};
use super::preference::PreferenceTable;
use super::similarity;
use super::types::{Strategy, StrategyName};
use crate::config::{defaults, SelectorConfig};
use crate::error::Result;
use std::collections::VecDeque;

/// Chooses a strategy per input and learns from reported outcomes
///
/// A selector is owned by one caller: selection borrows it immutably and
/// outcome recording needs `&mut self`. Wrap it in
/// [`SharedSelector`](super::SharedSelector) to use it from several
/// threads.
#[derive(Debug, Clone)]
pub struct StrategySelector {
    config: SelectorConfig,
    history: VecDeque<Outcome>,
    preferences: PreferenceTable,
    next_sequence: u64,
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategySelector {
    /// Selector with the default configuration
    pub fn new() -> Self {
        Self::with_config(SelectorConfig::default())
    }

    /// Selector with a custom configuration
    ///
    /// The configuration is used as given; call
    /// [`SelectorConfig::validate`] first when it comes from user input.
    pub fn with_config(config: SelectorConfig) -> Self {
        Self {
            history: VecDeque::with_capacity(config.history_capacity.min(1024)),
            config,
            preferences: PreferenceTable::default(),
            next_sequence: 0,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// The base strategy for an input, before requirements and preferences
    ///
    /// First match wins: short text, then long or complex text, then the
    /// domain override, else balanced.
    pub fn base_strategy(characteristics: &TextCharacteristics) -> StrategyName {
        if characteristics
            .length
            .is_some_and(|len| len < defaults::SHORT_TEXT_CHARS)
        {
            return StrategyName::Fast;
        }

        let long = characteristics
            .length
            .is_some_and(|len| len > defaults::LONG_TEXT_CHARS);
        let complex = characteristics
            .complexity
            .is_some_and(|c| c > defaults::HIGH_COMPLEXITY);
        if long || complex {
            return StrategyName::Comprehensive;
        }

        match characteristics.domain.as_str() {
            "technical" | "academic" => StrategyName::Comprehensive,
            "social-media" | "chat" => StrategyName::Fast,
            _ => StrategyName::Balanced,
        }
    }

    /// Choose and tune a strategy for one input
    pub fn select_strategy(
        &self,
        characteristics: &TextCharacteristics,
        requirements: &RequirementSpec,
    ) -> Result<Strategy> {
        let base = Self::base_strategy(characteristics);
        let mut strategy = self.config.strategies.get(base)?;

        adjust_for_requirements(&mut strategy, requirements);
        self.apply_preference(&mut strategy);

        tracing::debug!(
            base = %base,
            depth = strategy.parameters.depth,
            expected_quality = strategy.expected_quality,
            expected_speed = strategy.expected_speed,
            streaming = strategy.parameters.streaming,
            domain = %characteristics.domain,
            "strategy selected"
        );

        Ok(strategy)
    }

    fn apply_preference(&self, strategy: &mut Strategy) {
        let preference = self.preferences.for_strategy(strategy.name);
        if preference == 0.0 {
            return;
        }
        let factor = preference / defaults::PREFERENCE_SCALE;
        strategy.expected_quality = (strategy.expected_quality * (1.0 + factor)).clamp(0.0, 1.0);
        strategy.expected_speed = (strategy.expected_speed * (1.0 - factor)).clamp(0.0, 1.0);
    }

    /// Report how a selected strategy actually did
    pub fn record_outcome(
        &mut self,
        characteristics: TextCharacteristics,
        strategy: Strategy,
        score: OptimizationScore,
        success: bool,
    ) {
        let policy = self.config.preference;
        let name = strategy.name;

        let (strategy_delta, domain_delta) = if success {
            let margin = score.overall - defaults::SUCCESS_PIVOT;
            (
                margin * defaults::SUCCESS_GAIN,
                margin * defaults::DOMAIN_SUCCESS_GAIN,
            )
        } else {
            (
                -defaults::FAILURE_PENALTY,
                -defaults::DOMAIN_FAILURE_PENALTY,
            )
        };

        self.preferences.decay_all(&policy);
        let strategy_pref =
            self.preferences
                .adjust(PreferenceTable::strategy_key(name), strategy_delta, &policy);
        let domain_pref = self.preferences.adjust(
            PreferenceTable::domain_key(&characteristics.domain, name),
            domain_delta,
            &policy,
        );

        tracing::debug!(
            strategy = %name,
            success,
            score = score.overall,
            strategy_pref,
            domain_pref,
            "outcome recorded"
        );

        self.history.push_back(Outcome {
            sequence: self.next_sequence,
            characteristics,
            strategy,
            score,
            success,
        });
        self.next_sequence += 1;

        while self.history.len() > self.config.history_capacity {
            self.history.pop_front();
        }
    }

    /// Outcomes in recording order, oldest first
    pub fn history(&self) -> impl ExactSizeIterator<Item = &Outcome> {
        self.history.iter()
    }

    /// Outcomes currently retained
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Learned preferences
    pub fn preferences(&self) -> &PreferenceTable {
        &self.preferences
    }

    /// Preference value for a strategy name
    pub fn preference(&self, name: StrategyName) -> f64 {
        self.preferences.for_strategy(name)
    }

    /// Retained outcomes similar to `characteristics`
    pub fn find_similar_outcomes(&self, characteristics: &TextCharacteristics) -> Vec<&Outcome> {
        similarity::find_similar_outcomes(
            &self.history,
            characteristics,
            self.config.similarity_threshold,
        )
    }

    /// Strategies ranked by how they did on similar inputs
    pub fn recommendations(&self, characteristics: &TextCharacteristics) -> Vec<Recommendation> {
        insights::recommend(
            &self.history,
            characteristics,
            self.config.similarity_threshold,
        )
    }

    /// Summary of usage, success and learned preferences
    pub fn insights(&self) -> InsightsReport {
        insights::summarize(&self.history, &self.preferences)
    }

    /// Forget all outcomes and preferences
    pub fn clear(&mut self) {
        self.history.clear();
        self.preferences = PreferenceTable::default();
    }
}

/// Tune a strategy to the caller's quality, time and memory bounds
fn adjust_for_requirements(strategy: &mut Strategy, requirements: &RequirementSpec) {
    let params = &mut strategy.parameters;

    if requirements.min_quality > strategy.expected_quality {
        params.depth = params.depth.saturating_add(1).min(defaults::MAX_DEPTH);
        params.quality = params.quality.max(requirements.min_quality);
        strategy.expected_quality = (strategy.expected_quality + defaults::QUALITY_UPGRADE_STEP)
            .max(requirements.min_quality)
            .min(defaults::EXPECTED_QUALITY_CAP);
    }

    if requirements.has_time_budget()
        && strategy.resources.estimated_cpu_ms > requirements.max_time_ms as f64
    {
        tracing::debug!(
            strategy = %strategy.name,
            estimated_cpu_ms = strategy.resources.estimated_cpu_ms,
            max_time_ms = requirements.max_time_ms,
            "time budget forces downgrade"
        );
        params.depth = params
            .depth
            .saturating_sub(1)
            .max(defaults::MIN_DEPTH);
        params.algorithms.truncate(defaults::TIME_LIMITED_ALGORITHMS);
        strategy.resources.estimated_cpu_ms /= 2.0;
    }

    if requirements.has_memory_budget()
        && strategy.resources.max_memory_mb > requirements.max_memory_mb
    {
        strategy.resources.max_memory_mb = requirements.max_memory_mb;
        strategy.resources.min_memory_mb = strategy
            .resources
            .min_memory_mb
            .min(requirements.max_memory_mb);
        params.streaming = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::strategy::{Algorithm, PreferencePolicy, StrategyCatalog};

    fn chars(length: usize, domain: &str, complexity: f64) -> TextCharacteristics {
        TextCharacteristics::new(length, "en", domain, complexity)
    }

    #[test]
    fn test_base_strategy_thresholds() {
        let cases = [
            (chars(50, "general", 0.5), StrategyName::Fast),
            (chars(50, "technical", 0.95), StrategyName::Fast),
            (chars(20_000, "general", 0.1), StrategyName::Comprehensive),
            (chars(20_000, "chat", 0.1), StrategyName::Comprehensive),
            (chars(2_000, "general", 0.9), StrategyName::Comprehensive),
            (chars(2_000, "technical", 0.5), StrategyName::Comprehensive),
            (chars(2_000, "academic", 0.5), StrategyName::Comprehensive),
            (chars(2_000, "social-media", 0.5), StrategyName::Fast),
            (chars(2_000, "chat", 0.5), StrategyName::Fast),
            (chars(2_000, "general", 0.5), StrategyName::Balanced),
            (chars(100, "general", 0.5), StrategyName::Balanced),
            (chars(10_000, "general", 0.8), StrategyName::Balanced),
        ];

        for (input, expected) in cases {
            assert_eq!(
                StrategySelector::base_strategy(&input),
                expected,
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn test_unknown_length_skips_length_rules() {
        let input = TextCharacteristics::default().with_domain("news");
        assert_eq!(StrategySelector::base_strategy(&input), StrategyName::Balanced);
    }

    #[test]
    fn test_min_quality_raises_depth() {
        let selector = StrategySelector::new();
        let req = RequirementSpec::default().with_min_quality(0.99);
        let strategy = selector.select_strategy(&chars(50, "general", 0.3), &req).unwrap();

        assert_eq!(strategy.name, StrategyName::Fast);
        assert_eq!(strategy.parameters.depth, 2);
        assert!(strategy.parameters.quality >= 0.99);
        assert_eq!(strategy.expected_quality, defaults::EXPECTED_QUALITY_CAP);
    }

    #[test]
    fn test_depth_upgrade_is_capped() {
        let mut catalog = StrategyCatalog::default();
        let mut deep = Strategy::canonical(StrategyName::Comprehensive);
        deep.parameters.depth = defaults::MAX_DEPTH;
        catalog.insert(deep);
        let selector = StrategySelector::with_config(
            SelectorConfig::builder().strategies(catalog).build().unwrap(),
        );

        let req = RequirementSpec::default().with_min_quality(0.99);
        let strategy = selector
            .select_strategy(&chars(20_000, "general", 0.5), &req)
            .unwrap();
        assert_eq!(strategy.parameters.depth, defaults::MAX_DEPTH);
    }

    #[test]
    fn test_time_budget_downgrades() {
        let selector = StrategySelector::new();
        let req = RequirementSpec::default().with_max_time_ms(100);
        let strategy = selector
            .select_strategy(&chars(20_000, "general", 0.5), &req)
            .unwrap();

        assert_eq!(strategy.name, StrategyName::Comprehensive);
        assert_eq!(strategy.parameters.depth, 3);
        assert_eq!(
            strategy.parameters.algorithms.as_slice(),
            &[Algorithm::Basic, Algorithm::Statistical]
        );
        assert_eq!(strategy.resources.estimated_cpu_ms, 750.0);
    }

    #[test]
    fn test_time_budget_never_goes_below_min_depth() {
        let selector = StrategySelector::new();
        let req = RequirementSpec::default().with_max_time_ms(1);
        let strategy = selector.select_strategy(&chars(50, "general", 0.5), &req).unwrap();
        assert_eq!(strategy.parameters.depth, defaults::MIN_DEPTH);
        assert_eq!(strategy.resources.estimated_cpu_ms, 25.0);
    }

    #[test]
    fn test_generous_time_budget_changes_nothing() {
        let selector = StrategySelector::new();
        let req = RequirementSpec::default().with_max_time_ms(10_000);
        let strategy = selector
            .select_strategy(&chars(2_000, "general", 0.5), &req)
            .unwrap();
        assert_eq!(strategy, Strategy::canonical(StrategyName::Balanced));
    }

    #[test]
    fn test_memory_budget_clamps_and_streams() {
        let selector = StrategySelector::new();
        let req = RequirementSpec::default().with_max_memory_mb(128);
        let strategy = selector
            .select_strategy(&chars(20_000, "general", 0.5), &req)
            .unwrap();

        assert_eq!(strategy.resources.max_memory_mb, 128);
        assert_eq!(strategy.resources.min_memory_mb, 128);
        assert!(strategy.parameters.streaming);
    }

    #[test]
    fn test_quality_upgrade_saturates_unvalidated_depth() {
        let mut catalog = StrategyCatalog::default();
        let mut deep = Strategy::canonical(StrategyName::Fast);
        deep.parameters.depth = u8::MAX;
        catalog.insert(deep);
        let selector = StrategySelector::with_config(
            SelectorConfig::builder().strategies(catalog).build_unchecked(),
        );

        let req = RequirementSpec::default().with_min_quality(0.99);
        let strategy = selector.select_strategy(&chars(10, "general", 0.1), &req).unwrap();
        assert_eq!(strategy.parameters.depth, defaults::MAX_DEPTH);
    }

    #[test]
    fn test_missing_catalog_entry_is_error() {
        let mut catalog = StrategyCatalog::default();
        catalog.remove(StrategyName::Fast);
        let config = SelectorConfig::builder().strategies(catalog);
        assert!(config.clone().build().is_err());
        let selector = StrategySelector::with_config(config.build_unchecked());

        let result = selector.select_strategy(&chars(10, "general", 0.1), &RequirementSpec::default());
        assert!(matches!(result, Err(CoreError::InvalidStrategy { .. })));
    }

    #[test]
    fn test_outcome_updates_preferences() {
        let mut selector = StrategySelector::new();
        let input = chars(2_000, "news", 0.5);
        let balanced = Strategy::canonical(StrategyName::Balanced);

        selector.record_outcome(
            input.clone(),
            balanced.clone(),
            OptimizationScore::uniform(0.9),
            true,
        );
        assert!((selector.preference(StrategyName::Balanced) - 2.0).abs() < 1e-9);
        assert!(
            (selector.preferences().for_domain("news", StrategyName::Balanced) - 1.0).abs() < 1e-9
        );

        selector.record_outcome(input, balanced, OptimizationScore::uniform(0.3), false);
        assert!((selector.preference(StrategyName::Balanced) + 3.0).abs() < 1e-9);
        assert!(
            (selector.preferences().for_domain("news", StrategyName::Balanced) + 1.0).abs() < 1e-9
        );
    }

    #[test]
    fn test_success_below_pivot_lowers_preference() {
        let mut selector = StrategySelector::new();
        selector.record_outcome(
            chars(500, "general", 0.2),
            Strategy::canonical(StrategyName::Fast),
            OptimizationScore::uniform(0.5),
            true,
        );
        assert!(selector.preference(StrategyName::Fast) < 0.0);
    }

    #[test]
    fn test_preference_shifts_expectations() {
        let mut selector = StrategySelector::new();
        let input = chars(2_000, "general", 0.5);
        let before = selector
            .select_strategy(&input, &RequirementSpec::default())
            .unwrap();

        for _ in 0..3 {
            selector.record_outcome(
                input.clone(),
                before.clone(),
                OptimizationScore::uniform(1.0),
                true,
            );
        }
        let after = selector
            .select_strategy(&input, &RequirementSpec::default())
            .unwrap();

        assert!(after.expected_quality > before.expected_quality);
        assert!(after.expected_speed < before.expected_speed);
    }

    #[test]
    fn test_large_preference_stays_in_unit_range() {
        let mut selector = StrategySelector::new();
        let input = chars(2_000, "general", 0.5);
        let strategy = Strategy::canonical(StrategyName::Balanced);
        for _ in 0..200 {
            selector.record_outcome(
                input.clone(),
                strategy.clone(),
                OptimizationScore::uniform(0.3),
                false,
            );
        }
        let selected = selector
            .select_strategy(&input, &RequirementSpec::default())
            .unwrap();
        assert!((0.0..=1.0).contains(&selected.expected_quality));
        assert!((0.0..=1.0).contains(&selected.expected_speed));
        assert_eq!(selected.expected_quality, 0.0);
        assert_eq!(selected.expected_speed, 1.0);
    }

    #[test]
    fn test_bounded_policy_limits_drift() {
        let config = SelectorConfig::builder()
            .preference(PreferencePolicy::bounded(12.0))
            .build()
            .unwrap();
        let mut selector = StrategySelector::with_config(config);
        for _ in 0..10 {
            selector.record_outcome(
                chars(2_000, "general", 0.5),
                Strategy::canonical(StrategyName::Balanced),
                OptimizationScore::uniform(0.3),
                false,
            );
        }
        assert_eq!(selector.preference(StrategyName::Balanced), -12.0);
    }

    #[test]
    fn test_history_is_bounded_fifo() {
        let config = SelectorConfig::builder().history_capacity(3).build().unwrap();
        let mut selector = StrategySelector::with_config(config);
        for i in 0..5 {
            selector.record_outcome(
                chars(100 + i, "general", 0.5),
                Strategy::canonical(StrategyName::Balanced),
                OptimizationScore::uniform(0.8),
                true,
            );
        }
        let sequences: Vec<u64> = selector.history().map(|o| o.sequence).collect();
        assert_eq!(sequences, vec![2, 3, 4]);
    }

    #[test]
    fn test_clear() {
        let mut selector = StrategySelector::new();
        selector.record_outcome(
            chars(2_000, "general", 0.5),
            Strategy::canonical(StrategyName::Balanced),
            OptimizationScore::uniform(0.9),
            true,
        );
        selector.clear();
        assert_eq!(selector.history_len(), 0);
        assert!(selector.preferences().is_empty());
    }
}
