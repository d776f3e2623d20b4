//! Adaptive analysis pipeline
//!
//! One run characterizes the text, asks the selector for a strategy, runs
//! the analyzer under a cost probe, records telemetry and scores the
//! result. Feeding the score back through [`Pipeline::feedback`] closes
//! the loop: the selector's preferences drift toward what worked.

use crate::analyzers::{AnalysisFunction, AnalysisReport, Analyzer};
use crate::characterize::characterize;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use textsense_core::telemetry::CallParams;
use textsense_core::{
    CostRecord, OptimizationScore, RequirementSpec, SelectorConfig, Strategy, StrategySelector,
    TelemetryStore, TextCharacteristics,
};

/// Everything one adaptive run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRun {
    /// What the input looked like
    pub characteristics: TextCharacteristics,
    /// Strategy the selector chose
    pub strategy: Strategy,
    /// Analyzer output, cost and quality
    pub report: AnalysisReport,
    /// Weighted score of the run
    pub score: OptimizationScore,
}

/// Selector plus analyzer sharing one telemetry store
#[derive(Debug)]
pub struct Pipeline {
    analyzer: Analyzer,
    selector: StrategySelector,
}

impl Pipeline {
    /// Create a pipeline recording into `telemetry`
    pub fn new(telemetry: TelemetryStore, config: SelectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            analyzer: Analyzer::new(telemetry)?,
            selector: StrategySelector::with_config(config),
        })
    }

    /// The analyzer
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// The selector and its history
    pub fn selector(&self) -> &StrategySelector {
        &self.selector
    }

    /// The shared telemetry store
    pub fn telemetry(&self) -> &TelemetryStore {
        self.analyzer.telemetry()
    }

    /// Characterize, select, analyze and score one text
    pub fn run(
        &self,
        text: &str,
        domain: &str,
        function: AnalysisFunction,
        requirements: &RequirementSpec,
    ) -> Result<AnalysisRun> {
        validate_requirements(requirements)?;

        let characteristics = characterize(text, domain);
        let strategy = match self
            .selector
            .select_strategy(&characteristics, requirements)
        {
            Ok(strategy) => strategy,
            Err(err) => {
                let params = CallParams::new()
                    .with("domain", domain)
                    .with("chars", text.chars().count());
                self.telemetry()
                    .record_failure(function.as_str(), &params, &CostRecord::default());
                tracing::warn!(function = function.as_str(), error = %err, "strategy selection failed");
                return Err(err.into());
            }
        };

        let report = self.analyzer.analyze(text, function, &strategy);
        let score = score_run(&report, &strategy, requirements);

        tracing::debug!(
            function = function.as_str(),
            strategy = %strategy.name,
            elapsed_ms = report.cost.elapsed_ms(),
            accuracy = report.quality.accuracy,
            overall = score.overall,
            "analysis run"
        );

        Ok(AnalysisRun {
            characteristics,
            strategy,
            report,
            score,
        })
    }

    /// Report whether a run met the caller's expectations
    pub fn feedback(&mut self, run: &AnalysisRun, success: bool) {
        self.selector.record_outcome(
            run.characteristics.clone(),
            run.strategy.clone(),
            run.score,
            success,
        );
    }

    /// Judge a run against `requirements` and feed the verdict back
    ///
    /// A run succeeds when its accuracy reaches `min_quality` and it
    /// finished inside the time budget, if there is one.
    pub fn auto_feedback(&mut self, run: &AnalysisRun, requirements: &RequirementSpec) -> bool {
        let success = meets_requirements(run, requirements);
        self.feedback(run, success);
        success
    }
}

/// Whether a run satisfied the quality floor and the time budget
pub fn meets_requirements(run: &AnalysisRun, requirements: &RequirementSpec) -> bool {
    let quality_ok = run.report.quality.accuracy >= requirements.min_quality;
    let time_ok = !requirements.has_time_budget()
        || run.report.cost.elapsed_ms() <= requirements.max_time_ms as f64;
    quality_ok && time_ok
}

/// Score a report against the caller's budgets, or the strategy's
/// resource envelope when the caller set none
pub fn score_run(
    report: &AnalysisReport,
    strategy: &Strategy,
    requirements: &RequirementSpec,
) -> OptimizationScore {
    let time_budget_ms = if requirements.has_time_budget() {
        requirements.max_time_ms as f64
    } else {
        strategy.resources.estimated_cpu_ms
    };
    let memory_budget_mb = if requirements.has_memory_budget() {
        requirements.max_memory_mb as f64
    } else {
        strategy.resources.max_memory_mb as f64
    };

    let speed = headroom(report.cost.elapsed_ms(), time_budget_ms);
    let memory = headroom(report.cost.peak_memory_mb(), memory_budget_mb);
    OptimizationScore::weighted(report.quality.accuracy, speed, memory, requirements)
}

/// Unused share of a budget; no budget means full headroom
fn headroom(used: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        (1.0 - used / budget).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn validate_requirements(requirements: &RequirementSpec) -> Result<()> {
    if !(0.0..=1.0).contains(&requirements.min_quality) {
        return Err(EngineError::InvalidInput {
            reason: format!(
                "min_quality must be within [0, 1], got {}",
                requirements.min_quality
            ),
        });
    }
    for (label, weight) in [
        ("quality_weight", requirements.quality_weight),
        ("speed_weight", requirements.speed_weight),
        ("memory_weight", requirements.memory_weight),
    ] {
        if !weight.is_finite() || weight < 0.0 {
            return Err(EngineError::InvalidInput {
                reason: format!("{label} must be a non-negative number, got {weight}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use textsense_core::{QualityRecord, StrategyName};

    fn pipeline() -> Pipeline {
        Pipeline::new(TelemetryStore::new(), SelectorConfig::default()).unwrap()
    }

    #[test]
    fn test_selection_failure_is_recorded() {
        let mut catalog = textsense_core::StrategyCatalog::default();
        catalog.remove(StrategyName::Fast);
        let store = TelemetryStore::new();
        let pipeline = Pipeline {
            analyzer: Analyzer::new(store.clone()).unwrap(),
            selector: StrategySelector::with_config(
                SelectorConfig::builder().strategies(catalog).build_unchecked(),
            ),
        };

        let err = pipeline
            .run("tiny", "general", AnalysisFunction::Keywords, &RequirementSpec::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Core(_)));

        let snapshot = store.snapshot();
        let stats = snapshot.function("keywords").unwrap();
        assert_eq!(stats.call_count, 1);
        assert_eq!(stats.error_count, 1);
        assert!(snapshot.quality_for("keywords").is_none());
    }

    #[test]
    fn test_short_text_runs_fast() {
        let pipeline = pipeline();
        let run = pipeline
            .run(
                "Short note.",
                "general",
                AnalysisFunction::Keywords,
                &RequirementSpec::default(),
            )
            .unwrap();
        assert_eq!(run.strategy.name, StrategyName::Fast);
        assert_eq!(run.characteristics.length, Some(11));
        assert_eq!(pipeline.telemetry().call_count("keywords"), 1);
        assert!((0.0..=1.0).contains(&run.score.overall));
    }

    #[test]
    fn test_rejects_bad_requirements() {
        let pipeline = pipeline();
        let req = RequirementSpec::default().with_min_quality(1.5);
        let err = pipeline
            .run("text", "general", AnalysisFunction::Sentiment, &req)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));

        let req = RequirementSpec::default().with_weights(f64::NAN, 0.3, 0.2);
        assert!(pipeline
            .run("text", "general", AnalysisFunction::Sentiment, &req)
            .is_err());
        assert!(pipeline.telemetry().snapshot().is_empty());
    }

    #[test]
    fn test_headroom() {
        assert_eq!(headroom(5.0, 10.0), 0.5);
        assert_eq!(headroom(20.0, 10.0), 0.0);
        assert_eq!(headroom(20.0, 0.0), 1.0);
    }

    #[test]
    fn test_meets_requirements() {
        let pipeline = pipeline();
        let mut run = pipeline
            .run("Fine.", "general", AnalysisFunction::Sentiment, &RequirementSpec::default())
            .unwrap();
        run.report.quality = QualityRecord::new(0.8, 0.5, 0.5);
        run.report.cost = CostRecord::from_elapsed(Duration::from_millis(40));

        assert!(meets_requirements(&run, &RequirementSpec::default().with_min_quality(0.8)));
        assert!(!meets_requirements(&run, &RequirementSpec::default().with_min_quality(0.81)));
        assert!(!meets_requirements(&run, &RequirementSpec::default().with_max_time_ms(10)));
        assert!(meets_requirements(&run, &RequirementSpec::default().with_max_time_ms(50)));
    }

    #[test]
    fn test_score_uses_caller_budget() {
        let pipeline = pipeline();
        let mut run = pipeline
            .run("Fine.", "general", AnalysisFunction::Sentiment, &RequirementSpec::default())
            .unwrap();
        run.report.cost = CostRecord::from_elapsed(Duration::from_millis(25));
        run.report.quality = QualityRecord::new(1.0, 1.0, 1.0);

        let req = RequirementSpec::default()
            .with_max_time_ms(100)
            .with_weights(0.0, 1.0, 0.0);
        let score = score_run(&run.report, &run.strategy, &req);
        assert!((score.speed - 0.75).abs() < 1e-9);
        assert!((score.overall - 0.75).abs() < 1e-9);
        assert_eq!(score.quality, 1.0);
    }
}
