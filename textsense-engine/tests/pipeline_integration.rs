//! End-to-end tests of the select → analyze → record → feedback loop

use std::sync::Arc;
use std::thread;
use textsense_core::{
    QualityDistribution, RequirementSpec, SelectorConfig, Strategy, StrategyCatalog, StrategyName,
    TelemetryStore, TextCharacteristics,
};
use textsense_engine::{AnalysisFunction, AnalysisOutput, Analyzer, EngineError, Pipeline};

const ARTICLE: &str = "Distributed tracing links spans across services. Each span records \
                       timing and metadata. Sampling keeps overhead low while preserving \
                       enough detail to debug latency regressions.";

/// Weights that make the score equal to the self-assessed accuracy
fn quality_only() -> RequirementSpec {
    RequirementSpec::default().with_weights(1.0, 0.0, 0.0)
}

#[test]
fn test_every_function_is_recorded() {
    let store = TelemetryStore::new();
    let pipeline = Pipeline::new(store.clone(), SelectorConfig::default()).unwrap();

    for function in AnalysisFunction::ALL {
        let run = pipeline
            .run(ARTICLE, "technical", function, &RequirementSpec::default())
            .unwrap();
        assert_eq!(run.report.function, function);
        assert_eq!(run.strategy.name, StrategyName::Comprehensive);
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.totals.total_calls, AnalysisFunction::ALL.len() as u64);
    assert_eq!(snapshot.totals.total_errors, 0);
    for function in AnalysisFunction::ALL {
        let stats = snapshot.function(function.as_str()).unwrap();
        assert_eq!(stats.call_count, 1);
        assert_eq!(stats.parameter_usage.get("depth"), Some(&1));

        let quality: &QualityDistribution = snapshot.quality_for(function.as_str()).unwrap();
        assert_eq!(quality.count, 1);
        assert_eq!(quality.bucket_total(), 1);
    }
}

#[test]
fn test_successful_feedback_raises_preference() {
    let mut pipeline = Pipeline::new(TelemetryStore::new(), SelectorConfig::default()).unwrap();
    let requirements = quality_only();

    for _ in 0..4 {
        let run = pipeline
            .run(ARTICLE, "news", AnalysisFunction::TextStatistics, &requirements)
            .unwrap();
        assert_eq!(run.strategy.name, StrategyName::Balanced);
        assert!((run.score.overall - 0.95).abs() < 1e-9);
        assert!(pipeline.auto_feedback(&run, &requirements));
    }

    // four successes at 0.95: +2.5 each
    let preference = pipeline.selector().preference(StrategyName::Balanced);
    assert!((preference - 10.0).abs() < 1e-9);
    assert_eq!(pipeline.selector().history_len(), 4);

    let boosted = pipeline
        .run(ARTICLE, "news", AnalysisFunction::TextStatistics, &requirements)
        .unwrap();
    let canonical = Strategy::canonical(StrategyName::Balanced);
    assert!(boosted.strategy.expected_quality > canonical.expected_quality);
    assert!(boosted.strategy.expected_speed < canonical.expected_speed);
}

#[test]
fn test_failed_feedback_lowers_preference() {
    let mut pipeline = Pipeline::new(TelemetryStore::new(), SelectorConfig::default()).unwrap();
    let requirements = quality_only().with_min_quality(0.99);

    let run = pipeline
        .run("Quick note.", "chat", AnalysisFunction::Sentiment, &requirements)
        .unwrap();
    assert!(!pipeline.auto_feedback(&run, &requirements));

    let strategy = run.strategy.name;
    assert_eq!(pipeline.selector().preference(strategy), -5.0);
    assert!(!pipeline.selector().history().next().unwrap().success);
}

#[test]
fn test_recommendations_follow_history() {
    let mut pipeline = Pipeline::new(TelemetryStore::new(), SelectorConfig::default()).unwrap();
    let requirements = quality_only();

    let run = pipeline
        .run(ARTICLE, "news", AnalysisFunction::TextStatistics, &requirements)
        .unwrap();
    pipeline.feedback(&run, true);

    let recommendations = pipeline.selector().recommendations(&run.characteristics);
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].strategy, run.strategy.name);

    let unrelated = TextCharacteristics::new(50_000, "ja", "legal", 0.1);
    assert!(pipeline.selector().recommendations(&unrelated).is_empty());
}

#[test]
fn test_incomplete_catalog_is_rejected_up_front() {
    let mut catalog = StrategyCatalog::default();
    catalog.remove(StrategyName::Fast);
    let config = SelectorConfig::builder().strategies(catalog).build_unchecked();

    let store = TelemetryStore::new();
    let err = Pipeline::new(store.clone(), config).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(textsense_core::CoreError::InvalidConfig { .. })
    ));
    assert!(store.snapshot().is_empty());
}

#[test]
fn test_partial_catalog_from_toml_serves_every_length() {
    let config = SelectorConfig::from_toml_str(
        r#"
[strategies.fast]
name = "fast"
expected_quality = 0.6
expected_speed = 0.99

[strategies.fast.parameters]
depth = 1
quality = 0.6
algorithms = ["basic"]

[strategies.fast.resources]
min_memory_mb = 8
max_memory_mb = 32
estimated_cpu_ms = 20.0
use_network = false
use_caching = false
"#,
    )
    .unwrap();
    let store = TelemetryStore::new();
    let pipeline = Pipeline::new(store.clone(), config).unwrap();

    let short = pipeline
        .run("tiny", "general", AnalysisFunction::Keywords, &RequirementSpec::default())
        .unwrap();
    assert_eq!(short.strategy.name, StrategyName::Fast);
    assert_eq!(short.strategy.resources.max_memory_mb, 32);

    let long = pipeline
        .run(ARTICLE, "general", AnalysisFunction::Keywords, &RequirementSpec::default())
        .unwrap();
    assert_eq!(long.strategy.name, StrategyName::Balanced);
    assert_eq!(store.snapshot().function("keywords").unwrap().error_count, 0);
}

#[test]
fn test_analyzers_share_one_store_across_threads() {
    let store = TelemetryStore::new();
    let analyzer = Arc::new(Analyzer::new(store.clone()).unwrap());
    let strategy = Strategy::canonical(StrategyName::Fast);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let analyzer = Arc::clone(&analyzer);
            let strategy = strategy.clone();
            thread::spawn(move || {
                let texts = vec![ARTICLE; 10];
                analyzer.analyze_batch(&texts, AnalysisFunction::Summarize, &strategy)
            })
        })
        .collect();

    for handle in handles {
        let reports = handle.join().unwrap();
        assert_eq!(reports.len(), 10);
        assert!(reports
            .iter()
            .all(|r| matches!(&r.output, AnalysisOutput::Summary(s) if s.source_sentences == 3)));
    }
    assert_eq!(store.call_count("summarize"), 40);
}
