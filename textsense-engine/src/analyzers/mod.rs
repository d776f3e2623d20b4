//! Instrumented text analyzers
//!
//! Every analyzer is a pure function of the text and the strategy
//! parameters. It reports its own work (steps, cache hits, checkpoints)
//! into a [`CostProbe`] and returns a self-assessed [`QualityRecord`]
//! next to its output. [`Analyzer`] wraps them with telemetry recording.

pub mod entities;
pub mod keywords;
pub mod language;
pub mod readability;
pub mod segment;
pub mod sentiment;
pub mod statistics;
pub mod summarize;

use crate::batch::{self, ExecutionMode};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use textsense_core::strategy::StrategyParameters;
use textsense_core::{CostProbe, CostRecord, QualityRecord, Strategy, StrategyName, TelemetryStore};

pub use entities::{Entity, EntityExtractor, EntityKind};
pub use keywords::Keyword;
pub use language::LanguageGuess;
pub use readability::Readability;
pub use segment::Sentence;
pub use sentiment::{Sentiment, SentimentLabel};
pub use statistics::TextStatistics;
pub use summarize::Summary;

/// The analysis functions the engine can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisFunction {
    /// Split text into sentences
    SegmentSentences,
    /// Character, word and sentence counts
    TextStatistics,
    /// Readability formulas
    Readability,
    /// Lexicon sentiment
    Sentiment,
    /// Term-frequency keywords
    Keywords,
    /// Extractive summary
    Summarize,
    /// Language identification
    DetectLanguage,
    /// Emails, URLs, numbers, dates and names
    ExtractEntities,
}

impl AnalysisFunction {
    /// Every function, in listing order
    pub const ALL: [AnalysisFunction; 8] = [
        AnalysisFunction::SegmentSentences,
        AnalysisFunction::TextStatistics,
        AnalysisFunction::Readability,
        AnalysisFunction::Sentiment,
        AnalysisFunction::Keywords,
        AnalysisFunction::Summarize,
        AnalysisFunction::DetectLanguage,
        AnalysisFunction::ExtractEntities,
    ];

    /// Name used in telemetry and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisFunction::SegmentSentences => "segment_sentences",
            AnalysisFunction::TextStatistics => "text_statistics",
            AnalysisFunction::Readability => "readability",
            AnalysisFunction::Sentiment => "sentiment",
            AnalysisFunction::Keywords => "keywords",
            AnalysisFunction::Summarize => "summarize",
            AnalysisFunction::DetectLanguage => "detect_language",
            AnalysisFunction::ExtractEntities => "extract_entities",
        }
    }

    /// One-line description for listings
    pub fn description(&self) -> &'static str {
        match self {
            AnalysisFunction::SegmentSentences => "Split text into sentences",
            AnalysisFunction::TextStatistics => "Count characters, words, sentences and paragraphs",
            AnalysisFunction::Readability => "Flesch scores; Gunning fog and SMOG at depth 3+",
            AnalysisFunction::Sentiment => "Lexicon polarity with negation and intensifiers",
            AnalysisFunction::Keywords => "Stopword-filtered term frequency",
            AnalysisFunction::Summarize => "Extract the densest sentences",
            AnalysisFunction::DetectLanguage => "Identify the language by script and stopwords",
            AnalysisFunction::ExtractEntities => "Find emails, URLs, numbers, dates and names",
        }
    }
}

impl fmt::Display for AnalysisFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisFunction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        AnalysisFunction::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| EngineError::UnknownFunction(s.to_string()))
    }
}

/// Output of one analysis function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum AnalysisOutput {
    /// From [`AnalysisFunction::SegmentSentences`]
    Sentences(Vec<Sentence>),
    /// From [`AnalysisFunction::TextStatistics`]
    Statistics(TextStatistics),
    /// From [`AnalysisFunction::Readability`]
    Readability(Readability),
    /// From [`AnalysisFunction::Sentiment`]
    Sentiment(Sentiment),
    /// From [`AnalysisFunction::Keywords`]
    Keywords(Vec<Keyword>),
    /// From [`AnalysisFunction::Summarize`]
    Summary(Summary),
    /// From [`AnalysisFunction::DetectLanguage`]
    Language(LanguageGuess),
    /// From [`AnalysisFunction::ExtractEntities`]
    Entities(Vec<Entity>),
}

/// Result of one instrumented call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Function that ran
    pub function: AnalysisFunction,
    /// Strategy bundle the call ran under
    pub strategy: StrategyName,
    /// Function output
    pub output: AnalysisOutput,
    /// Measured cost
    pub cost: CostRecord,
    /// Self-assessed quality
    pub quality: QualityRecord,
}

/// Runs analyzers and records every call into a telemetry store
#[derive(Debug, Clone)]
pub struct Analyzer {
    telemetry: TelemetryStore,
    entities: EntityExtractor,
}

impl Analyzer {
    /// Create an analyzer that records into `telemetry`
    pub fn new(telemetry: TelemetryStore) -> Result<Self> {
        Ok(Self {
            telemetry,
            entities: EntityExtractor::new()?,
        })
    }

    /// Store every call is recorded into
    pub fn telemetry(&self) -> &TelemetryStore {
        &self.telemetry
    }

    /// Run one function under `strategy` and record it
    pub fn analyze(
        &self,
        text: &str,
        function: AnalysisFunction,
        strategy: &Strategy,
    ) -> AnalysisReport {
        self.analyze_with_probe(text, function, strategy, CostProbe::start())
    }

    /// Like [`Analyzer::analyze`], measured by a caller-supplied probe
    pub fn analyze_with_probe(
        &self,
        text: &str,
        function: AnalysisFunction,
        strategy: &Strategy,
        probe: CostProbe,
    ) -> AnalysisReport {
        let (output, quality) = self.dispatch(text, function, &strategy.parameters, &probe);
        let cost = probe.finalize();

        let params = strategy
            .call_params()
            .with("chars", text.chars().count());
        self.telemetry
            .record(function.as_str(), &params, &cost, Some(quality));

        AnalysisReport {
            function,
            strategy: strategy.name,
            output,
            cost,
            quality,
        }
    }

    fn dispatch(
        &self,
        text: &str,
        function: AnalysisFunction,
        params: &StrategyParameters,
        probe: &CostProbe,
    ) -> (AnalysisOutput, QualityRecord) {
        match function {
            AnalysisFunction::SegmentSentences => {
                let (out, q) = segment::segment_sentences(text, params, probe);
                (AnalysisOutput::Sentences(out), q)
            }
            AnalysisFunction::TextStatistics => {
                let (out, q) = statistics::text_statistics(text, params, probe);
                (AnalysisOutput::Statistics(out), q)
            }
            AnalysisFunction::Readability => {
                let (out, q) = readability::readability(text, params, probe);
                (AnalysisOutput::Readability(out), q)
            }
            AnalysisFunction::Sentiment => {
                let (out, q) = sentiment::sentiment(text, params, probe);
                (AnalysisOutput::Sentiment(out), q)
            }
            AnalysisFunction::Keywords => {
                let (out, q) = keywords::keywords(text, params, probe);
                (AnalysisOutput::Keywords(out), q)
            }
            AnalysisFunction::Summarize => {
                let (out, q) = summarize::summarize(text, params, probe);
                (AnalysisOutput::Summary(out), q)
            }
            AnalysisFunction::DetectLanguage => {
                let (out, q) = language::detect_language(text, params, probe);
                (AnalysisOutput::Language(out), q)
            }
            AnalysisFunction::ExtractEntities => {
                let (out, q) = self.entities.extract(text, params, probe);
                (AnalysisOutput::Entities(out), q)
            }
        }
    }

    /// Run one function over many documents
    ///
    /// Reports come back in input order. Every document is recorded into
    /// the shared store.
    pub fn analyze_batch<T>(
        &self,
        texts: &[T],
        function: AnalysisFunction,
        strategy: &Strategy,
    ) -> Vec<AnalysisReport>
    where
        T: AsRef<str> + Sync,
    {
        let mode = batch::auto_select(texts.len());
        tracing::debug!(
            function = function.as_str(),
            documents = texts.len(),
            mode = ?mode,
            "batch analysis"
        );

        match mode {
            #[cfg(feature = "parallel")]
            ExecutionMode::Parallel => {
                use rayon::prelude::*;
                texts
                    .par_iter()
                    .map(|text| self.analyze(text.as_ref(), function, strategy))
                    .collect()
            }
            _ => texts
                .iter()
                .map(|text| self.analyze(text.as_ref(), function, strategy))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names_round_trip() {
        for function in AnalysisFunction::ALL {
            assert_eq!(function.as_str().parse::<AnalysisFunction>().unwrap(), function);
        }
        assert_eq!(
            "Detect-Language".parse::<AnalysisFunction>().unwrap(),
            AnalysisFunction::DetectLanguage
        );
        assert!(matches!(
            "translate".parse::<AnalysisFunction>(),
            Err(EngineError::UnknownFunction(name)) if name == "translate"
        ));
    }

    #[test]
    fn test_analyze_records_telemetry() {
        let store = TelemetryStore::new();
        let analyzer = Analyzer::new(store.clone()).unwrap();
        let strategy = Strategy::canonical(StrategyName::Balanced);

        let report = analyzer.analyze("Good work. Very good work!", AnalysisFunction::Sentiment, &strategy);
        assert!(matches!(report.output, AnalysisOutput::Sentiment(_)));
        assert_eq!(report.strategy, StrategyName::Balanced);

        let snapshot = store.snapshot();
        let stats = snapshot.function("sentiment").unwrap();
        assert_eq!(stats.call_count, 1);
        assert_eq!(stats.total_steps, report.cost.steps);
        assert_eq!(stats.parameter_usage.get("chars"), Some(&1));
        assert_eq!(stats.parameter_usage.get("strategy"), Some(&1));
        assert_eq!(snapshot.quality_for("sentiment").unwrap().count, 1);
    }

    #[test]
    fn test_every_function_runs_on_empty_text() {
        let analyzer = Analyzer::new(TelemetryStore::new()).unwrap();
        let strategy = Strategy::canonical(StrategyName::Comprehensive);
        for function in AnalysisFunction::ALL {
            let report = analyzer.analyze("", function, &strategy);
            assert_eq!(report.function, function);
            assert!(!report.quality.is_out_of_range());
        }
        assert_eq!(analyzer.telemetry().snapshot().totals.total_calls, 8);
    }

    #[test]
    fn test_batch_preserves_order() {
        let store = TelemetryStore::new();
        let analyzer = Analyzer::new(store.clone()).unwrap();
        let strategy = Strategy::canonical(StrategyName::Fast);
        let texts: Vec<String> = (1..=12).map(|n| "word ".repeat(n)).collect();

        let reports = analyzer.analyze_batch(&texts, AnalysisFunction::TextStatistics, &strategy);
        assert_eq!(reports.len(), 12);
        for (n, report) in (1..=12).zip(&reports) {
            match &report.output {
                AnalysisOutput::Statistics(stats) => assert_eq!(stats.words, n),
                other => panic!("unexpected output {other:?}"),
            }
        }
        assert_eq!(store.call_count("text_statistics"), 12);
    }

    #[test]
    fn test_output_serializes_with_kind_tag() {
        let analyzer = Analyzer::new(TelemetryStore::new()).unwrap();
        let strategy = Strategy::canonical(StrategyName::Fast);
        let report = analyzer.analyze("Hello there.", AnalysisFunction::DetectLanguage, &strategy);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["function"], "detect_language");
        assert_eq!(json["output"]["kind"], "language");
        assert_eq!(json["strategy"], "fast");
    }
}
