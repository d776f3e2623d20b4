//! Output formatting module

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use textsense_core::{GlobalTelemetry, InsightsReport};
use textsense_engine::{AnalysisOutput, AnalysisRun};

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// One JSON document with every run and the telemetry snapshot
    Json,
    /// Markdown sections and tables
    Markdown,
}

/// Every run performed on one input file
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// Input path as given
    pub path: String,
    /// Runs in the order the functions were requested
    pub runs: Vec<AnalysisRun>,
}

/// Closing section printed after all documents
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Documents analyzed
    #[serde(rename = "documents_analyzed")]
    pub documents: usize,
    /// Telemetry snapshot, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<GlobalTelemetry>,
    /// Selector insights, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<InsightsReport>,
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Emit the results for one document
    fn format_document(&mut self, document: &DocumentReport) -> Result<()>;

    /// Emit the summary and flush
    fn finish(&mut self, summary: &RunSummary) -> Result<()>;
}

/// Build the formatter for `format` writing into `writer`
pub fn create_formatter<'a>(
    format: OutputFormat,
    writer: Box<dyn Write + 'a>,
    pretty_json: bool,
) -> Box<dyn OutputFormatter + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty_json)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
    }
}

const PREVIEW_ITEMS: usize = 5;

/// Short human-readable lines describing an analysis output
pub fn describe_output(output: &AnalysisOutput) -> Vec<String> {
    match output {
        AnalysisOutput::Sentences(sentences) => {
            let mut lines = vec![format!("{} sentences", sentences.len())];
            lines.extend(sentences.iter().take(PREVIEW_ITEMS).map(|s| s.text.clone()));
            if sentences.len() > PREVIEW_ITEMS {
                lines.push(format!("... {} more", sentences.len() - PREVIEW_ITEMS));
            }
            lines
        }
        AnalysisOutput::Statistics(stats) => vec![format!(
            "{} chars, {} words ({} unique), {} sentences, {} paragraphs; \
             mean word {:.2} chars, mean sentence {:.2} words, diversity {:.2}",
            stats.chars,
            stats.words,
            stats.unique_words,
            stats.sentences,
            stats.paragraphs,
            stats.mean_word_length,
            stats.mean_sentence_length,
            stats.lexical_diversity
        )],
        AnalysisOutput::Readability(r) => {
            let mut line = format!(
                "Flesch reading ease {:.1}, Flesch-Kincaid grade {:.1}",
                r.flesch_reading_ease, r.flesch_kincaid_grade
            );
            if let Some(fog) = r.gunning_fog {
                line.push_str(&format!(", Gunning fog {fog:.1}"));
            }
            if let Some(smog) = r.smog_index {
                line.push_str(&format!(", SMOG {smog:.1}"));
            }
            vec![line]
        }
        AnalysisOutput::Sentiment(s) => vec![format!(
            "{:?} ({:+.3}); {} positive, {} negative terms",
            s.label, s.score, s.positive_terms, s.negative_terms
        )],
        AnalysisOutput::Keywords(keywords) => {
            if keywords.is_empty() {
                return vec!["no keywords".to_string()];
            }
            vec![keywords
                .iter()
                .map(|k| format!("{} ({})", k.term, k.count))
                .collect::<Vec<_>>()
                .join(", ")]
        }
        AnalysisOutput::Summary(summary) => {
            let mut lines = vec![format!(
                "{} of {} sentences",
                summary.sentences.len(),
                summary.source_sentences
            )];
            lines.extend(summary.sentences.iter().cloned());
            lines
        }
        AnalysisOutput::Language(guess) => {
            vec![format!("{} (confidence {:.2})", guess.code, guess.confidence)]
        }
        AnalysisOutput::Entities(entities) => {
            if entities.is_empty() {
                return vec!["no entities".to_string()];
            }
            entities
                .iter()
                .map(|e| format!("{:?}: {}", e.kind, e.text))
                .collect()
        }
    }
}

/// One-line header for a run: strategy, cost, quality, score
pub fn describe_run(run: &AnalysisRun) -> String {
    format!(
        "strategy={} depth={} elapsed={:.3}ms steps={} accuracy={:.2} score={:.2}",
        run.strategy.name,
        run.strategy.parameters.depth,
        run.report.cost.elapsed_ms(),
        run.report.cost.steps,
        run.report.quality.accuracy,
        run.score.overall
    )
}
