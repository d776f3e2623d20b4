//! Instrumented text analyzers and the adaptive analysis pipeline
//!
//! This crate provides the analysis functions whose cost and quality the
//! core measures, input characterization for strategy selection, and the
//! [`Pipeline`] that ties selection, analysis, telemetry and outcome
//! feedback together.
//!
//! # Example
//!
//! ```
//! use textsense_engine::{AnalysisFunction, Pipeline};
//! use textsense_core::{RequirementSpec, SelectorConfig, TelemetryStore};
//!
//! let store = TelemetryStore::new();
//! let mut pipeline = Pipeline::new(store.clone(), SelectorConfig::default())?;
//! let requirements = RequirementSpec::default().with_min_quality(0.5);
//!
//! let run = pipeline.run(
//!     "Rust makes telemetry cheap. Telemetry makes tuning possible.",
//!     "technical",
//!     AnalysisFunction::Keywords,
//!     &requirements,
//! )?;
//! pipeline.auto_feedback(&run, &requirements);
//!
//! assert_eq!(store.call_count("keywords"), 1);
//! assert_eq!(pipeline.selector().history_len(), 1);
//! # Ok::<(), textsense_engine::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod analyzers;
pub mod batch;
pub mod characterize;
pub mod error;
pub mod lexicon;
pub mod pipeline;
pub mod tokenize;

// Re-export key types
pub use analyzers::{
    AnalysisFunction, AnalysisOutput, AnalysisReport, Analyzer, Entity, EntityKind, Keyword,
    LanguageGuess, Readability, Sentence, Sentiment, SentimentLabel, Summary, TextStatistics,
};
pub use batch::ExecutionMode;
pub use characterize::{characterize, detect_structure};
pub use error::{EngineError, Result};
pub use pipeline::{AnalysisRun, Pipeline};

// Re-export from core for convenience
pub use textsense_core::{
    RequirementSpec, SelectorConfig, Strategy, StrategyName, TelemetryStore, TextCharacteristics,
};
