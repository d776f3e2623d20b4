//! Engine error types

use textsense_core::CoreError;
use thiserror::Error;

/// Errors raised by the analyzers and the adaptive pipeline
#[derive(Error, Debug)]
pub enum EngineError {
    /// Selection or configuration error from the core
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// No analysis function has this name
    #[error("unknown analysis function '{0}'")]
    UnknownFunction(String),

    /// Caller-supplied values are unusable
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected
        reason: String,
    },

    /// A built-in extraction pattern failed to compile
    #[error("pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
