//! textsense CLI library
//!
//! Command-line interface over the adaptive analysis pipeline: resolve
//! inputs, run the requested analysis functions with per-document
//! strategy selection, and report results plus telemetry.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
