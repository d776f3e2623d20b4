//! Configuration module

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use textsense_core::{RequirementSpec, SelectorConfig};
use textsense_engine::AnalysisFunction;

/// CLI configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    /// Analysis defaults
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Requirement defaults, overridden by command-line flags
    #[serde(default)]
    pub requirements: RequirementSpec,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Strategy selector settings and bundle overrides
    #[serde(default)]
    pub selector: SelectorConfig,
}

/// Analysis-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Domain tag when `--domain` is not given
    pub domain: String,

    /// Functions to run when `-F` is not given; empty means all
    pub functions: Vec<String>,

    /// Feed every run's verdict back into the selector
    pub feedback: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            domain: "general".to_string(),
            functions: Vec::new(),
            feedback: true,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: String,

    /// Append the telemetry summary
    pub include_telemetry: bool,

    /// Append what the selector learned
    pub include_insights: bool,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            include_telemetry: true,
            include_insights: false,
            pretty_json: true,
        }
    }
}

impl OutputConfig {
    /// The configured default format
    pub fn format(&self) -> Result<OutputFormat, CliError> {
        OutputFormat::from_str(&self.default_format, true).map_err(|_| {
            CliError::ConfigError(format!(
                "unknown output format '{}'",
                self.default_format
            ))
        })
    }
}

impl CliConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CliConfig = toml::from_str(content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), CliError> {
        self.selector
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        self.output.format()?;
        self.functions()?;

        if !(0.0..=1.0).contains(&self.requirements.min_quality) {
            return Err(CliError::ConfigError(format!(
                "requirements.min_quality must be within [0, 1], got {}",
                self.requirements.min_quality
            )));
        }
        Ok(())
    }

    /// Configured default functions; all of them when none are listed
    pub fn functions(&self) -> Result<Vec<AnalysisFunction>, CliError> {
        if self.analysis.functions.is_empty() {
            return Ok(AnalysisFunction::ALL.to_vec());
        }
        self.analysis
            .functions
            .iter()
            .map(|name| {
                name.parse::<AnalysisFunction>()
                    .map_err(|e| CliError::ConfigError(e.to_string()))
            })
            .collect()
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Commented template holding every default
    pub fn template() -> Result<String> {
        let body = CliConfig::default().to_toml_string()?;
        let functions = AnalysisFunction::ALL
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!(
            "# textsense configuration\n\
             #\n\
             # [analysis]      defaults for `textsense analyze`\n\
             #   functions:    any of {functions}; empty runs all\n\
             # [requirements]  min_quality in [0, 1]; max_time_ms / max_memory_mb of 0 mean unbounded\n\
             # [output]        default_format is text, json or markdown\n\
             # [selector]      history size, similarity threshold, preference decay/clamp\n\
             #   [selector.strategies.*] override the fast, balanced and comprehensive bundles\n\
             \n{body}"
        ))
    }
}
