//! CLI command implementations

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use std::io::{self, Write};
use textsense_core::StrategyCatalog;
use textsense_engine::AnalysisFunction;

use crate::output::OutputFormat;

pub mod analyze;
pub mod generate_config;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze text files with adaptive strategy selection
    Analyze(analyze::AnalyzeArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Write a configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Check a configuration file
    Validate(validate::ValidateArgs),
}

/// List subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ListCommands {
    /// List analysis functions
    Functions,

    /// List the built-in strategy bundles
    Strategies,

    /// List available output formats
    Formats,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Analyze(args) => args.execute(),
            Commands::List { subcommand } => {
                let mut stdout = io::stdout().lock();
                write_listing(*subcommand, &mut stdout)
            }
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
        }
    }
}

/// Print one listing
pub fn write_listing(subcommand: ListCommands, out: &mut impl Write) -> Result<()> {
    match subcommand {
        ListCommands::Functions => {
            writeln!(out, "Available analysis functions:")?;
            for function in AnalysisFunction::ALL {
                writeln!(out, "  {:<18} - {}", function.as_str(), function.description())?;
            }
        }
        ListCommands::Strategies => {
            writeln!(out, "Built-in strategies:")?;
            for strategy in StrategyCatalog::default().iter() {
                writeln!(
                    out,
                    "  {:<14} - depth {}, expected quality {:.2}, expected speed {:.2}, ~{} ms",
                    strategy.name.as_str(),
                    strategy.parameters.depth,
                    strategy.expected_quality,
                    strategy.expected_speed,
                    strategy.resources.estimated_cpu_ms
                )?;
            }
        }
        ListCommands::Formats => {
            writeln!(out, "Available output formats:")?;
            for format in OutputFormat::value_variants() {
                if let Some(value) = format.to_possible_value() {
                    writeln!(
                        out,
                        "  {:<9} - {}",
                        value.get_name(),
                        value.get_help().map(|h| h.to_string()).unwrap_or_default()
                    )?;
                }
            }
        }
    }
    Ok(())
}
