//! Analyze command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::resolve_sources;
use crate::output::{create_formatter, DocumentReport, OutputFormat, RunSummary};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use textsense_core::{global_telemetry, RequirementSpec};
use textsense_engine::{AnalysisFunction, Pipeline};

/// Arguments for the analyze command
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Input files or patterns (supports glob, `-` reads stdin)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Analysis function to run; repeat for several (default: all)
    #[arg(short = 'F', long = "function", value_name = "NAME")]
    pub functions: Vec<String>,

    /// Domain tag that steers strategy selection (e.g. technical, chat)
    #[arg(short, long, value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Minimum acceptable quality in [0, 1]
    #[arg(long, value_name = "Q")]
    pub min_quality: Option<f64>,

    /// Time budget per call in milliseconds
    #[arg(long, value_name = "MS")]
    pub max_time_ms: Option<u64>,

    /// Memory budget per call in megabytes
    #[arg(long, value_name = "MB")]
    pub max_memory_mb: Option<u64>,

    /// Output format (default: from config, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "TEXTSENSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Feed every run's verdict back into the selector
    #[arg(long, conflicts_with = "no_feedback")]
    pub feedback: bool,

    /// Do not feed verdicts back into the selector
    #[arg(long)]
    pub no_feedback: bool,

    /// Append what the selector learned
    #[arg(long)]
    pub insights: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl AnalyzeArgs {
    /// Execute the analyze command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();

        log::info!("Starting analysis");
        log::debug!("Arguments: {:?}", self);

        let config = match &self.config {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        };
        let functions = self.functions(&config)?;
        let requirements = self.requirements(&config);
        let domain = self
            .domain
            .clone()
            .unwrap_or_else(|| config.analysis.domain.clone());
        let feedback = !self.no_feedback && (self.feedback || config.analysis.feedback);
        let format = match self.format {
            Some(format) => format,
            None => config.output.format()?,
        };

        let sources = resolve_sources(&self.input)?;
        log::info!(
            "Analyzing {} documents with {} functions (domain '{}')",
            sources.len(),
            functions.len(),
            domain
        );

        let telemetry = global_telemetry().clone();
        let mut pipeline = Pipeline::new(telemetry.clone(), config.selector.clone())?;

        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout().lock()),
        };
        let mut formatter = create_formatter(format, writer, config.output.pretty_json);

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(sources.len() as u64);

        for source in &sources {
            let name = source.display_name();
            let text = source.read_text()?;

            let mut runs = Vec::with_capacity(functions.len());
            for &function in &functions {
                let run = pipeline
                    .run(&text, &domain, function, &requirements)
                    .map_err(|e| CliError::AnalysisError {
                        path: name.clone(),
                        message: e.to_string(),
                    })?;
                if feedback {
                    let success = pipeline.auto_feedback(&run, &requirements);
                    log::debug!("{name}: {function} via {} success={success}", run.strategy.name);
                }
                runs.push(run);
            }

            formatter.format_document(&DocumentReport {
                path: name.clone(),
                runs,
            })?;
            progress.file_completed(&name);
        }
        progress.finish();

        let summary = RunSummary {
            documents: sources.len(),
            telemetry: config
                .output
                .include_telemetry
                .then(|| telemetry.snapshot()),
            insights: (self.insights || config.output.include_insights)
                .then(|| pipeline.selector().insights()),
        };
        formatter.finish(&summary)?;

        log::info!("Analysis complete");
        Ok(())
    }

    /// Functions from `-F`, else from the config
    fn functions(&self, config: &CliConfig) -> Result<Vec<AnalysisFunction>> {
        if self.functions.is_empty() {
            return Ok(config.functions()?);
        }
        let mut functions = Vec::with_capacity(self.functions.len());
        for name in &self.functions {
            let function = name.parse::<AnalysisFunction>()?;
            if !functions.contains(&function) {
                functions.push(function);
            }
        }
        Ok(functions)
    }

    /// Config requirements with command-line overrides applied
    fn requirements(&self, config: &CliConfig) -> RequirementSpec {
        let mut requirements = config.requirements.clone();
        if let Some(min_quality) = self.min_quality {
            requirements.min_quality = min_quality;
        }
        if let Some(max_time_ms) = self.max_time_ms {
            requirements.max_time_ms = max_time_ms;
        }
        if let Some(max_memory_mb) = self.max_memory_mb {
            requirements.max_memory_mb = max_memory_mb;
        }
        requirements
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        // a second init in the same process keeps the first logger
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .try_init();
    }
}
