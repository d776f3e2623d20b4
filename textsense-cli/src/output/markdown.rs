//! Markdown output formatter

use super::{describe_output, describe_run, DocumentReport, OutputFormatter, RunSummary};
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - a section per document, tables for telemetry
pub struct MarkdownFormatter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputFormatter for MarkdownFormatter<W> {
    fn format_document(&mut self, document: &DocumentReport) -> Result<()> {
        writeln!(self.writer, "## {}", document.path)?;
        writeln!(self.writer)?;
        for run in &document.runs {
            writeln!(self.writer, "### {}", run.report.function)?;
            writeln!(self.writer)?;
            writeln!(self.writer, "`{}`", describe_run(run))?;
            writeln!(self.writer)?;
            for line in describe_output(&run.report.output) {
                writeln!(self.writer, "- {line}")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Documents analyzed: {}*", summary.documents)?;

        if let Some(telemetry) = &summary.telemetry {
            writeln!(self.writer)?;
            writeln!(self.writer, "## Telemetry")?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| Function | Calls | Errors | Avg ms | Cache hit rate |")?;
            writeln!(self.writer, "|---|---:|---:|---:|---:|")?;
            for (name, stats) in &telemetry.functions {
                writeln!(
                    self.writer,
                    "| {} | {} | {} | {:.3} | {:.2} |",
                    name,
                    stats.call_count,
                    stats.error_count,
                    stats.average_time_ms,
                    stats.cache_hit_rate
                )?;
            }
        }

        if let Some(insights) = &summary.insights {
            writeln!(self.writer)?;
            writeln!(self.writer, "## Selector insights")?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{} outcomes, success rate {:.2}",
                insights.total_outcomes, insights.success_rate
            )?;
            for (domain, strategy) in &insights.best_strategy_by_domain {
                writeln!(self.writer, "- best for `{domain}`: {strategy}")?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }
}
