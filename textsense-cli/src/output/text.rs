//! Plain text output formatter

use super::{describe_output, describe_run, DocumentReport, OutputFormatter, RunSummary};
use anyhow::Result;
use std::io::Write;

/// Text formatter - one block per document, telemetry table at the end
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputFormatter for TextFormatter<W> {
    fn format_document(&mut self, document: &DocumentReport) -> Result<()> {
        writeln!(self.writer, "== {} ==", document.path)?;
        for run in &document.runs {
            writeln!(self.writer, "[{}] {}", run.report.function, describe_run(run))?;
            for line in describe_output(&run.report.output) {
                writeln!(self.writer, "  {line}")?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(self.writer, "Documents analyzed: {}", summary.documents)?;

        if let Some(telemetry) = &summary.telemetry {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{:<20} {:>6} {:>6} {:>10} {:>10} {:>9}",
                "function", "calls", "errors", "avg ms", "max ms", "accuracy"
            )?;
            for (name, stats) in &telemetry.functions {
                let accuracy = telemetry
                    .quality_for(name)
                    .map_or("-".to_string(), |q| format!("{:.2}", q.mean));
                writeln!(
                    self.writer,
                    "{:<20} {:>6} {:>6} {:>10.3} {:>10.3} {:>9}",
                    name,
                    stats.call_count,
                    stats.error_count,
                    stats.average_time_ms,
                    stats.max_time_ms,
                    accuracy
                )?;
            }
            writeln!(
                self.writer,
                "Total: {} calls, {} errors, {:.3} ms",
                telemetry.totals.total_calls,
                telemetry.totals.total_errors,
                telemetry.totals.total_time_ms
            )?;
        }

        if let Some(insights) = &summary.insights {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "Selector: {} outcomes, success rate {:.2}",
                insights.total_outcomes, insights.success_rate
            )?;
            for (name, value) in &insights.preferences {
                writeln!(self.writer, "  preference {name} = {value:.2}")?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }
}
