//! JSON output formatter

use super::{DocumentReport, OutputFormatter, RunSummary};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// JSON formatter - buffers documents and writes one object on finish
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    documents: Vec<DocumentReport>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    documents: &'a [DocumentReport],
    #[serde(flatten)]
    summary: &'a RunSummary,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            documents: Vec::new(),
        }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_document(&mut self, document: &DocumentReport) -> Result<()> {
        self.documents.push(document.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        let report = JsonReport {
            documents: &self.documents,
            summary,
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &report)?;
        } else {
            serde_json::to_writer(&mut self.writer, &report)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
