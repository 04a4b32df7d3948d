//! JSON output formatter

use super::{Report, ReportFormatter};
use anyhow::Result;
use depcube_core::Summary;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - outputs summary and rows as one object
pub struct JsonFormatter<W: Write> {
    writer: W,
}

/// Top-level JSON document
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportData {
    /// Headline numbers; NaN values serialize as null
    pub summary: Summary,
    /// Reported cells
    pub rows: Vec<RowData>,
}

/// One reported cell
#[derive(Debug, Serialize, Deserialize)]
pub struct RowData {
    /// Dependent label
    pub dep: String,
    /// Gold-head label
    pub gold: String,
    /// Predicted-head label
    pub head: String,
    /// Error rate
    pub rate: f64,
    /// Error count
    pub count: usize,
    /// Sampled sentence ids, when requested
    pub sentence_ids: Option<Vec<usize>>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> ReportFormatter for JsonFormatter<W> {
    fn write_report(&mut self, report: &Report<'_>) -> Result<()> {
        let marker = report.config.all_marker.as_str();
        let data = ReportData {
            summary: *report.summary,
            rows: report
                .rows
                .iter()
                .map(|row| RowData {
                    dep: row.coord.dep.display_with(marker).to_string(),
                    gold: row.coord.gold.display_with(marker).to_string(),
                    head: row.coord.head.display_with(marker).to_string(),
                    rate: row.rate,
                    count: row.count,
                    sentence_ids: row.sentence_ids.clone(),
                })
                .collect(),
        };

        serde_json::to_writer_pretty(&mut self.writer, &data)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
