//! Markdown output formatter

use super::{summary_fields, Report, ReportFormatter};
use anyhow::Result;
use depcube_core::format_rate;
use std::io::Write;

/// Markdown formatter - outputs the rows as a pipe table
pub struct MarkdownFormatter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> ReportFormatter for MarkdownFormatter<W> {
    fn write_report(&mut self, report: &Report<'_>) -> Result<()> {
        let config = report.config;
        let marker = config.all_marker.as_str();

        if report.show_summary {
            for (name, value) in summary_fields(report.summary) {
                writeln!(self.writer, "- **{name}**: {value}")?;
            }
            writeln!(self.writer)?;
        }

        if config.print_sent_ids {
            writeln!(self.writer, "| dep | gold | head | rate | count | sentences |")?;
            writeln!(self.writer, "|---|---|---|---:|---:|---|")?;
        } else {
            writeln!(self.writer, "| dep | gold | head | rate | count |")?;
            writeln!(self.writer, "|---|---|---|---:|---:|")?;
        }

        for row in report.rows {
            write!(
                self.writer,
                "| {} | {} | {} | {} | {} |",
                row.coord.dep.display_with(marker),
                row.coord.gold.display_with(marker),
                row.coord.head.display_with(marker),
                format_rate(row.rate),
                row.count
            )?;
            if config.print_sent_ids {
                let ids = row
                    .sentence_ids
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(self.writer, " {ids} |")?;
            }
            writeln!(self.writer)?;
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total rows: {}*", report.rows.len())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{rows, summary};
    use depcube_core::ReportConfig;

    #[test]
    fn test_pipe_table() {
        let rows = rows();
        let summary = summary();
        let config = ReportConfig::builder()
            .print_sent_ids(true)
            .all_marker("*")
            .build()
            .unwrap();
        let mut out = Vec::new();

        MarkdownFormatter::new(&mut out)
            .write_report(&Report {
                rows: &rows,
                summary: &summary,
                show_summary: true,
                config: &config,
            })
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("- **sentences**: 5\n"));
        assert!(text.contains("| det | nsubj | root | 0.5 | 2 | 0, 4 |\n"));
        assert!(text.contains("| obj | * | nsubj | 0.3333 | 1 |  |\n"));
        assert!(text.ends_with("*Total rows: 2*\n"));
    }
}
