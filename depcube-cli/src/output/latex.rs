//! LaTeX table-row output formatter

use super::{summary_fields, Report, ReportFormatter};
use anyhow::Result;
use depcube_core::write_report;
use std::io::Write;

/// LaTeX formatter - one delimiter-joined row per line, each ending in `\\`
pub struct LatexFormatter<W: Write> {
    writer: W,
}

impl<W: Write> LatexFormatter<W> {
    /// Create a new LaTeX formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send + Sync> ReportFormatter for LatexFormatter<W> {
    fn write_report(&mut self, report: &Report<'_>) -> Result<()> {
        if report.show_summary {
            for (name, value) in summary_fields(report.summary) {
                writeln!(self.writer, "% {name}: {value}")?;
            }
        }

        write_report(report.rows, report.config, &mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{rows, summary};
    use depcube_core::ReportConfig;

    fn render(show_summary: bool) -> String {
        let rows = rows();
        let summary = summary();
        let config = ReportConfig::builder().print_sent_ids(true).build().unwrap();
        let mut out = Vec::new();

        LatexFormatter::new(&mut out)
            .write_report(&Report {
                rows: &rows,
                summary: &summary,
                show_summary,
                config: &config,
            })
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_rows() {
        assert_eq!(
            render(false),
            "det & nsubj & root & 0.5 & 2 & [0, 4] \\\\\n\
             obj & ALL & nsubj & 0.3333 & 1 \\\\\n"
        );
    }

    #[test]
    fn test_summary_as_comments() {
        let text = render(true);
        assert!(text.starts_with("% sentences: 5\n% dropped: 1\n"));
        assert!(text.contains("% accuracy: 0.85\n"));
        assert!(text.contains("% mean correct distance: nan\n"));
        assert!(text.ends_with("obj & ALL & nsubj & 0.3333 & 1 \\\\\n"));
    }
}
