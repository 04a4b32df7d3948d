//! Output formatting module

use anyhow::Result;
use depcube_core::{format_rate, ReportConfig, ReportRow, Summary};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

pub mod json;
pub mod latex;
pub mod markdown;

pub use json::JsonFormatter;
pub use latex::LatexFormatter;
pub use markdown::MarkdownFormatter;

/// A finished report ready for rendering
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// Filtered, sorted rows
    pub rows: &'a [ReportRow],
    /// Headline numbers of the run
    pub summary: &'a Summary,
    /// Whether the summary is wanted in text formats
    pub show_summary: bool,
    /// Rendering settings
    pub config: &'a ReportConfig,
}

/// Trait for output formatters
pub trait ReportFormatter: Send + Sync {
    /// Format and output a complete report
    fn write_report(&mut self, report: &Report<'_>) -> Result<()>;
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table rows joined by the delimiter, ready for a tabular environment
    #[default]
    Latex,
    /// JSON object with summary and rows
    Json,
    /// Markdown pipe table
    Markdown,
}

impl OutputFormat {
    /// All formats, in listing order
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Latex,
        OutputFormat::Json,
        OutputFormat::Markdown,
    ];

    /// Name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Latex => "latex",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }

    /// One-line description
    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Latex => "delimiter-joined table rows ending in \\\\ (default)",
            OutputFormat::Json => "JSON object with summary and rows",
            OutputFormat::Markdown => "Markdown pipe table",
        }
    }

    /// Create the formatter for this format
    pub fn formatter<W: Write + Send + Sync + 'static>(&self, writer: W) -> Box<dyn ReportFormatter> {
        match self {
            OutputFormat::Latex => Box::new(LatexFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary as (name, value) pairs for the text formats
pub(crate) fn summary_fields(summary: &Summary) -> Vec<(&'static str, String)> {
    let distances = &summary.distances;
    vec![
        ("sentences", summary.sentences.to_string()),
        ("dropped", summary.dropped.to_string()),
        ("records", summary.records.to_string()),
        ("errors", summary.errors.to_string()),
        ("accuracy", format_rate(summary.accuracy)),
        ("mean distance", format_rate(distances.total)),
        ("mean gold distance", format_rate(distances.gold)),
        ("mean error distance", format_rate(distances.error)),
        ("mean correct distance", format_rate(distances.correct)),
    ]
}
