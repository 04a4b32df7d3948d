//! Filtered, sorted error reports over the cubes
//!
//! Rows are rendered for direct inclusion in a typeset table: fields joined
//! by a delimiter (`" & "` by default) and each line closed with ` \\`.

use crate::aggregate::CubeStats;
use crate::cube::{Coord, Slot};
use crate::error::{Error, Result};
use std::io::{self, Write};

/// Line terminator of a rendered row
pub const ROW_END: &str = " \\\\";

/// Default configuration values
pub mod defaults {
    /// Minimum error count of a reported cell
    pub const MIN_ABS: usize = 1;

    /// Minimum error rate of a reported cell
    pub const MIN_PRC: f64 = 0.0;

    /// Sentence ids sampled per row
    pub const MAX_SENT_IDS: usize = 5;

    /// Field delimiter
    pub const DELIMITER: &str = " & ";

    /// Text standing for the marginal slot
    pub const ALL_MARKER: &str = "ALL";
}

/// What to report and how to render it
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Dependent labels to report (empty: every observed label)
    pub dep: Vec<Slot>,
    /// Gold-head labels to report (empty: every observed label)
    pub gold: Vec<Slot>,
    /// Predicted-head labels to report (empty: every observed label)
    pub head: Vec<Slot>,
    /// Minimum error count
    pub min_abs: usize,
    /// Minimum error rate
    pub min_prc: f64,
    /// Sort by count before rate
    pub abs_first: bool,
    /// Sentence ids sampled per row
    pub max_sent_ids: usize,
    /// Row cap (None: unbounded)
    pub max_print: Option<usize>,
    /// Attach sampled sentence ids to rows
    pub print_sent_ids: bool,
    /// Field delimiter
    pub delimiter: String,
    /// Text standing for [`Slot::All`]
    pub all_marker: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dep: Vec::new(),
            gold: Vec::new(),
            head: Vec::new(),
            min_abs: defaults::MIN_ABS,
            min_prc: defaults::MIN_PRC,
            abs_first: true,
            max_sent_ids: defaults::MAX_SENT_IDS,
            max_print: None,
            print_sent_ids: false,
            delimiter: defaults::DELIMITER.to_string(),
            all_marker: defaults::ALL_MARKER.to_string(),
        }
    }
}

impl ReportConfig {
    /// Create a configuration builder
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_prc) {
            return Err(Error::InvalidValue {
                field: "min_prc",
                reason: format!("{} is not a rate between 0 and 1", self.min_prc),
            });
        }

        if self.delimiter.is_empty() {
            return Err(Error::InvalidValue {
                field: "delimiter",
                reason: "must not be empty".into(),
            });
        }

        if self.all_marker.is_empty() {
            return Err(Error::InvalidValue {
                field: "all_marker",
                reason: "must not be empty".into(),
            });
        }

        Ok(())
    }

    /// Parse label names, mapping the configured marker onto [`Slot::All`]
    pub fn parse_slots<S: AsRef<str>>(&self, labels: &[S]) -> Vec<Slot> {
        labels
            .iter()
            .map(|label| Slot::parse(label.as_ref(), &self.all_marker))
            .collect()
    }
}

/// Fluent builder for [`ReportConfig`]
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
    dep: Vec<String>,
    gold: Vec<String>,
    head: Vec<String>,
}

impl ReportConfigBuilder {
    /// Restrict dependent labels
    pub fn dep<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.dep = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict gold-head labels
    pub fn gold<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.gold = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict predicted-head labels
    pub fn head<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.head = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Minimum error count
    pub fn min_abs(mut self, count: usize) -> Self {
        self.config.min_abs = count;
        self
    }

    /// Minimum error rate
    pub fn min_prc(mut self, rate: f64) -> Self {
        self.config.min_prc = rate;
        self
    }

    /// Sort by count first (true) or by rate first (false)
    pub fn abs_first(mut self, abs_first: bool) -> Self {
        self.config.abs_first = abs_first;
        self
    }

    /// Sentence ids sampled per row
    pub fn max_sent_ids(mut self, count: usize) -> Self {
        self.config.max_sent_ids = count;
        self
    }

    /// Row cap
    pub fn max_print(mut self, rows: Option<usize>) -> Self {
        self.config.max_print = rows;
        self
    }

    /// Attach sampled sentence ids
    pub fn print_sent_ids(mut self, enabled: bool) -> Self {
        self.config.print_sent_ids = enabled;
        self
    }

    /// Field delimiter
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config.delimiter = delimiter.into();
        self
    }

    /// Text standing for the marginal slot
    pub fn all_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.all_marker = marker.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ReportConfig> {
        let mut config = self.config;
        config.validate()?;

        config.dep = config.parse_slots(&self.dep);
        config.gold = config.parse_slots(&self.gold);
        config.head = config.parse_slots(&self.head);

        Ok(config)
    }
}

/// Render a rate rounded to four decimals in its shortest form (`1.0`,
/// `0.5`, `0.3333`); NaN renders as `nan`.
pub fn format_rate(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let rounded = (value * 10_000.0).round() / 10_000.0;
    format!("{rounded:?}")
}

/// One reported cube cell
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Cell coordinate
    pub coord: Coord,
    /// Errors / total
    pub rate: f64,
    /// Error count
    pub count: usize,
    /// Sampled sentence ids, when requested
    pub sentence_ids: Option<Vec<usize>>,
}

impl ReportRow {
    /// Render as a table line without terminator
    pub fn render(&self, config: &ReportConfig) -> String {
        let marker = config.all_marker.as_str();
        let mut fields = vec![
            self.coord.dep.display_with(marker).to_string(),
            self.coord.gold.display_with(marker).to_string(),
            self.coord.head.display_with(marker).to_string(),
            format_rate(self.rate),
            self.count.to_string(),
        ];

        if let Some(ids) = self.sentence_ids.as_ref().filter(|ids| !ids.is_empty()) {
            fields.push(format!("{ids:?}"));
        }

        fields.join(&config.delimiter)
    }
}

/// Collect the cells passing the filters, unsorted
pub fn build_rows(stats: &CubeStats, config: &ReportConfig) -> Vec<ReportRow> {
    let rates = stats.rates();
    let errors = &stats.errors;
    let mut rows = Vec::new();

    let deps = axis_values(&config.dep, || errors.dep_labels());
    for dep in &deps {
        let golds = axis_values(&config.gold, || errors.gold_labels(dep));
        for gold in &golds {
            let heads = axis_values(&config.head, || errors.head_labels(dep, gold));
            for head in &heads {
                let coord = Coord::new(dep.clone(), gold.clone(), head.clone());
                if stats.total.get(&coord) == 0 {
                    continue;
                }

                let count = errors.get(&coord);
                let rate = rates.get(&coord).unwrap_or(0.0);
                if count < config.min_abs || rate < config.min_prc {
                    continue;
                }

                let sentence_ids = config
                    .print_sent_ids
                    .then(|| stats.sentence_ids.sample(&coord, config.max_sent_ids));

                rows.push(ReportRow {
                    coord,
                    rate,
                    count,
                    sentence_ids,
                });
            }
        }
    }

    rows
}

fn axis_values(configured: &[Slot], observed: impl FnOnce() -> Vec<Slot>) -> Vec<Slot> {
    if configured.is_empty() {
        observed()
    } else {
        configured.to_vec()
    }
}

/// Order rows by (count desc, rate desc), or (rate desc, count desc) when
/// `abs_first` is false.
///
/// Two stable sorts, secondary key first, so ties on the primary key keep
/// the secondary order and full ties keep enumeration order.
pub fn sort_rows(rows: &mut [ReportRow], abs_first: bool) {
    let by_rate = |a: &ReportRow, b: &ReportRow| b.rate.total_cmp(&a.rate);
    let by_count = |a: &ReportRow, b: &ReportRow| b.count.cmp(&a.count);

    if abs_first {
        rows.sort_by(by_rate);
        rows.sort_by(by_count);
    } else {
        rows.sort_by(by_count);
        rows.sort_by(by_rate);
    }
}

/// Filter, sort and truncate the report rows
pub fn generate_report(stats: &CubeStats, config: &ReportConfig) -> Vec<ReportRow> {
    let mut rows = build_rows(stats, config);
    sort_rows(&mut rows, config.abs_first);
    if let Some(limit) = config.max_print {
        rows.truncate(limit);
    }
    tracing::debug!("report has {} rows", rows.len());
    rows
}

/// Write rows as terminated table lines
pub fn write_report<W: Write>(
    rows: &[ReportRow],
    config: &ReportConfig,
    writer: &mut W,
) -> io::Result<()> {
    for row in rows {
        writeln!(writer, "{}{ROW_END}", row.render(config))?;
    }
    Ok(())
}
