//! Evaluate command implementation

use super::input::InputArgs;
use crate::config::{PerformanceConfig, ReportSection};
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, Report};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use depcube_core::{
    aggregate, aggregate_parallel, align, generate_report, ComparisonRecord, CubeStats,
    ReportConfig,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Arguments for the evaluate command
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Dependent labels to report, comma separated (default: all observed)
    #[arg(long, value_name = "LABELS", value_delimiter = ',')]
    pub dep: Option<Vec<String>>,

    /// Gold-head labels to report, comma separated (default: all observed)
    #[arg(long = "gold-head", value_name = "LABELS", value_delimiter = ',')]
    pub gold_head: Option<Vec<String>>,

    /// Predicted-head labels to report, comma separated (default: all observed)
    #[arg(long, value_name = "LABELS", value_delimiter = ',')]
    pub head: Option<Vec<String>>,

    /// Minimum error count of a reported cell [default: 1]
    #[arg(long, value_name = "N")]
    pub min_abs: Option<usize>,

    /// Minimum error rate of a reported cell [default: 0.0]
    #[arg(long, value_name = "RATE")]
    pub min_prc: Option<f64>,

    /// Sort by error rate before error count
    #[arg(long, overrides_with = "no_rate_first")]
    pub rate_first: bool,

    /// Sort by error count first, even if the config file says otherwise
    #[arg(long, overrides_with = "rate_first")]
    pub no_rate_first: bool,

    /// Sentence ids sampled per row [default: 5]
    #[arg(long, value_name = "N")]
    pub max_sent_ids: Option<usize>,

    /// Maximum number of rows
    #[arg(long, value_name = "N")]
    pub max_print: Option<usize>,

    /// Append sampled sentence ids to each row
    #[arg(long, overrides_with = "no_print_sent_ids")]
    pub print_sent_ids: bool,

    /// Omit sentence ids, even if the config file enables them
    #[arg(long, overrides_with = "print_sent_ids")]
    pub no_print_sent_ids: bool,

    /// Field delimiter [default: " & "]
    #[arg(long, value_name = "TEXT")]
    pub delimiter: Option<String>,

    /// Text standing for the marginal over an axis [default: ALL]
    #[arg(long, value_name = "TEXT")]
    pub all_marker: Option<String>,

    /// Output format [default: latex]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Include summary statistics
    #[arg(long, overrides_with = "no_summary")]
    pub summary: bool,

    /// Omit summary statistics, even if the config file enables them
    #[arg(long, overrides_with = "summary")]
    pub no_summary: bool,

    /// Worker threads for aggregation (forces parallel aggregation)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,
}

impl EvaluateArgs {
    /// Execute the evaluate command
    pub fn execute(&self) -> Result<()> {
        self.input.init_logging();

        log::info!("Starting evaluation");
        log::debug!("Arguments: {:?}", self);

        let config = self.input.load_config()?;
        let report_config = self.report_config(&config.report)?;
        let format = self.format.unwrap_or(config.report.format);

        let mut progress = ProgressReporter::new(self.input.quiet);
        let decoded = self.input.decode(&config, &mut progress)?;

        progress.stage("Aligning parses");
        let alignment = align(&decoded.trees, &decoded.sentences)
            .map_err(|e| CliError::EvaluationError(e.to_string()))?;

        progress.stage("Aggregating error cubes");
        let stats = self.aggregate(&alignment.records, &config.performance)?;
        let summary = stats.summary(&alignment);
        let rows = generate_report(&stats, &report_config);
        progress.finish();

        log::info!(
            "{} records, {} errors, {} report rows",
            summary.records,
            summary.errors,
            rows.len()
        );

        let mut formatter = format.formatter(self.open_output()?);
        formatter.write_report(&Report {
            rows: &rows,
            summary: &summary,
            show_summary: toggle(self.summary, self.no_summary, config.report.summary),
            config: &report_config,
        })
    }

    /// Merge report flags over the file section
    pub fn report_config(&self, file: &ReportSection) -> CliResult<ReportConfig> {
        let labels = |flag: &Option<Vec<String>>, fallback: &Vec<String>| {
            flag.clone().unwrap_or_else(|| fallback.clone())
        };

        ReportConfig::builder()
            .dep(labels(&self.dep, &file.dep))
            .gold(labels(&self.gold_head, &file.gold))
            .head(labels(&self.head, &file.head))
            .min_abs(self.min_abs.unwrap_or(file.min_abs))
            .min_prc(self.min_prc.unwrap_or(file.min_prc))
            .abs_first(!toggle(self.rate_first, self.no_rate_first, file.rate_first))
            .max_sent_ids(self.max_sent_ids.unwrap_or(file.max_sent_ids))
            .max_print(self.max_print.or(file.max_print))
            .print_sent_ids(toggle(
                self.print_sent_ids,
                self.no_print_sent_ids,
                file.print_sent_ids,
            ))
            .delimiter(self.delimiter.clone().unwrap_or_else(|| file.delimiter.clone()))
            .all_marker(self.all_marker.clone().unwrap_or_else(|| file.all_marker.clone()))
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    fn aggregate(
        &self,
        records: &[ComparisonRecord<'_>],
        performance: &PerformanceConfig,
    ) -> Result<CubeStats> {
        let threads = match self.threads.unwrap_or(performance.worker_threads) {
            0 => num_cpus::get(),
            n => n,
        };
        let parallel = self.threads.is_some() || records.len() >= performance.parallel_threshold;

        if !parallel || threads == 1 {
            log::debug!("aggregating {} records sequentially", records.len());
            return Ok(aggregate(records));
        }

        log::debug!(
            "aggregating {} records on {} threads",
            records.len(),
            threads
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build aggregation thread pool")?;

        Ok(pool.install(|| aggregate_parallel(records, threads)))
    }

    fn open_output(&self) -> Result<Box<dyn Write + Send + Sync>> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(BufWriter::new(io::stdout()))),
        }
    }
}

/// Resolve a `--flag` / `--no-flag` pair over the config file value
fn toggle(on: bool, off: bool, file: bool) -> bool {
    if off {
        false
    } else {
        on || file
    }
}
