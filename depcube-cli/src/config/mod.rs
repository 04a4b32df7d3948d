//! Configuration module
//!
//! An optional TOML file supplies defaults for every `evaluate` and
//! `example` flag. Flags given on the command line win over file values.

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use anyhow::Context;
use depcube_core::report::defaults;
use depcube_core::{DecoderKind, RootMode, SubwordMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Decoder configuration
    #[serde(default)]
    pub decoder: DecoderSection,

    /// Report configuration
    #[serde(default)]
    pub report: ReportSection,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl CliConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&text).map_err(|e| {
            CliError::ConfigError(format!("{}: {}", path.display(), e.message())).into()
        })
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Decoder-related configuration
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DecoderSection {
    /// Decoder input file
    pub matrix: Option<PathBuf>,

    /// Which decoder to run
    pub kind: DecoderKind,

    /// Root resolution mode
    pub root: RootMode,

    /// Sub-word pooling mode
    pub subword: SubwordMode,
}

/// Report-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReportSection {
    /// Dependent labels (empty: every observed label)
    pub dep: Vec<String>,

    /// Gold-head labels (empty: every observed label)
    pub gold: Vec<String>,

    /// Predicted-head labels (empty: every observed label)
    pub head: Vec<String>,

    /// Minimum error count
    pub min_abs: usize,

    /// Minimum error rate
    pub min_prc: f64,

    /// Sort by rate before count
    pub rate_first: bool,

    /// Sentence ids sampled per row
    pub max_sent_ids: usize,

    /// Row cap
    pub max_print: Option<usize>,

    /// Attach sampled sentence ids to rows
    pub print_sent_ids: bool,

    /// Field delimiter
    pub delimiter: String,

    /// Text standing for the marginal slot
    pub all_marker: String,

    /// Output format
    pub format: OutputFormat,

    /// Emit summary statistics
    pub summary: bool,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            dep: Vec::new(),
            gold: Vec::new(),
            head: Vec::new(),
            min_abs: defaults::MIN_ABS,
            min_prc: defaults::MIN_PRC,
            rate_first: false,
            max_sent_ids: defaults::MAX_SENT_IDS,
            max_print: None,
            print_sent_ids: false,
            delimiter: defaults::DELIMITER.to_string(),
            all_marker: defaults::ALL_MARKER.to_string(),
            format: OutputFormat::Latex,
            summary: false,
        }
    }
}

/// Performance-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Record count from which aggregation runs in parallel
    pub parallel_threshold: usize,

    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 50_000,
            worker_threads: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.report.delimiter, " & ");
        assert_eq!(config.decoder.kind, DecoderKind::Conllu);
    }

    #[test]
    fn test_partial_sections() {
        let config: CliConfig = toml::from_str(
            r#"
[decoder]
kind = "right-branching"
root = "cls"

[report]
dep = ["nsubj", "ALL"]
min_abs = 3
format = "markdown"

[performance]
worker_threads = 2
"#,
        )
        .unwrap();

        assert_eq!(config.decoder.kind, DecoderKind::RightBranching);
        assert_eq!(config.decoder.root, RootMode::Cls);
        assert_eq!(config.decoder.subword, SubwordMode::First);
        assert_eq!(config.report.dep, ["nsubj", "ALL"]);
        assert_eq!(config.report.min_abs, 3);
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert_eq!(config.report.max_sent_ids, 5);
        assert_eq!(config.performance.worker_threads, 2);
        assert_eq!(config.performance.parallel_threshold, 50_000);
    }

    #[test]
    fn test_load_reports_bad_values() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[decoder]\nkind = \"eisner\"\n").unwrap();

        let err = CliConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CliConfig::load(Path::new("/nonexistent/depcube.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = CliConfig::load_or_default(None).unwrap();
        assert_eq!(config.performance.worker_threads, 0);
    }
}
