//! Input and decoder flags shared by `evaluate` and `example`

use crate::config::{CliConfig, DecoderSection};
use crate::error::{CliError, CliResult};
use crate::input::{resolve_patterns, CorpusReader};
use crate::progress::ProgressReporter;
use clap::Args;
use depcube_core::{CorpusDecoder, Decoded, Decoder, DecoderConfig, DecoderKind, RootMode, SubwordMode};
use std::path::PathBuf;

/// Gold corpus, decoder and logging flags
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Gold CoNLL-U files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true, num_args = 1..)]
    pub gold: Vec<String>,

    /// Decoder input (system-output CoNLL-U for the conllu decoder)
    #[arg(short, long, value_name = "FILE")]
    pub matrix: Option<PathBuf>,

    /// Decoder producing the predicted trees [default: conllu]
    #[arg(short, long, value_name = "NAME")]
    pub decoder: Option<DecoderKind>,

    /// Root resolution mode: gold or cls [default: gold]
    #[arg(long, value_name = "MODE")]
    pub root: Option<RootMode>,

    /// Sub-word pooling mode: first, last or mean [default: first]
    #[arg(long, value_name = "MODE")]
    pub subword: Option<SubwordMode>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "DEPCUBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl InputArgs {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A logger may already be installed when commands run in-process
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }

    /// Load the configuration file, if any
    pub fn load_config(&self) -> CliResult<CliConfig> {
        CliConfig::load_or_default(self.config.as_deref())
    }

    /// Merge decoder flags over the file section
    pub fn decoder_config(&self, section: &DecoderSection) -> CliResult<DecoderConfig> {
        let decoder = self.decoder.unwrap_or(section.kind);
        let matrix = self.matrix.clone().or_else(|| section.matrix.clone());

        let matrix = match matrix {
            Some(path) if decoder.needs_matrix() && !path.is_file() => {
                return Err(CliError::FileNotFound(path.display().to_string()).into());
            }
            Some(path) => path,
            None if decoder.needs_matrix() => {
                return Err(CliError::ConfigError(format!(
                    "decoder '{decoder}' needs a matrix file (--matrix)"
                ))
                .into());
            }
            None => PathBuf::new(),
        };

        Ok(DecoderConfig {
            matrix,
            decoder,
            root: self.root.unwrap_or(section.root),
            subword: self.subword.unwrap_or(section.subword),
        })
    }

    /// Read the gold corpus and run the decoder over it
    pub fn decode(&self, config: &CliConfig, progress: &mut ProgressReporter) -> CliResult<Decoded> {
        let decoder_config = self.decoder_config(&config.decoder)?;
        log::debug!("decoder configuration: {decoder_config:?}");

        let files = resolve_patterns(&self.gold)?;
        let gold = CorpusReader::read_all(&files, progress)?;

        progress.stage(&format!("Decoding with {}", decoder_config.decoder));
        CorpusDecoder::new(gold)
            .decode(&decoder_config)
            .map_err(|e| CliError::EvaluationError(e.to_string()).into())
    }
}
