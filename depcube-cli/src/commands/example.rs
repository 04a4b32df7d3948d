//! Example command implementation

use super::input::InputArgs;
use crate::error::CliError;
use crate::progress::ProgressReporter;
use anyhow::Result;
use clap::Args;
use depcube_core::{align, write_example};
use std::io::{self, Write};

/// Arguments for the example command
#[derive(Debug, Args)]
pub struct ExampleArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Retained sentence to print (0-based, dropped sentences not counted)
    #[arg(short = 'n', long, value_name = "N")]
    pub sentence: usize,
}

impl ExampleArgs {
    /// Execute the example command
    pub fn execute(&self) -> Result<()> {
        self.input.init_logging();
        log::debug!("Arguments: {:?}", self);

        let config = self.input.load_config()?;
        let mut progress = ProgressReporter::new(self.input.quiet);
        let decoded = self.input.decode(&config, &mut progress)?;

        progress.stage("Aligning parses");
        let alignment = align(&decoded.trees, &decoded.sentences)
            .map_err(|e| CliError::EvaluationError(e.to_string()))?;
        progress.finish();

        let stdout = io::stdout();
        let mut out = stdout.lock();
        if !write_example(&alignment, self.sentence, &mut out)? {
            return Err(CliError::EvaluationError(format!(
                "sentence {} is out of range, {} sentences retained",
                self.sentence,
                alignment.retained()
            ))
            .into());
        }
        out.flush()?;
        Ok(())
    }
}
