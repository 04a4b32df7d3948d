//! List command implementation

use crate::output::OutputFormat;
use anyhow::Result;
use clap::Subcommand;
use depcube_core::DecoderKind;

/// List subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ListCommands {
    /// List available output formats
    Formats,

    /// List available decoders
    Decoders,
}

impl ListCommands {
    /// Execute the list command
    pub fn execute(&self) -> Result<()> {
        for line in self.lines() {
            println!("{line}");
        }
        Ok(())
    }

    /// Lines to print, one per entry
    pub fn lines(&self) -> Vec<String> {
        match self {
            ListCommands::Formats => OutputFormat::ALL
                .iter()
                .map(|format| format!("{:<16}{}", format.as_str(), format.description()))
                .collect(),
            ListCommands::Decoders => DecoderKind::ALL
                .iter()
                .map(|kind| format!("{:<16}{}", kind.as_str(), kind.description()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_listed() {
        let lines = ListCommands::Formats.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("latex "));
    }

    #[test]
    fn test_decoders_listed() {
        let lines = ListCommands::Decoders.lines();
        assert!(lines.iter().any(|l| l.starts_with("right-branching ")));
        assert!(lines[0].starts_with("conllu"));
    }
}
