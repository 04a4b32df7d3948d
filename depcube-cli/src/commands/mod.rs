//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod evaluate;
pub mod example;
pub mod input;
pub mod list;

pub use list::ListCommands;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Break attachment errors down by relation and report them
    Evaluate(evaluate::EvaluateArgs),

    /// Print the attachment diff of one retained sentence
    Example(example::ExampleArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Evaluate(args) => args.execute(),
            Commands::Example(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
        }
    }
}
