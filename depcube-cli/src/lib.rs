//! depcube CLI library
//!
//! Command-line surface for relation-keyed dependency attachment
//! evaluation: argument parsing, TOML configuration, input resolution,
//! output formatting and progress reporting around `depcube-core`.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
