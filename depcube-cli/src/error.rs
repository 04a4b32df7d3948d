//! Error handling for the CLI application

use std::fmt;

/// CLI-specific error conditions
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Invalid file pattern
    InvalidPattern(String),
    /// Configuration error
    ConfigError(String),
    /// Evaluation error from core
    EvaluationError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::EvaluationError(msg) => write!(f, "Evaluation error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error_display() {
        let error = CliError::FileNotFound("gold.conllu".to_string());
        assert_eq!(error.to_string(), "File not found: gold.conllu");
    }

    #[test]
    fn test_invalid_pattern_error_display() {
        let error = CliError::InvalidPattern("[invalid".to_string());
        assert_eq!(error.to_string(), "Invalid file pattern: [invalid");
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("missing matrix".to_string());
        assert_eq!(error.to_string(), "Configuration error: missing matrix");
    }

    #[test]
    fn test_evaluation_error_display() {
        let error = CliError::EvaluationError("sentence 9 not retained".to_string());
        assert_eq!(
            error.to_string(),
            "Evaluation error: sentence 9 not retained"
        );
    }

    #[test]
    fn test_error_converts_into_anyhow() {
        let result: CliResult<()> = Err(CliError::FileNotFound("x".into()).into());
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
        assert_eq!(err.to_string(), "File not found: x");
    }
}
