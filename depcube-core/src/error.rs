//! Error types for evaluation

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, decoding or aligning parses
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error on a corpus or prediction file
    #[error("I/O error for path '{}': {source}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Malformed CoNLL-U input
    #[error("parse error in '{}' at line {line}: {message}", .path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// The decoder produced a different number of trees than gold sentences
    #[error("decoder produced {trees} trees for {sentences} gold sentences")]
    TreeCountMismatch {
        /// Number of predicted trees
        trees: usize,
        /// Number of gold sentences
        sentences: usize,
    },

    /// Predicted tree, gold tree and token sequence disagree in length
    #[error(
        "length mismatch in sentence {sentence}: predicted {predicted}, gold {gold}, tokens {tokens}"
    )]
    LengthMismatch {
        /// Index of the sentence in decoder order
        sentence: usize,
        /// Predicted tree length
        predicted: usize,
        /// Gold tree length
        gold: usize,
        /// Token sequence length
        tokens: usize,
    },

    /// An edge points at a head outside its sentence
    #[error("sentence {sentence}: head {head} of token {dependent} is outside the sentence")]
    HeadOutOfRange {
        /// Index of the sentence in decoder order
        sentence: usize,
        /// Dependent identifier of the offending edge
        dependent: i64,
        /// Head identifier of the offending edge
        head: i64,
    },

    /// System output and gold corpus disagree on sentence count
    #[error("system output has {predicted} sentences, gold corpus has {gold}")]
    SentenceCountMismatch {
        /// Number of gold sentences
        gold: usize,
        /// Number of system-output sentences
        predicted: usize,
    },

    /// Invalid configuration value
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the configuration field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type for evaluation operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let error = Error::LengthMismatch {
            sentence: 3,
            predicted: 5,
            gold: 6,
            tokens: 6,
        };
        assert_eq!(
            error.to_string(),
            "length mismatch in sentence 3: predicted 5, gold 6, tokens 6"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let error = Error::Parse {
            path: PathBuf::from("gold.conllu"),
            line: 12,
            message: "expected 10 columns".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "parse error in 'gold.conllu' at line 12: expected 10 columns"
        );
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;

        let error = Error::Io {
            path: PathBuf::from("missing.conllu"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(error.source().is_some());
        assert!(error.to_string().contains("missing.conllu"));
    }
}
