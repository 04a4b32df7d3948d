//! Relation-keyed error analysis for dependency attachment
//!
//! This crate compares predicted dependency trees with gold trees and breaks
//! attachment errors down by grammatical relation. Every scored token lands
//! in a three-axis cube (dependent relation × gold-head relation ×
//! predicted-head relation) whose axes also carry an `ALL` marginal, so a
//! single pass answers questions at every granularity, from "which
//! head confusions dominate for `nsubj`" down to the overall attachment
//! error rate.
//!
//! # Pipeline
//!
//! - [`corpus`]: read gold (and system) CoNLL-U
//! - [`decoder`]: produce predicted trees for the gold sentences
//! - [`align`]: pair trees into [`ComparisonRecord`]s
//! - [`aggregate`]: build the count cubes, sentence-id index and distances
//! - [`rates`]: per-cell error rates
//! - [`report`]: filter, sort and render rows
//! - [`example`]: line-by-line diff of one sentence
//!
//! # Example
//!
//! ```rust
//! use depcube_core::{aggregate, align, generate_report, ReportConfig, Sentence, Token};
//! use depcube_core::tree::Edge;
//!
//! let sentences = vec![Sentence::with_root(vec![
//!     Token::new(1, "The", "det", 2),
//!     Token::new(2, "dog", "nsubj", 3),
//!     Token::new(3, "barked", "-root-", 0),
//! ])];
//! let trees = vec![vec![
//!     Edge::DECODER_ROOT,
//!     Edge::new(1, 3),
//!     Edge::new(2, 3),
//!     Edge::new(3, 0),
//! ]];
//!
//! let alignment = align(&trees, &sentences).unwrap();
//! let stats = aggregate(&alignment.records);
//! let rows = generate_report(&stats, &ReportConfig::default());
//!
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].render(&ReportConfig::default()), "det & nsubj & root & 1.0 & 1");
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod align;
pub mod corpus;
pub mod cube;
pub mod decoder;
pub mod error;
pub mod example;
pub mod monoid;
pub mod rates;
pub mod report;
pub mod token;
pub mod tree;

pub use aggregate::{aggregate, CubeStats, DistanceMeans, Distances, Summary};
#[cfg(feature = "parallel")]
pub use aggregate::aggregate_parallel;
pub use align::{align, AlignedSentence, Alignment, ComparisonRecord};
pub use corpus::{read_conllu, read_conllu_files};
pub use cube::{Coord, Cube, SentenceIndex, Slot};
pub use decoder::{
    CorpusDecoder, Decoded, Decoder, DecoderConfig, DecoderKind, RootMode, SubwordMode,
};
pub use error::{Error, Result};
pub use example::{example_lines, write_example};
pub use rates::{derive_rates, RateCube};
pub use report::{
    format_rate, generate_report, write_report, ReportConfig, ReportConfigBuilder, ReportRow,
};
pub use token::{Sentence, Token};
