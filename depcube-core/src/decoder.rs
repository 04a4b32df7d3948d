//! Decoder interface and the file-backed decoders shipped with the crate
//!
//! The evaluation core only needs predicted trees index-aligned with gold
//! sentences. Where those trees come from is the decoder's business: the
//! [`Decoder`] trait is the seam, and [`DecoderConfig`] carries the settings
//! a decoder is selected and driven with.

use crate::corpus::read_conllu;
use crate::error::{Error, Result};
use crate::token::Sentence;
use crate::tree::{Edge, Tree};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Available decoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DecoderKind {
    /// Heads read from a system-output CoNLL-U file
    #[default]
    Conllu,
    /// Every token headed by its left neighbour
    LeftBranching,
    /// Every token headed by its right neighbour
    RightBranching,
}

impl DecoderKind {
    /// All decoders, in listing order
    pub const ALL: [DecoderKind; 3] = [
        DecoderKind::Conllu,
        DecoderKind::LeftBranching,
        DecoderKind::RightBranching,
    ];

    /// Name used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            DecoderKind::Conllu => "conllu",
            DecoderKind::LeftBranching => "left-branching",
            DecoderKind::RightBranching => "right-branching",
        }
    }

    /// One-line description
    pub fn description(&self) -> &'static str {
        match self {
            DecoderKind::Conllu => "heads from a system-output CoNLL-U file",
            DecoderKind::LeftBranching => "baseline: each token attaches to its left neighbour",
            DecoderKind::RightBranching => "baseline: each token attaches to its right neighbour",
        }
    }

    /// Whether this decoder reads the matrix path
    pub fn needs_matrix(&self) -> bool {
        matches!(self, DecoderKind::Conllu)
    }
}

impl fmt::Display for DecoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecoderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DecoderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidValue {
                field: "decoder",
                reason: format!("unknown decoder '{s}'"),
            })
    }
}

/// Where the root attachment of a predicted tree comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RootMode {
    /// The gold root dependent is attached to the root
    #[default]
    Gold,
    /// The decoder's own root choice is kept
    Cls,
}

impl FromStr for RootMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gold" => Ok(RootMode::Gold),
            "cls" => Ok(RootMode::Cls),
            _ => Err(Error::InvalidValue {
                field: "root",
                reason: format!("expected 'gold' or 'cls', got '{s}'"),
            }),
        }
    }
}

/// How sub-word scores are pooled into word scores by matrix decoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SubwordMode {
    /// First sub-word stands for the word
    #[default]
    First,
    /// Last sub-word stands for the word
    Last,
    /// Average over sub-words
    Mean,
}

impl FromStr for SubwordMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(SubwordMode::First),
            "last" => Ok(SubwordMode::Last),
            "mean" => Ok(SubwordMode::Mean),
            _ => Err(Error::InvalidValue {
                field: "subword",
                reason: format!("expected 'first', 'last' or 'mean', got '{s}'"),
            }),
        }
    }
}

/// Settings a decoder is driven with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecoderConfig {
    /// Decoder input (score matrix or system output)
    pub matrix: PathBuf,
    /// Which decoder to run
    pub decoder: DecoderKind,
    /// Root resolution mode
    pub root: RootMode,
    /// Sub-word pooling mode
    pub subword: SubwordMode,
}

/// Decoder output: predicted trees and the gold sentences they belong to
#[derive(Debug, Clone)]
pub struct Decoded {
    /// One predicted tree per sentence, root slot first
    pub trees: Vec<Tree>,
    /// Gold sentences, index-aligned with `trees`
    pub sentences: Vec<Sentence>,
}

/// Produces predicted trees for a gold corpus
pub trait Decoder {
    /// Decode every sentence
    fn decode(&self, config: &DecoderConfig) -> Result<Decoded>;
}

/// Decoder over a gold corpus already in memory, dispatching on
/// [`DecoderConfig::decoder`]
#[derive(Debug, Clone)]
pub struct CorpusDecoder {
    gold: Vec<Sentence>,
}

impl CorpusDecoder {
    /// Create a decoder for the given gold sentences
    pub fn new(gold: Vec<Sentence>) -> Self {
        Self { gold }
    }

    fn system_output_trees(&self, config: &DecoderConfig) -> Result<Vec<Tree>> {
        let system = read_conllu(&config.matrix)?;
        if system.len() != self.gold.len() {
            return Err(Error::SentenceCountMismatch {
                gold: self.gold.len(),
                predicted: system.len(),
            });
        }

        Ok(system
            .iter()
            .zip(&self.gold)
            .map(|(predicted, gold)| project_system_tree(predicted, gold.len()))
            .collect())
    }
}

impl Decoder for CorpusDecoder {
    fn decode(&self, config: &DecoderConfig) -> Result<Decoded> {
        if config.subword != SubwordMode::First {
            tracing::debug!(
                "{} decoder works on whole tokens, ignoring sub-word mode {:?}",
                config.decoder,
                config.subword
            );
        }

        let mut trees = match config.decoder {
            DecoderKind::Conllu => self.system_output_trees(config)?,
            DecoderKind::LeftBranching => self.gold.iter().map(|s| left_branching(s.len())).collect(),
            DecoderKind::RightBranching => {
                self.gold.iter().map(|s| right_branching(s.len())).collect()
            }
        };

        if config.root == RootMode::Gold {
            for (tree, sentence) in trees.iter_mut().zip(&self.gold) {
                attach_gold_root(tree, sentence);
            }
        }

        tracing::info!(
            "{} decoder produced {} trees",
            config.decoder,
            trees.len()
        );

        Ok(Decoded {
            trees,
            sentences: self.gold.clone(),
        })
    }
}

/// Turn a system-output sentence into a decoder tree of `gold_len` edges.
///
/// A sentence tokenized like gold maps edge for edge. Otherwise the system's
/// edges are laid over the gold slots and the final edge keeps the system's
/// last token id, which makes the aligner discard the sentence.
fn project_system_tree(predicted: &Sentence, gold_len: usize) -> Tree {
    let edges: Vec<Edge> = predicted
        .tokens()
        .iter()
        .map(|token| {
            if token.is_root() {
                Edge::DECODER_ROOT
            } else {
                Edge::new(token.id() as i64, token.head() as i64)
            }
        })
        .collect();

    if edges.len() == gold_len {
        return edges;
    }

    let mut tree: Tree = (0..gold_len)
        .map(|slot| {
            edges
                .get(slot)
                .copied()
                .unwrap_or(Edge::new(slot as i64, 0))
        })
        .collect();
    if let (Some(last), Some(system_last)) = (tree.last_mut(), edges.last()) {
        *last = *system_last;
    }
    tree
}

fn left_branching(len: usize) -> Tree {
    (0..len)
        .map(|slot| {
            if slot == 0 {
                Edge::DECODER_ROOT
            } else {
                Edge::new(slot as i64, slot as i64 - 1)
            }
        })
        .collect()
}

fn right_branching(len: usize) -> Tree {
    (0..len)
        .map(|slot| {
            if slot == 0 {
                Edge::DECODER_ROOT
            } else if slot + 1 == len {
                Edge::new(slot as i64, 0)
            } else {
                Edge::new(slot as i64, slot as i64 + 1)
            }
        })
        .collect()
}

/// Attach the gold root dependent to the root slot
fn attach_gold_root(tree: &mut Tree, sentence: &Sentence) {
    for token in sentence.tokens().iter().filter(|t| !t.is_root() && t.head() == 0) {
        if let Some(edge) = tree.get_mut(token.id()) {
            if edge.dependent == token.id() as i64 {
                edge.head = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn gold_sentence() -> Sentence {
        Sentence::with_root(vec![
            Token::new(1, "The", "det", 2),
            Token::new(2, "dog", "nsubj", 3),
            Token::new(3, "barked", "root", 0),
        ])
    }

    fn config(decoder: DecoderKind, root: RootMode) -> DecoderConfig {
        DecoderConfig {
            decoder,
            root,
            ..Default::default()
        }
    }

    #[test]
    fn test_kind_round_trips_through_names() {
        for kind in DecoderKind::ALL {
            assert_eq!(kind.as_str().parse::<DecoderKind>().unwrap(), kind);
        }
        assert!("eisner".parse::<DecoderKind>().is_err());
    }

    #[test]
    fn test_modes_parse() {
        assert_eq!("cls".parse::<RootMode>().unwrap(), RootMode::Cls);
        assert_eq!("mean".parse::<SubwordMode>().unwrap(), SubwordMode::Mean);
        assert!("both".parse::<RootMode>().is_err());
    }

    #[test]
    fn test_right_branching_with_cls_root() {
        let decoder = CorpusDecoder::new(vec![gold_sentence()]);
        let decoded = decoder
            .decode(&config(DecoderKind::RightBranching, RootMode::Cls))
            .unwrap();

        assert_eq!(
            decoded.trees[0],
            vec![
                Edge::DECODER_ROOT,
                Edge::new(1, 2),
                Edge::new(2, 3),
                Edge::new(3, 0)
            ]
        );
        assert_eq!(decoded.sentences.len(), 1);
    }

    #[test]
    fn test_left_branching_with_gold_root() {
        let decoder = CorpusDecoder::new(vec![gold_sentence()]);
        let decoded = decoder
            .decode(&config(DecoderKind::LeftBranching, RootMode::Gold))
            .unwrap();

        // Token 3 is the gold root dependent, so its head is forced to 0
        assert_eq!(
            decoded.trees[0],
            vec![
                Edge::DECODER_ROOT,
                Edge::new(1, 0),
                Edge::new(2, 1),
                Edge::new(3, 0)
            ]
        );
    }

    #[test]
    fn test_conllu_decoder_reads_system_heads() {
        let mut system = NamedTempFile::new().unwrap();
        write!(
            system,
            "1\tThe\t_\t_\t_\t_\t3\tdet\t_\t_\n\
             2\tdog\t_\t_\t_\t_\t3\tnsubj\t_\t_\n\
             3\tbarked\t_\t_\t_\t_\t0\troot\t_\t_\n"
        )
        .unwrap();

        let decoder = CorpusDecoder::new(vec![gold_sentence()]);
        let decoded = decoder
            .decode(&DecoderConfig {
                matrix: system.path().to_path_buf(),
                decoder: DecoderKind::Conllu,
                root: RootMode::Cls,
                subword: SubwordMode::First,
            })
            .unwrap();

        assert_eq!(decoded.trees[0][0], Edge::DECODER_ROOT);
        assert_eq!(decoded.trees[0][1], Edge::new(1, 3));
    }

    #[test]
    fn test_conllu_decoder_sentence_count_mismatch() {
        let mut system = NamedTempFile::new().unwrap();
        write!(system, "1\tHi\t_\t_\t_\t_\t0\troot\t_\t_\n\n1\tYo\t_\t_\t_\t_\t0\troot\t_\t_\n")
            .unwrap();

        let decoder = CorpusDecoder::new(vec![gold_sentence()]);
        let err = decoder
            .decode(&DecoderConfig {
                matrix: system.path().to_path_buf(),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(
            err,
            Error::SentenceCountMismatch {
                gold: 1,
                predicted: 2
            }
        ));
    }

    #[test]
    fn test_retokenized_sentence_keeps_system_final_id() {
        let system = Sentence::with_root(vec![
            Token::new(1, "The", "det", 2),
            Token::new(2, "dog", "nsubj", 4),
            Token::new(3, "bark", "root", 0),
            Token::new(4, "ed", "dep", 3),
        ]);

        let tree = project_system_tree(&system, 4);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.last().unwrap().dependent, 4);
    }
}
