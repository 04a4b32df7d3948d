//! Pairing predicted trees with gold trees
//!
//! The aligner turns decoder output into a flat stream of
//! [`ComparisonRecord`]s, one per scored token, and keeps the retained
//! sentences around for example rendering.

use crate::error::{Error, Result};
use crate::token::{Sentence, Token};
use crate::tree::{gold_tree, Edge, Tree};

/// One scored token: its predicted and gold heads
///
/// The three tokens are borrowed from the same sentence. Whether the
/// attachment is correct is decided by token identity, not by label.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonRecord<'a> {
    /// Dense id of the retained sentence
    pub sentence_id: usize,
    /// The dependent token
    pub token: &'a Token,
    /// Head chosen by the decoder
    pub head: &'a Token,
    /// Head in the gold tree
    pub gold_head: &'a Token,
}

impl ComparisonRecord<'_> {
    /// Whether predicted and gold head are the same corpus position
    pub fn is_correct(&self) -> bool {
        std::ptr::eq(self.head, self.gold_head)
    }

    /// Distance from the dependent to its predicted head
    pub fn distance(&self) -> usize {
        self.head.id().abs_diff(self.token.id())
    }

    /// Distance from the dependent to its gold head
    pub fn gold_distance(&self) -> usize {
        self.gold_head.id().abs_diff(self.token.id())
    }
}

/// A sentence that survived alignment
#[derive(Debug, Clone)]
pub struct AlignedSentence<'a> {
    /// Gold tokens
    pub sentence: &'a Sentence,
    /// Decoder tree
    pub predicted: &'a Tree,
    /// Tree extracted from the gold tokens
    pub gold: Tree,
}

/// Output of the aligner
#[derive(Debug, Clone, Default)]
pub struct Alignment<'a> {
    /// Comparison records of all retained sentences, in order
    pub records: Vec<ComparisonRecord<'a>>,
    /// Retained sentences; position equals sentence id
    pub sentences: Vec<AlignedSentence<'a>>,
    /// Number of sentences discarded for tokenization mismatch
    pub dropped: usize,
}

impl<'a> Alignment<'a> {
    /// Retained sentence by dense id
    pub fn sentence(&self, sentence_id: usize) -> Option<&AlignedSentence<'a>> {
        self.sentences.get(sentence_id)
    }

    /// Number of retained sentences
    pub fn retained(&self) -> usize {
        self.sentences.len()
    }
}

/// Align predicted trees with their gold sentences.
///
/// Length disagreements and heads outside the sentence are contract
/// violations: the whole alignment fails and no records are returned.
/// Sentences whose final dependent id differs between prediction and gold
/// are dropped without advancing the sentence id.
pub fn align<'a>(trees: &'a [Tree], sentences: &'a [Sentence]) -> Result<Alignment<'a>> {
    if trees.len() != sentences.len() {
        return Err(Error::TreeCountMismatch {
            trees: trees.len(),
            sentences: sentences.len(),
        });
    }

    let mut alignment = Alignment::default();

    for (index, (predicted, sentence)) in trees.iter().zip(sentences).enumerate() {
        let gold = gold_tree(sentence);

        if predicted.len() != gold.len() || gold.len() != sentence.len() {
            return Err(Error::LengthMismatch {
                sentence: index,
                predicted: predicted.len(),
                gold: gold.len(),
                tokens: sentence.len(),
            });
        }

        let predicted_last = predicted.last().map(|edge| edge.dependent);
        let gold_last = gold.last().map(|edge| edge.dependent);
        if predicted_last != gold_last {
            tracing::debug!(
                "dropping sentence {index}: final dependent {predicted_last:?} != gold {gold_last:?}"
            );
            alignment.dropped += 1;
            continue;
        }

        let sentence_id = alignment.sentences.len();
        for ((edge, gold_edge), token) in predicted.iter().zip(&gold).zip(sentence.tokens()) {
            if Edge::is_root_pair(edge, gold_edge) {
                continue;
            }

            alignment.records.push(ComparisonRecord {
                sentence_id,
                token,
                head: resolve_head(sentence, index, edge)?,
                gold_head: resolve_head(sentence, index, gold_edge)?,
            });
        }

        alignment.sentences.push(AlignedSentence {
            sentence,
            predicted,
            gold,
        });
    }

    tracing::info!(
        "aligned {} sentences ({} dropped), {} comparison records",
        alignment.retained(),
        alignment.dropped,
        alignment.records.len()
    );

    Ok(alignment)
}

fn resolve_head<'a>(sentence: &'a Sentence, index: usize, edge: &Edge) -> Result<&'a Token> {
    usize::try_from(edge.head)
        .ok()
        .and_then(|head| sentence.get(head))
        .ok_or(Error::HeadOutOfRange {
            sentence: index,
            dependent: edge.dependent,
            head: edge.head,
        })
}
