//! Attachment edges and trees

use crate::token::Sentence;
use std::fmt;

/// A (dependent, head) attachment pair
///
/// Identifiers are signed because decoders mark the root slot with a head
/// of `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Dependent token identifier
    pub dependent: i64,
    /// Head token identifier
    pub head: i64,
}

impl Edge {
    /// Root slot as emitted by decoders
    pub const DECODER_ROOT: Edge = Edge::new(0, -1);

    /// Root slot as found in gold data
    pub const GOLD_ROOT: Edge = Edge::new(0, 0);

    /// Create an edge
    pub const fn new(dependent: i64, head: i64) -> Self {
        Self { dependent, head }
    }

    /// Whether a predicted/gold pair is the root slot and must not be scored.
    ///
    /// The comparison is literal: a predicted `(0,0)` is scored like any other
    /// edge.
    pub fn is_root_pair(predicted: &Edge, gold: &Edge) -> bool {
        *predicted == Self::DECODER_ROOT && *gold == Self::GOLD_ROOT
    }
}

impl From<(i64, i64)> for Edge {
    fn from((dependent, head): (i64, i64)) -> Self {
        Self::new(dependent, head)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.dependent, self.head)
    }
}

/// Edges of one sentence, index-aligned with its tokens
pub type Tree = Vec<Edge>;

/// Extract the gold tree of a sentence as (id, head) pairs in corpus order
pub fn gold_tree(sentence: &Sentence) -> Tree {
    sentence
        .tokens()
        .iter()
        .map(|token| Edge::new(token.id() as i64, token.head() as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    #[test]
    fn test_gold_tree_follows_corpus_order() {
        let sentence = Sentence::with_root(vec![
            Token::new(1, "The", "det", 2),
            Token::new(2, "dog", "nsubj", 3),
            Token::new(3, "barked", "root", 0),
        ]);

        let tree = gold_tree(&sentence);
        assert_eq!(
            tree,
            vec![
                Edge::GOLD_ROOT,
                Edge::new(1, 2),
                Edge::new(2, 3),
                Edge::new(3, 0)
            ]
        );
    }

    #[test]
    fn test_root_pair_is_literal() {
        assert!(Edge::is_root_pair(&Edge::DECODER_ROOT, &Edge::GOLD_ROOT));
        assert!(!Edge::is_root_pair(&Edge::GOLD_ROOT, &Edge::GOLD_ROOT));
        assert!(!Edge::is_root_pair(&Edge::DECODER_ROOT, &Edge::new(1, 0)));
    }

    #[test]
    fn test_edge_from_tuple() {
        assert_eq!(Edge::from((4, 2)), Edge::new(4, 2));
        assert_eq!(Edge::new(4, 2).to_string(), "(4,2)");
    }
}
