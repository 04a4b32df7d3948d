//! Per-sentence attachment diffs

use crate::align::{AlignedSentence, Alignment};
use crate::token::Sentence;
use crate::tree::Edge;
use std::io::{self, Write};

/// Render one line per non-root token: `CORR` when the predicted edge equals
/// the gold edge, otherwise the gold (`OLD`) and predicted (`NEW`) heads.
pub fn example_lines(aligned: &AlignedSentence<'_>) -> Vec<String> {
    let sentence = aligned.sentence;

    sentence
        .tokens()
        .iter()
        .zip(aligned.predicted.iter())
        .zip(aligned.gold.iter())
        .skip(1)
        .map(|((token, predicted), gold)| {
            if predicted == gold {
                format!("{token}\tCORR")
            } else {
                format!(
                    "{token}\tOLD:{}\tNEW:{}",
                    describe_head(sentence, gold),
                    describe_head(sentence, predicted)
                )
            }
        })
        .collect()
}

fn describe_head(sentence: &Sentence, edge: &Edge) -> String {
    usize::try_from(edge.head)
        .ok()
        .and_then(|head| sentence.get(head))
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("{}|?|?", edge.head))
}

/// Write the diff of retained sentence `sentence_id`.
///
/// Returns `false` when no such sentence was retained.
pub fn write_example<W: Write>(
    alignment: &Alignment<'_>,
    sentence_id: usize,
    writer: &mut W,
) -> io::Result<bool> {
    let Some(aligned) = alignment.sentence(sentence_id) else {
        return Ok(false);
    };

    for line in example_lines(aligned) {
        writeln!(writer, "{line}")?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;
    use crate::token::Token;
    use crate::tree::Tree;

    fn sentence() -> Sentence {
        Sentence::with_root(vec![
            Token::new(1, "The", "det", 2),
            Token::new(2, "dog", "nsubj", 3),
            Token::new(3, "barked", "root", 0),
        ])
    }

    #[test]
    fn test_lines_mark_correct_and_changed_heads() {
        let sentences = vec![sentence()];
        let trees: Vec<Tree> = vec![vec![
            Edge::DECODER_ROOT,
            Edge::new(1, 3),
            Edge::new(2, 3),
            Edge::new(3, 0),
        ]];
        let alignment = align(&trees, &sentences).unwrap();

        let lines = example_lines(alignment.sentence(0).unwrap());
        assert_eq!(
            lines,
            vec![
                "1|The|det\tOLD:2|dog|nsubj\tNEW:3|barked|root".to_string(),
                "2|dog|nsubj\tCORR".to_string(),
                "3|barked|root\tCORR".to_string(),
            ]
        );
    }

    #[test]
    fn test_write_example_unknown_sentence() {
        let alignment = Alignment::default();
        let mut out = Vec::new();
        assert!(!write_example(&alignment, 0, &mut out).unwrap());
        assert!(out.is_empty());
    }
}
