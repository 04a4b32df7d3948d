//! CoNLL-U corpus reader
//!
//! Reads gold treebanks (and system outputs in the same format) into
//! [`Sentence`]s. Every sentence gets the implicit root token in slot 0, so
//! token positions equal CoNLL-U word ids.

use crate::error::{Error, Result};
use crate::token::{Sentence, Token};
use std::fs;
use std::path::{Path, PathBuf};

const COLUMNS: usize = 10;
const ID: usize = 0;
const FORM: usize = 1;
const HEAD: usize = 6;
const DEPREL: usize = 7;

/// Read a CoNLL-U file
pub fn read_conllu(path: &Path) -> Result<Vec<Sentence>> {
    let text = fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let sentences = parse_conllu(&text, path)?;
    tracing::debug!("read {} sentences from {}", sentences.len(), path.display());
    Ok(sentences)
}

/// Read several CoNLL-U files and concatenate their sentences in order.
///
/// `on_file` is called after each file with its path and sentence count.
pub fn read_conllu_files<P, F>(paths: &[P], mut on_file: F) -> Result<Vec<Sentence>>
where
    P: AsRef<Path>,
    F: FnMut(&Path, usize),
{
    let mut sentences = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let read = read_conllu(path)?;
        on_file(path, read.len());
        sentences.extend(read);
    }
    Ok(sentences)
}

/// Parse CoNLL-U text; `source` only labels errors
pub fn parse_conllu(text: &str, source: &Path) -> Result<Vec<Sentence>> {
    let mut sentences = Vec::new();
    let mut words: Vec<Token> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            if !words.is_empty() {
                sentences.push(Sentence::with_root(std::mem::take(&mut words)));
            }
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        let fail = |message: String| Error::Parse {
            path: source.to_path_buf(),
            line: index + 1,
            message,
        };

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() != COLUMNS {
            return Err(fail(format!(
                "expected {COLUMNS} tab-separated columns, found {}",
                columns.len()
            )));
        }

        // Multi-word ranges and empty nodes carry no attachment of their own
        let id_field = columns[ID];
        if id_field.contains('-') || id_field.contains('.') {
            continue;
        }

        let id: usize = id_field
            .parse()
            .map_err(|_| fail(format!("invalid token id '{id_field}'")))?;
        if id != words.len() + 1 {
            return Err(fail(format!(
                "token id {id} out of sequence, expected {}",
                words.len() + 1
            )));
        }

        let head_field = columns[HEAD];
        let head: usize = head_field
            .parse()
            .map_err(|_| fail(format!("invalid head '{head_field}'")))?;

        words.push(Token::new(id, columns[FORM], columns[DEPREL], head));
    }

    if !words.is_empty() {
        sentences.push(Sentence::with_root(words));
    }

    Ok(sentences)
}

/// Label used for in-memory sources in error messages
pub fn memory_source() -> PathBuf {
    PathBuf::from("<memory>")
}
