//! Corpus file reading

use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use depcube_core::{read_conllu_files, Sentence};
use std::path::PathBuf;

/// Reads CoNLL-U corpora with progress reporting
pub struct CorpusReader;

impl CorpusReader {
    /// Read files in order and concatenate their sentences
    pub fn read_all(paths: &[PathBuf], progress: &mut ProgressReporter) -> Result<Vec<Sentence>> {
        progress.init_files(paths.len() as u64);

        let sentences = read_conllu_files(paths, |path, count| {
            log::debug!("{}: {} sentences", path.display(), count);
            progress.file_completed(&path.display().to_string());
        })
        .context("Failed to read gold corpus")?;

        log::info!("read {} gold sentences from {} files", sentences.len(), paths.len());
        Ok(sentences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ONE: &str = "1\tHi\t_\t_\t_\t_\t0\troot\t_\t_\n";
    const TWO: &str = "1\tGo\t_\t_\t_\t_\t0\troot\t_\t_\n\n1\tNo\t_\t_\t_\t_\t0\troot\t_\t_\n";

    #[test]
    fn test_read_all_concatenates_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.conllu");
        let second = temp_dir.path().join("b.conllu");
        fs::write(&first, ONE).unwrap();
        fs::write(&second, TWO).unwrap();

        let mut progress = ProgressReporter::new(true);
        let sentences = CorpusReader::read_all(&[first, second], &mut progress).unwrap();

        let forms: Vec<&str> = sentences.iter().map(|s| s.tokens()[1].form()).collect();
        assert_eq!(forms, ["Hi", "Go", "No"]);
    }

    #[test]
    fn test_read_all_nonexistent_file() {
        let mut progress = ProgressReporter::new(true);
        let err = CorpusReader::read_all(&[PathBuf::from("/nonexistent/gold.conllu")], &mut progress)
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Failed to read gold corpus"));
        assert!(message.contains("/nonexistent/gold.conllu"));
    }

    #[test]
    fn test_parse_error_carries_location() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.conllu");
        fs::write(&path, "1\tHi\t_\t_\t_\t_\t_\troot\t_\t_\n").unwrap();

        let mut progress = ProgressReporter::new(true);
        let err = CorpusReader::read_all(&[path], &mut progress).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("bad.conllu"));
        assert!(message.contains("invalid head"));
    }
}
