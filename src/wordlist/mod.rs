//! Word-list editing
//!
//! Bulk import replaces the whole vocabulary from a sectioned text file:
//!
//! ```text
//! %Adjectives
//! quick
//! %Adverbs
//! quickly
//! %Nouns
//! fox
//! %Verbs
//! jump
//! ```
//!
//! Sections are positional (adjectives, adverbs, nouns, verbs); the text
//! after `%` is a label only. Partial edits add or remove individual words
//! of one category.

pub mod partial;

pub use partial::{PartialEdit, PartialEditReport};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::storage::StorageError;
use crate::types::{Word, CATEGORY_COUNT};

// ============================================================
// Errors
// ============================================================

#[derive(Error, Debug)]
pub enum WordListError {
    #[error("incorrectly formatted word list: expected 4 sections, found {sections}")]
    IncorrectlyFormattedFile { sections: usize },

    #[error("invalid character in word {word:?}")]
    InvalidCharacter { word: String },

    #[error("cannot read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One list of level-1 words per category, in [`crate::types::Category::ALL`] order
pub type CategoryWordLists = [Vec<Word>; CATEGORY_COUNT];

// ============================================================
// Parsing
// ============================================================

/// Parse a sectioned word list.
///
/// Validation is all-or-nothing: nothing is returned unless every word is
/// valid and there are exactly four sections.
pub fn parse_word_list(text: &str) -> Result<CategoryWordLists, WordListError> {
    let mut sections: Vec<Vec<Word>> = Vec::with_capacity(CATEGORY_COUNT);

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('%') {
            sections.push(Vec::new());
            continue;
        }

        let word = Word::parse(line).map_err(|e| WordListError::InvalidCharacter { word: e.0 })?;
        let Some(section) = sections.last_mut() else {
            return Err(WordListError::IncorrectlyFormattedFile { sections: 0 });
        };
        if !section.contains(&word) {
            section.push(word);
        }
    }

    let found = sections.len();
    let lists: CategoryWordLists = sections
        .try_into()
        .map_err(|_| WordListError::IncorrectlyFormattedFile { sections: found })?;

    tracing::debug!(
        words = lists.iter().map(Vec::len).sum::<usize>(),
        "word list parsed"
    );
    Ok(lists)
}

pub fn read_word_list_file<P: AsRef<Path>>(path: P) -> Result<CategoryWordLists, WordListError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| WordListError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_word_list(&String::from_utf8_lossy(&bytes))
}
