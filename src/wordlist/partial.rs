//! Add or remove individual words of one category.

use serde::Serialize;

use super::WordListError;
use crate::storage::LevelStore;
use crate::types::{Category, Level, Word};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialEdit {
    pub category: Category,
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialEditReport {
    /// Words newly placed at level 1
    pub added: Vec<Word>,
    /// Words not added because they were already present
    pub skipped: Vec<Word>,
    /// Words that were found and removed
    pub removed: Vec<Word>,
}

impl PartialEdit {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            add: Vec::new(),
            remove: Vec::new(),
        }
    }

    pub fn adding<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn removing<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remove.extend(words.into_iter().map(Into::into));
        self
    }

    /// Validate every word up front, returning `(add, remove)`
    pub fn validate(&self) -> Result<(Vec<Word>, Vec<Word>), WordListError> {
        let parse_all = |raw: &[String]| -> Result<Vec<Word>, WordListError> {
            raw.iter()
                .filter(|w| !w.trim().is_empty())
                .map(|w| Word::parse(w).map_err(|e| WordListError::InvalidCharacter { word: e.0 }))
                .collect()
        };
        Ok((parse_all(&self.add)?, parse_all(&self.remove)?))
    }

    /// Apply the edit. Additions run before removals, so a word listed in
    /// both ends up removed.
    pub fn apply(&self, store: &LevelStore) -> Result<PartialEditReport, WordListError> {
        let (add, remove) = self.validate()?;
        let mut report = PartialEditReport::default();

        for word in add {
            if store.add_word(self.category, Level::One, &word)? {
                report.added.push(word);
            } else {
                report.skipped.push(word);
            }
        }

        for word in remove {
            let mut found = store.remove_word_from_all_stats(self.category, &word)? > 0;
            for level in Level::ALL {
                found |= store.remove_word(self.category, level, &word)?;
            }
            if found {
                report.removed.push(word);
            }
        }

        tracing::info!(
            category = %self.category,
            added = report.added.len(),
            skipped = report.skipped.len(),
            removed = report.removed.len(),
            "word list edited"
        );
        Ok(report)
    }
}
