//! Common Types and Constants
//!
//! Shared vocabulary of the spelling engine: categories, familiarity levels,
//! selection tiers, quiz outcomes and the validated [`Word`] type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Number of words quizzed in one session
pub const SESSION_WORD_COUNT: usize = 10;

/// Number of familiarity levels per category
pub const LEVEL_COUNT: usize = 5;

/// Number of stats logs per category (mastered, faulted, failed)
pub const OUTCOME_COUNT: usize = 3;

/// Number of word categories
pub const CATEGORY_COUNT: usize = 4;

// ==================== Category ====================

/// Grammatical word category. Declaration order is the section order of
/// bulk-import files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Adjectives,
    Adverbs,
    Nouns,
    Verbs,
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Adjectives,
        Category::Adverbs,
        Category::Nouns,
        Category::Verbs,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Folder name used by the on-disk layout
    pub fn folder_name(self) -> &'static str {
        match self {
            Category::Adjectives => "adjectives",
            Category::Adverbs => "adverbs",
            Category::Nouns => "nouns",
            Category::Verbs => "verbs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Adjectives => "Adjectives",
            Category::Adverbs => "Adverbs",
            Category::Nouns => "Nouns",
            Category::Verbs => "Verbs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.folder_name() == needle)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// ==================== Level ====================

/// Familiarity level, 1 = least familiar, 5 = most familiar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Level {
    pub const ALL: [Level; LEVEL_COUNT] = [
        Level::One,
        Level::Two,
        Level::Three,
        Level::Four,
        Level::Five,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based bucket index
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn from_value(value: u8) -> Option<Level> {
        Level::ALL.into_iter().find(|l| l.value() == value)
    }

    /// Adjacent level in the given direction, `None` at the boundary
    pub fn shifted(self, direction: ShiftDirection) -> Option<Level> {
        match direction {
            ShiftDirection::Up => Level::from_value(self.value() + 1),
            ShiftDirection::Down => Level::from_value(self.value().saturating_sub(1)),
        }
    }

    pub fn tier(self) -> Tier {
        match self {
            Level::One | Level::Two => Tier::Unfamiliar,
            Level::Three | Level::Four => Tier::Familiar,
            Level::Five => Tier::VeryFamiliar,
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.value()
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::from_value(value).ok_or_else(|| format!("level out of range: {value}"))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

// ==================== Tier ====================

/// Grouping of levels used by word selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Unfamiliar,
    Familiar,
    VeryFamiliar,
}

impl Tier {
    /// Priority order: least familiar first
    pub const ALL: [Tier; 3] = [Tier::Unfamiliar, Tier::Familiar, Tier::VeryFamiliar];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Nominal number of session words drawn from this tier
    pub fn quota(self) -> usize {
        match self {
            Tier::Unfamiliar => 5,
            Tier::Familiar => 3,
            Tier::VeryFamiliar => 2,
        }
    }

    pub fn levels(self) -> &'static [Level] {
        match self {
            Tier::Unfamiliar => &[Level::One, Level::Two],
            Tier::Familiar => &[Level::Three, Level::Four],
            Tier::VeryFamiliar => &[Level::Five],
        }
    }
}

// ==================== Outcome / Shift ====================

/// Result of quizzing a single word
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// Correct on the first attempt
    Mastered,
    /// Correct on the second attempt
    Faulted,
    /// Wrong on both attempts
    Failed,
}

impl Outcome {
    pub const ALL: [Outcome; OUTCOME_COUNT] = [Outcome::Mastered, Outcome::Faulted, Outcome::Failed];

    pub fn index(self) -> usize {
        self as usize
    }

    /// File name of the stats log
    pub fn file_name(self) -> &'static str {
        match self {
            Outcome::Mastered => "Mastered",
            Outcome::Faulted => "Faulted",
            Outcome::Failed => "Failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftDirection {
    Up,
    Down,
}

// ==================== Word ====================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid word {0:?}: only letters and apostrophes are allowed")]
pub struct InvalidWord(pub String);

/// A lowercase vocabulary word.
///
/// Identity is case-insensitive: every constructor lowercases its input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    /// Validate user-supplied text: trimmed, non-empty, `[a-zA-Z']+`
    pub fn parse(raw: &str) -> Result<Self, InvalidWord> {
        let candidate = raw.trim().to_lowercase();
        let valid = !candidate.is_empty()
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphabetic() || c == '\'');
        if valid {
            Ok(Word(candidate))
        } else {
            Err(InvalidWord(candidate))
        }
    }

    /// Lenient constructor for lines read back from disk. Hand-edited files
    /// may hold words with other characters (hyphens, accents) and those
    /// still get quizzed.
    pub(crate) fn from_stored(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Word(trimmed.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains_char(&self, c: char) -> bool {
        self.0.contains(c)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Word {
    type Err = InvalidWord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Word::parse(s)
    }
}

impl TryFrom<String> for Word {
    type Error = InvalidWord;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Word::parse(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> String {
        word.0
    }
}

/// Per-category level buckets, index 0 = level 1
pub type LevelBuckets = [Vec<Word>; LEVEL_COUNT];

/// Per-category stats logs in [`Outcome::ALL`] order
pub type StatsLogs = [Vec<Word>; OUTCOME_COUNT];
