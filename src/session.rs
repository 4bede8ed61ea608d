//! Quiz session state machine
//!
//! A session walks through the selected words one at a time. Each word gets
//! up to two attempts:
//! - correct first time: Mastered, level up
//! - correct second time: Faulted, level unchanged
//! - wrong twice: Failed, level down
//!
//! Every submission returns the ordered list of events it produced. Store
//! failures during grading are logged and never interrupt the session.

use serde::Serialize;

use crate::selection::Selection;
use crate::storage::LevelStore;
use crate::types::{Category, Outcome, ShiftDirection, Word};

// ==================== Events ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SessionEvent {
    /// Fewer than 5 unfamiliar words were available for this session
    LowUnfamiliarWords { available: usize },
    /// A new word is current; `position` is 1-based
    NextWord { position: usize, word: Word },
    /// The answer held a character that is neither a letter, an apostrophe
    /// nor part of the current word
    InvalidInput,
    SpeltCorrectly { word: Word },
    /// First attempt was wrong, the same word is asked again
    SpeltWrongly { word: Word },
    /// Correct on the second attempt
    Faulted { word: Word },
    FailedWord { correct_spelling: Word },
    EndOfQuiz(SessionSummary),
}

// ==================== Summary ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    WellDone,
    GoodEffort,
    MorePracticeNeeded,
}

impl ScoreBand {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy > 0.80 {
            ScoreBand::WellDone
        } else if accuracy > 0.30 {
            ScoreBand::GoodEffort
        } else {
            ScoreBand::MorePracticeNeeded
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreBand::WellDone => "Well done!",
            ScoreBand::GoodEffort => "Good effort, keep practising.",
            ScoreBand::MorePracticeNeeded => "More practice needed.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub category: Category,
    /// Words spelt correctly on the first attempt
    pub mastered: usize,
    /// Words resolved before the session ended
    pub attempted: usize,
    /// Every word selected for the session
    pub words: Vec<Word>,
}

impl SessionSummary {
    /// Share of attempted words mastered, 0.0 when nothing was attempted
    pub fn accuracy(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.mastered as f64 / self.attempted as f64
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_accuracy(self.accuracy())
    }
}

// ==================== State ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// `index` is 0-based into the session words
    AwaitingAnswer { index: usize, attempt: Attempt },
    Completed,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    category: Category,
    words: Vec<Word>,
    state: SessionState,
    mastered: usize,
    resolved: usize,
}

impl QuizSession {
    /// Start a session over selected words. The returned events announce the
    /// first word, preceded by the low-unfamiliar advisory when raised.
    pub fn start(selection: Selection) -> (Self, Vec<SessionEvent>) {
        let mut events = Vec::new();
        if selection.low_unfamiliar_words {
            events.push(SessionEvent::LowUnfamiliarWords {
                available: selection.allocation[0],
            });
        }

        let state = if selection.words.is_empty() {
            SessionState::Completed
        } else {
            SessionState::AwaitingAnswer {
                index: 0,
                attempt: Attempt::First,
            }
        };
        let session = Self {
            category: selection.category,
            words: selection.words,
            state,
            mastered: 0,
            resolved: 0,
        };
        if let Some(word) = session.current_word() {
            events.push(SessionEvent::NextWord {
                position: 1,
                word: word.clone(),
            });
        }
        (session, events)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn mastered(&self) -> usize {
        self.mastered
    }

    pub fn current_word(&self) -> Option<&Word> {
        match self.state {
            SessionState::AwaitingAnswer { index, .. } => self.words.get(index),
            SessionState::Completed => None,
        }
    }

    /// 1-based position of the current word
    pub fn position(&self) -> Option<usize> {
        match self.state {
            SessionState::AwaitingAnswer { index, .. } => Some(index + 1),
            SessionState::Completed => None,
        }
    }

    pub fn attempt(&self) -> Option<Attempt> {
        match self.state {
            SessionState::AwaitingAnswer { attempt, .. } => Some(attempt),
            SessionState::Completed => None,
        }
    }

    /// Grade one answer against the current word
    pub fn submit_answer(&mut self, store: &LevelStore, answer: &str) -> Vec<SessionEvent> {
        let SessionState::AwaitingAnswer { index, attempt } = self.state else {
            return Vec::new();
        };
        let answer = answer.trim().to_lowercase();
        if answer.is_empty() {
            return Vec::new();
        }
        let Some(word) = self.words.get(index).cloned() else {
            return Vec::new();
        };

        if !is_acceptable_answer(&answer, &word) {
            return vec![SessionEvent::InvalidInput];
        }

        let mut events = Vec::new();
        let correct = answer == word.as_str();
        match (correct, attempt) {
            (true, Attempt::First) => {
                self.record(store, Outcome::Mastered, &word);
                self.shift(store, ShiftDirection::Up, &word);
                self.mastered += 1;
                events.push(SessionEvent::SpeltCorrectly { word });
                self.advance(index, &mut events);
            }
            (true, Attempt::Second) => {
                self.record(store, Outcome::Faulted, &word);
                events.push(SessionEvent::Faulted { word });
                self.advance(index, &mut events);
            }
            (false, Attempt::First) => {
                self.state = SessionState::AwaitingAnswer {
                    index,
                    attempt: Attempt::Second,
                };
                events.push(SessionEvent::SpeltWrongly { word });
            }
            (false, Attempt::Second) => {
                self.record(store, Outcome::Failed, &word);
                self.shift(store, ShiftDirection::Down, &word);
                events.push(SessionEvent::FailedWord {
                    correct_spelling: word,
                });
                self.advance(index, &mut events);
            }
        }
        events
    }

    /// End the session now. Unresolved words are left untouched.
    pub fn abandon(&mut self) -> SessionSummary {
        if !self.is_completed() {
            tracing::info!(
                category = %self.category,
                resolved = self.resolved,
                "session abandoned"
            );
        }
        self.state = SessionState::Completed;
        self.summary()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            category: self.category,
            mastered: self.mastered,
            attempted: self.resolved,
            words: self.words.clone(),
        }
    }

    fn advance(&mut self, index: usize, events: &mut Vec<SessionEvent>) {
        self.resolved += 1;
        let next = index + 1;
        match self.words.get(next) {
            Some(word) => {
                self.state = SessionState::AwaitingAnswer {
                    index: next,
                    attempt: Attempt::First,
                };
                events.push(SessionEvent::NextWord {
                    position: next + 1,
                    word: word.clone(),
                });
            }
            None => {
                self.state = SessionState::Completed;
                let summary = self.summary();
                tracing::info!(
                    category = %self.category,
                    mastered = summary.mastered,
                    attempted = summary.attempted,
                    "session completed"
                );
                events.push(SessionEvent::EndOfQuiz(summary));
            }
        }
    }

    fn record(&self, store: &LevelStore, outcome: Outcome, word: &Word) {
        if let Err(e) = store.record_outcome(self.category, outcome, word) {
            tracing::warn!(category = %self.category, %word, ?outcome, error = %e, "failed to record outcome");
        }
    }

    fn shift(&self, store: &LevelStore, direction: ShiftDirection, word: &Word) {
        if let Err(e) = store.shift_level(self.category, direction, word) {
            tracing::warn!(category = %self.category, %word, ?direction, error = %e, "failed to shift level");
        }
    }
}

/// Letters and apostrophes are always accepted; any other character only
/// when the word itself contains it.
fn is_acceptable_answer(answer: &str, word: &Word) -> bool {
    answer
        .chars()
        .all(|c| c.is_alphabetic() || c == '\'' || word.contains_char(c))
}
