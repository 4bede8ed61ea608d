//! # danci-spell - spelling mastery engine
//!
//! Tracks how well a learner spells words in four grammatical categories and
//! runs short adaptive quizzes:
//!
//! - **LevelStore** - words per familiarity level (1..5) plus append-only
//!   outcome logs, persisted as plain text files
//! - **GameWordSelector** - picks 10 words per session, 5/3/2 over the
//!   unfamiliar/familiar/very familiar tiers with cascading fallback
//! - **QuizSession** - two-attempt grading that moves words between levels
//! - **StatsAggregator** - per-word and per-category accuracy
//!
//! ## Module layout
//!
//! - [`types`] - categories, levels, tiers, outcomes, [`Word`]
//! - [`storage`] - [`LevelStore`] and its on-disk layout
//! - [`selection`] - quota allocation and word sampling
//! - [`session`] - the quiz state machine and its events
//! - [`stats`] - scoreboard rows and accuracy
//! - [`wordlist`] - bulk import and partial edits
//! - [`speech`] - the audio collaborator
//! - [`engine`] - [`SpellingEngine`], the facade used by front ends
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use danci_spell::{Category, LevelStore, SilentSpeaker, SpellingEngine};
//!
//! let store = Arc::new(LevelStore::open("./.quiz")?);
//! let engine = SpellingEngine::new(store, Arc::new(SilentSpeaker));
//! engine.add_words(Category::Nouns, ["apple", "berry", "cherry"])?;
//!
//! let mut started = engine.new_session(Category::Nouns)?;
//! let events = engine.submit_answer(&mut started.session, "apple");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod engine;
pub mod logging;
pub mod selection;
pub mod session;
pub mod speech;
pub mod stats;
pub mod storage;
pub mod types;
pub mod wordlist;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use engine::{EngineError, EngineResult, NewSession, SpellingEngine};

pub use selection::{allocate_quotas, GameWordSelector, Selection, SelectionError};

pub use session::{Attempt, QuizSession, ScoreBand, SessionEvent, SessionState, SessionSummary};

pub use speech::{Cue, FestivalSpeaker, SilentSpeaker, Speaker, SpeechConfig, Voice};

pub use stats::{StatsAggregator, WordStats};

pub use storage::{LevelStore, StorageError, StorageResult};

pub use wordlist::{
    parse_word_list, read_word_list_file, CategoryWordLists, PartialEdit, PartialEditReport,
    WordListError,
};
