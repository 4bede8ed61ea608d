//! Engine facade
//!
//! The API consumed by a presentation layer: start sessions, grade answers,
//! read the scoreboard and edit the vocabulary. Session events are also
//! turned into speech here so callers only render them.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::selection::{GameWordSelector, SelectionError};
use crate::session::{QuizSession, SessionEvent, SessionSummary};
use crate::speech::{Cue, Speaker, Voice};
use crate::stats::{StatsAggregator, WordStats};
use crate::storage::{LevelStore, StorageError};
use crate::types::Category;
use crate::wordlist::{self, CategoryWordLists, PartialEdit, PartialEditReport, WordListError};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    WordList(#[from] WordListError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// A started session with the events announcing it
#[derive(Debug)]
pub struct NewSession {
    pub session: QuizSession,
    pub events: Vec<SessionEvent>,
}

pub struct SpellingEngine {
    store: Arc<LevelStore>,
    speaker: Arc<dyn Speaker>,
    selector: Mutex<GameWordSelector>,
}

impl SpellingEngine {
    pub fn new(store: Arc<LevelStore>, speaker: Arc<dyn Speaker>) -> Self {
        Self::with_selector(store, speaker, GameWordSelector::new())
    }

    pub fn with_selector(
        store: Arc<LevelStore>,
        speaker: Arc<dyn Speaker>,
        selector: GameWordSelector,
    ) -> Self {
        Self {
            store,
            speaker,
            selector: Mutex::new(selector),
        }
    }

    pub fn store(&self) -> &LevelStore {
        &self.store
    }

    // ============================================================
    // Sessions
    // ============================================================

    pub fn new_session(&self, category: Category) -> EngineResult<NewSession> {
        let selection = self.selector.lock().select_from_store(&self.store, category)?;
        let (session, events) = QuizSession::start(selection);
        tracing::info!(%category, words = session.words().len(), "session started");
        self.announce(&session, &events);
        Ok(NewSession { session, events })
    }

    pub fn submit_answer(&self, session: &mut QuizSession, answer: &str) -> Vec<SessionEvent> {
        let events = session.submit_answer(&self.store, answer);
        self.announce(session, &events);
        events
    }

    /// Say the current word again; the session is not touched
    pub fn relisten(&self, session: &QuizSession) {
        if let Some(word) = session.current_word() {
            self.speaker.relisten(word);
        }
    }

    pub fn abandon(&self, session: &mut QuizSession) -> SessionSummary {
        session.abandon()
    }

    fn announce(&self, session: &QuizSession, events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::NextWord { word, .. } => self.speaker.speak_word(word),
                SessionEvent::SpeltCorrectly { .. } | SessionEvent::Faulted { .. } => {
                    self.speaker.play_cue(Cue::Correct)
                }
                SessionEvent::SpeltWrongly { word } => {
                    self.speaker.play_cue(Cue::Incorrect);
                    self.speaker.speak_retry(word);
                }
                SessionEvent::FailedWord { .. } => self.speaker.play_cue(Cue::Incorrect),
                SessionEvent::InvalidInput => {
                    if let Some(word) = session.current_word() {
                        self.speaker.speak_word(word);
                    }
                }
                SessionEvent::LowUnfamiliarWords { .. } | SessionEvent::EndOfQuiz(_) => {}
            }
        }
    }

    // ============================================================
    // Scoreboard
    // ============================================================

    pub fn get_stats(&self, category: Category) -> Vec<WordStats> {
        StatsAggregator::for_category(&self.store, category)
    }

    pub fn get_category_accuracy(&self, category: Category) -> u8 {
        StatsAggregator::category_accuracy(&self.get_stats(category))
    }

    // ============================================================
    // Vocabulary
    // ============================================================

    pub fn reset_category(&self, category: Category) -> EngineResult<()> {
        self.store.reset_category(category)?;
        Ok(())
    }

    pub fn add_words<I, S>(&self, category: Category, words: I) -> EngineResult<PartialEditReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply_edit(&PartialEdit::new(category).adding(words))
    }

    pub fn remove_words<I, S>(&self, category: Category, words: I) -> EngineResult<PartialEditReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply_edit(&PartialEdit::new(category).removing(words))
    }

    /// Validate every word of the edit first, then add before removing.
    /// An invalid word leaves the store untouched.
    pub fn apply_edit(&self, edit: &PartialEdit) -> EngineResult<PartialEditReport> {
        Ok(edit.apply(&self.store)?)
    }

    pub fn replace_all_word_lists(&self, lists: &CategoryWordLists) -> EngineResult<()> {
        self.store.replace_all_categories(lists)?;
        Ok(())
    }

    /// Parse a sectioned word-list file and replace the vocabulary with it.
    /// A malformed file leaves the store untouched.
    pub fn import_word_list_file<P: AsRef<Path>>(&self, path: P) -> EngineResult<CategoryWordLists> {
        let lists = wordlist::read_word_list_file(path)?;
        self.replace_all_word_lists(&lists)?;
        Ok(lists)
    }

    pub fn set_voice(&self, voice: Voice) {
        self.speaker.set_voice(voice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Level, Word};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSpeaker {
        calls: parking_lot::Mutex<Vec<String>>,
    }

    impl RecordingSpeaker {
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.calls.lock())
        }
    }

    impl Speaker for RecordingSpeaker {
        fn speak_word(&self, word: &Word) {
            self.calls.lock().push(format!("word:{word}"));
        }
        fn speak_retry(&self, word: &Word) {
            self.calls.lock().push(format!("retry:{word}"));
        }
        fn relisten(&self, word: &Word) {
            self.calls.lock().push(format!("relisten:{word}"));
        }
        fn play_cue(&self, cue: Cue) {
            self.calls.lock().push(format!("cue:{cue:?}"));
        }
        fn set_voice(&self, voice: Voice) {
            self.calls.lock().push(format!("voice:{voice}"));
        }
    }

    fn engine(dir: &TempDir) -> (SpellingEngine, Arc<RecordingSpeaker>) {
        let store = Arc::new(LevelStore::open(dir.path()).expect("Failed to open store"));
        let speaker = Arc::new(RecordingSpeaker::default());
        let engine = SpellingEngine::with_selector(store, speaker.clone(), GameWordSelector::with_seed(9));
        (engine, speaker)
    }

    const NOUNS: [&str; 12] = [
        "apple", "berry", "cherry", "date", "elder", "fig", "grape", "kiwi", "lemon", "mango", "olive", "peach",
    ];

    #[test]
    fn test_new_session_not_enough_words() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (engine, _) = engine(&dir);
        engine.add_words(Category::Verbs, ["run", "walk"]).unwrap();

        let err = engine.new_session(Category::Verbs).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Selection(SelectionError::NotEnoughWords { shortfall: 8, .. })
        ));
    }

    #[test]
    fn test_session_events_drive_speech() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (engine, speaker) = engine(&dir);
        engine.add_words(Category::Nouns, NOUNS).unwrap();

        let NewSession { mut session, events } = engine.new_session(Category::Nouns).unwrap();
        let first = session.current_word().cloned().unwrap();
        assert!(matches!(events.last(), Some(SessionEvent::NextWord { position: 1, .. })));
        assert_eq!(speaker.take(), vec![format!("word:{first}")]);

        engine.submit_answer(&mut session, "zzz");
        assert_eq!(
            speaker.take(),
            vec!["cue:Incorrect".to_string(), format!("retry:{first}")]
        );

        engine.relisten(&session);
        assert_eq!(speaker.take(), vec![format!("relisten:{first}")]);

        engine.submit_answer(&mut session, first.as_str());
        let second = session.current_word().cloned().unwrap();
        assert_eq!(
            speaker.take(),
            vec!["cue:Correct".to_string(), format!("word:{second}")]
        );
        assert_eq!(engine.store().level_of(Category::Nouns, &first), Some(Level::One));
    }

    #[test]
    fn test_stats_reflect_session_outcomes() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (engine, _) = engine(&dir);
        engine.add_words(Category::Nouns, NOUNS).unwrap();

        let NewSession { mut session, .. } = engine.new_session(Category::Nouns).unwrap();
        let first = session.current_word().cloned().unwrap();
        engine.submit_answer(&mut session, first.as_str());

        let stats = engine.get_stats(Category::Nouns);
        assert_eq!(stats.len(), NOUNS.len());
        assert_eq!(stats[0].word, first);
        assert_eq!(stats[0].accuracy, 100);
        assert_eq!(stats[0].level, Level::Two);
        // one word at 100, eleven never attempted
        assert_eq!(engine.get_category_accuracy(Category::Nouns), 8);
    }

    #[test]
    fn test_import_replaces_everything() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (engine, _) = engine(&dir);
        engine.add_words(Category::Nouns, NOUNS).unwrap();

        let file = dir.path().join("list.txt");
        std::fs::write(&file, "%Adjectives\nred\n%Adverbs\n%Nouns\ncar\n%Verbs\ngo\n").unwrap();
        engine.import_word_list_file(&file).unwrap();

        assert_eq!(engine.store().word_count(Category::Nouns), 1);
        assert_eq!(engine.store().word_count(Category::Adverbs), 0);
    }

    #[test]
    fn test_apply_edit_adds_then_removes() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (engine, _) = engine(&dir);
        engine.add_words(Category::Verbs, ["run", "walk"]).unwrap();

        let edit = PartialEdit::new(Category::Verbs)
            .adding(["jump", "run", "swim"])
            .removing(["walk", "swim", "fly"]);
        let report = engine.apply_edit(&edit).unwrap();

        let words = |names: &[&str]| -> Vec<Word> { names.iter().map(|w| Word::parse(w).unwrap()).collect() };
        assert_eq!(report.added, words(&["jump", "swim"]));
        assert_eq!(report.skipped, words(&["run"]));
        assert_eq!(report.removed, words(&["walk", "swim"]));
        assert_eq!(
            engine.store().snapshot(Category::Verbs)[Level::One.index()],
            words(&["run", "jump"])
        );

        let bad = PartialEdit::new(Category::Verbs).adding(["hop", "x-ray"]);
        assert!(matches!(
            engine.apply_edit(&bad),
            Err(EngineError::WordList(WordListError::InvalidCharacter { .. }))
        ));
        assert_eq!(engine.store().word_count(Category::Verbs), 2);
    }

    #[test]
    fn test_set_voice_forwards_to_speaker() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let (engine, speaker) = engine(&dir);
        engine.set_voice(Voice::NewZealand);
        assert_eq!(speaker.take(), vec!["voice:new_zealand".to_string()]);
    }
}
