//! Level store: word membership per familiarity level and mastery history
//!
//! Every category is guarded by its own lock, held across each compound
//! operation (`shift_level` reads then writes), so a word can never end up
//! in two buckets of the same category.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard};

use super::layout::{self, CategoryPaths};
use super::{StorageError, StorageResult};
use crate::types::{
    Category, Level, LevelBuckets, Outcome, ShiftDirection, StatsLogs, Word, CATEGORY_COUNT,
};

const STAGING_DIR: &str = ".staging";
const RETIRED_DIR: &str = ".retired";
/// Written into the retired dir once every category has been swapped
const COMMIT_MARKER: &str = "COMMITTED";

/// In-memory mirror of one category's files
#[derive(Debug)]
struct CategoryState {
    paths: CategoryPaths,
    levels: LevelBuckets,
    stats: StatsLogs,
}

impl CategoryState {
    fn load(root: &Path, category: Category) -> StorageResult<Self> {
        let paths = CategoryPaths::new(root, category);
        paths.bootstrap()?;

        let mut levels = LevelBuckets::default();
        for level in Level::ALL {
            levels[level.index()] = layout::read_words(paths.level(level))?;
        }
        let mut stats = StatsLogs::default();
        for outcome in Outcome::ALL {
            stats[outcome.index()] = layout::read_words(paths.stats(outcome))?;
        }

        Ok(Self {
            paths,
            levels,
            stats,
        })
    }

    /// First level (scanning 1..5) holding the word
    fn level_of(&self, word: &Word) -> Option<Level> {
        Level::ALL
            .into_iter()
            .find(|level| self.levels[level.index()].contains(word))
    }

    fn persist_level(&self, level: Level) -> StorageResult<()> {
        layout::write_words(self.paths.level(level), &self.levels[level.index()])
    }

    fn persist_stats(&self, outcome: Outcome) -> StorageResult<()> {
        layout::write_words(self.paths.stats(outcome), &self.stats[outcome.index()])
    }
}

/// Durable per-category word store.
///
/// Construct one per process and share it by reference (or `Arc`).
pub struct LevelStore {
    root: PathBuf,
    categories: [Mutex<CategoryState>; CATEGORY_COUNT],
}

impl LevelStore {
    /// Open the store rooted at `root`, creating any missing folder or file.
    pub fn open<P: AsRef<Path>>(root: P) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(StorageError::io(&root))?;
        recover_interrupted_replace(&root)?;

        let [adjectives, adverbs, nouns, verbs] =
            Category::ALL.map(|category| CategoryState::load(&root, category));
        let categories = [
            Mutex::new(adjectives?),
            Mutex::new(adverbs?),
            Mutex::new(nouns?),
            Mutex::new(verbs?),
        ];

        tracing::debug!(root = %root.display(), "level store opened");
        Ok(Self { root, categories })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn state(&self, category: Category) -> MutexGuard<'_, CategoryState> {
        self.categories[category.index()].lock()
    }

    // ============================================================
    // Reads
    // ============================================================

    /// Current level buckets, index 0 = level 1
    pub fn snapshot(&self, category: Category) -> LevelBuckets {
        self.state(category).levels.clone()
    }

    /// Stats logs in Mastered, Faulted, Failed order
    pub fn stats_snapshot(&self, category: Category) -> StatsLogs {
        self.state(category).stats.clone()
    }

    pub fn level_of(&self, category: Category, word: &Word) -> Option<Level> {
        self.state(category).level_of(word)
    }

    pub fn word_count(&self, category: Category) -> usize {
        self.state(category).levels.iter().map(Vec::len).sum()
    }

    // ============================================================
    // Mutations
    // ============================================================

    /// Add a word to a bucket.
    ///
    /// Returns `Ok(false)` without writing when the word already sits in any
    /// level of the category.
    pub fn add_word(&self, category: Category, level: Level, word: &Word) -> StorageResult<bool> {
        let mut state = self.state(category);
        if let Some(existing) = state.level_of(word) {
            tracing::debug!(%category, %word, %existing, "word already present, not added");
            return Ok(false);
        }
        state.levels[level.index()].push(word.clone());
        layout::append_word(state.paths.level(level), word)?;
        Ok(true)
    }

    /// Remove every occurrence of the word from one bucket. Returns whether
    /// anything was removed; an absent word is a silent no-op.
    pub fn remove_word(&self, category: Category, level: Level, word: &Word) -> StorageResult<bool> {
        let mut state = self.state(category);
        let bucket = &mut state.levels[level.index()];
        let before = bucket.len();
        bucket.retain(|w| w != word);
        if bucket.len() == before {
            return Ok(false);
        }
        state.persist_level(level)?;
        Ok(true)
    }

    /// Purge the word from all three stats logs. Returns the number of
    /// occurrences removed.
    pub fn remove_word_from_all_stats(&self, category: Category, word: &Word) -> StorageResult<usize> {
        let mut state = self.state(category);
        let mut removed = 0;
        for outcome in Outcome::ALL {
            let log = &mut state.stats[outcome.index()];
            let before = log.len();
            log.retain(|w| w != word);
            if log.len() != before {
                removed += before - log.len();
                state.persist_stats(outcome)?;
            }
        }
        Ok(removed)
    }

    /// Append one occurrence to the outcome's stats log
    pub fn record_outcome(&self, category: Category, outcome: Outcome, word: &Word) -> StorageResult<()> {
        let mut state = self.state(category);
        state.stats[outcome.index()].push(word.clone());
        layout::append_word(state.paths.stats(outcome), word)
    }

    /// Move a word one level up or down.
    ///
    /// Returns the word's level after the call: unchanged at the boundary,
    /// `None` if the word is in no bucket of the category.
    pub fn shift_level(
        &self,
        category: Category,
        direction: ShiftDirection,
        word: &Word,
    ) -> StorageResult<Option<Level>> {
        let mut state = self.state(category);
        let Some(current) = state.level_of(word) else {
            tracing::warn!(%category, %word, "cannot shift a word that is not in the store");
            return Ok(None);
        };
        let Some(target) = current.shifted(direction) else {
            return Ok(Some(current));
        };

        state.levels[current.index()].retain(|w| w != word);
        state.levels[target.index()].push(word.clone());

        // destination first: a crash in between leaves a duplicate, not a loss
        layout::append_word(state.paths.level(target), word)?;
        state.persist_level(current)?;

        tracing::debug!(%category, %word, from = %current, to = %target, "word shifted");
        Ok(Some(target))
    }

    /// Clear the stats and move every word to level 1
    pub fn reset_category(&self, category: Category) -> StorageResult<()> {
        let mut state = self.state(category);

        let mut collapsed: Vec<Word> = Vec::new();
        for bucket in state.levels.iter_mut() {
            for word in bucket.drain(..) {
                if !collapsed.contains(&word) {
                    collapsed.push(word);
                }
            }
        }
        state.levels[Level::One.index()] = collapsed;
        for log in state.stats.iter_mut() {
            log.clear();
        }

        for level in Level::ALL {
            state.persist_level(level)?;
        }
        for outcome in Outcome::ALL {
            state.persist_stats(outcome)?;
        }

        tracing::info!(
            %category,
            words = state.levels[Level::One.index()].len(),
            "category reset"
        );
        Ok(())
    }

    /// Destructively replace every category with fresh level-1 word lists.
    ///
    /// The new tree is staged first, then swapped in folder by folder. A
    /// failure at any point puts every category back, so the store holds
    /// either all old lists or all new ones.
    pub fn replace_all_categories(&self, lists: &[Vec<Word>; CATEGORY_COUNT]) -> StorageResult<()> {
        let mut guards: Vec<MutexGuard<'_, CategoryState>> =
            self.categories.iter().map(|m| m.lock()).collect();

        let deduped: Vec<Vec<Word>> = lists.iter().map(|list| dedup_words(list)).collect();

        let staging = self.root.join(STAGING_DIR);
        if let Err(err) = stage_tree(&staging, &deduped) {
            discard_dir(&staging);
            tracing::error!(error = %err, "word list staging failed, store unchanged");
            return Err(err);
        }

        // memory follows only once every folder is in place
        swap_staged_tree(&self.root)?;

        for (category, words) in Category::ALL.into_iter().zip(deduped) {
            let state = &mut guards[category.index()];
            state.levels = LevelBuckets::default();
            state.levels[Level::One.index()] = words;
            state.stats = StatsLogs::default();
        }

        tracing::info!(
            words = guards.iter().map(|g| g.levels[0].len()).sum::<usize>(),
            "all word lists replaced"
        );
        Ok(())
    }
}

fn dedup_words(words: &[Word]) -> Vec<Word> {
    let mut out: Vec<Word> = Vec::with_capacity(words.len());
    for word in words {
        if !out.contains(word) {
            out.push(word.clone());
        }
    }
    out
}

fn stage_tree(staging: &Path, lists: &[Vec<Word>]) -> StorageResult<()> {
    if staging.exists() {
        fs::remove_dir_all(staging).map_err(StorageError::io(staging))?;
    }
    for (category, words) in Category::ALL.into_iter().zip(lists) {
        let paths = CategoryPaths::new(staging, category);
        paths.bootstrap()?;
        layout::write_words(paths.level(Level::One), words)?;
    }
    Ok(())
}

/// Move the staged category folders into place, parking the live ones in
/// the retired dir. Any failure rolls every category back.
fn swap_staged_tree(root: &Path) -> StorageResult<()> {
    let staging = root.join(STAGING_DIR);
    let retired = root.join(RETIRED_DIR);
    discard_dir(&retired);
    fs::create_dir_all(&retired).map_err(StorageError::io(&retired))?;

    let swapped = Category::ALL
        .into_iter()
        .try_for_each(|category| swap_category(root, &staging, &retired, category))
        .and_then(|()| {
            let marker = retired.join(COMMIT_MARKER);
            fs::write(&marker, b"").map_err(StorageError::io(&marker))
        });

    if let Err(err) = swapped {
        tracing::error!(error = %err, "word list swap failed, restoring previous lists");
        if let Err(rollback) = roll_back_swap(root, &retired) {
            // leave the retired dir for open() to finish the job
            tracing::error!(error = %rollback, "rollback incomplete, retried on next open");
            return Err(err);
        }
        discard_dir(&retired);
        discard_dir(&staging);
        return Err(err);
    }

    discard_dir(&retired);
    discard_dir(&staging);
    Ok(())
}

fn swap_category(root: &Path, staging: &Path, retired: &Path, category: Category) -> StorageResult<()> {
    let live = root.join(category.folder_name());
    let staged = staging.join(category.folder_name());
    let parked = retired.join(category.folder_name());

    // a parked folder must exist for every swapped category
    fs::create_dir_all(&live).map_err(StorageError::io(&live))?;
    fs::rename(&live, &parked).map_err(StorageError::io(&live))?;
    fs::rename(&staged, &live).map_err(StorageError::io(&staged))?;
    Ok(())
}

/// Put every parked category back in place, discarding its replacement
fn roll_back_swap(root: &Path, retired: &Path) -> StorageResult<()> {
    for category in Category::ALL {
        let live = root.join(category.folder_name());
        let parked = retired.join(category.folder_name());
        if !parked.exists() {
            continue;
        }
        if live.exists() {
            fs::remove_dir_all(&live).map_err(StorageError::io(&live))?;
        }
        fs::rename(&parked, &live).map_err(StorageError::io(&parked))?;
        tracing::warn!(%category, "restored previous word lists");
    }
    Ok(())
}

/// Finish a replace interrupted by a crash. Without the commit marker the
/// swap is rolled back for every category; with it the new lists stay.
fn recover_interrupted_replace(root: &Path) -> StorageResult<()> {
    let retired = root.join(RETIRED_DIR);
    if retired.exists() {
        if retired.join(COMMIT_MARKER).exists() {
            tracing::info!("completing interrupted word list replace");
        } else {
            roll_back_swap(root, &retired)?;
        }
    }
    discard_dir(&retired);
    discard_dir(&root.join(STAGING_DIR));
    Ok(())
}

fn discard_dir(path: &Path) {
    if path.exists() {
        if let Err(err) = fs::remove_dir_all(path) {
            tracing::warn!(path = %path.display(), error = %err, "failed to remove directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn word(w: &str) -> Word {
        Word::parse(w).unwrap()
    }

    fn open_store() -> (TempDir, LevelStore) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = LevelStore::open(dir.path()).expect("Failed to open store");
        (dir, store)
    }

    fn seed(store: &LevelStore, category: Category, level: Level, words: &[&str]) {
        for w in words {
            assert!(store.add_word(category, level, &word(w)).unwrap());
        }
    }

    #[test]
    fn test_open_bootstraps_empty_store() {
        let (dir, store) = open_store();
        assert_eq!(store.root(), dir.path());
        for category in Category::ALL {
            assert_eq!(store.word_count(category), 0);
            let paths = CategoryPaths::new(dir.path(), category);
            assert!(paths.files().all(Path::exists));
        }
    }

    #[test]
    fn test_add_word_refuses_duplicates_across_levels() {
        let (_dir, store) = open_store();
        assert!(store.add_word(Category::Nouns, Level::Three, &word("cat")).unwrap());
        assert!(!store.add_word(Category::Nouns, Level::One, &word("cat")).unwrap());
        assert!(!store.add_word(Category::Nouns, Level::Three, &word("CAT")).unwrap());

        assert_eq!(store.word_count(Category::Nouns), 1);
        assert_eq!(store.level_of(Category::Nouns, &word("cat")), Some(Level::Three));
        // other categories are independent
        assert!(store.add_word(Category::Verbs, Level::One, &word("cat")).unwrap());
    }

    #[test]
    fn test_remove_word_is_idempotent() {
        let (_dir, store) = open_store();
        seed(&store, Category::Verbs, Level::Two, &["run", "jump"]);

        assert!(store.remove_word(Category::Verbs, Level::Two, &word("run")).unwrap());
        assert!(!store.remove_word(Category::Verbs, Level::Two, &word("run")).unwrap());
        assert!(!store.remove_word(Category::Verbs, Level::One, &word("jump")).unwrap());

        let snapshot = store.snapshot(Category::Verbs);
        assert_eq!(snapshot[Level::Two.index()], vec![word("jump")]);
    }

    #[test]
    fn test_shift_level_moves_one_step() {
        let (_dir, store) = open_store();
        seed(&store, Category::Adjectives, Level::Two, &["big"]);

        let up = store
            .shift_level(Category::Adjectives, ShiftDirection::Up, &word("big"))
            .unwrap();
        assert_eq!(up, Some(Level::Three));
        let down = store
            .shift_level(Category::Adjectives, ShiftDirection::Down, &word("big"))
            .unwrap();
        assert_eq!(down, Some(Level::Two));

        let snapshot = store.snapshot(Category::Adjectives);
        assert_eq!(snapshot[Level::Two.index()], vec![word("big")]);
        assert!(snapshot[Level::Three.index()].is_empty());
    }

    #[test]
    fn test_shift_level_boundaries_are_no_ops() {
        let (_dir, store) = open_store();
        seed(&store, Category::Nouns, Level::One, &["low"]);
        seed(&store, Category::Nouns, Level::Five, &["high"]);

        let low = store
            .shift_level(Category::Nouns, ShiftDirection::Down, &word("low"))
            .unwrap();
        let high = store
            .shift_level(Category::Nouns, ShiftDirection::Up, &word("high"))
            .unwrap();

        assert_eq!(low, Some(Level::One));
        assert_eq!(high, Some(Level::Five));
        assert_eq!(store.level_of(Category::Nouns, &word("low")), Some(Level::One));
        assert_eq!(store.level_of(Category::Nouns, &word("high")), Some(Level::Five));
    }

    #[test]
    fn test_shift_level_unknown_word() {
        let (_dir, store) = open_store();
        let result = store
            .shift_level(Category::Nouns, ShiftDirection::Up, &word("ghost"))
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(store.word_count(Category::Nouns), 0);
    }

    #[test]
    fn test_record_outcome_never_deduplicates() {
        let (_dir, store) = open_store();
        for _ in 0..3 {
            store
                .record_outcome(Category::Adverbs, Outcome::Mastered, &word("quickly"))
                .unwrap();
        }
        store
            .record_outcome(Category::Adverbs, Outcome::Failed, &word("quickly"))
            .unwrap();

        let stats = store.stats_snapshot(Category::Adverbs);
        assert_eq!(stats[Outcome::Mastered.index()].len(), 3);
        assert!(stats[Outcome::Faulted.index()].is_empty());
        assert_eq!(stats[Outcome::Failed.index()].len(), 1);
    }

    #[test]
    fn test_remove_word_from_all_stats() {
        let (_dir, store) = open_store();
        for outcome in Outcome::ALL {
            store.record_outcome(Category::Nouns, outcome, &word("cat")).unwrap();
            store.record_outcome(Category::Nouns, outcome, &word("dog")).unwrap();
        }

        let removed = store
            .remove_word_from_all_stats(Category::Nouns, &word("cat"))
            .unwrap();
        assert_eq!(removed, 3);

        let stats = store.stats_snapshot(Category::Nouns);
        assert!(stats.iter().all(|log| log == &vec![word("dog")]));
    }

    #[test]
    fn test_reset_category_collapses_to_level_one() {
        let (_dir, store) = open_store();
        seed(&store, Category::Verbs, Level::One, &["go"]);
        seed(&store, Category::Verbs, Level::Three, &["eat", "drink"]);
        seed(&store, Category::Verbs, Level::Five, &["sleep"]);
        store.record_outcome(Category::Verbs, Outcome::Mastered, &word("sleep")).unwrap();

        store.reset_category(Category::Verbs).unwrap();

        let snapshot = store.snapshot(Category::Verbs);
        let mut level_one = snapshot[0].clone();
        level_one.sort();
        assert_eq!(level_one, vec![word("drink"), word("eat"), word("go"), word("sleep")]);
        assert!(snapshot[1..].iter().all(Vec::is_empty));
        assert!(store.stats_snapshot(Category::Verbs).iter().all(Vec::is_empty));
    }

    #[test]
    fn test_writes_survive_reopen() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        {
            let store = LevelStore::open(dir.path()).unwrap();
            seed(&store, Category::Nouns, Level::One, &["cat", "dog"]);
            store.shift_level(Category::Nouns, ShiftDirection::Up, &word("dog")).unwrap();
            store.record_outcome(Category::Nouns, Outcome::Mastered, &word("dog")).unwrap();
        }

        let reopened = LevelStore::open(dir.path()).unwrap();
        let snapshot = reopened.snapshot(Category::Nouns);
        assert_eq!(snapshot[0], vec![word("cat")]);
        assert_eq!(snapshot[1], vec![word("dog")]);
        assert_eq!(reopened.stats_snapshot(Category::Nouns)[0], vec![word("dog")]);
    }

    #[test]
    fn test_replace_all_categories() {
        let (dir, store) = open_store();
        seed(&store, Category::Nouns, Level::Four, &["old"]);
        store.record_outcome(Category::Nouns, Outcome::Failed, &word("old")).unwrap();

        let lists = [
            vec![word("big"), word("big"), word("small")],
            vec![word("quickly")],
            vec![word("cat")],
            vec![],
        ];
        store.replace_all_categories(&lists).unwrap();

        assert_eq!(store.snapshot(Category::Adjectives)[0], vec![word("big"), word("small")]);
        assert_eq!(store.snapshot(Category::Nouns)[0], vec![word("cat")]);
        assert!(store.snapshot(Category::Nouns)[3].is_empty());
        assert!(store.stats_snapshot(Category::Nouns).iter().all(Vec::is_empty));
        assert_eq!(store.word_count(Category::Verbs), 0);
        assert!(!dir.path().join(STAGING_DIR).exists());
        assert!(!dir.path().join(RETIRED_DIR).exists());

        let reopened = LevelStore::open(dir.path()).unwrap();
        assert_eq!(reopened.snapshot(Category::Adjectives)[0], vec![word("big"), word("small")]);
        assert_eq!(reopened.word_count(Category::Nouns), 1);
    }

    fn seed_all(store: &LevelStore, prefix: &str) {
        for category in Category::ALL {
            let w = format!("{prefix}{}", category.folder_name());
            seed(store, category, Level::Two, &[w.as_str()]);
        }
    }

    fn new_lists() -> Vec<Vec<Word>> {
        Category::ALL
            .iter()
            .map(|c| vec![word(&format!("new{}", c.folder_name()))])
            .collect()
    }

    fn assert_old_lists(root: &Path) {
        let reopened = LevelStore::open(root).expect("Failed to reopen store");
        for category in Category::ALL {
            let expected = word(&format!("old{}", category.folder_name()));
            assert_eq!(
                reopened.snapshot(category)[Level::Two.index()],
                vec![expected],
                "{category} was not restored"
            );
            assert_eq!(reopened.word_count(category), 1);
        }
    }

    #[test]
    fn test_appends_after_unterminated_files_survive_reopen() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let paths = CategoryPaths::new(dir.path(), Category::Nouns);
        paths.bootstrap().unwrap();
        fs::write(paths.level(Level::One), "cat\ndog").unwrap();
        fs::write(paths.stats(Outcome::Mastered), "cat").unwrap();

        {
            let store = LevelStore::open(dir.path()).unwrap();
            assert!(store.add_word(Category::Nouns, Level::One, &word("eel")).unwrap());
            store.record_outcome(Category::Nouns, Outcome::Mastered, &word("dog")).unwrap();
        }

        let reopened = LevelStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.snapshot(Category::Nouns)[Level::One.index()],
            vec![word("cat"), word("dog"), word("eel")]
        );
        assert_eq!(
            reopened.stats_snapshot(Category::Nouns)[Outcome::Mastered.index()],
            vec![word("cat"), word("dog")]
        );
    }

    #[test]
    fn test_shift_level_moves_lowest_duplicate_only() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let paths = CategoryPaths::new(dir.path(), Category::Verbs);
        paths.bootstrap().unwrap();
        fs::write(paths.level(Level::One), "run\n").unwrap();
        fs::write(paths.level(Level::Three), "run\nwalk\n").unwrap();

        let store = LevelStore::open(dir.path()).unwrap();
        assert_eq!(store.level_of(Category::Verbs, &word("run")), Some(Level::One));

        let shifted = store
            .shift_level(Category::Verbs, ShiftDirection::Up, &word("run"))
            .unwrap();
        assert_eq!(shifted, Some(Level::Two));

        let snapshot = store.snapshot(Category::Verbs);
        assert!(snapshot[Level::One.index()].is_empty());
        assert_eq!(snapshot[Level::Two.index()], vec![word("run")]);
        assert_eq!(snapshot[Level::Three.index()], vec![word("run"), word("walk")]);
        assert_eq!(
            fs::read_to_string(paths.level(Level::Three)).unwrap(),
            "run\nwalk\n"
        );
    }

    #[test]
    fn test_failed_swap_restores_every_category() {
        let (dir, store) = open_store();
        seed_all(&store, "old");

        let staging = dir.path().join(STAGING_DIR);
        stage_tree(&staging, &new_lists()).unwrap();
        // nouns is swapped third, after adjectives and adverbs
        fs::remove_dir_all(staging.join(Category::Nouns.folder_name())).unwrap();

        let result = swap_staged_tree(dir.path());
        assert!(result.is_err());
        assert!(!staging.exists());
        assert!(!dir.path().join(RETIRED_DIR).exists());
        assert_old_lists(dir.path());
    }

    #[test]
    fn test_open_rolls_back_uncommitted_swap() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        {
            let store = LevelStore::open(dir.path()).unwrap();
            seed_all(&store, "old");
        }

        // crash state: two categories swapped, nouns parked but not replaced
        let root = dir.path();
        let staging = root.join(STAGING_DIR);
        let retired = root.join(RETIRED_DIR);
        stage_tree(&staging, &new_lists()).unwrap();
        fs::create_dir_all(&retired).unwrap();
        swap_category(root, &staging, &retired, Category::Adjectives).unwrap();
        swap_category(root, &staging, &retired, Category::Adverbs).unwrap();
        fs::rename(
            root.join(Category::Nouns.folder_name()),
            retired.join(Category::Nouns.folder_name()),
        )
        .unwrap();

        assert_old_lists(root);
        assert!(!retired.exists());
        assert!(!staging.exists());
    }

    #[test]
    fn test_open_keeps_committed_swap() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        {
            let store = LevelStore::open(dir.path()).unwrap();
            seed_all(&store, "old");
        }

        // crash state: every category swapped and the marker written
        let root = dir.path();
        let staging = root.join(STAGING_DIR);
        let retired = root.join(RETIRED_DIR);
        stage_tree(&staging, &new_lists()).unwrap();
        fs::create_dir_all(&retired).unwrap();
        for category in Category::ALL {
            swap_category(root, &staging, &retired, category).unwrap();
        }
        fs::write(retired.join(COMMIT_MARKER), b"").unwrap();

        let reopened = LevelStore::open(root).unwrap();
        for category in Category::ALL {
            let expected = word(&format!("new{}", category.folder_name()));
            assert_eq!(reopened.snapshot(category)[Level::One.index()], vec![expected]);
            assert!(reopened.snapshot(category)[Level::Two.index()].is_empty());
        }
        assert!(!retired.exists());
    }
}
