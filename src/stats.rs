//! Scoreboard statistics derived from the stats logs and level buckets.

use std::collections::HashMap;

use serde::Serialize;

use crate::storage::LevelStore;
use crate::types::{Category, Level, LevelBuckets, Outcome, StatsLogs, Word, OUTCOME_COUNT};

/// One scoreboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStats {
    pub word: Word,
    pub level: Level,
    pub mastered: u32,
    pub faulted: u32,
    pub failed: u32,
    /// Rounded percentage of attempts mastered, 0 when never attempted
    pub accuracy: u8,
}

impl WordStats {
    pub fn attempts(&self) -> u32 {
        self.mastered + self.faulted + self.failed
    }
}

/// Stateless aggregation over a category snapshot
pub struct StatsAggregator;

impl StatsAggregator {
    /// One row per word present in the level buckets, sorted by accuracy
    /// descending and then alphabetically.
    pub fn word_stats(levels: &LevelBuckets, logs: &StatsLogs) -> Vec<WordStats> {
        let mut counts: HashMap<&Word, [u32; OUTCOME_COUNT]> = HashMap::new();
        for outcome in Outcome::ALL {
            for word in &logs[outcome.index()] {
                counts.entry(word).or_default()[outcome.index()] += 1;
            }
        }

        let mut rows: Vec<WordStats> = Vec::new();
        for level in Level::ALL {
            for word in &levels[level.index()] {
                if rows.iter().any(|row| &row.word == word) {
                    continue;
                }
                let [mastered, faulted, failed] = counts.get(word).copied().unwrap_or_default();
                rows.push(WordStats {
                    word: word.clone(),
                    level,
                    mastered,
                    faulted,
                    failed,
                    accuracy: rounded_percent(mastered, mastered + faulted + failed),
                });
            }
        }

        rows.sort_by(|a, b| b.accuracy.cmp(&a.accuracy).then_with(|| a.word.cmp(&b.word)));
        rows
    }

    /// Rounded mean of the per-word accuracies, 0 for an empty category
    pub fn category_accuracy(rows: &[WordStats]) -> u8 {
        if rows.is_empty() {
            return 0;
        }
        let n = rows.len() as u64;
        let sum: u64 = rows.iter().map(|row| u64::from(row.accuracy)).sum();
        ((2 * sum + n) / (2 * n)) as u8
    }

    pub fn for_category(store: &LevelStore, category: Category) -> Vec<WordStats> {
        let levels = store.snapshot(category);
        let logs = store.stats_snapshot(category);
        Self::word_stats(&levels, &logs)
    }
}

/// `round(100 * part / whole)` with halves rounded up
fn rounded_percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (u64::from(part), u64::from(whole));
    ((200 * part + whole) / (2 * whole)) as u8
}
