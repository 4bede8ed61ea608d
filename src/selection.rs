//! Game word selection
//!
//! Picks the 10 words of a quiz session from a category snapshot, weighted
//! toward unfamiliar words:
//! - Unfamiliar (levels 1-2): 5 words
//! - Familiar (levels 3-4): 3 words
//! - Very familiar (level 5): 2 words
//!
//! A tier that cannot meet its quota contributes everything it has, and the
//! freed slots go to the remaining surplus in least-familiar-first order.
//! Each tier is shuffled independently before sampling, so the quota shape
//! is deterministic while the chosen words are not.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::storage::LevelStore;
use crate::types::{Category, LevelBuckets, Tier, Word, SESSION_WORD_COUNT};

// ==================== Errors ====================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("not enough words in {category}: {shortfall} more needed")]
    NotEnoughWords { category: Category, shortfall: usize },
}

// ==================== Quota Allocation ====================

/// Number of words taken from each tier, indexed by [`Tier::index`]
pub type TierAllocation = [usize; 3];

/// Allocate the session slots over three tier pool sizes.
///
/// Returns `None` when the pools hold fewer than [`SESSION_WORD_COUNT`]
/// words in total. Otherwise the allocation always sums to exactly
/// [`SESSION_WORD_COUNT`] and never exceeds a pool.
pub fn allocate_quotas(pools: TierAllocation) -> Option<TierAllocation> {
    let total: usize = pools.iter().sum();
    if total < SESSION_WORD_COUNT {
        return None;
    }

    let mut allocation = [0usize; 3];
    for tier in Tier::ALL {
        allocation[tier.index()] = pools[tier.index()].min(tier.quota());
    }

    let mut remaining = SESSION_WORD_COUNT - allocation.iter().sum::<usize>();
    for tier in Tier::ALL {
        if remaining == 0 {
            break;
        }
        let i = tier.index();
        let extra = (pools[i] - allocation[i]).min(remaining);
        allocation[i] += extra;
        remaining -= extra;
    }

    debug_assert_eq!(allocation.iter().sum::<usize>(), SESSION_WORD_COUNT);
    Some(allocation)
}

// ==================== Selector ====================

/// Words chosen for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub category: Category,
    /// Unfamiliar words first, then familiar, then very familiar
    pub words: Vec<Word>,
    pub allocation: TierAllocation,
    /// Advisory: fewer than 5 unfamiliar words were available
    pub low_unfamiliar_words: bool,
}

/// Randomised word selector.
///
/// Seed it for reproducible sessions (tests, benchmarks).
#[derive(Debug, Clone)]
pub struct GameWordSelector {
    rng: ChaCha8Rng,
}

impl Default for GameWordSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl GameWordSelector {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn select_from_store(
        &mut self,
        store: &LevelStore,
        category: Category,
    ) -> Result<Selection, SelectionError> {
        let buckets = store.snapshot(category);
        self.select(category, &buckets)
    }

    pub fn select(
        &mut self,
        category: Category,
        buckets: &LevelBuckets,
    ) -> Result<Selection, SelectionError> {
        let mut pools = tier_pools(buckets);
        let sizes = pools.each_ref().map(Vec::len);

        let Some(allocation) = allocate_quotas(sizes) else {
            let total: usize = sizes.iter().sum();
            return Err(SelectionError::NotEnoughWords {
                category,
                shortfall: SESSION_WORD_COUNT - total,
            });
        };

        let low_unfamiliar_words = sizes[Tier::Unfamiliar.index()] < Tier::Unfamiliar.quota();
        if low_unfamiliar_words {
            tracing::info!(
                %category,
                unfamiliar = sizes[Tier::Unfamiliar.index()],
                "few unfamiliar words left, consider adding new words"
            );
        }

        let mut words = Vec::with_capacity(SESSION_WORD_COUNT);
        for tier in Tier::ALL {
            let pool = &mut pools[tier.index()];
            pool.shuffle(&mut self.rng);
            words.extend(pool.drain(..allocation[tier.index()]));
        }

        tracing::debug!(%category, ?allocation, "session words selected");
        Ok(Selection {
            category,
            words,
            allocation,
            low_unfamiliar_words,
        })
    }
}

/// Group buckets into tier pools. A word seen twice keeps only its lowest
/// level, matching the first-match rule of the store.
fn tier_pools(buckets: &LevelBuckets) -> [Vec<Word>; 3] {
    let mut pools: [Vec<Word>; 3] = Default::default();
    let mut seen: HashSet<&Word> = HashSet::new();
    for tier in Tier::ALL {
        for level in tier.levels() {
            for word in &buckets[level.index()] {
                if seen.insert(word) {
                    pools[tier.index()].push(word.clone());
                }
            }
        }
    }
    pools
}
