//! Memo (transposition table) implementations used during analysis.
//!
//! The key is an order-independent hash of the completion subset under
//! consideration; the value records whether the position is winning for the
//! player to move. Different move sequences often narrow the completion set
//! to the same subset, so caching these values protects the search from the
//! exponential blow-up caused by move-order permutations.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap;

type FastHasher = BuildHasherDefault<ahash::AHasher>;

/// Tri-state cache from a 64-bit set key to a winning/losing verdict.
/// A missing key means unknown.
pub trait Memo {
    fn get(&self, key: u64) -> Option<bool>;
    fn put(&mut self, key: u64, winning: bool);
    fn clear(&mut self);
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of key collisions observed; nonzero only for lossy tables.
    #[inline]
    fn collisions(&self) -> u64 {
        0
    }
}

/// Exact growing memo. The default: never forgets, never lies (short of a
/// 64-bit key collision between distinct completion subsets, which is
/// treated as negligible).
#[derive(Debug, Default)]
pub struct ExactMemo {
    map: HashMap<u64, bool, FastHasher>,
}

impl ExactMemo {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(cap, FastHasher::default()),
        }
    }
}

impl Memo for ExactMemo {
    #[inline]
    fn get(&self, key: u64) -> Option<bool> {
        self.map.get(&key).copied()
    }

    #[inline]
    fn put(&mut self, key: u64, winning: bool) {
        // Entries transition unknown -> known exactly once and are then
        // immutable; a conflicting second write means the search is broken.
        let old = self.map.insert(key, winning);
        debug_assert!(old.is_none() || old == Some(winning));
    }

    #[inline]
    fn clear(&mut self) {
        self.map.clear();
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Write-only memo for validation runs: records values and asserts that
/// re-derived values agree, but never reports a hit, so every position is
/// recomputed from scratch.
#[derive(Debug, Default)]
pub struct WriteonlyMemo {
    map: HashMap<u64, bool, FastHasher>,
}

impl WriteonlyMemo {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Memo for WriteonlyMemo {
    #[inline]
    fn get(&self, _key: u64) -> Option<bool> {
        None
    }

    #[inline]
    fn put(&mut self, key: u64, winning: bool) {
        let old = self.map.insert(key, winning);
        assert!(
            old.is_none() || old == Some(winning),
            "inconsistent memo write for key {key:#018x}"
        );
    }

    #[inline]
    fn clear(&mut self) {
        self.map.clear();
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }
}
