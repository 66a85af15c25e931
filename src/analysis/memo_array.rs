use super::memo::Memo;

/// Fixed-size lossy memo.
///
/// Each slot is a single 64-bit word storing the top 56 bits of the key
/// plus an 8-bit value (0 = unknown, 1 = losing, 2 = winning). The slot
/// index is the key modulo the (power of two) capacity. When two keys map
/// to the same slot, whichever was written last wins; overwrites of a
/// foreign key are counted as collisions. Memory is bounded by 8 bytes per
/// slot regardless of how long the search runs.
pub struct LossyMemo {
    mask: usize,
    slots: Vec<u64>,
    used: usize,
    collisions: u64,
}

const VALUE_MASK: u64 = 0xff;
const KEY_MASK: u64 = !VALUE_MASK;

impl LossyMemo {
    /// Recommended default: 2^26 slots (512 MB).
    pub const DEFAULT_CAPACITY: usize = 1 << 26;

    #[must_use]
    pub fn with_capacity_pow2(cap_pow2: usize) -> Self {
        assert!(
            cap_pow2.is_power_of_two(),
            "memo capacity must be a power of two"
        );
        Self {
            mask: cap_pow2 - 1,
            slots: vec![0u64; cap_pow2],
            used: 0,
            collisions: 0,
        }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }
}

impl Default for LossyMemo {
    fn default() -> Self {
        Self::with_capacity_pow2(Self::DEFAULT_CAPACITY)
    }
}

impl Memo for LossyMemo {
    #[inline]
    fn get(&self, key: u64) -> Option<bool> {
        let slot = self.slots[self.index(key)];
        if slot & KEY_MASK == key & KEY_MASK && slot & VALUE_MASK != 0 {
            Some(slot & VALUE_MASK == 2)
        } else {
            None
        }
    }

    #[inline]
    fn put(&mut self, key: u64, winning: bool) {
        let idx = self.index(key);
        let slot = self.slots[idx];
        if slot == 0 {
            self.used += 1;
        } else if slot & KEY_MASK != key & KEY_MASK {
            self.collisions += 1;
        }
        // Unconditionally overwrite the previous value.
        self.slots[idx] = (key & KEY_MASK) | (u64::from(winning) + 1);
    }

    fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = 0;
        }
        self.used = 0;
        self.collisions = 0;
    }

    #[inline]
    fn len(&self) -> usize {
        self.used
    }

    #[inline]
    fn collisions(&self) -> u64 {
        self.collisions
    }
}
