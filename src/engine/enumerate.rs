use rand::seq::SliceRandom;
use rand::RngCore;

use crate::grid::{GridState, Position};
use crate::types::Completion;

/// Result of an enumeration run.
#[derive(Debug, Clone, Copy)]
pub struct EnumerateResult {
    /// `true` iff the callback never returned false (including when it was
    /// never called because there weren't any solutions).
    pub success: bool,
    pub work: i64,
    pub max_work: i64,
}

impl EnumerateResult {
    #[inline]
    #[must_use]
    pub fn accurate(&self) -> bool {
        self.success && self.work < self.max_work
    }

    #[inline]
    #[must_use]
    pub fn work_limit_reached(&self) -> bool {
        self.work >= self.max_work
    }
}

/// Enumerates completions of the partial grid and invokes `callback` for
/// each, until the callback returns false or the work budget runs out.
///
/// Completions are produced in no guaranteed order; when `rng` is given the
/// empty-position work list is shuffled first, which randomizes tie-breaks
/// between equally constrained cells. The grid is restored before returning.
pub fn for_each_solution(
    grid: &mut GridState,
    max_work: i64,
    rng: Option<&mut dyn RngCore>,
    mut callback: impl FnMut(&Completion) -> bool,
) -> EnumerateResult {
    assert!(max_work >= 0);
    let mut todo = grid.empty_positions();
    if let Some(rng) = rng {
        todo.shuffle(rng);
    }
    let mut work_left = max_work;
    let success = enumerate_rec(grid, &mut todo, &mut work_left, &mut callback);
    debug_assert!(work_left >= 0);
    EnumerateResult {
        success,
        work: max_work - work_left,
        max_work,
    }
}

/// Enumerates up to `max_count` completions into a vector.
pub fn enumerate_solutions(
    grid: &mut GridState,
    max_count: usize,
    max_work: i64,
    rng: Option<&mut dyn RngCore>,
) -> (Vec<Completion>, EnumerateResult) {
    let mut solutions = Vec::new();
    let result = for_each_solution(grid, max_work, rng, |digits| {
        solutions.push(*digits);
        solutions.len() < max_count
    });
    (solutions, result)
}

// Note: the logic here is very similar to count_rec(), except that this
// version fills in digits so the callback can observe them.
fn enumerate_rec(
    grid: &mut GridState,
    todo: &mut [Position],
    work_left: &mut i64,
    callback: &mut impl FnMut(&Completion) -> bool,
) -> bool {
    if todo.is_empty() {
        // Solution found!
        return callback(&grid.digits);
    }

    // Find the most constrained cell to fill in.
    let mut min_unused_count = 10;
    let mut min_unused_index = usize::MAX;
    let mut min_unused_mask = 0u16;
    for (j, p) in todo.iter().enumerate() {
        let unused = grid.unused_row[p.r as usize]
            & grid.unused_col[p.c as usize]
            & grid.unused_box[p.b as usize];
        if unused == 0 {
            return true; // unsolvable
        }
        let unused_count = unused.count_ones();
        if unused_count < min_unused_count {
            min_unused_index = j;
            min_unused_count = unused_count;
            min_unused_mask = unused;
        }
    }
    let last = todo.len() - 1;
    todo.swap(min_unused_index, last);

    let p = todo[last];

    // Try all possible digits, lowest first.
    let mut unused = min_unused_mask;
    while unused != 0 && *work_left > 0 {
        *work_left -= 1;

        let mask = unused & unused.wrapping_neg();
        let digit = mask.trailing_zeros() as u8;
        unused ^= mask;

        grid.digits[p.i as usize] = digit;
        grid.unused_row[p.r as usize] ^= mask;
        grid.unused_col[p.c as usize] ^= mask;
        grid.unused_box[p.b as usize] ^= mask;

        let result = {
            let (remaining, _) = todo.split_at_mut(last);
            enumerate_rec(grid, remaining, work_left, callback)
        };

        grid.unused_row[p.r as usize] ^= mask;
        grid.unused_col[p.c as usize] ^= mask;
        grid.unused_box[p.b as usize] ^= mask;
        grid.digits[p.i as usize] = 0;

        if !result {
            return false;
        }
    }
    true
}
