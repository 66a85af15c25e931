use crate::grid::{GridState, Position};

/// Result of `count_solutions`.
///
/// `count` never distinguishes "exactly max_count" from "at least
/// max_count"; callers inspect `count_limit_reached` instead.
#[derive(Debug, Clone, Copy)]
pub struct CountResult {
    pub count: u64,
    pub max_count: u64,
    pub work: i64,
    pub max_work: i64,
}

impl CountResult {
    #[inline]
    #[must_use]
    pub fn accurate(&self) -> bool {
        self.work < self.max_work && self.count < self.max_count
    }

    #[inline]
    #[must_use]
    pub fn work_limit_reached(&self) -> bool {
        self.work >= self.max_work
    }

    #[inline]
    #[must_use]
    pub fn count_limit_reached(&self) -> bool {
        self.count >= self.max_count
    }
}

struct CountState {
    count_left: u64,
    work_left: i64,
}

/// Counts completions of the partial grid, up to `max_count`, spending at
/// most `max_work` recursive branch steps. The grid is restored to its
/// input state before returning.
pub fn count_solutions(grid: &mut GridState, max_count: u64, max_work: i64) -> CountResult {
    assert!(max_work >= 0);
    let mut todo = grid.empty_positions();
    let mut cs = CountState {
        count_left: max_count,
        work_left: max_work,
    };
    count_rec(grid, &mut todo, &mut cs);
    debug_assert!(cs.work_left >= 0);
    CountResult {
        count: max_count - cs.count_left,
        max_count,
        work: max_work - cs.work_left,
        max_work,
    }
}

// Note: the logic here is very similar to enumerate_rec(), except that this
// version never actually fills in any digits.
fn count_rec(grid: &mut GridState, todo: &mut [Position], cs: &mut CountState) {
    if todo.is_empty() {
        // Solution found!
        cs.count_left -= 1;
        return;
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
            return; // unsolvable
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
    let (remaining, _) = todo.split_at_mut(last);

    // Try all possible digits, lowest first.
    let mut unused = min_unused_mask;
    while unused != 0 && cs.count_left > 0 && cs.work_left > 0 {
        cs.work_left -= 1;

        let mask = unused & unused.wrapping_neg();
        unused ^= mask;

        grid.unused_row[p.r as usize] ^= mask;
        grid.unused_col[p.c as usize] ^= mask;
        grid.unused_box[p.b as usize] ^= mask;

        count_rec(grid, remaining, cs);

        grid.unused_row[p.r as usize] ^= mask;
        grid.unused_col[p.c as usize] ^= mask;
        grid.unused_box[p.b as usize] ^= mask;
    }
}
