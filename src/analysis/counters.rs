use std::fmt;

/// Search instrumentation. Single-threaded; owned by the `Analyzer` and
/// cumulative across its `analyze` calls. Intended for debug logs, where
/// each counter prints as a `name=value` pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub max_depth: u32,
    pub recursive_calls: u64,
    pub total_solutions: u64,
    pub immediately_won: u64,
    pub memo_accessed: u64,
    pub memo_returned: u64,
    pub memo_collisions: u64,
}

impl Counters {
    #[inline]
    pub(crate) fn observe_depth(&mut self, depth: u32) {
        if depth > self.max_depth {
            self.max_depth = depth;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max_depth={} recursive_calls={} total_solutions={} immediately_won={} \
             memo_accessed={} memo_returned={} memo_collisions={}",
            self.max_depth,
            self.recursive_calls,
            self.total_solutions,
            self.immediately_won,
            self.memo_accessed,
            self.memo_returned,
            self.memo_collisions,
        )
    }
}
