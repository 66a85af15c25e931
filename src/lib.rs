#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // may be revisited

pub mod types;
pub mod grid;
pub mod hash;
pub mod rng;
pub mod logging;

pub mod engine {
    pub mod count;
    pub mod enumerate;
}

pub mod analysis;

// Re-exports: stable minimal API surface for external callers
pub use crate::analysis::{
    AnalysisOptions, AnalyzeResult, Analyzer, Counters, ExactMemo, LossyMemo, Memo, WriteonlyMemo,
};
pub use crate::engine::count::{count_solutions, CountResult};
pub use crate::engine::enumerate::{enumerate_solutions, for_each_solution, EnumerateResult};
pub use crate::grid::{GridState, Position};
pub use crate::hash::fnv1a_64;
pub use crate::types::{Completion, Move, Outcome, Turn};
