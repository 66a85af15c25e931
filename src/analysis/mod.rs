//! Endgame analysis: given a partial grid together with the complete set of
//! its completions, decides whether the position is winning for the player
//! to move and which turns are optimal.

use serde::{Deserialize, Serialize};

pub mod completions;
pub mod counters;
pub mod memo;
pub mod memo_array;
pub mod move_order;
mod search;

pub use completions::{build_hashed_completions, partition_by_move, set_key, HashedCompletion};
pub use counters::Counters;
pub use memo::{ExactMemo, Memo, WriteonlyMemo};
pub use memo_array::LossyMemo;

use move_order::{order_moves, scan_node, RankedMove};
use search::SearchContext;

use crate::types::{Completion, Move, Outcome, Turn};

/// Analysis switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// In lost positions, restrict the reported turns to the moves that
    /// keep the maximum number of completions (rather than any reducing
    /// move), to give the opponent the largest remaining problem.
    pub maximize_solutions_remaining: bool,
    /// When true (the default), forced placements are never searched as
    /// moves; only their parity affects the position value. When false,
    /// forced "pass" placements are searched explicitly, which exists to
    /// validate the parity reduction: outcomes must not change.
    pub must_reduce: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            maximize_solutions_remaining: true,
            must_reduce: true,
        }
    }
}

/// Result of one `analyze` call.
///
/// `outcome` is absent iff the search ran out of work budget; in that case
/// `optimal_turns` is empty and a repeat call (the memo persists) picks up
/// where this one left off. Otherwise `optimal_turns` holds at least one
/// turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub outcome: Option<Outcome>,
    pub optimal_turns: Vec<Turn>,
}

impl AnalyzeResult {
    #[inline]
    #[must_use]
    pub fn aborted(&self) -> bool {
        self.outcome.is_none()
    }

    fn abort() -> Self {
        Self {
            outcome: None,
            optimal_turns: Vec::new(),
        }
    }
}

/// The analysis façade. Owns the memo and the counters, both of which
/// persist across `analyze` calls so that a caller can slice a large search
/// into repeated calls with fresh work budgets.
pub struct Analyzer {
    memo: Box<dyn Memo>,
    counters: Counters,
    options: AnalysisOptions,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Default configuration: exact growing memo.
    #[must_use]
    pub fn new() -> Self {
        Self::with_memo(Box::new(ExactMemo::new()), AnalysisOptions::default())
    }

    #[must_use]
    pub fn with_memo(memo: Box<dyn Memo>, options: AnalysisOptions) -> Self {
        Self {
            memo,
            counters: Counters::default(),
            options,
        }
    }

    #[inline]
    #[must_use]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    /// Drops all cached verdicts and resets the counters.
    pub fn reset(&mut self) {
        self.memo.clear();
        self.counters.clear();
    }

    /// Decides the position given by `givens` and the complete set of its
    /// completions.
    ///
    /// `max_winning_turns` caps the number of turns reported for winning
    /// positions; `max_work` bounds the search (see `AnalyzeResult` for
    /// the abort contract). Supplying an empty completion set, a zero
    /// `max_winning_turns` or a non-positive `max_work` is a programming
    /// error.
    pub fn analyze(
        &mut self,
        givens: &[u8; 81],
        completions: &[Completion],
        max_winning_turns: usize,
        max_work: i64,
    ) -> AnalyzeResult {
        let result = self.analyze_inner(givens, completions, max_winning_turns, max_work);
        self.counters.memo_collisions = self.memo.collisions();
        result
    }

    fn analyze_inner(
        &mut self,
        givens: &[u8; 81],
        completions: &[Completion],
        max_winning_turns: usize,
        max_work: i64,
    ) -> AnalyzeResult {
        assert!(!completions.is_empty(), "completion set must not be empty");
        assert!(max_winning_turns >= 1);
        assert!(max_work > 0);
        debug_assert!(completions.iter().all(|s| consistent(givens, s)));

        // The position is already decided: claim and win.
        if completions.len() == 1 {
            return AnalyzeResult {
                outcome: Some(Outcome::WinImmediate),
                optimal_turns: vec![Turn::claim()],
            };
        }

        let mut hashed = build_hashed_completions(completions);
        let full_key = set_key(&hashed);

        let empty_cells: Vec<u8> = (0..81u8).filter(|&i| givens[i as usize] == 0).collect();
        let scan = scan_node(&hashed, &empty_cells);
        debug_assert!(!scan.choice_cells.is_empty());

        let mut ranked = scan.ranked;
        order_moves(&mut ranked);

        if scan.has_single {
            // Playing any single-completion placement reduces the set to
            // one, so the claim can ride along on the same turn.
            let turns = ranked
                .iter()
                .take_while(|m| m.solution_count == 1)
                .take(max_winning_turns)
                .map(|m| Turn::play_and_claim(m.to_move()))
                .collect();
            return AnalyzeResult {
                outcome: Some(Outcome::WinImmediate),
                optimal_turns: turns,
            };
        }

        let parity_odd = scan.inferred.len() % 2 == 1;
        let root_inferred = if self.options.must_reduce {
            0
        } else {
            scan.inferred.len() as u32
        };

        let mut ctx = SearchContext {
            memo: &mut *self.memo,
            counters: &mut self.counters,
            options: self.options,
            work_left: max_work,
        };

        // Try reducing moves, least-solutions first; collect those whose
        // child position is losing for the opponent.
        let mut winning_moves: Vec<Move> = Vec::new();
        for m in &ranked {
            let (k, child_key) = partition_by_move(&mut hashed, m.pos, m.digit);
            debug_assert_eq!(k as u32, m.solution_count);
            let child_cells: Vec<u8> = scan
                .choice_cells
                .iter()
                .copied()
                .filter(|&p| p != m.pos)
                .collect();
            match ctx.is_winning(&mut hashed[..k], child_key, &child_cells, root_inferred, 1) {
                None => return AnalyzeResult::abort(),
                Some(false) => {
                    winning_moves.push(m.to_move());
                    if winning_moves.len() >= max_winning_turns {
                        break;
                    }
                }
                Some(true) => {}
            }
        }

        // Fold in the forced placements: an odd number of them flips the
        // winner (default mode), or is searched as an explicit pass
        // (validation mode).
        let reduce_wins = !winning_moves.is_empty();
        let (winning, via_inferred) = if self.options.must_reduce {
            if parity_odd {
                (!reduce_wins, !reduce_wins)
            } else {
                (reduce_wins, false)
            }
        } else if reduce_wins {
            (true, false)
        } else if parity_odd {
            match ctx.is_winning(
                &mut hashed,
                full_key,
                &scan.choice_cells,
                scan.inferred.len() as u32 - 1,
                1,
            ) {
                None => return AnalyzeResult::abort(),
                Some(false) => (true, true),
                Some(true) => (false, false),
            }
        } else {
            (false, false)
        };

        if winning {
            if via_inferred {
                let turns = scan
                    .inferred
                    .iter()
                    .take(max_winning_turns)
                    .map(|&mv| Turn::play(mv))
                    .collect();
                AnalyzeResult {
                    outcome: Some(Outcome::WinInferred),
                    optimal_turns: turns,
                }
            } else {
                AnalyzeResult {
                    outcome: Some(Outcome::WinReduce),
                    optimal_turns: winning_moves.into_iter().map(Turn::play).collect(),
                }
            }
        } else {
            AnalyzeResult {
                outcome: Some(Outcome::Loss),
                optimal_turns: loss_turns(
                    &ranked,
                    &scan.inferred,
                    self.options.maximize_solutions_remaining,
                ),
            }
        }
    }
}

/// Best-effort turn set for a lost position: the moves that keep the most
/// completions alive (or every reducing move, depending on the option).
/// Falls back to the forced placements if no reducing move exists.
fn loss_turns(ranked: &[RankedMove], inferred: &[Move], maximize: bool) -> Vec<Turn> {
    if ranked.is_empty() {
        return inferred.iter().map(|&mv| Turn::play(mv)).collect();
    }
    if maximize {
        let max_count = ranked.iter().map(|m| m.solution_count).max().unwrap_or(0);
        ranked
            .iter()
            .filter(|m| m.solution_count == max_count)
            .map(|m| Turn::play(m.to_move()))
            .collect()
    } else {
        ranked.iter().map(|m| Turn::play(m.to_move())).collect()
    }
}

fn consistent(givens: &[u8; 81], solution: &Completion) -> bool {
    givens.iter().zip(solution.iter()).all(|(&g, &s)| {
        (1..=9).contains(&s) && (g == 0 || g == s)
    })
}
