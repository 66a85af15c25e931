use super::completions::{partition_by_move, HashedCompletion};
use super::counters::Counters;
use super::memo::Memo;
use super::move_order::{order_moves, scan_node};
use super::AnalysisOptions;
use crate::hash::DOM_PARITY;

/// Mutable state threaded through one analysis call: the memo, counters,
/// options, and the remaining work budget.
pub(crate) struct SearchContext<'a> {
    pub memo: &'a mut dyn Memo,
    pub counters: &'a mut Counters,
    pub options: AnalysisOptions,
    pub work_left: i64,
}

impl SearchContext<'_> {
    /// Decides whether the position described by `subrange` (>= 2
    /// completions) and `choice_cells` (non-empty) is winning for the
    /// player to move.
    ///
    /// `subrange_hash` is the XOR of the hashes in `subrange`. The slice is
    /// reordered freely while branching; set identity is preserved.
    /// `inferred_left` is the number of forced placements inherited from
    /// ancestor nodes; it stays zero in the default (parity reduction)
    /// mode, where forced placements only contribute a per-node parity.
    ///
    /// Returns `None` when the work budget is exhausted; the abort
    /// propagates to the top without writing to the memo, so all entries
    /// written so far stay valid.
    pub fn is_winning(
        &mut self,
        subrange: &mut [HashedCompletion],
        subrange_hash: u64,
        choice_cells: &[u8],
        inferred_left: u32,
        depth: u32,
    ) -> Option<bool> {
        let n = subrange.len();
        debug_assert!(n >= 2);
        debug_assert!(!choice_cells.is_empty());

        self.counters.recursive_calls += 1;
        self.counters.total_solutions += n as u64;
        self.counters.observe_depth(depth);

        self.work_left -= n as i64;
        if self.work_left < 0 {
            return None;
        }

        let scan = scan_node(subrange, choice_cells);
        debug_assert!(!scan.choice_cells.is_empty());

        let inferred_total = inferred_left + scan.inferred.len() as u32;
        let parity_odd = if self.options.must_reduce {
            scan.inferred.len() % 2 == 1
        } else {
            inferred_total % 2 == 1
        };
        let key = subrange_hash ^ if parity_odd { DOM_PARITY } else { 0 };

        if scan.has_single {
            // An immediately-winning placement ends the game on this turn,
            // before any forced placement can change the tempo.
            self.counters.immediately_won += 1;
            self.memo.put(key, true);
            return Some(true);
        }

        self.counters.memo_accessed += 1;
        if let Some(winning) = self.memo.get(key) {
            self.counters.memo_returned += 1;
            return Some(winning);
        }

        let mut ranked = scan.ranked;
        order_moves(&mut ranked);

        let child_inferred = if self.options.must_reduce {
            0
        } else {
            inferred_total
        };

        let mut found_losing_child = false;
        for m in &ranked {
            let (k, child_hash) = partition_by_move(subrange, m.pos, m.digit);
            debug_assert_eq!(k as u32, m.solution_count);
            debug_assert!(k >= 2 && k < n);
            let child_cells: Vec<u8> = scan
                .choice_cells
                .iter()
                .copied()
                .filter(|&p| p != m.pos)
                .collect();
            match self.is_winning(&mut subrange[..k], child_hash, &child_cells, child_inferred, depth + 1)
            {
                None => return None,
                Some(false) => {
                    found_losing_child = true;
                    break;
                }
                Some(true) => {}
            }
        }

        let winning = if self.options.must_reduce {
            // Parity reduction: an odd number of forced placements flips
            // the winner, because the side that would lose the pure choice
            // game can spend a forced placement to hand it back.
            found_losing_child != parity_odd
        } else {
            let mut winning = found_losing_child;
            if !winning && inferred_total % 2 == 1 {
                // Validation mode: search the forced "pass" explicitly.
                // The completion set and choice cells are unchanged; one
                // forced placement is consumed.
                match self.is_winning(
                    subrange,
                    subrange_hash,
                    &scan.choice_cells,
                    inferred_total - 1,
                    depth + 1,
                ) {
                    None => return None,
                    Some(false) => winning = true,
                    Some(true) => {}
                }
            }
            winning
        };

        self.memo.put(key, winning);
        Some(winning)
    }
}
