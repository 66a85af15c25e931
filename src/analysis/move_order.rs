use super::completions::HashedCompletion;
use crate::types::Move;

/// A candidate placement paired with the number of completions in the
/// current subrange that contain it. Drives move ordering: placements that
/// keep fewer completions are tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMove {
    pub pos: u8,
    pub digit: u8,
    pub solution_count: u32,
}

impl RankedMove {
    #[inline]
    #[must_use]
    pub fn to_move(self) -> Move {
        Move::new(self.pos, self.digit)
    }
}

/// Per-node classification of a candidate cell list against a completion
/// subrange.
#[derive(Debug, Default)]
pub struct NodeScan {
    /// Cells whose candidate set over the subrange still has >= 2 digits.
    pub choice_cells: Vec<u8>,
    /// Cells that became forced: exactly one digit appears across the
    /// whole subrange.
    pub inferred: Vec<Move>,
    /// All (cell, digit) placements over the choice cells, unranked.
    pub ranked: Vec<RankedMove>,
    /// True iff some placement is contained in exactly one completion,
    /// i.e. an immediately-winning move exists.
    pub has_single: bool,
}

/// Tallies digit frequencies for every cell in `cells` across the subrange
/// and splits the cells into choice and inferred groups. Ranked moves are
/// generated in (cell, digit) order; `order_moves` sorts them afterwards.
#[must_use]
pub fn scan_node(subrange: &[HashedCompletion], cells: &[u8]) -> NodeScan {
    let n = subrange.len() as u32;
    let mut scan = NodeScan::default();
    for &pos in cells {
        let mut counts = [0u32; 10];
        for hc in subrange {
            counts[hc.digits[pos as usize] as usize] += 1;
        }

        if let Some(d) = (1..=9u8).find(|&d| counts[d as usize] == n) {
            scan.inferred.push(Move::new(pos, d));
            continue;
        }

        scan.choice_cells.push(pos);
        for d in 1..=9u8 {
            let c = counts[d as usize];
            if c == 0 {
                continue;
            }
            if c == 1 {
                scan.has_single = true;
            }
            scan.ranked.push(RankedMove {
                pos,
                digit: d,
                solution_count: c,
            });
        }
    }
    scan
}

/// Deterministic move ordering: ascending by solution count, ties broken by
/// the (cell, digit) generation order. The sort is stable, so equal counts
/// keep their insertion order.
#[inline]
pub fn order_moves(moves: &mut [RankedMove]) {
    moves.sort_by_key(|m| m.solution_count);
}
