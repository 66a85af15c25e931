use duodoku::{
    count_solutions, AnalysisOptions, Analyzer, Completion, ExactMemo, GridState, LossyMemo, Move,
    Outcome, Turn, WriteonlyMemo,
};

const SOLVED: &str = "123456789456789123789123456231564897564897231897231564312645978645978312978312645";

const BIG_WORK: i64 = 1_000_000_000_000;

fn blank(desc: &str, positions: &[usize]) -> String {
    let mut bytes = desc.as_bytes().to_vec();
    for &i in positions {
        bytes[i] = b'.';
    }
    String::from_utf8(bytes).expect("ascii")
}

fn solved_digits() -> Completion {
    let mut out = [0u8; 81];
    for (o, b) in out.iter_mut().zip(SOLVED.bytes()) {
        *o = b - b'0';
    }
    out
}

fn variant(overrides: &[(usize, u8)]) -> Completion {
    let mut digits = solved_digits();
    for &(pos, d) in overrides {
        digits[pos] = d;
    }
    digits
}

/// Givens matching a completion set: the base grid with the given cells
/// blanked.
fn givens_for(blanked: &[usize]) -> Completion {
    let mut givens = solved_digits();
    for &i in blanked {
        givens[i] = 0;
    }
    givens
}

/// Four completions forming a rectangle on two cells: no single placement
/// reduces the set to one, and every placement hands the opponent an
/// immediate win.
fn rectangle() -> Vec<Completion> {
    vec![
        variant(&[(39, 3), (40, 7)]),
        variant(&[(39, 3), (40, 8)]),
        variant(&[(39, 5), (40, 7)]),
        variant(&[(39, 5), (40, 8)]),
    ]
}

/// Six completions over three cells where exactly one move (cell 20,
/// digit 1) leads into a losing rectangle for the opponent.
fn two_ply_win() -> Vec<Completion> {
    vec![
        variant(&[(20, 1), (40, 3), (60, 7)]),
        variant(&[(20, 1), (40, 3), (60, 8)]),
        variant(&[(20, 1), (40, 5), (60, 7)]),
        variant(&[(20, 1), (40, 5), (60, 8)]),
        variant(&[(20, 2), (40, 3), (60, 7)]),
        variant(&[(20, 2), (40, 5), (60, 8)]),
    ]
}

#[test]
fn s1_unique_completion_is_claimed() {
    let desc = blank(SOLVED, &[40]);
    let mut grid = GridState::from_grid_desc(&desc).expect("valid grid");

    let cr = count_solutions(&mut grid, 2, BIG_WORK);
    assert_eq!(cr.count, 1);
    assert!(cr.accurate());

    let mut analyzer = Analyzer::new();
    let result = analyzer.analyze(&grid.grid(), &[solved_digits()], 1, 1_000_000);
    assert_eq!(result.outcome, Some(Outcome::WinImmediate));
    assert_eq!(result.optimal_turns, vec![Turn::claim()]);
}

#[test]
fn s2_immediate_win_by_digit_choice() {
    // Two completions that agree everywhere except cell 40.
    let completions = vec![variant(&[(40, 7)]), solved_digits()];
    let givens = givens_for(&[40]);

    let mut analyzer = Analyzer::new();
    let result = analyzer.analyze(&givens, &completions, 2, 1_000_000);
    assert_eq!(result.outcome, Some(Outcome::WinImmediate));
    assert_eq!(
        result.optimal_turns,
        vec![
            Turn::play_and_claim(Move::new(40, 7)),
            Turn::play_and_claim(Move::new(40, 9)),
        ]
    );
}

#[test]
fn s3_rectangle_is_lost() {
    let completions = rectangle();
    let givens = givens_for(&[39, 40]);

    let mut analyzer = Analyzer::new();
    let result = analyzer.analyze(&givens, &completions, 1, 1_000_000);
    assert_eq!(result.outcome, Some(Outcome::Loss));
    // All four placements keep two completions, so all four are equally
    // optimal.
    assert_eq!(
        result.optimal_turns,
        vec![
            Turn::play(Move::new(39, 3)),
            Turn::play(Move::new(39, 5)),
            Turn::play(Move::new(40, 7)),
            Turn::play(Move::new(40, 8)),
        ]
    );

    // Outcome coherence: every legal move hands the opponent a win.
    for turn in &result.optimal_turns {
        let mv = turn.mv.expect("loss turns carry a placement");
        let mut givens = givens;
        givens[mv.pos as usize] = mv.digit;
        let remaining: Vec<Completion> = completions
            .iter()
            .copied()
            .filter(|s| s[mv.pos as usize] == mv.digit)
            .collect();
        let reply = analyzer.analyze(&givens, &remaining, 1, 1_000_000);
        assert_eq!(reply.outcome, Some(Outcome::WinImmediate));
    }
}

#[test]
fn s4_two_ply_win_is_found() {
    let completions = two_ply_win();
    let givens = givens_for(&[20, 40, 60]);

    let mut analyzer = Analyzer::new();
    let result = analyzer.analyze(&givens, &completions, 9, BIG_WORK);
    assert_eq!(result.outcome, Some(Outcome::WinReduce));
    assert_eq!(result.optimal_turns, vec![Turn::play(Move::new(20, 1))]);

    // Outcome coherence: after the winning move the opponent is lost.
    let mut after = givens;
    after[20] = 1;
    let remaining: Vec<Completion> = completions
        .iter()
        .copied()
        .filter(|s| s[20] == 1)
        .collect();
    let reply = analyzer.analyze(&after, &remaining, 1, BIG_WORK);
    assert_eq!(reply.outcome, Some(Outcome::Loss));
}

#[test]
fn forced_cell_with_odd_parity_wins() {
    // The losing rectangle plus one forced cell: the player to move fills
    // the forced cell and hands the rectangle back.
    let completions = rectangle();
    let givens = givens_for(&[0, 39, 40]);

    let mut analyzer = Analyzer::new();
    let result = analyzer.analyze(&givens, &completions, 1, 1_000_000);
    assert_eq!(result.outcome, Some(Outcome::WinInferred));
    assert_eq!(result.optimal_turns, vec![Turn::play(Move::new(0, 1))]);

    // Playing the forced move indeed leaves the opponent lost.
    let mut after = givens;
    after[0] = 1;
    let reply = analyzer.analyze(&after, &completions, 1, 1_000_000);
    assert_eq!(reply.outcome, Some(Outcome::Loss));
}

#[test]
fn forced_cell_flips_a_won_position() {
    // The two-ply win plus one forced cell: now the opponent gets to spend
    // the forced placement, so the position is lost.
    let completions = two_ply_win();
    let givens = givens_for(&[0, 20, 40, 60]);

    let mut analyzer = Analyzer::new();
    let result = analyzer.analyze(&givens, &completions, 1, BIG_WORK);
    assert_eq!(result.outcome, Some(Outcome::Loss));
}

#[test]
fn parity_reduction_matches_explicit_pass_search() {
    // Disabling the parity reduction and searching forced passes
    // explicitly must not change any outcome.
    let fixtures: Vec<(Completion, Vec<Completion>)> = vec![
        (givens_for(&[39, 40]), rectangle()),
        (givens_for(&[0, 39, 40]), rectangle()),
        (givens_for(&[20, 40, 60]), two_ply_win()),
        (givens_for(&[0, 20, 40, 60]), two_ply_win()),
    ];
    for (givens, completions) in fixtures {
        let mut fast = Analyzer::new();
        let mut checked = Analyzer::with_memo(
            Box::new(ExactMemo::new()),
            AnalysisOptions {
                maximize_solutions_remaining: true,
                must_reduce: false,
            },
        );
        let a = fast.analyze(&givens, &completions, 9, BIG_WORK);
        let b = checked.analyze(&givens, &completions, 9, BIG_WORK);
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.optimal_turns, b.optimal_turns);
    }
}

#[test]
fn internal_parity_and_transpositions() {
    // Cells 10, 20, 30, 40. Playing (10,1) or (20,7) narrows to the same
    // four-completion subset, in which the other cell becomes forced and
    // the remaining two cells form a rectangle.
    let completions = vec![
        variant(&[(10, 1), (20, 7), (30, 3), (40, 8)]),
        variant(&[(10, 1), (20, 7), (30, 3), (40, 9)]),
        variant(&[(10, 1), (20, 7), (30, 5), (40, 8)]),
        variant(&[(10, 1), (20, 7), (30, 5), (40, 9)]),
        variant(&[(10, 2), (20, 8), (30, 3), (40, 8)]),
        variant(&[(10, 2), (20, 8), (30, 5), (40, 9)]),
    ];
    let givens = givens_for(&[10, 20, 30, 40]);

    let mut analyzer = Analyzer::new();
    let result = analyzer.analyze(&givens, &completions, 9, BIG_WORK);
    assert_eq!(result.outcome, Some(Outcome::Loss));
    assert_eq!(
        result.optimal_turns,
        vec![Turn::play(Move::new(10, 1)), Turn::play(Move::new(20, 7))]
    );
    // The shared subset must be served from the memo on its second visit.
    assert!(analyzer.counters().memo_returned >= 1);

    // And the validation mode agrees.
    let mut checked = Analyzer::with_memo(
        Box::new(ExactMemo::new()),
        AnalysisOptions {
            maximize_solutions_remaining: true,
            must_reduce: false,
        },
    );
    let b = checked.analyze(&givens, &completions, 9, BIG_WORK);
    assert_eq!(b.outcome, result.outcome);
}

#[test]
fn s5_work_budget_aborts_and_resumes() {
    // Three independent linked cell pairs, two joint values each: eight
    // completions over six cells, with no immediate win anywhere near the
    // root and every root placement keeping half the set.
    let pairs = [(2usize, 6usize, 1u8, 2u8), (30, 34, 3, 4), (74, 78, 5, 6)];
    let mut completions = Vec::new();
    for a in 0..2u8 {
        for b in 0..2u8 {
            for c in 0..2u8 {
                completions.push(variant(&[
                    (pairs[0].0, pairs[0].2 + a),
                    (pairs[0].1, pairs[0].3 + a),
                    (pairs[1].0, pairs[1].2 + b),
                    (pairs[1].1, pairs[1].3 + b),
                    (pairs[2].0, pairs[2].2 + c),
                    (pairs[2].1, pairs[2].3 + c),
                ]));
            }
        }
    }
    let blanked: Vec<usize> = pairs
        .iter()
        .flat_map(|&(x, y, _, _)| [x, y])
        .collect();
    let givens = givens_for(&blanked);

    let mut analyzer = Analyzer::new();
    let aborted = analyzer.analyze(&givens, &completions, 1, 1);
    assert_eq!(aborted.outcome, None);
    assert!(aborted.optimal_turns.is_empty());

    let finished = analyzer.analyze(&givens, &completions, 1, BIG_WORK);
    assert!(finished.outcome.is_some());

    // Slicing the same search into small budgets converges to the same
    // answer, because completed sub-searches persist in the memo.
    let mut sliced = Analyzer::new();
    let mut rounds = 0;
    let batched = loop {
        let r = sliced.analyze(&givens, &completions, 1, 100);
        rounds += 1;
        if r.outcome.is_some() {
            break r;
        }
        assert!(rounds < 1_000, "batched analysis failed to converge");
    };
    assert_eq!(batched.outcome, finished.outcome);
}

#[test]
fn s6_memo_makes_repeat_analysis_cheaper() {
    let completions = two_ply_win();
    let givens = givens_for(&[20, 40, 60]);

    let mut analyzer = Analyzer::new();
    let first = analyzer.analyze(&givens, &completions, 1, BIG_WORK);
    let calls_first = analyzer.counters().recursive_calls;

    let second = analyzer.analyze(&givens, &completions, 1, BIG_WORK);
    let calls_second = analyzer.counters().recursive_calls - calls_first;

    assert_eq!(first, second);
    assert!(
        calls_second < calls_first,
        "memo did not shrink the repeat search: {calls_second} >= {calls_first}"
    );
}

#[test]
fn s6_memo_survives_a_forced_move() {
    // One forced cell in front of the two-ply-win position: after filling
    // it, re-analysis runs mostly out of the memo.
    let completions = two_ply_win();
    let givens = givens_for(&[0, 20, 40, 60]);

    let mut analyzer = Analyzer::new();
    let first = analyzer.analyze(&givens, &completions, 1, BIG_WORK);
    assert!(first.outcome.is_some());
    let calls_first = analyzer.counters().recursive_calls;

    let mut after = givens;
    after[0] = 1;
    let second = analyzer.analyze(&after, &completions, 1, BIG_WORK);
    assert_eq!(second.outcome, Some(Outcome::WinReduce));
    let calls_second = analyzer.counters().recursive_calls - calls_first;
    assert!(calls_second < calls_first);
}

#[test]
fn analysis_is_deterministic() {
    let completions = two_ply_win();
    let givens = givens_for(&[20, 40, 60]);

    let mut a = Analyzer::new();
    let mut b = Analyzer::new();
    assert_eq!(
        a.analyze(&givens, &completions, 9, BIG_WORK),
        b.analyze(&givens, &completions, 9, BIG_WORK)
    );
}

#[test]
fn work_monotonicity() {
    let completions = two_ply_win();
    let givens = givens_for(&[20, 40, 60]);

    let mut decided: Option<duodoku::AnalyzeResult> = None;
    for shift in 0..24 {
        let mut analyzer = Analyzer::new();
        let result = analyzer.analyze(&givens, &completions, 9, 1i64 << shift);
        match (&decided, result.outcome) {
            (None, None) => {}
            (None, Some(_)) => decided = Some(result),
            (Some(prev), _) => {
                // Once decided, a larger budget never changes the answer.
                assert_eq!(&result, prev);
            }
        }
    }
    assert!(decided.is_some(), "largest budget still aborted");
}

#[test]
fn alternative_memos_agree_with_the_exact_one() {
    let completions = two_ply_win();
    let givens = givens_for(&[20, 40, 60]);

    let mut exact = Analyzer::new();
    let expected = exact.analyze(&givens, &completions, 9, BIG_WORK);

    let mut lossy = Analyzer::with_memo(
        Box::new(LossyMemo::with_capacity_pow2(1 << 16)),
        AnalysisOptions::default(),
    );
    assert_eq!(lossy.analyze(&givens, &completions, 9, BIG_WORK), expected);

    let mut writeonly = Analyzer::with_memo(
        Box::new(WriteonlyMemo::new()),
        AnalysisOptions::default(),
    );
    assert_eq!(writeonly.analyze(&givens, &completions, 9, BIG_WORK), expected);
}

#[test]
fn loss_turns_without_maximization_list_every_reducing_move() {
    let completions = rectangle();
    let givens = givens_for(&[39, 40]);

    let mut analyzer = Analyzer::with_memo(
        Box::new(ExactMemo::new()),
        AnalysisOptions {
            maximize_solutions_remaining: false,
            must_reduce: true,
        },
    );
    let result = analyzer.analyze(&givens, &completions, 1, BIG_WORK);
    assert_eq!(result.outcome, Some(Outcome::Loss));
    // All placements reduce here, so the sets coincide with the
    // maximizing variant; the option only changes which moves qualify.
    assert_eq!(result.optimal_turns.len(), 4);
}
