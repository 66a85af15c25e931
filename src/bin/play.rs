use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use clap::Parser;
use rand_pcg::Pcg64;

use duodoku::logging::{
    log_error, log_id, log_info, log_outcome, log_pause, log_received, log_seed, log_sending,
    log_solutions, log_time, log_turn, log_warning,
};
use duodoku::rng::{random_seed, rng_from_seed, sample};
use duodoku::{enumerate_solutions, Analyzer, Completion, GridState, Move, Turn};

const PLAYER_NAME: &str = "duodoku";

/// Referee-protocol player: reads moves on stdin, writes turns on stdout,
/// logs tagged diagnostics on stderr.
#[derive(Debug, Parser)]
#[command(name = "duodoku-play")]
struct Args {
    /// Random seed in hexadecimal format. If empty, pick randomly. The
    /// chosen seed is logged to stderr for reproducibility.
    #[arg(long)]
    seed: Option<String>,

    /// Maximum number of solutions to enumerate
    #[arg(long, default_value_t = 200_000)]
    enumerate_max_count: usize,

    /// Maximum number of recursive calls used to enumerate solutions
    #[arg(long, default_value_t = 20_000_000)]
    enumerate_max_work: i64,

    /// Endgame analysis does not start until the solution count is at most
    /// this value
    #[arg(long, default_value_t = 100_000)]
    analyze_max_count: usize,

    /// Maximum amount of work to perform during analysis. Only applies
    /// when no time limit is given.
    #[arg(long, default_value_t = 100_000_000)]
    analyze_max_work: i64,

    /// Time limit in seconds (0 disables time-based pacing). Should be
    /// slightly lower than the official limit to account for overhead.
    #[arg(long, default_value_t = 27)]
    time_limit: u64,

    /// Amount of work to do per analysis call when using a time limit.
    /// Small enough to avoid timeouts, large enough to stay efficient.
    #[arg(long, default_value_t = 10_000_000)]
    analyze_batch_size: i64,
}

/// A simple timer. Can be running or paused; tracks time spent in both
/// states.
struct Timer {
    running: bool,
    start: Instant,
    elapsed: [Duration; 2],
}

impl Timer {
    fn new() -> Self {
        Self {
            running: true,
            start: Instant::now(),
            elapsed: [Duration::ZERO, Duration::ZERO],
        }
    }

    /// Total time spent in the given state.
    fn elapsed(&self, while_running: bool) -> Duration {
        let mut d = self.elapsed[usize::from(while_running)];
        if self.running == while_running {
            d += self.start.elapsed();
        }
        d
    }

    fn running_ms(&self) -> u128 {
        self.elapsed(true).as_millis()
    }

    /// Toggles the running state; returns how much time passed since the
    /// last toggle.
    fn toggle(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.start;
        self.elapsed[usize::from(self.running)] += delta;
        self.start = now;
        self.running = !self.running;
        delta
    }

    fn pause(&mut self) -> Duration {
        assert!(self.running);
        self.toggle()
    }

    fn resume(&mut self) -> Duration {
        assert!(!self.running);
        self.toggle()
    }
}

fn read_input_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> String {
    loop {
        let Some(line) = lines.next() else {
            log_error("Unexpected end of input!");
            std::process::exit(1);
        };
        let line = line.unwrap_or_else(|e| {
            log_error(format!("Read error: {e}"));
            std::process::exit(1);
        });
        // The judging system sometimes writes empty lines before the
        // actual input, so skip those instead of failing.
        let s = line.trim();
        if s.is_empty() {
            continue;
        }
        log_received(s);
        if s == "Quit" {
            log_info("Exiting.");
            std::process::exit(0);
        }
        return s.to_owned();
    }
}

fn write_output_line(s: &str) {
    log_sending(s);
    println!("{s}");
    io::stdout().flush().expect("flush stdout");
}

/// A random valid-looking move. Cells whose candidate mask is down to a
/// single digit are skipped: filling them is never useful and may hand the
/// opponent a uniqueness claim.
fn pick_random_move(state: &GridState, rng: &mut Pcg64) -> Move {
    let mut moves = Vec::new();
    for pos in 0..81u8 {
        if state.digit(pos) != 0 {
            continue;
        }
        let unused = state.candidates(pos);
        if unused & unused.wrapping_sub(1) == 0 {
            continue;
        }
        for digit in 1..=9u8 {
            if unused & (1 << digit) != 0 {
                moves.push(Move::new(pos, digit));
            }
        }
    }
    *sample(&moves, rng)
}

/// Picks a move from an incomplete list of solutions: a random move that
/// reduces the solution set while keeping it as large as possible.
fn pick_move_incomplete(state: &GridState, solutions: &[Completion], rng: &mut Pcg64) -> Move {
    assert!(!solutions.is_empty());
    let mut count = vec![[0usize; 10]; 81];
    for solution in solutions {
        for (i, &d) in solution.iter().enumerate() {
            count[i][d as usize] += 1;
        }
    }

    let mut best_moves = Vec::new();
    let mut max_count = 0usize;
    for pos in 0..81u8 {
        if state.digit(pos) != 0 {
            continue;
        }
        for digit in 1..=9u8 {
            let c = count[pos as usize][digit as usize];
            debug_assert!(c <= solutions.len());
            if c == solutions.len() {
                continue; // must reduce the solution set
            }
            if c > max_count {
                max_count = c;
                best_moves.clear();
            }
            if max_count > 0 && c == max_count {
                best_moves.push(Move::new(pos, digit));
            }
        }
    }
    assert!(max_count > 0);
    assert!(!best_moves.is_empty());
    *sample(&best_moves, rng)
}

struct Game {
    state: GridState,
    solutions: Vec<Completion>,
    solutions_complete: bool,
}

impl Game {
    /// Updates the grid and refines the solution set after a move by
    /// either player.
    fn play_move(&mut self, mv: Move) {
        self.state.play(mv);

        if self.solutions.is_empty() {
            return;
        }
        if !self.solutions_complete {
            // Just clear the solutions; we'll regenerate them next turn.
            self.solutions.clear();
            return;
        }
        let before = self.solutions.len();
        self.solutions
            .retain(|solution| solution[mv.pos as usize] == mv.digit);
        if self.solutions.len() == before {
            log_warning(format!("Non-reducing move: {mv}"));
        }
        assert!(!self.solutions.is_empty());
    }
}

#[allow(clippy::too_many_lines)]
fn play_game(args: &Args, rng: &mut Pcg64) -> bool {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let input = read_input_line(&mut lines);
    let my_player = u32::from(input != "Start");

    let mut total_timer = Timer::new();
    let mut analyzer = Analyzer::new();
    let mut game = Game {
        state: GridState::new(),
        solutions: Vec::new(),
        solutions_complete: false,
    };
    let mut winning = false;
    let mut analyze_max_count = args.analyze_max_count;

    // When we move second, the line already read is the opponent's first
    // move; when we move first it was just the start marker.
    let mut opponent_input = if my_player == 1 { Some(input) } else { None };
    for turn_index in 0u32.. {
        if turn_index % 2 == my_player {
            // My turn!
            log_turn(turn_index, &game.state.desc_string(), total_timer.running_ms());

            let turn_start = Instant::now();
            let mut enumerate_time = Duration::ZERO;
            let mut analyze_time = Duration::ZERO;

            if !game.solutions_complete {
                let t = Instant::now();
                let (solutions, er) = enumerate_solutions(
                    &mut game.state,
                    args.enumerate_max_count,
                    args.enumerate_max_work,
                    Some(&mut *rng),
                );
                enumerate_time += t.elapsed();
                game.solutions = solutions;
                if er.accurate() {
                    game.solutions_complete = true;
                    if game.solutions.is_empty() {
                        log_error("No solutions remain!");
                        return false;
                    }
                } else if game.solutions.is_empty() {
                    log_warning("No solutions found! (this doesn't mean there aren't any)");
                }
            }
            log_solutions(game.solutions.len(), game.solutions_complete);

            let turn;
            if game.solutions.is_empty() {
                // We know nothing about the solutions. Just pick randomly.
                turn = Turn::play(pick_random_move(&game.state, rng));
            } else if !game.solutions_complete || game.solutions.len() > analyze_max_count {
                // We have some solutions, but not the complete set.
                turn = Turn::play(pick_move_incomplete(&game.state, &game.solutions, rng));
            } else {
                // The hard case: select an optimal move given the complete
                // set of solutions.
                let t = Instant::now();
                let givens = game.state.grid();
                let result = if args.time_limit == 0 {
                    analyzer.analyze(&givens, &game.solutions, 1, args.analyze_max_work)
                } else {
                    // Heuristic: each turn, use a third of the remaining
                    // time for analysis.
                    let time_limit = Duration::from_secs(args.time_limit);
                    let time_budget =
                        time_limit.saturating_sub(total_timer.elapsed(true)) / 3;
                    loop {
                        let result = analyzer.analyze(
                            &givens,
                            &game.solutions,
                            1,
                            args.analyze_batch_size,
                        );
                        if result.outcome.is_some() || t.elapsed() > time_budget {
                            break result;
                        }
                        log_info("Continuing analysis");
                    }
                };
                analyze_time += t.elapsed();

                if let Some(outcome) = result.outcome {
                    turn = *sample(&result.optimal_turns, rng);
                    log_outcome(outcome);
                    if turn.claim_unique {
                        log_info("Claiming a unique solution!");
                    }
                    // Detect bugs in analysis: a winning position must
                    // never turn into a losing one.
                    let new_winning = outcome.is_winning();
                    if winning && !new_winning {
                        log_warning(
                            "State went from winning to losing! \
                             (this means there is a bug in analysis)",
                        );
                    }
                    winning = new_winning;
                } else {
                    log_warning("Analysis aborted!");
                    // Fall back to pseudo-random selection, and don't try
                    // to re-analyze until the solution set is smaller.
                    turn = Turn::play(pick_move_incomplete(&game.state, &game.solutions, rng));
                    analyze_max_count = game.solutions.len() - 1;
                }
            }

            // Execute the selected turn.
            assert!(!turn.is_empty());
            if let Some(mv) = turn.mv {
                if !game.state.can_play(mv) {
                    log_error(format!("Selected move is invalid: {mv}"));
                    return false;
                }
                game.play_move(mv);
            }
            log_time(
                turn_start.elapsed().as_millis(),
                enumerate_time.as_millis(),
                analyze_time.as_millis(),
            );
            // Pause just before writing the output line, since the referee
            // may suspend our process immediately after.
            total_timer.pause();
            write_output_line(&turn.to_string());
        } else {
            // Opponent's turn.
            let input = match opponent_input.take() {
                Some(first) => first,
                None => {
                    let s = read_input_line(&mut lines);
                    let pause_duration = total_timer.resume();
                    log_pause(pause_duration.as_millis(), total_timer.elapsed(false).as_millis());
                    s
                }
            };
            match input.parse::<Move>() {
                Err(e) => {
                    log_error(format!("Could not parse move: {e}"));
                    return false;
                }
                Ok(mv) => {
                    if !game.state.can_play(mv) {
                        log_error("Invalid move received!");
                        return false;
                    }
                    game.play_move(mv);
                }
            }
        }
    }
    unreachable!();
}

fn parse_seed(hex: &str) -> Result<u64, String> {
    u64::from_str_radix(hex, 16).map_err(|e| format!("could not parse RNG seed [{hex}]: {e}"))
}

fn main() {
    let args = Args::parse();
    log_id(PLAYER_NAME);

    let seed = match &args.seed {
        Some(hex) => match parse_seed(hex) {
            Ok(seed) => seed,
            Err(e) => {
                log_error(e);
                std::process::exit(1);
            }
        },
        None => random_seed(),
    };
    log_seed(seed);
    let mut rng = rng_from_seed(seed);

    let ok = play_game(&args, &mut rng);
    std::process::exit(i32::from(!ok));
}
