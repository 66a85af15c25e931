//! Tagged log lines on standard error.
//!
//! Every line starts with an uppercase tag followed by a space, so that a
//! player transcript stays machine parseable: `grep ^TURN log.txt` lists the
//! state at the start of each of our turns, `grep ^IO log.txt` the moves
//! sent and received.

use std::fmt::Display;

use crate::analysis::Counters;
use crate::types::Outcome;

pub fn log_info(msg: impl Display) {
    eprintln!("INFO {msg}");
}

pub fn log_warning(msg: impl Display) {
    eprintln!("WARNING {msg}");
}

/// Typically followed by the player exiting with a nonzero status code.
pub fn log_error(msg: impl Display) {
    eprintln!("ERROR {msg}");
}

/// Logged once at startup.
pub fn log_id(player_name: &str) {
    eprintln!("ID {player_name} (v{})", env!("CARGO_PKG_VERSION"));
}

pub fn log_seed(seed: u64) {
    eprintln!("SEED {seed:016x}");
}

/// State at the beginning of one of our turns, plus the time we think we
/// have used so far (milliseconds).
pub fn log_turn(turn: u32, state_desc: &str, used_ms: u128) {
    eprintln!("TURN {turn} {state_desc} {used_ms}");
}

/// Number of completions that remain; a trailing `+` means the set is
/// known to be incomplete.
pub fn log_solutions(count: usize, complete: bool) {
    eprintln!("SOLUTIONS {count}{}", if complete { "" } else { "+" });
}

pub fn log_sending(s: &str) {
    eprintln!("IO SEND [{s}]");
}

pub fn log_received(s: &str) {
    eprintln!("IO RCVD [{s}]");
}

pub fn log_outcome(outcome: Outcome) {
    eprintln!("OUTCOME {outcome}");
}

/// Time taken this turn, in milliseconds. total >= enumerate + analyze.
pub fn log_time(total_ms: u128, enumerate_ms: u128, analyze_ms: u128) {
    eprintln!("TIME {total_ms} ENUMERATE {enumerate_ms} ANALYZE {analyze_ms}");
}

/// Time spent paused; an upper bound on the time used by the opponent.
pub fn log_pause(interval_ms: u128, total_ms: u128) {
    eprintln!("PAUSE {interval_ms} {total_ms}");
}

pub fn log_counters(counters: &Counters) {
    eprintln!("COUNTERS {counters}");
}
