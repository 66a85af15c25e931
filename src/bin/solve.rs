use std::io::BufRead;

use clap::Parser;
use serde::Serialize;

use duodoku::{
    count_solutions, enumerate_solutions, Analyzer, Completion, GridState, Outcome, Turn,
};

/// Offline position analyzer: counts and enumerates completions of a
/// position, then runs the endgame analysis.
#[derive(Debug, Parser)]
#[command(name = "duodoku-solve")]
struct Args {
    /// Position description: an 81-character grid (`.` or `0` for empty
    /// cells) or a move sequence like `Ee5Dc2`. Use `-` to read one
    /// description per line from standard input.
    state: String,

    /// Max. number of solutions to enumerate
    #[arg(long, default_value_t = 1_000_000)]
    enumerate_max_count: usize,

    /// Max. number of solutions to print
    #[arg(long, default_value_t = 100)]
    max_print: usize,

    /// Max. number of winning turns to list
    #[arg(long, default_value_t = 1)]
    max_winning_turns: usize,

    /// Total work limit for analysis
    #[arg(long, default_value_t = 1_000_000_000_000_000_000)]
    analyze_max_work: i64,

    /// Work to spend per analysis call
    #[arg(long, default_value_t = 10_000_000)]
    analyze_batch_size: i64,

    /// Emit a single JSON object per position instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    solutions: usize,
    complete: bool,
    outcome: Option<Outcome>,
    optimal_turns: &'a [Turn],
    counters: String,
}

fn digit_char(d: u8) -> char {
    if d == 0 {
        '.'
    } else {
        (b'0' + d) as char
    }
}

/// For each cell, the bitmask of digits appearing in at least one solution.
fn calculate_options(solutions: &[Completion]) -> [u16; 81] {
    let mut options = [0u16; 81];
    for solution in solutions {
        for (o, &d) in options.iter_mut().zip(solution.iter()) {
            *o |= 1 << d;
        }
    }
    options
}

#[inline]
fn determined(mask: u16) -> bool {
    mask & mask.wrapping_sub(1) == 0
}

fn print_counts(state: &GridState, args: &Args) {
    let mut grid = state.clone();
    let cr = count_solutions(&mut grid, args.enumerate_max_count as u64, i64::MAX);
    assert!(!cr.work_limit_reached());
    let prefix = if cr.count_limit_reached() { "At least " } else { "" };
    println!("{prefix}{} solutions", cr.count);
    println!("Work required: {}", cr.work);
}

fn print_summary(givens: &[u8; 81], solutions: &[Completion], max_print: usize) {
    let print_count = solutions.len().min(max_print);
    for solution in &solutions[..print_count] {
        let line: String = solution.iter().map(|&d| digit_char(d)).collect();
        println!("{line}");
    }
    if print_count < solutions.len() {
        println!("({} more solutions not printed)", solutions.len() - print_count);
    }

    let given_count = givens.iter().filter(|&&d| d != 0).count();
    let givens_line: String = givens.iter().map(|&d| digit_char(d)).collect();
    println!("{givens_line} ({given_count} given)");

    let options = calculate_options(solutions);
    let mut inferred_count = 0;
    let inferred_line: String = (0..81)
        .map(|i| {
            if givens[i] != 0 {
                '_'
            } else if options[i] != 0 && determined(options[i]) {
                inferred_count += 1;
                digit_char(options[i].trailing_zeros() as u8)
            } else {
                '.'
            }
        })
        .collect();
    println!("{inferred_line} ({inferred_count} inferred)");

    let mut total_choices = 0u32;
    let choices_line: String = (0..81)
        .map(|i| {
            if givens[i] != 0 || determined(options[i]) {
                '_'
            } else {
                let n = options[i].count_ones();
                total_choices += n;
                (b'0' + n as u8) as char
            }
        })
        .collect();
    println!("{choices_line} (choices per cell)");
    println!("{total_choices} (total choices)");
    println!();
}

fn analyze_batched(
    givens: &[u8; 81],
    solutions: &[Completion],
    args: &Args,
    quiet: bool,
) -> (Analyzer, duodoku::AnalyzeResult) {
    let mut analyzer = Analyzer::new();
    let mut work_left = args.analyze_max_work;
    loop {
        let max_work = work_left.min(args.analyze_batch_size);
        let result = analyzer.analyze(givens, solutions, args.max_winning_turns, max_work);
        work_left -= max_work;
        if result.outcome.is_some() || work_left <= 0 {
            return (analyzer, result);
        }
        if !quiet {
            println!("Analysis continuing...");
        }
    }
}

fn process(desc: &str, args: &Args) -> Result<(), String> {
    let state = GridState::parse_desc(desc)?;
    let givens = state.grid();

    if !args.json {
        print_counts(&state, args);
    }

    let mut grid = state.clone();
    let (solutions, er) =
        enumerate_solutions(&mut grid, args.enumerate_max_count, i64::MAX, None);
    assert!(!er.work_limit_reached());
    let complete = er.success;

    if args.json {
        let (outcome, turns, counters) = if solutions.len() == 1 || !complete {
            // Nothing to search: either the claim is already decided or
            // the completion set is not fully known.
            if solutions.len() == 1 && complete {
                (Some(Outcome::WinImmediate), vec![Turn::claim()], String::new())
            } else {
                (None, Vec::new(), String::new())
            }
        } else if solutions.is_empty() {
            (None, Vec::new(), String::new())
        } else {
            let (analyzer, result) = analyze_batched(&givens, &solutions, args, true);
            (
                result.outcome,
                result.optimal_turns,
                analyzer.counters().to_string(),
            )
        };
        let report = JsonReport {
            solutions: solutions.len(),
            complete,
            outcome,
            optimal_turns: &turns,
            counters,
        };
        println!(
            "{}",
            serde_json::to_string(&report).map_err(|e| e.to_string())?
        );
        return Ok(());
    }

    if !complete {
        println!("(further solutions omitted)");
        return Ok(()); // doesn't make sense to analyze an incomplete set
    }

    print_summary(&givens, &solutions, args.max_print);

    if solutions.is_empty() {
        println!("No solution possible!");
    } else if solutions.len() == 1 {
        println!("Solution is unique!");
    } else {
        let (analyzer, result) = analyze_batched(&givens, &solutions, args, false);
        match result.outcome {
            None => println!("Analysis incomplete!"),
            Some(outcome) => {
                println!("Outcome: {outcome}");
                print!("{} optimal turns:", result.optimal_turns.len());
                for turn in &result.optimal_turns {
                    print!(" {turn}");
                }
                println!();
                println!("{}", analyzer.counters());
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.state != "-" {
        process(&args.state, &args)?;
    } else {
        let stdin = std::io::stdin();
        for (line_no, line) in stdin.lock().lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            process(line.trim(), &args)
                .map_err(|e| format!("parse error on line {}: {e}", line_no + 1))?;
        }
    }
    Ok(())
}
