use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A fully-filled grid: 81 digits, each in 1..=9, satisfying all region
/// constraints and agreeing with the givens it was derived from.
pub type Completion = [u8; 81];

/// Grid indexing helpers (9x9 board, row-major)
#[inline]
#[must_use]
pub fn row_of(pos: u8) -> u8 {
    pos / 9
}

#[inline]
#[must_use]
pub fn col_of(pos: u8) -> u8 {
    pos % 9
}

#[inline]
#[must_use]
pub fn box_of(pos: u8) -> u8 {
    3 * (pos / 27) + (pos % 9) / 3
}

#[inline]
#[must_use]
pub fn pos_of(row: u8, col: u8) -> u8 {
    debug_assert!(row < 9 && col < 9);
    9 * row + col
}

/// A single placement: digit 1..=9 at cell 0..=80.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub pos: u8,
    pub digit: u8,
}

impl Move {
    #[inline]
    #[must_use]
    pub const fn new(pos: u8, digit: u8) -> Self {
        Self { pos, digit }
    }

    #[inline]
    pub fn assert_valid(self) {
        debug_assert!(self.pos < 81);
        debug_assert!((1..=9).contains(&self.digit));
    }
}

/// Text form: uppercase row letter, lowercase column letter, digit.
/// `Ee5` is digit 5 in the middle cell.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = (b'A' + row_of(self.pos)) as char;
        let c = (b'a' + col_of(self.pos)) as char;
        write!(f, "{r}{c}{}", self.digit)
    }
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() != 3 {
            return Err(format!("move must be 3 characters: [{s}]"));
        }
        if !(b'A'..=b'I').contains(&b[0])
            || !(b'a'..=b'i').contains(&b[1])
            || !(b'1'..=b'9').contains(&b[2])
        {
            return Err(format!("unparsable move: [{s}]"));
        }
        Ok(Move {
            pos: pos_of(b[0] - b'A', b[1] - b'a'),
            digit: b[2] - b'0',
        })
    }
}

/// During a turn, a player either places a single digit, or claims that the
/// current position has a unique completion (optionally together with a
/// final placement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    #[serde(rename = "move")]
    pub mv: Option<Move>,
    pub claim_unique: bool,
}

impl Turn {
    /// Claim uniqueness without placing a digit.
    #[inline]
    #[must_use]
    pub const fn claim() -> Self {
        Self {
            mv: None,
            claim_unique: true,
        }
    }

    #[inline]
    #[must_use]
    pub const fn play(mv: Move) -> Self {
        Self {
            mv: Some(mv),
            claim_unique: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn play_and_claim(mv: Move) -> Self {
        Self {
            mv: Some(mv),
            claim_unique: true,
        }
    }

    /// A turn with neither a placement nor a claim is not a valid turn.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mv.is_none() && !self.claim_unique
    }
}

/// Text form: the placement followed by `!` if claiming; a lone `!` claims
/// without placing.
impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(mv) = self.mv {
            write!(f, "{mv}")?;
        }
        if self.claim_unique {
            write!(f, "!")?;
        }
        Ok(())
    }
}

impl FromStr for Turn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "!" {
            return Ok(Turn::claim());
        }
        let (body, claim) = match s.strip_suffix('!') {
            Some(body) => (body, true),
            None => (s, false),
        };
        let mv: Move = body.parse()?;
        Ok(Turn {
            mv: Some(mv),
            claim_unique: claim,
        })
    }
}

/// Game-theoretic value of an analyzed position, for the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Every legal move leaves the opponent winning.
    Loss,
    /// Some placement reduces the completion set to exactly one.
    WinImmediate,
    /// Some reducing placement leaves the opponent in a losing position.
    WinReduce,
    /// Filling a forced cell leaves the opponent in a losing position.
    WinInferred,
}

impl Outcome {
    #[inline]
    #[must_use]
    pub fn is_winning(self) -> bool {
        !matches!(self, Outcome::Loss)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Loss => "LOSS",
            Outcome::WinImmediate => "WIN_IMMEDIATE",
            Outcome::WinReduce => "WIN_REDUCE",
            Outcome::WinInferred => "WIN_INFERRED",
        };
        f.write_str(s)
    }
}
