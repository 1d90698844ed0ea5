// Janken shapes and the cyclic dominance rule

use serde::Deserialize;
use std::fmt;

/// The player's shape: one of the three Janken hands
///
/// Rock beats Scissors, Scissors beats Paper, Paper beats Rock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Closed fist
    #[default]
    Rock,
    Scissors,
    /// Open hand
    Paper,
}

/// Result of comparing two shapes, from the first shape's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Variant {
    /// All shapes in cycle order
    pub const ALL: [Variant; 3] = [Variant::Rock, Variant::Scissors, Variant::Paper];

    /// Position in cycle order, used to index per-shape tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The next shape in cycle order, wrapping after Paper
    pub const fn next(self) -> Self {
        match self {
            Self::Rock => Self::Scissors,
            Self::Scissors => Self::Paper,
            Self::Paper => Self::Rock,
        }
    }

    /// The shape this one defeats
    pub const fn beats(self) -> Self {
        match self {
            Self::Rock => Self::Scissors,
            Self::Scissors => Self::Paper,
            Self::Paper => Self::Rock,
        }
    }

    /// Compare against an opposing shape
    pub fn against(self, other: Variant) -> Outcome {
        if self == other {
            Outcome::Draw
        } else if self.beats() == other {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Scissors => "scissors",
            Self::Paper => "paper",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
