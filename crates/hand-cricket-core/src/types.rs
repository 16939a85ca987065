//! Move vocabulary and the small enums shared by every component

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// A hand signal: the number shown by batter or bowler on one ball.
///
/// Always within 1..=6. Serialized as a bare integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Every digit, in ascending order.
    pub const ALL: [Digit; 6] = [Digit(1), Digit(2), Digit(3), Digit(4), Digit(5), Digit(6)];

    pub fn new(value: u8) -> Result<Self, MatchError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(MatchError::InvalidDigit(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-based position, used to index transition tables.
    pub(crate) fn index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    /// Inverse of [`Digit::index`]. Out-of-range indices wrap.
    pub(crate) fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Narrow a JavaScript number to a ball input. Fractions, NaN and values
/// outside `u8` are rejected here instead of being truncated; the 1..=6
/// check stays with [`Digit::new`].
#[cfg_attr(not(feature = "wasm"), allow(dead_code))]
pub(crate) fn ball_input(value: f64) -> Result<u8, MatchError> {
    if value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(MatchError::Parse { kind: "digit", value: value.to_string() })
    }
}

impl TryFrom<u8> for Digit {
    type Error = MatchError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Digit {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.trim().parse().map_err(|_| MatchError::Parse {
            kind: "digit",
            value: s.to_string(),
        })?;
        Self::new(value)
    }
}

/// One of the two participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Human,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Computer,
            Side::Computer => Side::Human,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Human => f.write_str("You"),
            Side::Computer => f.write_str("Computer"),
        }
    }
}

/// What a side is doing during an innings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Batting,
    Bowling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    Heads,
    Tails,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Computer plays uniformly random digits.
    #[default]
    Easy,
    /// Computer predicts from the human's transition table.
    Hard,
}

/// What the toss winner elects to do first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TossChoice {
    Bat,
    Bowl,
}

macro_rules! impl_from_str {
    ($ty:ty, $kind:literal, { $($($text:literal)|+ => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = MatchError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($($text)|+ => Ok($variant),)+
                    _ => Err(MatchError::Parse { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

impl_from_str!(Coin, "coin call", {
    "h" | "head" | "heads" => Coin::Heads,
    "t" | "tail" | "tails" => Coin::Tails,
});

impl_from_str!(Difficulty, "difficulty", {
    "easy" | "e" => Difficulty::Easy,
    "hard" | "h" => Difficulty::Hard,
});

impl_from_str!(TossChoice, "toss choice", {
    "bat" | "b" => TossChoice::Bat,
    "bowl" | "w" => TossChoice::Bowl,
});
