//! Match Logic for Hand Cricket
//!
//! Core rules for a human-versus-computer game of hand cricket: the toss,
//! two innings, the equal-number dismissal rule, the target chase, and an
//! opponent that learns the human's habits on Hard difficulty.
//! This crate is compiled to:
//! - Native (for the terminal client)
//! - WASM (for a browser front end)

mod error;
mod types;
mod random;
mod strategy;
mod innings;
mod game;
mod config;
pub mod autoplay;

#[cfg(feature = "wasm")]
mod wasm;

use serde::{Deserialize, Serialize};

pub use error::{MatchError, Result};
pub use types::{Coin, Difficulty, Digit, Role, Side, TossChoice};
pub use random::{RandomSource, SeededRng};
#[cfg(not(target_arch = "wasm32"))]
pub use random::EntropyRng;
pub use strategy::{predict_attack, predict_avoid, MoveTracker, Tactic, TransitionTable};
pub use innings::{Innings, InningsEnd, WICKETS_PER_INNINGS};
pub use game::{BallOutcome, BallReport, BallTurn, InningsView, Match, MatchState, Pending, Stage};
pub use config::{MatchConfig, PacingConfig};

/// What a single ball does to the batting side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallResult {
    Wicket,
    Runs(u8),
}

/// Resolve a ball: matching digits dismiss the batter, otherwise the batter
/// scores their own digit. The bowler's digit never scores.
pub fn score_ball(batter: Digit, bowler: Digit) -> BallResult {
    if batter == bowler {
        BallResult::Wicket
    } else {
        BallResult::Runs(batter.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_ball() {
        for bat in Digit::ALL {
            for bowl in Digit::ALL {
                let expected = if bat == bowl {
                    BallResult::Wicket
                } else {
                    BallResult::Runs(bat.value())
                };
                assert_eq!(score_ball(bat, bowl), expected);
            }
        }
    }
}
