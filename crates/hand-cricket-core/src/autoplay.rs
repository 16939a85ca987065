//! Headless match runner
//!
//! Plays a complete match against a scripted human, for simulations and
//! end-to-end tests. The human always calls heads and, on winning the toss,
//! elects to bat.

use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::error::{require, MatchError, Result};
use crate::game::{BallReport, Match};
use crate::random::{RandomSource, SeededRng};
use crate::types::{Coin, Difficulty, Digit, Side, TossChoice};

/// Mixed into the seed so the scripted human draws from its own stream and
/// does not disturb the computer's.
const HUMAN_STREAM: u64 = 0x9e3779b97f4a7c15;

/// How the scripted human picks digits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Autopilot {
    /// Uniformly random digit each ball.
    Random,
    /// Same digit every ball.
    Repeat(Digit),
    /// Walk the pattern, restarting at each innings.
    Cycle(Vec<Digit>),
}

impl Autopilot {
    fn digit(&self, ball: usize, rng: &mut SeededRng) -> Digit {
        match self {
            Autopilot::Random => rng.uniform_digit(),
            Autopilot::Repeat(d) => *d,
            Autopilot::Cycle(pattern) if pattern.is_empty() => rng.uniform_digit(),
            Autopilot::Cycle(pattern) => pattern[ball % pattern.len()],
        }
    }
}

/// Result of a complete match
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSummary {
    pub winner: Side,
    pub first_batting: Side,
    pub target: u32,
    pub human_score: u32,
    pub computer_score: u32,
    pub balls: Vec<BallReport>,
}

/// Run a complete match
///
/// # Arguments
/// * `difficulty` - Computer's difficulty tier
/// * `autopilot` - How the human side plays
/// * `seed` - Randomness seed; same seed, same match
/// * `ball_limit` - Abort an innings that runs longer than this
pub fn run_match(
    difficulty: Difficulty,
    autopilot: &Autopilot,
    seed: u64,
    ball_limit: u32,
) -> Result<MatchSummary> {
    let mut game = Match::new(MatchConfig::headless(), SeededRng::new(seed))?;
    let mut human_rng = SeededRng::new(seed ^ HUMAN_STREAM);

    game.start_match(difficulty)?;
    let state = game.submit_toss_call(Coin::Heads)?;
    if state.toss_winner == Some(Side::Human) {
        game.submit_toss_winner_choice(TossChoice::Bat)?;
    }

    let mut balls = Vec::new();
    while let Some(innings) = game.innings() {
        require!(innings.balls() < ball_limit, MatchError::BallLimitExceeded(ball_limit));
        let digit = autopilot.digit(innings.balls() as usize, &mut human_rng);
        if let Some(report) = game.submit_ball(digit.value())?.report {
            balls.push(report);
        }
    }

    let state = game.state();
    let incomplete = || MatchError::InvalidStageTransition {
        action: "summarise the match",
        stage: state.stage,
    };
    Ok(MatchSummary {
        winner: state.winner.ok_or_else(incomplete)?,
        first_batting: state.first_batting.ok_or_else(incomplete)?,
        target: state.target.ok_or_else(incomplete)?,
        human_score: state.human_score.ok_or_else(incomplete)?,
        computer_score: state.computer_score.ok_or_else(incomplete)?,
        balls,
    })
}
