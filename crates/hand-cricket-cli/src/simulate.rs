//! Batch autoplay statistics

use std::fmt;

use anyhow::{Context, Result};
use hand_cricket_core::autoplay::{run_match, Autopilot};
use hand_cricket_core::{Difficulty, Digit, MatchError, Side};
use tracing::{debug, info};

/// Build the scripted human from CLI arguments.
pub fn autopilot(pattern: &[u8], repeat: Option<u8>) -> Result<Autopilot> {
    if let Some(v) = repeat {
        let digit = Digit::new(v).context("--repeat")?;
        return Ok(Autopilot::Repeat(digit));
    }
    if pattern.is_empty() {
        return Ok(Autopilot::Random);
    }
    let digits = pattern
        .iter()
        .map(|v| Digit::new(*v))
        .collect::<Result<Vec<_>, _>>()
        .context("--pattern")?;
    Ok(Autopilot::Cycle(digits))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub difficulty: Difficulty,
    pub games: u32,
    pub human_wins: u32,
    pub computer_wins: u32,
    /// Matches stopped by the ball limit
    pub abandoned: u32,
    pub human_runs: u64,
    pub computer_runs: u64,
}

impl SimulationStats {
    fn completed(&self) -> u32 {
        self.human_wins + self.computer_wins
    }

    fn average(&self, total: u64) -> f64 {
        match self.completed() {
            0 => 0.0,
            n => total as f64 / n as f64,
        }
    }
}

impl fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Difficulty:     {:?}", self.difficulty)?;
        writeln!(f, "Matches:        {}", self.games)?;
        writeln!(f, "Human wins:     {}", self.human_wins)?;
        writeln!(f, "Computer wins:  {}", self.computer_wins)?;
        writeln!(f, "Abandoned:      {}", self.abandoned)?;
        writeln!(f, "Avg human runs: {:.1}", self.average(self.human_runs))?;
        write!(f, "Avg comp. runs: {:.1}", self.average(self.computer_runs))
    }
}

/// Play `games` matches with consecutive seeds starting at `seed`.
pub fn run(
    difficulty: Difficulty,
    pilot: &Autopilot,
    games: u32,
    seed: u64,
    ball_limit: u32,
) -> Result<SimulationStats> {
    let mut stats = SimulationStats { difficulty, games, ..Default::default() };
    for i in 0..games {
        let match_seed = seed.wrapping_add(u64::from(i));
        match run_match(difficulty, pilot, match_seed, ball_limit) {
            Ok(summary) => {
                match summary.winner {
                    Side::Human => stats.human_wins += 1,
                    Side::Computer => stats.computer_wins += 1,
                }
                stats.human_runs += u64::from(summary.human_score);
                stats.computer_runs += u64::from(summary.computer_score);
            }
            Err(MatchError::BallLimitExceeded(limit)) => {
                debug!(match_seed, limit, "match abandoned");
                stats.abandoned += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("match with seed {}", match_seed)),
        }
    }
    info!(?stats, "simulation finished");
    Ok(stats)
}
