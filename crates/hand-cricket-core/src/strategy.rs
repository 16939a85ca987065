//! Adaptive opponent model
//!
//! The computer learns an order-1 transition table over the human's digits
//! during an innings and uses it two ways:
//!
//! - **Attack** (computer bowls): bowl one of the digits the batter most
//!   often plays after their previous digit, hoping to match it.
//! - **Avoid** (computer bats): bat any digit *except* the ones the bowler
//!   most often plays next, so the computer is not dismissed.
//!
//! Ties between equally frequent digits are broken uniformly at random, never
//! by table order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::random::RandomSource;
use crate::types::{Difficulty, Digit, Role};

/// Counts of which digit followed which, `counts[previous][next]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTable {
    counts: [[u32; 6]; 6],
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `next` following `previous`.
    pub fn record(&mut self, previous: Digit, next: Digit) {
        let cell = &mut self.counts[previous.index()][next.index()];
        *cell = cell.saturating_add(1);
    }

    pub fn count(&self, previous: Digit, next: Digit) -> u32 {
        self.counts[previous.index()][next.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().flatten().all(|c| *c == 0)
    }

    /// Digits observed most often after `previous`, ascending.
    ///
    /// Empty when nothing has followed `previous` yet.
    pub fn most_likely_after(&self, previous: Digit) -> Vec<Digit> {
        let row = &self.counts[previous.index()];
        let max = row.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return Vec::new();
        }
        Digit::ALL
            .iter()
            .zip(row.iter())
            .filter(|(_, count)| **count == max)
            .map(|(digit, _)| *digit)
            .collect()
    }
}

/// One side's digits in the current innings, with its transition table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTracker {
    history: Vec<Digit>,
    table: TransitionTable,
}

impl MoveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move. The first move of an innings has no predecessor and
    /// leaves the table untouched.
    pub fn observe(&mut self, digit: Digit) {
        if let Some(previous) = self.history.last() {
            self.table.record(*previous, digit);
        }
        self.history.push(digit);
    }

    pub fn history(&self) -> &[Digit] {
        &self.history
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Up to `n` most recent moves, oldest first.
    pub fn recent(&self, n: usize) -> &[Digit] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}

/// Which policy produced the computer's digit on a ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tactic {
    /// Uniformly random digit.
    Random,
    /// Bowl the batter's predicted digit.
    Attack,
    /// Bat anything but the bowler's predicted digit.
    Avoid,
}

impl Tactic {
    /// Pick the tactic for the computer's role this innings.
    pub fn for_role(difficulty: Difficulty, computer_role: Role) -> Self {
        match (difficulty, computer_role) {
            (Difficulty::Easy, _) => Tactic::Random,
            (Difficulty::Hard, Role::Bowling) => Tactic::Attack,
            (Difficulty::Hard, Role::Batting) => Tactic::Avoid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tactic::Random => "Random",
            Tactic::Attack => "Markov AI",
            Tactic::Avoid => "Markov AI (avoid)",
        }
    }

    /// Choose the computer's digit against `opponent`'s moves so far.
    pub fn choose(self, opponent: &MoveTracker, rng: &mut impl RandomSource) -> Digit {
        match self {
            Tactic::Random => rng.uniform_digit(),
            Tactic::Attack => predict_attack(opponent.history(), opponent.table(), rng),
            Tactic::Avoid => predict_avoid(opponent.history(), opponent.table(), rng),
        }
    }
}

/// Digits the opponent most likely plays next, or `None` when there is not
/// enough history to say.
fn predicted_set(history: &[Digit], table: &TransitionTable) -> Option<Vec<Digit>> {
    if history.len() < 2 {
        return None;
    }
    let last = *history.last()?;
    let likely = table.most_likely_after(last);
    if likely.is_empty() {
        None
    } else {
        Some(likely)
    }
}

/// Attack: play one of the most frequent successors of the last move.
pub fn predict_attack(
    history: &[Digit],
    table: &TransitionTable,
    rng: &mut impl RandomSource,
) -> Digit {
    match predicted_set(history, table) {
        Some(likely) => {
            debug!(?likely, "attack prediction");
            rng.pick(&likely).unwrap_or_else(|| rng.uniform_digit())
        }
        None => rng.uniform_digit(),
    }
}

/// Avoid: play anything outside the most frequent successors of the last move.
pub fn predict_avoid(
    history: &[Digit],
    table: &TransitionTable,
    rng: &mut impl RandomSource,
) -> Digit {
    let Some(likely) = predicted_set(history, table) else {
        return rng.uniform_digit();
    };
    let safe: Vec<Digit> = Digit::ALL
        .iter()
        .copied()
        .filter(|d| !likely.contains(d))
        .collect();
    debug!(?likely, ?safe, "avoid prediction");
    // All six tied leaves nothing to avoid
    rng.pick(&safe).unwrap_or_else(|| rng.uniform_digit())
}
