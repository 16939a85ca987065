//! Ball resolution engine
//!
//! One [`Innings`] is a single side's batting spell. It owns the score, the
//! wicket count and both sides' move trackers, so the opponent model forgets
//! everything when the next innings is created.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{require, MatchError, Result};
use crate::game::Stage;
use crate::strategy::MoveTracker;
use crate::types::{Digit, Side};
use crate::{score_ball, BallResult};

/// Wickets a side can lose before it is all out.
pub const WICKETS_PER_INNINGS: u8 = 3;

/// Why an innings finished
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InningsEnd {
    AllOut,
    TargetReached,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Innings {
    number: u8,
    batting_side: Side,
    target: Option<u32>,
    runs: u32,
    wickets_lost: u8,
    balls: u32,
    batter: MoveTracker,
    bowler: MoveTracker,
    ended: Option<InningsEnd>,
}

impl Innings {
    /// Fresh innings: no runs, no wickets, empty histories.
    pub fn new(number: u8, batting_side: Side, target: Option<u32>) -> Self {
        Self {
            number,
            batting_side,
            target,
            runs: 0,
            wickets_lost: 0,
            balls: 0,
            batter: MoveTracker::new(),
            bowler: MoveTracker::new(),
            ended: None,
        }
    }

    /// Play one ball and report whether it finished the innings.
    ///
    /// Equal digits cost a wicket and score nothing; otherwise the batter's
    /// digit is added to the score. A finished innings rejects further balls.
    pub fn resolve_ball(&mut self, batter: Digit, bowler: Digit) -> Result<(BallResult, Option<InningsEnd>)> {
        require!(
            self.ended.is_none(),
            MatchError::InvalidStageTransition {
                action: "bowl a ball",
                stage: Stage::Batting { innings: self.number },
            }
        );

        let result = score_ball(batter, bowler);
        match result {
            BallResult::Wicket => self.wickets_lost += 1,
            BallResult::Runs(n) => self.runs += u32::from(n),
        }
        self.batter.observe(batter);
        self.bowler.observe(bowler);
        self.balls += 1;

        self.ended = if self.wickets_lost >= WICKETS_PER_INNINGS {
            Some(InningsEnd::AllOut)
        } else if self.target.is_some_and(|t| self.runs >= t) {
            Some(InningsEnd::TargetReached)
        } else {
            None
        };

        debug!(
            innings = self.number,
            %batter,
            %bowler,
            ?result,
            runs = self.runs,
            wickets_lost = self.wickets_lost,
            "ball resolved"
        );
        Ok((result, self.ended))
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn batting_side(&self) -> Side {
        self.batting_side
    }

    pub fn bowling_side(&self) -> Side {
        self.batting_side.opponent()
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn wickets_lost(&self) -> u8 {
        self.wickets_lost
    }

    pub fn wickets_remaining(&self) -> u8 {
        WICKETS_PER_INNINGS.saturating_sub(self.wickets_lost)
    }

    pub fn balls(&self) -> u32 {
        self.balls
    }

    pub fn end_reason(&self) -> Option<InningsEnd> {
        self.ended
    }

    pub fn is_over(&self) -> bool {
        self.ended.is_some()
    }

    pub fn batter(&self) -> &MoveTracker {
        &self.batter
    }

    pub fn bowler(&self) -> &MoveTracker {
        &self.bowler
    }

    /// Moves made by `side` this innings, whichever role it holds.
    pub fn moves_of(&self, side: Side) -> &MoveTracker {
        if side == self.batting_side {
            &self.batter
        } else {
            &self.bowler
        }
    }
}
