//! Match execution engine
//!
//! [`Match`] sequences a whole game: difficulty, toss, the toss winner's
//! choice, two innings and the result. It is driven entirely by discrete
//! inputs from a shell and answers every input with a fresh [`MatchState`].
//!
//! Pacing delays are continuations, not sleeps. When pacing is enabled the
//! match parks a [`Pending`] after certain actions; the shell waits
//! [`Match::pending_delay`] and then calls [`Match::resolve_pending`]. Any
//! input that arrives in between is silently ignored.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{MatchConfig, PacingConfig};
use crate::error::{require, MatchError, Result};
use crate::innings::{Innings, InningsEnd};
use crate::random::RandomSource;
use crate::strategy::Tactic;
use crate::types::{Coin, Difficulty, Digit, Role, Side, TossChoice};
use crate::BallResult;

/// Where the match is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    DifficultySelect,
    TossCall,
    TossChoicePending,
    Batting { innings: u8 },
    Result,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::DifficultySelect => f.write_str("difficulty selection"),
            Stage::TossCall => f.write_str("the toss call"),
            Stage::TossChoicePending => f.write_str("the toss decision"),
            Stage::Batting { innings } => write!(f, "innings {}", innings),
            Stage::Result => f.write_str("the result"),
        }
    }
}

/// A continuation the shell must resolve before input is accepted again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pending {
    /// Computer won the toss and is "deciding" whether to bat or bowl
    ComputerTossChoice,
    /// Pause after a ball, and before the first ball to a computer batter
    BallCooldown,
    /// Pause before the second innings
    InningsBreak,
}

/// What a submitted ball amounted to, from the match's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallOutcome {
    Wicket,
    Runs(u8),
    InningsOver(InningsEnd),
    MatchOver { winner: Side },
}

/// Everything a shell needs to describe one ball.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallReport {
    pub innings: u8,
    pub ball: u32,
    pub batting_side: Side,
    pub batter_digit: Digit,
    pub bowler_digit: Digit,
    /// Policy that produced the computer's digit
    pub tactic: Tactic,
    pub result: BallResult,
    pub outcome: BallOutcome,
    /// Batting side's runs after this ball
    pub runs: u32,
    pub wickets_lost: u8,
}

impl BallReport {
    pub fn human_digit(&self) -> Digit {
        match self.batting_side {
            Side::Human => self.batter_digit,
            Side::Computer => self.bowler_digit,
        }
    }

    pub fn computer_digit(&self) -> Digit {
        match self.batting_side {
            Side::Human => self.bowler_digit,
            Side::Computer => self.batter_digit,
        }
    }

    /// One-line description, e.g. `Computer bowled 3 (Random). Runs: 12`.
    pub fn message(&self) -> String {
        let verb = match self.batting_side {
            Side::Human => "bowled",
            Side::Computer => "chose",
        };
        let play = format!("Computer {} {} ({})", verb, self.computer_digit(), self.tactic.label());
        match self.result {
            BallResult::Wicket => format!("<< WICKET >> {}", play),
            BallResult::Runs(_) => format!("{}. Runs: {}", play, self.runs),
        }
    }
}

/// Live view of the active innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsView {
    pub number: u8,
    pub batting_side: Side,
    pub runs: u32,
    pub wickets_lost: u8,
    pub wickets_remaining: u8,
    pub balls: u32,
    pub target: Option<u32>,
    pub recent_human_moves: Vec<Digit>,
    pub recent_computer_moves: Vec<Digit>,
}

/// Snapshot handed to the presentation layer after every input
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub stage: Stage,
    pub difficulty: Difficulty,
    pub toss_call: Option<Coin>,
    pub toss_result: Option<Coin>,
    pub toss_winner: Option<Side>,
    pub toss_choice: Option<TossChoice>,
    pub first_batting: Option<Side>,
    pub batting_side: Option<Side>,
    pub target: Option<u32>,
    pub human_score: Option<u32>,
    pub computer_score: Option<u32>,
    pub innings: Option<InningsView>,
    pub winner: Option<Side>,
    pub pending: Option<Pending>,
}

/// Answer to [`Match::submit_ball`]. `report` is `None` when the ball was
/// ignored because a continuation was pending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallTurn {
    pub state: MatchState,
    pub report: Option<BallReport>,
}

/// Everything cleared by a reset.
#[derive(Clone, Debug, Default)]
struct Progress {
    stage: Stage,
    difficulty: Difficulty,
    toss_call: Option<Coin>,
    toss_result: Option<Coin>,
    toss_winner: Option<Side>,
    toss_choice: Option<TossChoice>,
    first_batting: Option<Side>,
    target: Option<u32>,
    human_score: Option<u32>,
    computer_score: Option<u32>,
    innings: Option<Innings>,
    winner: Option<Side>,
    pending: Option<Pending>,
}

/// A single human-versus-computer match
pub struct Match<R: RandomSource> {
    config: MatchConfig,
    rng: R,
    progress: Progress,
}

impl<R: RandomSource> Match<R> {
    pub fn new(config: MatchConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng, progress: Progress::default() })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.progress.stage
    }

    pub fn pending(&self) -> Option<Pending> {
        self.progress.pending
    }

    /// The innings currently being played, if any.
    pub fn innings(&self) -> Option<&Innings> {
        self.progress.innings.as_ref()
    }

    pub fn state(&self) -> MatchState {
        let p = &self.progress;
        let window = self.config.recent_moves_window;
        let innings = p.innings.as_ref().map(|innings| InningsView {
            number: innings.number(),
            batting_side: innings.batting_side(),
            runs: innings.runs(),
            wickets_lost: innings.wickets_lost(),
            wickets_remaining: innings.wickets_remaining(),
            balls: innings.balls(),
            target: innings.target(),
            recent_human_moves: innings.moves_of(Side::Human).recent(window).to_vec(),
            recent_computer_moves: innings.moves_of(Side::Computer).recent(window).to_vec(),
        });
        MatchState {
            stage: p.stage,
            difficulty: p.difficulty,
            toss_call: p.toss_call,
            toss_result: p.toss_result,
            toss_winner: p.toss_winner,
            toss_choice: p.toss_choice,
            first_batting: p.first_batting,
            batting_side: p.innings.as_ref().map(Innings::batting_side),
            target: p.target,
            human_score: p.human_score,
            computer_score: p.computer_score,
            innings,
            winner: p.winner,
            pending: p.pending,
        }
    }

    /// Pick a difficulty and move on to the toss.
    pub fn start_match(&mut self, difficulty: Difficulty) -> Result<MatchState> {
        if self.is_waiting("start match") {
            return Ok(self.state());
        }
        require!(
            self.progress.stage == Stage::DifficultySelect,
            self.wrong_stage("start a match")
        );

        self.progress.difficulty = difficulty;
        self.progress.stage = Stage::TossCall;
        info!(?difficulty, "match started");
        Ok(self.state())
    }

    /// Human calls the coin; the flip decides who chooses to bat or bowl.
    pub fn submit_toss_call(&mut self, call: Coin) -> Result<MatchState> {
        if self.is_waiting("toss call") {
            return Ok(self.state());
        }
        require!(
            self.progress.stage == Stage::TossCall,
            self.wrong_stage("call the toss")
        );

        let coin = self.rng.fair_coin();
        let winner = if coin == call { Side::Human } else { Side::Computer };
        self.progress.toss_call = Some(call);
        self.progress.toss_result = Some(coin);
        self.progress.toss_winner = Some(winner);
        self.progress.stage = Stage::TossChoicePending;
        info!(?call, ?coin, ?winner, "toss decided");

        if winner == Side::Computer {
            if self.config.pacing.enabled {
                self.progress.pending = Some(Pending::ComputerTossChoice);
            } else {
                self.computer_toss_choice();
            }
        }
        Ok(self.state())
    }

    /// Bat or bowl first. Only the human toss winner calls this; the
    /// computer's choice is made internally.
    pub fn submit_toss_winner_choice(&mut self, choice: TossChoice) -> Result<MatchState> {
        if self.is_waiting("toss choice") {
            return Ok(self.state());
        }
        require!(
            self.progress.stage == Stage::TossChoicePending
                && self.progress.toss_winner == Some(Side::Human),
            self.wrong_stage("choose to bat or bowl")
        );

        self.apply_toss_choice(Side::Human, choice);
        Ok(self.state())
    }

    /// Play the human's digit for the next ball.
    ///
    /// The digit is the bat when the human is batting and the bowl when the
    /// computer is. The computer's digit is chosen from the human's moves so
    /// far this innings, before this ball is recorded.
    pub fn submit_ball(&mut self, digit: u8) -> Result<BallTurn> {
        if self.is_waiting("ball") {
            return Ok(BallTurn { state: self.state(), report: None });
        }
        let stage = self.progress.stage;
        let (Stage::Batting { .. }, Some(innings)) = (stage, self.progress.innings.as_mut()) else {
            return Err(self.wrong_stage("bowl a ball"));
        };
        let human = Digit::new(digit)?;

        let human_batting = innings.batting_side() == Side::Human;
        let computer_role = if human_batting { Role::Bowling } else { Role::Batting };
        let tactic = Tactic::for_role(self.progress.difficulty, computer_role);
        let computer = tactic.choose(innings.moves_of(Side::Human), &mut self.rng);
        let (batter_digit, bowler_digit) = if human_batting {
            (human, computer)
        } else {
            (computer, human)
        };

        let (result, ended) = innings.resolve_ball(batter_digit, bowler_digit)?;
        let number = innings.number();
        let ball = innings.balls();
        let batting_side = innings.batting_side();
        let runs = innings.runs();
        let wickets_lost = innings.wickets_lost();

        let outcome = match ended {
            Some(reason) => self
                .complete_innings(reason)
                .unwrap_or(BallOutcome::InningsOver(reason)),
            None => {
                if self.config.pacing.enabled {
                    self.progress.pending = Some(Pending::BallCooldown);
                }
                match result {
                    BallResult::Wicket => BallOutcome::Wicket,
                    BallResult::Runs(n) => BallOutcome::Runs(n),
                }
            }
        };

        let report = BallReport {
            innings: number,
            ball,
            batting_side,
            batter_digit,
            bowler_digit,
            tactic,
            result,
            outcome,
            runs,
            wickets_lost,
        };
        Ok(BallTurn { state: self.state(), report: Some(report) })
    }

    /// Run the parked continuation, if any. Called by the shell once the
    /// delay from [`Match::pending_delay`] has passed.
    pub fn resolve_pending(&mut self) -> MatchState {
        match self.progress.pending.take() {
            Some(Pending::ComputerTossChoice) => self.computer_toss_choice(),
            Some(Pending::InningsBreak) => {
                debug!("innings break finished");
                self.await_computer_batter();
            }
            Some(pending) => debug!(?pending, "pause finished"),
            None => {}
        }
        self.state()
    }

    /// How long the shell should wait before calling
    /// [`Match::resolve_pending`].
    pub fn pending_delay(&self) -> Option<Duration> {
        let pacing = &self.config.pacing;
        let computer_batting = self
            .progress
            .innings
            .as_ref()
            .is_some_and(|innings| innings.batting_side() == Side::Computer);
        self.progress.pending.map(|pending| {
            PacingConfig::millis(match pending {
                Pending::ComputerTossChoice => pacing.toss_decision_ms,
                Pending::InningsBreak => pacing.innings_break_ms,
                Pending::BallCooldown if computer_batting => pacing.computer_ready_ms,
                Pending::BallCooldown => pacing.ball_cooldown_ms,
            })
        })
    }

    /// Abandon or finish the match and go back to difficulty selection.
    pub fn reset_match(&mut self) -> MatchState {
        self.progress = Progress::default();
        info!("match reset");
        self.state()
    }

    fn is_waiting(&self, action: &'static str) -> bool {
        match self.progress.pending {
            Some(pending) => {
                debug!(action, ?pending, "input ignored while pending");
                true
            }
            None => false,
        }
    }

    fn wrong_stage(&self, action: &'static str) -> MatchError {
        MatchError::InvalidStageTransition { action, stage: self.progress.stage }
    }

    fn computer_toss_choice(&mut self) {
        let choice = self.rng.fair_toss_choice();
        self.apply_toss_choice(Side::Computer, choice);
    }

    fn apply_toss_choice(&mut self, chooser: Side, choice: TossChoice) {
        let first = match choice {
            TossChoice::Bat => chooser,
            TossChoice::Bowl => chooser.opponent(),
        };
        info!(?chooser, ?choice, first_batting = ?first, "batting order decided");
        let p = &mut self.progress;
        p.toss_choice = Some(choice);
        p.first_batting = Some(first);
        p.target = None;
        p.human_score = None;
        p.computer_score = None;
        self.begin_innings(1, first, None);
        self.await_computer_batter();
    }

    /// With pacing on, the human waits `computer_ready_ms` before bowling
    /// the first ball to a computer batter, just as between balls.
    fn await_computer_batter(&mut self) {
        let computer_batting = self
            .progress
            .innings
            .as_ref()
            .is_some_and(|innings| innings.batting_side() == Side::Computer && innings.balls() == 0);
        if self.config.pacing.enabled && computer_batting {
            self.progress.pending = Some(Pending::BallCooldown);
        }
    }

    fn begin_innings(&mut self, number: u8, batting_side: Side, target: Option<u32>) {
        self.progress.innings = Some(Innings::new(number, batting_side, target));
        self.progress.stage = Stage::Batting { innings: number };
        info!(innings = number, ?batting_side, ?target, "innings started");
    }

    /// Archive the active innings and move on. A second call finds no
    /// active innings and returns `None`.
    fn complete_innings(&mut self, reason: InningsEnd) -> Option<BallOutcome> {
        let Some(finished) = self.progress.innings.take() else {
            debug!(?reason, "innings already completed");
            return None;
        };
        let side = finished.batting_side();
        let runs = finished.runs();
        match side {
            Side::Human => self.progress.human_score = Some(runs),
            Side::Computer => self.progress.computer_score = Some(runs),
        }
        info!(innings = finished.number(), ?side, runs, ?reason, "innings over");

        if finished.number() == 1 {
            let target = runs + 1;
            self.progress.target = Some(target);
            self.begin_innings(2, side.opponent(), Some(target));
            if self.config.pacing.enabled {
                self.progress.pending = Some(Pending::InningsBreak);
            }
            return Some(BallOutcome::InningsOver(reason));
        }

        let defended = match side.opponent() {
            Side::Human => self.progress.human_score,
            Side::Computer => self.progress.computer_score,
        }
        .unwrap_or(0);
        let winner = if runs > defended { side } else { side.opponent() };
        self.progress.winner = Some(winner);
        self.progress.stage = Stage::Result;
        self.progress.pending = None;
        info!(?winner, chased = runs, defended, "match over");
        Some(BallOutcome::MatchOver { winner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRng;
    use std::collections::VecDeque;

    /// Plays scripted digits first, then falls back to a seeded source.
    /// The coin always lands heads.
    struct ScriptedRng {
        digits: VecDeque<u8>,
        fallback: SeededRng,
    }

    impl ScriptedRng {
        fn new(digits: &[u8]) -> Self {
            Self { digits: digits.iter().copied().collect(), fallback: SeededRng::new(5) }
        }
    }

    impl RandomSource for ScriptedRng {
        fn next_range(&mut self, max: u32) -> u32 {
            self.fallback.next_range(max)
        }

        fn uniform_digit(&mut self) -> Digit {
            match self.digits.pop_front() {
                Some(v) => Digit::new(v).unwrap(),
                None => self.fallback.uniform_digit(),
            }
        }

        fn fair_coin(&mut self) -> Coin {
            Coin::Heads
        }
    }

    fn headless(digits: &[u8]) -> Match<ScriptedRng> {
        Match::new(MatchConfig::headless(), ScriptedRng::new(digits)).unwrap()
    }

    /// Easy match where the human won the toss and made `choice`.
    fn after_toss(digits: &[u8], choice: TossChoice) -> Match<ScriptedRng> {
        let mut game = headless(digits);
        game.start_match(Difficulty::Easy).unwrap();
        game.submit_toss_call(Coin::Heads).unwrap();
        game.submit_toss_winner_choice(choice).unwrap();
        game
    }

    fn report(turn: BallTurn) -> BallReport {
        turn.report.expect("ball was ignored")
    }

    #[test]
    fn test_fresh_match_state() {
        let game = headless(&[]);
        let state = game.state();
        assert_eq!(state.stage, Stage::DifficultySelect);
        assert_eq!(state, MatchState::default());
    }

    #[test]
    fn test_stage_sequence() {
        let mut game = headless(&[]);
        assert_eq!(game.start_match(Difficulty::Hard).unwrap().stage, Stage::TossCall);
        let state = game.submit_toss_call(Coin::Heads).unwrap();
        assert_eq!(state.stage, Stage::TossChoicePending);
        assert_eq!(state.toss_winner, Some(Side::Human));
        assert_eq!(state.toss_result, Some(Coin::Heads));
        let state = game.submit_toss_winner_choice(TossChoice::Bowl).unwrap();
        assert_eq!(state.stage, Stage::Batting { innings: 1 });
        assert_eq!(state.first_batting, Some(Side::Computer));
        assert_eq!(state.batting_side, Some(Side::Computer));
        assert_eq!(state.target, None);
        let view = state.innings.unwrap();
        assert_eq!((view.runs, view.wickets_lost, view.wickets_remaining), (0, 0, 3));
    }

    #[test]
    fn test_computer_wins_toss_headless_resolves_immediately() {
        let mut game = headless(&[]);
        game.start_match(Difficulty::Easy).unwrap();
        let state = game.submit_toss_call(Coin::Tails).unwrap();
        assert_eq!(state.toss_winner, Some(Side::Computer));
        assert_eq!(state.stage, Stage::Batting { innings: 1 });
        assert!(state.toss_choice.is_some());
        assert_eq!(state.pending, None);
    }

    #[test]
    fn test_human_cannot_choose_when_computer_won() {
        let mut game = Match::new(MatchConfig::default(), ScriptedRng::new(&[])).unwrap();
        game.start_match(Difficulty::Easy).unwrap();
        game.submit_toss_call(Coin::Tails).unwrap();
        assert_eq!(game.pending(), Some(Pending::ComputerTossChoice));
        // Parked: ignored, not rejected
        let state = game.submit_toss_winner_choice(TossChoice::Bat).unwrap();
        assert_eq!(state.stage, Stage::TossChoicePending);
        assert_eq!(state.toss_choice, None);

        let state = game.resolve_pending();
        assert_eq!(state.stage, Stage::Batting { innings: 1 });
        // A computer that chose to bat parks its ready pause
        game.resolve_pending();
        let err = game.submit_toss_winner_choice(TossChoice::Bat).unwrap_err();
        assert!(matches!(err, MatchError::InvalidStageTransition { .. }));
    }

    #[test]
    fn test_wrong_stage_rejected_without_change() {
        let mut game = headless(&[]);
        let before = game.state();
        let err = game.submit_ball(3).unwrap_err();
        assert_eq!(
            err,
            MatchError::InvalidStageTransition { action: "bowl a ball", stage: Stage::DifficultySelect }
        );
        assert!(game.submit_toss_call(Coin::Heads).is_err());
        assert!(game.submit_toss_winner_choice(TossChoice::Bat).is_err());
        assert_eq!(game.state(), before);

        game.start_match(Difficulty::Easy).unwrap();
        assert!(game.start_match(Difficulty::Hard).is_err());
        assert_eq!(game.state().difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_invalid_digit_rejected_without_change() {
        let mut game = after_toss(&[], TossChoice::Bat);
        let before = game.state();
        assert_eq!(game.submit_ball(0).unwrap_err(), MatchError::InvalidDigit(0));
        assert_eq!(game.submit_ball(7).unwrap_err(), MatchError::InvalidDigit(7));
        assert_eq!(game.state(), before);
    }

    #[test]
    fn test_easy_scripted_scenario() {
        let mut game = after_toss(&[1, 2, 3], TossChoice::Bat);
        let mut totals = Vec::new();
        for _ in 0..3 {
            let r = report(game.submit_ball(4).unwrap());
            assert_eq!(r.tactic, Tactic::Random);
            assert_eq!(r.outcome, BallOutcome::Runs(4));
            totals.push(r.runs);
        }
        assert_eq!(totals, vec![4, 8, 12]);
        let view = game.state().innings.unwrap();
        assert_eq!(view.wickets_lost, 0);
        assert_eq!(view.recent_computer_moves.iter().map(|d| d.value()).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_wicket_costs_one_and_keeps_runs() {
        let mut game = after_toss(&[2, 5], TossChoice::Bat);
        game.submit_ball(6).unwrap();
        let r = report(game.submit_ball(5).unwrap());
        assert_eq!(r.outcome, BallOutcome::Wicket);
        assert_eq!(r.runs, 6);
        assert_eq!(r.wickets_lost, 1);
        assert_eq!(r.message(), "<< WICKET >> Computer bowled 5 (Random)");
    }

    #[test]
    fn test_target_and_chase_win() {
        // Human bats first: 6, 4 then three wickets = 10 all out
        let mut game = after_toss(&[1, 1, 3, 3, 3], TossChoice::Bat);
        game.submit_ball(6).unwrap();
        game.submit_ball(4).unwrap();
        game.submit_ball(3).unwrap();
        game.submit_ball(3).unwrap();
        let r = report(game.submit_ball(3).unwrap());
        assert_eq!(r.outcome, BallOutcome::InningsOver(InningsEnd::AllOut));

        let state = game.state();
        assert_eq!(state.target, Some(11));
        assert_eq!(state.human_score, Some(10));
        assert_eq!(state.stage, Stage::Batting { innings: 2 });
        assert_eq!(state.batting_side, Some(Side::Computer));
        let view = state.innings.unwrap();
        assert_eq!((view.runs, view.wickets_lost), (0, 0));
        assert!(view.recent_human_moves.is_empty());

        // Computer chases: bats 5, 5, 1 against human bowling 2
        game.rng.digits.extend([5, 5, 1]);
        assert_eq!(report(game.submit_ball(2).unwrap()).outcome, BallOutcome::Runs(5));
        let r = report(game.submit_ball(2).unwrap());
        assert_eq!(r.message(), "Computer chose 5 (Random). Runs: 10");
        let r = report(game.submit_ball(2).unwrap());
        assert_eq!(r.runs, 11);
        assert_eq!(r.outcome, BallOutcome::MatchOver { winner: Side::Computer });

        let state = game.state();
        assert_eq!(state.stage, Stage::Result);
        assert_eq!(state.winner, Some(Side::Computer));
        assert_eq!(state.computer_score, Some(11));
        assert_eq!(state.target, Some(11));
        assert!(state.innings.is_none());
        assert!(game.submit_ball(1).is_err());
    }

    #[test]
    fn test_defending_side_wins_when_chase_falls_short() {
        // Computer bats first for 6, then human is all out for 6
        let mut game = after_toss(&[6, 2, 2, 2], TossChoice::Bowl);
        game.submit_ball(1).unwrap();
        game.submit_ball(2).unwrap();
        game.submit_ball(2).unwrap();
        let r = report(game.submit_ball(2).unwrap());
        assert_eq!(r.outcome, BallOutcome::InningsOver(InningsEnd::AllOut));
        assert_eq!(game.state().target, Some(7));

        game.rng.digits.extend([1, 4, 4, 4]);
        game.submit_ball(6).unwrap();
        game.submit_ball(4).unwrap();
        game.submit_ball(4).unwrap();
        let r = report(game.submit_ball(4).unwrap());
        assert_eq!(r.outcome, BallOutcome::MatchOver { winner: Side::Computer });
        let state = game.state();
        assert_eq!(state.human_score, Some(6));
        assert_eq!(state.computer_score, Some(6));
    }

    #[test]
    fn test_target_set_once() {
        let mut game = after_toss(&[1, 1, 1], TossChoice::Bat);
        for _ in 0..3 {
            game.submit_ball(1).unwrap();
        }
        assert_eq!(game.state().target, Some(1));
        for _ in 0..2 {
            if game.stage() == Stage::Result {
                break;
            }
            game.submit_ball(1).unwrap();
            assert_eq!(game.state().target, Some(1));
        }
    }

    #[test]
    fn test_second_completion_is_ignored() {
        let mut game = after_toss(&[], TossChoice::Bat);
        assert_eq!(game.complete_innings(InningsEnd::AllOut), Some(BallOutcome::InningsOver(InningsEnd::AllOut)));
        let target = game.state().target;
        let mut drained = game;
        drained.progress.innings = None;
        assert_eq!(drained.complete_innings(InningsEnd::AllOut), None);
        assert_eq!(drained.state().target, target);
    }

    #[test]
    fn test_pacing_ignores_input_until_resolved() {
        let mut game = Match::new(MatchConfig::default(), ScriptedRng::new(&[1, 2])).unwrap();
        game.start_match(Difficulty::Easy).unwrap();
        game.submit_toss_call(Coin::Heads).unwrap();
        game.submit_toss_winner_choice(TossChoice::Bat).unwrap();

        let r = report(game.submit_ball(4).unwrap());
        assert_eq!(r.runs, 4);
        assert_eq!(game.pending(), Some(Pending::BallCooldown));
        assert_eq!(game.pending_delay(), Some(Duration::from_millis(1000)));

        let before = game.state();
        let turn = game.submit_ball(4).unwrap();
        assert!(turn.report.is_none());
        assert_eq!(turn.state, before);
        // Invalid input is also swallowed while waiting
        assert!(game.submit_ball(9).unwrap().report.is_none());

        let state = game.resolve_pending();
        assert_eq!(state.pending, None);
        assert_eq!(report(game.submit_ball(4).unwrap()).runs, 8);
    }

    #[test]
    fn test_pacing_delays_by_pending_kind() {
        let mut game = Match::new(MatchConfig::default(), ScriptedRng::new(&[3, 3, 3])).unwrap();
        game.start_match(Difficulty::Easy).unwrap();
        game.submit_toss_call(Coin::Tails).unwrap();
        assert_eq!(game.pending_delay(), Some(Duration::from_millis(1000)));
        game.resolve_pending();
        if game.state().batting_side == Some(Side::Computer) {
            assert_eq!(game.pending(), Some(Pending::BallCooldown));
            assert_eq!(game.pending_delay(), Some(Duration::from_millis(2000)));
            game.resolve_pending();
        }
        assert_eq!(game.pending_delay(), None);

        // Play until the first innings ends, whichever side bats
        let mut outcome = None;
        for _ in 0..200 {
            let turn = game.submit_ball(3).unwrap();
            outcome = turn.report.map(|r| r.outcome);
            if matches!(outcome, Some(BallOutcome::InningsOver(_))) {
                break;
            }
            game.resolve_pending();
        }
        assert!(matches!(outcome, Some(BallOutcome::InningsOver(_))));
        assert_eq!(game.pending(), Some(Pending::InningsBreak));
        assert_eq!(game.pending_delay(), Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_computer_batter_gets_ready_before_first_ball() {
        let mut game = Match::new(MatchConfig::default(), ScriptedRng::new(&[2])).unwrap();
        game.start_match(Difficulty::Easy).unwrap();
        game.submit_toss_call(Coin::Heads).unwrap();
        let state = game.submit_toss_winner_choice(TossChoice::Bowl).unwrap();
        assert_eq!(state.batting_side, Some(Side::Computer));
        assert_eq!(state.pending, Some(Pending::BallCooldown));
        assert_eq!(game.pending_delay(), Some(Duration::from_millis(2000)));
        assert!(game.submit_ball(5).unwrap().report.is_none());

        game.resolve_pending();
        let r = report(game.submit_ball(5).unwrap());
        assert_eq!((r.batter_digit.value(), r.runs), (2, 2));
    }

    #[test]
    fn test_computer_batter_gets_ready_after_innings_break() {
        // Human bats first and is out three times to the scripted 1s
        let mut game = Match::new(MatchConfig::default(), ScriptedRng::new(&[1, 1, 1])).unwrap();
        game.start_match(Difficulty::Easy).unwrap();
        game.submit_toss_call(Coin::Heads).unwrap();
        let state = game.submit_toss_winner_choice(TossChoice::Bat).unwrap();
        assert_eq!(state.pending, None);
        for _ in 0..3 {
            game.submit_ball(1).unwrap();
            game.resolve_pending();
        }
        assert_eq!(game.stage(), Stage::Batting { innings: 2 });
        assert_eq!(game.pending(), Some(Pending::BallCooldown));
        assert_eq!(game.pending_delay(), Some(Duration::from_millis(2000)));
        assert_eq!(game.resolve_pending().pending, None);
    }

    #[test]
    fn test_resolve_pending_without_pending_is_noop() {
        let mut game = headless(&[]);
        let before = game.state();
        assert_eq!(game.resolve_pending(), before);
    }

    #[test]
    fn test_reset_then_start_matches_fresh() {
        let mut played = after_toss(&[1, 2, 3], TossChoice::Bat);
        played.submit_ball(4).unwrap();
        played.submit_ball(5).unwrap();
        let state = played.reset_match();
        assert_eq!(state, MatchState::default());
        assert!(played.innings().is_none());

        let mut fresh = headless(&[]);
        assert_eq!(
            played.start_match(Difficulty::Easy).unwrap(),
            fresh.start_match(Difficulty::Easy).unwrap()
        );
    }

    #[test]
    fn test_hard_bowler_attacks_predicted_digit() {
        // Uniform draws only happen while the table has nothing to say
        let mut game = headless(&[6, 6, 6]);
        game.start_match(Difficulty::Hard).unwrap();
        game.submit_toss_call(Coin::Heads).unwrap();
        game.submit_toss_winner_choice(TossChoice::Bat).unwrap();

        for v in [1, 2, 1] {
            let r = report(game.submit_ball(v).unwrap());
            assert_eq!(r.bowler_digit.value(), 6);
        }

        // 2 followed 1 once, so after a 1 the bowler bowls 2
        let r = report(game.submit_ball(2).unwrap());
        assert_eq!(r.tactic, Tactic::Attack);
        assert_eq!(r.bowler_digit.value(), 2);
        assert_eq!(r.outcome, BallOutcome::Wicket);
        assert_eq!(r.message(), "<< WICKET >> Computer bowled 2 (Markov AI)");

        // 1 followed 2 once
        let r = report(game.submit_ball(1).unwrap());
        assert_eq!(r.bowler_digit.value(), 1);
        assert_eq!(r.outcome, BallOutcome::Wicket);

        // 2 has now followed 1 twice
        let r = report(game.submit_ball(2).unwrap());
        assert_eq!(r.bowler_digit.value(), 2);
        assert_eq!(r.outcome, BallOutcome::InningsOver(InningsEnd::AllOut));
        assert_eq!(game.state().target, Some(5));
    }

    #[test]
    fn test_hard_batter_uses_avoid() {
        let mut game = headless(&[]);
        game.start_match(Difficulty::Hard).unwrap();
        game.submit_toss_call(Coin::Heads).unwrap();
        game.submit_toss_winner_choice(TossChoice::Bowl).unwrap();
        let r = report(game.submit_ball(3).unwrap());
        assert_eq!(r.tactic, Tactic::Avoid);
        assert!(r.message().contains("Markov AI (avoid)"));
    }
}
