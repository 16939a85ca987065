//! Interactive terminal shell
//!
//! Reads one command per line, forwards it to the match and prints the
//! resulting state. The shell owns pacing: whenever the match parks a
//! continuation it sleeps for the requested delay and resolves it.
//!
//! The sleep blocks the reader, so the match never sees input while a
//! continuation is pending. Lines typed during a pause stay buffered and are
//! played once it is over; they are not dropped.

use std::io::{BufRead, Write};
use std::thread;

use anyhow::Result;
use hand_cricket_core::{
    Coin, Difficulty, Match, MatchError, MatchState, Pending, RandomSource, Side, Stage, TossChoice,
};
use tracing::debug;

use crate::render;

pub struct Shell<R: RandomSource, I: BufRead, O: Write> {
    game: Match<R>,
    input: I,
    out: O,
    difficulty: Option<Difficulty>,
}

impl<R: RandomSource, I: BufRead, O: Write> Shell<R, I, O> {
    /// `difficulty` skips the difficulty prompt for every match played.
    pub fn new(game: Match<R>, input: I, out: O, difficulty: Option<Difficulty>) -> Self {
        Self { game, input, out, difficulty }
    }

    /// Play until the input ends or the player quits.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Hand Cricket (q to quit, r to restart)")?;
        loop {
            let state = self.game.state();
            if state.stage == Stage::DifficultySelect {
                if let Some(difficulty) = self.difficulty {
                    self.game.start_match(difficulty)?;
                    writeln!(self.out, "Difficulty: {:?}", difficulty)?;
                    continue;
                }
            }

            write!(self.out, "{}", prompt(&state))?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(());
            };
            match line.as_str() {
                "q" | "quit" => return Ok(()),
                "r" | "restart" => {
                    self.game.reset_match();
                    writeln!(self.out, "Match reset.")?;
                    continue;
                }
                _ => {}
            }

            if state.stage == Stage::Result {
                match line.as_str() {
                    "y" | "yes" => {
                        self.game.reset_match();
                    }
                    "n" | "no" => return Ok(()),
                    _ => writeln!(self.out, "! answer y or n")?,
                }
                continue;
            }

            if let Err(e) = self.dispatch(&state, &line) {
                debug!(error = %e, "input rejected");
                writeln!(self.out, "! {}", e)?;
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_ascii_lowercase()))
    }

    fn dispatch(&mut self, state: &MatchState, line: &str) -> Result<()> {
        match state.stage {
            Stage::DifficultySelect => {
                let difficulty: Difficulty = line.parse()?;
                self.game.start_match(difficulty)?;
            }
            Stage::TossCall => {
                let call: Coin = line.parse()?;
                let state = self.game.submit_toss_call(call)?;
                writeln!(self.out, "{}", render::toss(&state))?;
                self.settle()?;
                if let Some(order) = render::batting_order(&self.game.state()) {
                    writeln!(self.out, "{}", order)?;
                }
            }
            Stage::TossChoicePending => {
                let choice: TossChoice = line.parse()?;
                let state = self.game.submit_toss_winner_choice(choice)?;
                if let Some(order) = render::batting_order(&state) {
                    writeln!(self.out, "{}", order)?;
                }
                self.settle()?;
            }
            Stage::Batting { .. } => {
                let digit: u8 = line.parse().map_err(|_| MatchError::Parse {
                    kind: "digit",
                    value: line.to_string(),
                })?;
                let turn = self.game.submit_ball(digit)?;
                if let Some(report) = turn.report {
                    writeln!(self.out, "{}", render::ball(&report))?;
                }
                if turn.state.stage == Stage::Result {
                    writeln!(self.out, "{}", render::result(&turn.state))?;
                }
                self.settle()?;
            }
            Stage::Result => {}
        }
        Ok(())
    }

    /// Wait out and resolve every parked continuation.
    fn settle(&mut self) -> Result<()> {
        while let (Some(pending), Some(delay)) = (self.game.pending(), self.game.pending_delay()) {
            if pending != Pending::BallCooldown {
                writeln!(self.out, "{}", render::pending(pending))?;
                self.out.flush()?;
            }
            thread::sleep(delay);
            self.game.resolve_pending();
        }
        Ok(())
    }
}

fn prompt(state: &MatchState) -> String {
    match state.stage {
        Stage::DifficultySelect => "Select difficulty [easy/hard]: ".to_string(),
        Stage::TossCall => "Toss time! Call heads or tails: ".to_string(),
        Stage::TossChoicePending => "You won the toss! Bat or bowl first? ".to_string(),
        Stage::Batting { .. } => {
            let role = match state.batting_side {
                Some(Side::Human) => "Your bat",
                _ => "Your bowl",
            };
            format!("\n{}\n{} (1-6): ", render::scoreboard(state), role)
        }
        Stage::Result => "Play again? [y/n]: ".to_string(),
    }
}
