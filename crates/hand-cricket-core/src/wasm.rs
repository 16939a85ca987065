//! WASM bindings for a browser front end
//!
//! The page owns rendering and timers: after each call it reads
//! `pendingDelayMs()`, waits that long, then calls `resolvePending()`.

#![cfg(feature = "wasm")]

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::strategy::Tactic;
use crate::types::ball_input;
use crate::{BallTurn, Coin, Difficulty, Match, MatchConfig, SeededRng, TossChoice};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn js_err(e: crate::MatchError) -> JsError {
    JsError::new(&e.to_string())
}

/// One match, held by the page for its whole lifetime
#[wasm_bindgen]
pub struct HandCricket {
    inner: Match<SeededRng>,
}

#[wasm_bindgen]
impl HandCricket {
    /// # Arguments
    /// * `config_json` - Optional JSON `MatchConfig`; defaults when absent
    /// * `seed` - Optional seed for a reproducible match
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, seed: Option<f64>) -> Result<HandCricket, JsError> {
        let config = match config_json {
            Some(json) => MatchConfig::from_json(&json).map_err(js_err)?,
            None => MatchConfig::default(),
        };
        let seed = seed.unwrap_or_else(|| js_sys::Math::random() * u32::MAX as f64);
        let inner = Match::new(config, SeededRng::new(seed as u64)).map_err(js_err)?;
        Ok(HandCricket { inner })
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.state())
    }

    #[wasm_bindgen(js_name = startMatch)]
    pub fn start_match(&mut self, difficulty: &str) -> Result<JsValue, JsError> {
        let difficulty: Difficulty = difficulty.parse().map_err(js_err)?;
        to_js(&self.inner.start_match(difficulty).map_err(js_err)?)
    }

    #[wasm_bindgen(js_name = submitTossCall)]
    pub fn submit_toss_call(&mut self, call: &str) -> Result<JsValue, JsError> {
        let call: Coin = call.parse().map_err(js_err)?;
        to_js(&self.inner.submit_toss_call(call).map_err(js_err)?)
    }

    #[wasm_bindgen(js_name = submitTossWinnerChoice)]
    pub fn submit_toss_winner_choice(&mut self, choice: &str) -> Result<JsValue, JsError> {
        let choice: TossChoice = choice.parse().map_err(js_err)?;
        to_js(&self.inner.submit_toss_winner_choice(choice).map_err(js_err)?)
    }

    /// Returns `{state, report}`; `report` is null when the ball was ignored.
    /// Takes a plain JS number so that 260 or 3.5 are rejected, not cast.
    #[wasm_bindgen(js_name = submitBall)]
    pub fn submit_ball(&mut self, digit: f64) -> Result<JsValue, JsError> {
        let turn = match ball_input(digit) {
            Ok(value) => self.inner.submit_ball(value).map_err(js_err)?,
            Err(_) if self.inner.pending().is_some() => {
                BallTurn { state: self.inner.state(), report: None }
            }
            Err(e) => return Err(js_err(e)),
        };
        to_js(&turn)
    }

    #[wasm_bindgen(js_name = resolvePending)]
    pub fn resolve_pending(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.resolve_pending())
    }

    /// Milliseconds to wait before `resolvePending`, or undefined.
    #[wasm_bindgen(js_name = pendingDelayMs)]
    pub fn pending_delay_ms(&self) -> Option<u32> {
        self.inner
            .pending_delay()
            .map(|d| d.as_millis().min(u32::MAX as u128) as u32)
    }

    #[wasm_bindgen(js_name = resetMatch)]
    pub fn reset_match(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.reset_match())
    }
}

#[derive(Serialize)]
struct TacticInfo {
    id: Tactic,
    label: &'static str,
    description: &'static str,
}

/// Describe the computer's tactics for an about page
#[wasm_bindgen(js_name = getTactics)]
pub fn get_tactics() -> Result<JsValue, JsError> {
    let tactics = [
        TacticInfo {
            id: Tactic::Random,
            label: Tactic::Random.label(),
            description: "Easy: every digit is equally likely.",
        },
        TacticInfo {
            id: Tactic::Attack,
            label: Tactic::Attack.label(),
            description: "Hard, bowling: bowls the digit you most often play after your last one.",
        },
        TacticInfo {
            id: Tactic::Avoid,
            label: Tactic::Avoid.label(),
            description: "Hard, batting: bats anything except the digit you most often bowl next.",
        },
    ];
    to_js(&tactics)
}
