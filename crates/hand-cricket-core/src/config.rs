//! Match configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Pause lengths the shell should wait before resolving a pending
/// continuation. The core never sleeps; it only reports these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PacingConfig {
    pub enabled: bool,
    /// Computer "thinking" after winning the toss
    pub toss_decision_ms: u64,
    /// After a ball while the human bats
    pub ball_cooldown_ms: u64,
    /// After a ball while the computer bats, before the human may bowl
    pub computer_ready_ms: u64,
    /// Between the innings
    pub innings_break_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            toss_decision_ms: 1000,
            ball_cooldown_ms: 1000,
            computer_ready_ms: 2000,
            innings_break_ms: 2000,
        }
    }
}

impl PacingConfig {
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    pub(crate) fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub pacing: PacingConfig,
    /// How many recent digits per side the state snapshot exposes
    pub recent_moves_window: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            recent_moves_window: 6,
        }
    }
}

impl MatchConfig {
    /// No pacing continuations; every action resolves synchronously.
    pub fn headless() -> Self {
        Self { pacing: PacingConfig::disabled(), ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.recent_moves_window == 0 {
            return Err(MatchError::InvalidConfig(
                "recent_moves_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MatchError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
