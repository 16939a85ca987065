//! Error codes for rejected match actions

use thiserror::Error;

use crate::game::Stage;

/// Reasons an input is rejected.
///
/// A rejected action never mutates the match; callers re-render from the
/// unchanged state. Input arriving while a pacing continuation is pending is
/// not an error at all and is dropped silently.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("invalid digit {0}: expected a number from 1 to 6")]
    InvalidDigit(u8),

    #[error("cannot {action} during {stage}")]
    InvalidStageTransition { action: &'static str, stage: Stage },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unrecognised {kind}: {value:?}")]
    Parse { kind: &'static str, value: String },

    #[error("innings exceeded the limit of {0} balls")]
    BallLimitExceeded(u32),
}

pub type Result<T> = std::result::Result<T, MatchError>;

/// Return early with `$err` unless `$cond` holds.
macro_rules! require {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

pub(crate) use require;
