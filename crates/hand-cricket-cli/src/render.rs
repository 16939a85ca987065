//! Plain-text rendering of match states

use hand_cricket_core::{
    BallOutcome, BallReport, Coin, Digit, InningsEnd, MatchState, Pending, Side, TossChoice,
};

pub fn digits(moves: &[Digit]) -> String {
    moves
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn coin(c: Coin) -> &'static str {
    match c {
        Coin::Heads => "Heads",
        Coin::Tails => "Tails",
    }
}

pub fn toss(state: &MatchState) -> String {
    match (state.toss_result, state.toss_winner) {
        (Some(result), Some(Side::Human)) => format!("Toss result: {} - You won the toss!", coin(result)),
        (Some(result), Some(Side::Computer)) => {
            format!("Toss result: {} - Computer won the toss!", coin(result))
        }
        _ => String::new(),
    }
}

/// Who bats first, once the toss winner has chosen.
pub fn batting_order(state: &MatchState) -> Option<String> {
    let chooser = state.toss_winner?;
    let choice = match state.toss_choice? {
        TossChoice::Bat => "bat",
        TossChoice::Bowl => "bowl",
    };
    Some(match chooser {
        Side::Human => format!("You chose to {} first.", choice),
        Side::Computer => format!("Computer chose to {} first.", choice),
    })
}

pub fn scoreboard(state: &MatchState) -> String {
    let Some(innings) = &state.innings else {
        return String::new();
    };
    let mut lines = Vec::new();
    if let Some(target) = innings.target {
        lines.push(format!("Target: {}", target));
    }
    lines.push(match innings.batting_side {
        Side::Human => "Your turn to bat!".to_string(),
        Side::Computer => "Computer's turn to bat! (You bowl)".to_string(),
    });
    lines.push(format!(
        "Runs: {} | Wickets left: {}",
        innings.runs, innings.wickets_remaining
    ));
    lines.push(format!("Your last choices:     {}", digits(&innings.recent_human_moves)));
    lines.push(format!("Computer last choices: {}", digits(&innings.recent_computer_moves)));
    lines.join("\n")
}

pub fn ball(report: &BallReport) -> String {
    let mut text = report.message();
    match report.outcome {
        BallOutcome::InningsOver(InningsEnd::AllOut) => {
            text.push_str(&format!("\nAll out for {}!", report.runs));
        }
        BallOutcome::InningsOver(InningsEnd::TargetReached) => {
            text.push_str("\nTarget reached!");
        }
        BallOutcome::MatchOver { .. } | BallOutcome::Wicket | BallOutcome::Runs(_) => {}
    }
    text
}

/// What the player is waiting for during a pause.
pub fn pending(pending: Pending) -> &'static str {
    match pending {
        Pending::ComputerTossChoice => "Computer is deciding...",
        Pending::InningsBreak => "Get ready for the second innings...",
        Pending::BallCooldown => "...",
    }
}

pub fn result(state: &MatchState) -> String {
    let headline = match state.winner {
        Some(Side::Human) => "You won!",
        Some(Side::Computer) => "Computer won!",
        None => "No result",
    };
    let score = |s: Option<u32>| s.map_or_else(|| "-".to_string(), |v| v.to_string());
    format!(
        "Game over\n{}\nYour score: {}\nComputer score: {}",
        headline,
        score(state.human_score),
        score(state.computer_score)
    )
}
