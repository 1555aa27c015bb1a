//! Live match scoring: score and pin counters, completing and reopening a match.
//!
//! Every function reads the current match and returns the [`MatchUpdate`] to
//! write back; nothing here touches storage.

use crate::models::{GameMatch, MatchUpdate, Side, SidePair};

/// Errors from scoring operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScoringError {
    /// Both teams must be known to decide a match.
    TeamsNotSet,
}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::TeamsNotSet => write!(f, "Both teams must be set to complete a match"),
        }
    }
}

impl std::error::Error for ScoringError {}

fn clamp(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

fn bump(current: u32, delta: i32) -> u32 {
    clamp(i64::from(current) + i64::from(delta))
}

/// Winner for the given score: the leading side's team, None on a tie.
fn decided_winner(m: &GameMatch, score: SidePair) -> Option<String> {
    let probe = GameMatch {
        score,
        ..m.clone()
    };
    probe
        .leading_side()
        .and_then(|side| probe.team(side).map(str::to_string))
}

/// Score change on a completed match keeps the winner in step.
fn with_score(m: &GameMatch, score: SidePair) -> MatchUpdate {
    let mut update = MatchUpdate {
        score: Some(score),
        ..MatchUpdate::default()
    };
    if m.is_completed {
        update.winner = Some(decided_winner(m, score));
    }
    update
}

/// Add `delta` (may be negative) to one side's score, never going below zero.
pub fn adjust_score(m: &GameMatch, side: Side, delta: i32) -> MatchUpdate {
    let mut score = m.score;
    score.set(side, bump(score.get(side), delta));
    with_score(m, score)
}

/// Add `delta` (may be negative) to one side's pins, never going below zero.
pub fn adjust_pins(m: &GameMatch, side: Side, delta: i32) -> MatchUpdate {
    let mut pins = m.pins;
    pins.set(side, bump(pins.get(side), delta));
    MatchUpdate {
        pins: Some(pins),
        ..MatchUpdate::default()
    }
}

/// Replace both scores; negative inputs clamp to zero.
pub fn set_score(m: &GameMatch, team_a: i64, team_b: i64) -> MatchUpdate {
    with_score(m, SidePair::new(clamp(team_a), clamp(team_b)))
}

/// Mark the match completed with the higher score as winner (none on a tie).
pub fn complete_match(m: &GameMatch) -> Result<MatchUpdate, ScoringError> {
    if m.team_a.is_none() || m.team_b.is_none() {
        return Err(ScoringError::TeamsNotSet);
    }
    Ok(MatchUpdate {
        is_completed: Some(true),
        winner: Some(decided_winner(m, m.score)),
        ..MatchUpdate::default()
    })
}

/// Back to in-progress: not completed, no winner; counters kept.
pub fn reopen_match() -> MatchUpdate {
    MatchUpdate {
        is_completed: Some(false),
        winner: Some(None),
        ..MatchUpdate::default()
    }
}

/// Zero score and pins and clear the result.
pub fn reset_match() -> MatchUpdate {
    MatchUpdate {
        score: Some(SidePair::default()),
        pins: Some(SidePair::default()),
        is_completed: Some(false),
        winner: Some(None),
        ..MatchUpdate::default()
    }
}
