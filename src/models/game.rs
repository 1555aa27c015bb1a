//! Match (game) record, its per-side counters, and the partial update applied by storage.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Unique identifier for a match.
pub type MatchId = String;

/// One side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Which part of the tournament a match belongs to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    RoundRobin,
    Bracket,
}

/// A non-negative counter per side (score, pins).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SidePair {
    #[serde(default)]
    pub team_a: u32,
    #[serde(default)]
    pub team_b: u32,
}

impl SidePair {
    pub fn new(team_a: u32, team_b: u32) -> Self {
        Self { team_a, team_b }
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::A => self.team_a,
            Side::B => self.team_b,
        }
    }

    pub fn set(&mut self, side: Side, value: u32) {
        match side {
            Side::A => self.team_a = value,
            Side::B => self.team_b = value,
        }
    }
}

/// A single match between two teams.
///
/// Every field besides the ids has a serde default, so partially populated
/// records coming out of storage still deserialize into a total value.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// None until the side is known (later bracket rounds).
    #[serde(default)]
    pub team_a: Option<TeamId>,
    #[serde(default)]
    pub team_b: Option<TeamId>,
    /// Round-robin round, or the 1-based bracket round for bracket matches.
    #[serde(default = "default_round")]
    pub round: u32,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub score: SidePair,
    #[serde(default)]
    pub pins: SidePair,
    #[serde(default)]
    pub is_completed: bool,
    /// Set only for a completed, non-tied match.
    #[serde(default)]
    pub winner: Option<TeamId>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub scheduled_time: Option<NaiveTime>,
}

fn default_round() -> u32 {
    1
}

impl GameMatch {
    /// Materialize a stored match from its creation payload.
    pub fn from_new(id: MatchId, new: NewMatch) -> Self {
        Self {
            id,
            tournament_id: new.tournament_id,
            team_a: new.team_a,
            team_b: new.team_b,
            round: new.round,
            stage: new.stage,
            score: SidePair::default(),
            pins: SidePair::default(),
            is_completed: false,
            winner: None,
            scheduled_date: new.scheduled_date,
            scheduled_time: new.scheduled_time,
        }
    }

    /// Team id on the given side, if known.
    pub fn team(&self, side: Side) -> Option<&str> {
        match side {
            Side::A => self.team_a.as_deref(),
            Side::B => self.team_b.as_deref(),
        }
    }

    /// True if the match links exactly these two teams, in either order.
    pub fn links(&self, first: &str, second: &str) -> bool {
        match (self.team_a.as_deref(), self.team_b.as_deref()) {
            (Some(a), Some(b)) => (a == first && b == second) || (a == second && b == first),
            _ => false,
        }
    }

    /// Side holding the higher score, None on a tie.
    pub fn leading_side(&self) -> Option<Side> {
        use std::cmp::Ordering::*;
        match self.score.team_a.cmp(&self.score.team_b) {
            Greater => Some(Side::A),
            Less => Some(Side::B),
            Equal => None,
        }
    }

    /// Apply a partial update. An incomplete match never keeps a winner.
    pub fn apply(&mut self, update: &MatchUpdate) {
        if let Some(team_a) = &update.team_a {
            self.team_a = team_a.clone();
        }
        if let Some(team_b) = &update.team_b {
            self.team_b = team_b.clone();
        }
        if let Some(score) = update.score {
            self.score = score;
        }
        if let Some(pins) = update.pins {
            self.pins = pins;
        }
        if let Some(done) = update.is_completed {
            self.is_completed = done;
        }
        if let Some(winner) = &update.winner {
            self.winner = winner.clone();
        }
        if let Some(date) = update.scheduled_date {
            self.scheduled_date = date;
        }
        if let Some(time) = update.scheduled_time {
            self.scheduled_time = time;
        }
        if !self.is_completed {
            self.winner = None;
        }
    }
}

/// Creation payload for a match; storage assigns the id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    /// Filled from the route when a match is created over the API.
    #[serde(default)]
    pub tournament_id: TournamentId,
    #[serde(default)]
    pub team_a: Option<TeamId>,
    #[serde(default)]
    pub team_b: Option<TeamId>,
    #[serde(default = "default_round")]
    pub round: u32,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub scheduled_time: Option<NaiveTime>,
}

impl NewMatch {
    pub fn round_robin(
        tournament_id: impl Into<TournamentId>,
        team_a: impl Into<TeamId>,
        team_b: impl Into<TeamId>,
        round: u32,
    ) -> Self {
        Self {
            tournament_id: tournament_id.into(),
            team_a: Some(team_a.into()),
            team_b: Some(team_b.into()),
            round,
            stage: Stage::RoundRobin,
            scheduled_date: None,
            scheduled_time: None,
        }
    }
}

/// Partial-field update for a match. `None` leaves a field untouched; for
/// nullable fields `Some(None)` clears it.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MatchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_a: Option<Option<TeamId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_b: Option<Option<TeamId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<SidePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pins: Option<SidePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Option<TeamId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<Option<NaiveTime>>,
}

impl MatchUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
