//! Data-integrity warnings: conditions in stored data the engines skip over instead of failing.

use crate::models::{GameMatch, MatchId, Team, TeamId};
use std::collections::{HashMap, HashSet};

/// A non-fatal problem found in a team/match snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataIntegrityWarning {
    /// Match references a team id that is not in the team list.
    UnknownTeam { match_id: MatchId, team_id: TeamId },
    /// Completed match with one or both sides unset.
    MissingTeam { match_id: MatchId },
    /// Winner is neither side of the match.
    WinnerNotParticipant { match_id: MatchId, winner: TeamId },
    /// Winner recorded on a match that is not completed.
    WinnerOnIncompleteMatch { match_id: MatchId },
    /// More than one match links the same pair of teams.
    AmbiguousPairing {
        team_a: TeamId,
        team_b: TeamId,
        match_ids: Vec<MatchId>,
    },
}

impl std::fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataIntegrityWarning::UnknownTeam { match_id, team_id } => {
                write!(f, "match {} references unknown team {}", match_id, team_id)
            }
            DataIntegrityWarning::MissingTeam { match_id } => {
                write!(f, "completed match {} is missing a team", match_id)
            }
            DataIntegrityWarning::WinnerNotParticipant { match_id, winner } => {
                write!(f, "match {} winner {} is not one of its teams", match_id, winner)
            }
            DataIntegrityWarning::WinnerOnIncompleteMatch { match_id } => {
                write!(f, "match {} has a winner but is not completed", match_id)
            }
            DataIntegrityWarning::AmbiguousPairing {
                team_a,
                team_b,
                match_ids,
            } => write!(
                f,
                "{} matches link {} and {} ({}); using the first",
                match_ids.len(),
                team_a,
                team_b,
                match_ids.join(", ")
            ),
        }
    }
}

impl DataIntegrityWarning {
    /// Emit through the log facade.
    pub fn log(&self) {
        log::warn!("data integrity: {}", self);
    }
}

/// Per-match checks. Pairing ambiguity is reported separately because only
/// the bracket cares about it.
pub fn check_match(known: &HashSet<&str>, m: &GameMatch) -> Vec<DataIntegrityWarning> {
    let mut out = Vec::new();
    for team_id in [m.team_a.as_deref(), m.team_b.as_deref()].into_iter().flatten() {
        if !known.contains(team_id) {
            out.push(DataIntegrityWarning::UnknownTeam {
                match_id: m.id.clone(),
                team_id: team_id.to_string(),
            });
        }
    }
    if m.is_completed && (m.team_a.is_none() || m.team_b.is_none()) {
        out.push(DataIntegrityWarning::MissingTeam {
            match_id: m.id.clone(),
        });
    }
    if let Some(winner) = &m.winner {
        if m.team_a.as_ref() != Some(winner) && m.team_b.as_ref() != Some(winner) {
            out.push(DataIntegrityWarning::WinnerNotParticipant {
                match_id: m.id.clone(),
                winner: winner.clone(),
            });
        }
        if !m.is_completed {
            out.push(DataIntegrityWarning::WinnerOnIncompleteMatch {
                match_id: m.id.clone(),
            });
        }
    }
    out
}

/// Every warning for a snapshot, in match order; pairing ambiguities last.
pub fn audit(teams: &[Team], matches: &[GameMatch]) -> Vec<DataIntegrityWarning> {
    let known: HashSet<&str> = teams.iter().map(|t| t.id.as_str()).collect();
    let mut warnings: Vec<DataIntegrityWarning> =
        matches.iter().flat_map(|m| check_match(&known, m)).collect();

    // Pair key is order-independent; keep first-seen order for stable output.
    let mut order: Vec<(String, String)> = Vec::new();
    let mut pairs: HashMap<(String, String), Vec<MatchId>> = HashMap::new();
    for m in matches {
        if let (Some(a), Some(b)) = (&m.team_a, &m.team_b) {
            let key = if a <= b {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            let ids = pairs.entry(key.clone()).or_default();
            if ids.is_empty() {
                order.push(key);
            }
            ids.push(m.id.clone());
        }
    }
    for key in order {
        let ids = &pairs[&key];
        if ids.len() > 1 {
            warnings.push(DataIntegrityWarning::AmbiguousPairing {
                team_a: key.0.clone(),
                team_b: key.1.clone(),
                match_ids: ids.clone(),
            });
        }
    }
    warnings
}
