//! Standings: a ranked table of team records derived from completed matches.

use crate::logic::integrity::DataIntegrityWarning;
use crate::models::{GameMatch, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Ranking criteria applied when sorting standings (and seeding the bracket).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingRule {
    /// wins, ties, goal difference, goals for, pins (all descending).
    #[default]
    Sequential,
    /// points (`wins * 3 + ties`), goal difference, goals for, pins.
    Points,
}

impl std::str::FromStr for RankingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(RankingRule::Sequential),
            "points" => Ok(RankingRule::Points),
            other => Err(format!("unknown ranking rule: {}", other)),
        }
    }
}

/// One row of the standings table. Derived fresh on every computation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRecord {
    pub id: TeamId,
    pub name: String,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    /// Goals for.
    pub gf: u32,
    /// Goals against.
    pub ga: u32,
    pub pins: u32,
}

impl StandingRecord {
    fn new(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            ..Self::default()
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.gf) - i64::from(self.ga)
    }

    pub fn played(&self) -> u32 {
        self.wins + self.ties + self.losses
    }

    pub fn points(&self) -> u32 {
        self.wins * 3 + self.ties
    }
}

/// Order two records best-first under `rule`. `Less` means `a` ranks higher.
pub fn compare_records(a: &StandingRecord, b: &StandingRecord, rule: RankingRule) -> Ordering {
    let head = match rule {
        RankingRule::Sequential => b.wins.cmp(&a.wins).then(b.ties.cmp(&a.ties)),
        RankingRule::Points => b.points().cmp(&a.points()),
    };
    head.then(b.goal_difference().cmp(&a.goal_difference()))
        .then(b.gf.cmp(&a.gf))
        .then(b.pins.cmp(&a.pins))
}

/// Standings under the default sequential tiebreak.
pub fn compute_standings(teams: &[Team], matches: &[GameMatch]) -> Vec<StandingRecord> {
    compute_standings_with(teams, matches, RankingRule::Sequential)
}

/// Build one record per team, credit every completed match, then stable-sort by `rule`.
///
/// Records fully tied on every criterion keep the order of `teams`.
/// Completed matches with a missing or unknown side are skipped and logged.
pub fn compute_standings_with(
    teams: &[Team],
    matches: &[GameMatch],
    rule: RankingRule,
) -> Vec<StandingRecord> {
    let mut records: Vec<StandingRecord> = teams.iter().map(StandingRecord::new).collect();
    let index: HashMap<&str, usize> = teams
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();

    for m in matches.iter().filter(|m| m.is_completed) {
        let (a, b) = match (m.team_a.as_deref(), m.team_b.as_deref()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                DataIntegrityWarning::MissingTeam {
                    match_id: m.id.clone(),
                }
                .log();
                continue;
            }
        };
        let (ia, ib) = match (index.get(a), index.get(b)) {
            (Some(&ia), Some(&ib)) => (ia, ib),
            (ia, _) => {
                let team_id = if ia.is_none() { a } else { b };
                DataIntegrityWarning::UnknownTeam {
                    match_id: m.id.clone(),
                    team_id: team_id.to_string(),
                }
                .log();
                continue;
            }
        };
        if ia == ib {
            log::warn!("data integrity: match {} pits team {} against itself", m.id, a);
            continue;
        }
        credit(&mut records[ia], m.score.team_a, m.score.team_b, m.pins.team_a);
        credit(&mut records[ib], m.score.team_b, m.score.team_a, m.pins.team_b);
    }

    // sort_by is stable: full ties keep team-list order.
    records.sort_by(|a, b| compare_records(a, b, rule));
    log::debug!("computed standings for {} teams", records.len());
    records
}

fn credit(record: &mut StandingRecord, scored: u32, conceded: u32, pins: u32) {
    record.gf += scored;
    record.ga += conceded;
    record.pins += pins;
    match scored.cmp(&conceded) {
        Ordering::Greater => record.wins += 1,
        Ordering::Less => record.losses += 1,
        Ordering::Equal => record.ties += 1,
    }
}
