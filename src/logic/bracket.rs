//! Single-elimination bracket: seeded from standings, resolved round by round from match results.

use crate::logic::command::MatchCommand;
use crate::logic::integrity::DataIntegrityWarning;
use crate::logic::standings::{compute_standings_with, RankingRule};
use crate::models::{
    is_valid_bracket_size, GameMatch, MatchId, MatchUpdate, NewMatch, Stage, Team, TeamId,
    TournamentId,
};
use serde::{Deserialize, Serialize};

/// An attempt to act on a bracket node that does not allow it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvalidOperation {
    /// Node needs both teams and no winner.
    NodeNotLive { round: usize, index: usize },
    /// Team is neither `team1` nor `team2` of the node.
    TeamNotInNode(TeamId),
    /// Node is already backed by a bracket match record.
    MatchAlreadyExists(MatchId),
    /// The stored score does not put this team ahead.
    WinnerNotAhead(TeamId),
}

impl std::fmt::Display for InvalidOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidOperation::NodeNotLive { round, index } => {
                write!(f, "Bracket match {} in round {} is not live", index + 1, round + 1)
            }
            InvalidOperation::TeamNotInNode(id) => {
                write!(f, "Team {} is not playing in this bracket match", id)
            }
            InvalidOperation::MatchAlreadyExists(id) => {
                write!(f, "Bracket match already exists ({})", id)
            }
            InvalidOperation::WinnerNotAhead(id) => {
                write!(f, "Team {} is not ahead on the match score", id)
            }
        }
    }
}

impl std::error::Error for InvalidOperation {}

/// Errors from building or acting on a bracket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Size must be a power of two, at least 2.
    InvalidBracketSize(usize),
    InvalidOperation(InvalidOperation),
    /// Live node has no underlying match record yet; create it first.
    MatchNotCreated { round: usize, index: usize },
    /// No node at this position.
    NodeNotFound { round: usize, index: usize },
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InvalidBracketSize(size) => {
                write!(f, "Bracket size {} is not a power of two (>= 2)", size)
            }
            BracketError::InvalidOperation(op) => write!(f, "{}", op),
            BracketError::MatchNotCreated { round, index } => write!(
                f,
                "Bracket match {} in round {} has not been created yet",
                index + 1,
                round + 1
            ),
            BracketError::NodeNotFound { round, index } => {
                write!(f, "No bracket match {} in round {}", index + 1, round + 1)
            }
        }
    }
}

impl std::error::Error for BracketError {}

impl From<InvalidOperation> for BracketError {
    fn from(op: InvalidOperation) -> Self {
        BracketError::InvalidOperation(op)
    }
}

/// A team placed in the bracket with its seed (1 = best).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeededTeam {
    pub id: TeamId,
    pub name: String,
    pub seed: usize,
}

/// One match slot of the bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketNode {
    /// 0 = first round.
    pub round: usize,
    pub index: usize,
    pub match_id: Option<MatchId>,
    /// Stage of the record behind `match_id`.
    #[serde(default)]
    pub match_stage: Option<Stage>,
    /// Team ahead on the record's score; None on a level score or without a record.
    #[serde(default)]
    pub match_leader: Option<TeamId>,
    pub team1: Option<SeededTeam>,
    pub team2: Option<SeededTeam>,
    pub winner: Option<SeededTeam>,
}

impl BracketNode {
    fn empty(round: usize, index: usize) -> Self {
        Self {
            round,
            index,
            match_id: None,
            match_stage: None,
            match_leader: None,
            team1: None,
            team2: None,
            winner: None,
        }
    }

    /// Both participants known, no result yet.
    pub fn is_live(&self) -> bool {
        self.team1.is_some() && self.team2.is_some() && self.winner.is_none()
    }

    /// Match id of the bracket-stage record behind this node. A round-robin
    /// fixture linking the same pair does not count.
    pub fn bracket_match_id(&self) -> Option<&MatchId> {
        match self.match_stage {
            Some(Stage::Bracket) => self.match_id.as_ref(),
            _ => None,
        }
    }

    /// The participant with this id, if any.
    pub fn participant(&self, team_id: &str) -> Option<&SeededTeam> {
        [self.team1.as_ref(), self.team2.as_ref()]
            .into_iter()
            .flatten()
            .find(|t| t.id == team_id)
    }
}

/// A derived bracket: rounds ordered first round to final.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub size: usize,
    pub rounds: Vec<Vec<BracketNode>>,
}

impl Bracket {
    pub fn node(&self, round: usize, index: usize) -> Option<&BracketNode> {
        self.rounds.get(round).and_then(|r| r.get(index))
    }

    /// Like [`Bracket::node`], but a missing node is an error.
    pub fn try_node(&self, round: usize, index: usize) -> Result<&BracketNode, BracketError> {
        self.node(round, index)
            .ok_or(BracketError::NodeNotFound { round, index })
    }

    pub fn final_node(&self) -> Option<&BracketNode> {
        self.rounds.last().and_then(|r| r.first())
    }

    pub fn champion(&self) -> Option<&SeededTeam> {
        self.final_node().and_then(|n| n.winner.as_ref())
    }

    pub fn is_resolved(&self) -> bool {
        self.champion().is_some()
    }

    pub fn live_nodes(&self) -> impl Iterator<Item = &BracketNode> {
        self.rounds.iter().flatten().filter(|n| n.is_live())
    }

    /// Display name of a round, e.g. "Round of 16", "Quarter-Finals".
    pub fn round_name(&self, round: usize) -> String {
        match self.size >> round {
            0 | 1 => String::new(),
            2 => "Final".to_string(),
            4 => "Semi-Finals".to_string(),
            8 => "Quarter-Finals".to_string(),
            n => format!("Round of {}", n),
        }
    }
}

/// Seeds in first-round slot order for a bracket of `size` slots.
///
/// Built by doubling: every seed `s` of the half-size order expands to the
/// pair `(s, 2k + 1 - s)`, seed 1 keeping the top slot and every other seed
/// dropping below its new opponent. Seed 1 and 2 can only meet in the final.
fn slot_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let opp = order.len() * 2 + 1;
        order = order
            .iter()
            .flat_map(|&s| if s == 1 { [s, opp - s] } else { [opp - s, s] })
            .collect();
    }
    order
}

/// First-round seed pairs for a bracket of `size` slots, better seed first.
///
/// For 16 slots: `(1,16) (8,9) (5,12) (4,13) (6,11) (3,14) (7,10) (2,15)`.
pub fn seeding_pairs(size: usize) -> Vec<(usize, usize)> {
    slot_order(size)
        .chunks_exact(2)
        .map(|p| (p[0].min(p[1]), p[0].max(p[1])))
        .collect()
}

/// Bracket seeded with the default sequential ranking.
pub fn compute_bracket(
    teams: &[Team],
    matches: &[GameMatch],
    bracket_size: usize,
) -> Result<Bracket, BracketError> {
    compute_bracket_with(teams, matches, bracket_size, RankingRule::Sequential)
}

/// Seed teams by standings under `rule`, pair them, and resolve every round from `matches`.
///
/// Seeding ranks on every match except bracket-stage ones. Teams ranked below
/// `bracket_size` are left out. Empty seeds are byes: the
/// lone team of a first-round node advances without a match.
pub fn compute_bracket_with(
    teams: &[Team],
    matches: &[GameMatch],
    bracket_size: usize,
    rule: RankingRule,
) -> Result<Bracket, BracketError> {
    if !is_valid_bracket_size(bracket_size) {
        return Err(BracketError::InvalidBracketSize(bracket_size));
    }
    // Bracket results must not reseed the bracket they belong to.
    let seeding_matches: Vec<GameMatch> = matches
        .iter()
        .filter(|m| m.stage != Stage::Bracket)
        .cloned()
        .collect();
    let standings = compute_standings_with(teams, &seeding_matches, rule);
    if standings.len() > bracket_size {
        log::info!(
            "{} teams for a {}-slot bracket; seeds below {} left out",
            standings.len(),
            bracket_size,
            bracket_size
        );
    }
    let seeded: Vec<SeededTeam> = standings
        .into_iter()
        .take(bracket_size)
        .enumerate()
        .map(|(i, r)| SeededTeam {
            id: r.id,
            name: r.name,
            seed: i + 1,
        })
        .collect();

    let mut current: Vec<BracketNode> = seeding_pairs(bracket_size)
        .into_iter()
        .enumerate()
        .map(|(index, (hi, lo))| {
            let team1 = seeded.get(hi - 1).cloned();
            let team2 = seeded.get(lo - 1).cloned();
            first_round_node(index, team1, team2, matches)
        })
        .collect();

    let mut rounds = Vec::new();
    while current.len() > 1 {
        let round = rounds.len() + 1;
        let next = current
            .chunks_exact(2)
            .enumerate()
            .map(|(index, pair)| match (&pair[0].winner, &pair[1].winner) {
                (Some(t1), Some(t2)) => resolve(round, index, t1.clone(), t2.clone(), matches),
                _ => BracketNode::empty(round, index),
            })
            .collect();
        rounds.push(current);
        current = next;
    }
    rounds.push(current);

    Ok(Bracket {
        size: bracket_size,
        rounds,
    })
}

fn first_round_node(
    index: usize,
    team1: Option<SeededTeam>,
    team2: Option<SeededTeam>,
    matches: &[GameMatch],
) -> BracketNode {
    match (team1, team2) {
        (Some(t1), Some(t2)) => resolve(0, index, t1, t2, matches),
        (Some(t), None) | (None, Some(t)) => BracketNode {
            winner: Some(t.clone()),
            team1: Some(t),
            ..BracketNode::empty(0, index)
        },
        (None, None) => BracketNode::empty(0, index),
    }
}

/// Node with both teams known: look up the match linking them for id and winner.
fn resolve(
    round: usize,
    index: usize,
    team1: SeededTeam,
    team2: SeededTeam,
    matches: &[GameMatch],
) -> BracketNode {
    let mut node = BracketNode::empty(round, index);
    if let Some(m) = find_pairing(&team1.id, &team2.id, matches) {
        node.match_id = Some(m.id.clone());
        node.match_stage = Some(m.stage);
        node.match_leader = m
            .leading_side()
            .and_then(|side| m.team(side))
            .map(str::to_string);
        node.winner = match m.winner.as_deref() {
            Some(w) if w == team1.id => Some(team1.clone()),
            Some(w) if w == team2.id => Some(team2.clone()),
            Some(w) => {
                DataIntegrityWarning::WinnerNotParticipant {
                    match_id: m.id.clone(),
                    winner: w.to_string(),
                }
                .log();
                None
            }
            None => None,
        };
    }
    node.team1 = Some(team1);
    node.team2 = Some(team2);
    node
}

/// First match linking the two teams. Bracket-stage records win over
/// round-robin ones; more than one candidate is reported.
fn find_pairing<'a>(a: &str, b: &str, matches: &'a [GameMatch]) -> Option<&'a GameMatch> {
    let linking: Vec<&GameMatch> = matches.iter().filter(|m| m.links(a, b)).collect();
    let candidates: Vec<&GameMatch> = if linking.iter().any(|m| m.stage == Stage::Bracket) {
        linking
            .into_iter()
            .filter(|m| m.stage == Stage::Bracket)
            .collect()
    } else {
        linking
    };
    if candidates.len() > 1 {
        DataIntegrityWarning::AmbiguousPairing {
            team_a: a.to_string(),
            team_b: b.to_string(),
            match_ids: candidates.iter().map(|m| m.id.clone()).collect(),
        }
        .log();
    }
    candidates.first().copied()
}

/// Intent to record `winning_team_id` as winner of a live node.
///
/// Rejected with [`InvalidOperation`] before any intent is produced when the
/// node is not live or the team is not in it. A live node without a
/// bracket-stage record gives [`BracketError::MatchNotCreated`]; a round-robin
/// fixture between the same teams is never written to.
/// The stored score must already put the winner ahead, otherwise
/// [`InvalidOperation::WinnerNotAhead`].
pub fn record_bracket_winner(
    node: &BracketNode,
    winning_team_id: &str,
) -> Result<MatchCommand, BracketError> {
    if !node.is_live() {
        return Err(InvalidOperation::NodeNotLive {
            round: node.round,
            index: node.index,
        }
        .into());
    }
    let winner = node
        .participant(winning_team_id)
        .ok_or_else(|| InvalidOperation::TeamNotInNode(winning_team_id.to_string()))?;
    let match_id = node
        .bracket_match_id()
        .cloned()
        .ok_or(BracketError::MatchNotCreated {
            round: node.round,
            index: node.index,
        })?;
    if node.match_leader.as_deref() != Some(winner.id.as_str()) {
        return Err(InvalidOperation::WinnerNotAhead(winner.id.clone()).into());
    }
    Ok(MatchCommand::new(
        match_id,
        MatchUpdate {
            is_completed: Some(true),
            winner: Some(Some(winner.id.clone())),
            ..MatchUpdate::default()
        },
    ))
}

/// Creation payload for the bracket match behind a live node that has none yet.
/// A round-robin fixture between the same teams does not count as one.
pub fn materialize_bracket_match(
    tournament_id: &str,
    node: &BracketNode,
) -> Result<NewMatch, BracketError> {
    let (team1, team2) = match (&node.team1, &node.team2) {
        (Some(t1), Some(t2)) if node.winner.is_none() => (t1, t2),
        _ => {
            return Err(InvalidOperation::NodeNotLive {
                round: node.round,
                index: node.index,
            }
            .into())
        }
    };
    if let Some(id) = node.bracket_match_id() {
        return Err(InvalidOperation::MatchAlreadyExists(id.clone()).into());
    }
    Ok(NewMatch {
        tournament_id: TournamentId::from(tournament_id),
        team_a: Some(team1.id.clone()),
        team_b: Some(team2.id.clone()),
        round: node.round as u32 + 1,
        stage: Stage::Bracket,
        scheduled_date: None,
        scheduled_time: None,
    })
}
