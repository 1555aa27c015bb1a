//! Storage collaborator: the persistence contract the core is driven through, plus an
//! in-memory implementation used by the web binary and tests.

use crate::models::{
    GameMatch, MatchId, MatchUpdate, NewMatch, NewTournament, Team, TeamId, Tournament,
    TournamentId,
};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Kind of record a storage error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Entity {
    Tournament,
    Team,
    Match,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Tournament => write!(f, "Tournament"),
            Entity::Team => write!(f, "Team"),
            Entity::Match => write!(f, "Match"),
        }
    }
}

/// Errors surfaced by storage. Callers get them unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    NotFound { entity: Entity, id: String },
    /// Internal lock was poisoned by a panicking writer.
    Unavailable,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound { entity, id } => write!(f, "{} {} not found", entity, id),
            StoreError::Unavailable => write!(f, "Storage unavailable"),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    fn not_found(entity: Entity, id: &str) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Persistence contract. Updates are last-write-wins; no retries.
pub trait TournamentStore: Send + Sync {
    fn create_tournament(&self, new: NewTournament) -> Result<Tournament, StoreError>;
    fn get_tournament(&self, id: &str) -> Result<Tournament, StoreError>;
    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError>;
    /// Also removes the tournament's teams and matches.
    fn delete_tournament(&self, id: &str) -> Result<(), StoreError>;

    fn create_team(&self, tournament_id: &str, name: &str) -> Result<Team, StoreError>;
    fn get_team(&self, id: &str) -> Result<Team, StoreError>;
    /// Replace a stored team wholesale.
    fn save_team(&self, team: &Team) -> Result<(), StoreError>;
    /// Matches referring to the team are left as they are.
    fn delete_team(&self, id: &str) -> Result<(), StoreError>;
    fn fetch_teams(&self, tournament_id: &str) -> Result<Vec<Team>, StoreError>;

    fn create_match(&self, new: NewMatch) -> Result<GameMatch, StoreError>;
    fn get_match(&self, id: &str) -> Result<GameMatch, StoreError>;
    fn update_match(&self, id: &str, update: &MatchUpdate) -> Result<GameMatch, StoreError>;
    fn fetch_matches(&self, tournament_id: &str) -> Result<Vec<GameMatch>, StoreError>;
}

#[derive(Default)]
struct Tables {
    tournaments: Vec<Tournament>,
    teams: Vec<Team>,
    matches: Vec<GameMatch>,
}

/// In-memory store. Records keep insertion order, so fetches are stable.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Unavailable)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Unavailable)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl TournamentStore for MemoryStore {
    fn create_tournament(&self, new: NewTournament) -> Result<Tournament, StoreError> {
        let tournament = Tournament {
            id: TournamentId::from(new_id()),
            name: new.name,
            rounds: new.rounds,
            created_on: new
                .created_on
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            bracket_size: new.bracket_size,
        };
        self.write()?.tournaments.push(tournament.clone());
        log::info!("created tournament {} ({})", tournament.name, tournament.id);
        Ok(tournament)
    }

    fn get_tournament(&self, id: &str) -> Result<Tournament, StoreError> {
        self.read()?
            .tournaments
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Tournament, id))
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        Ok(self.read()?.tournaments.clone())
    }

    fn delete_tournament(&self, id: &str) -> Result<(), StoreError> {
        let mut g = self.write()?;
        let before = g.tournaments.len();
        g.tournaments.retain(|t| t.id != id);
        if g.tournaments.len() == before {
            return Err(StoreError::not_found(Entity::Tournament, id));
        }
        g.teams.retain(|t| t.tournament_id != id);
        g.matches.retain(|m| m.tournament_id != id);
        log::info!("deleted tournament {}", id);
        Ok(())
    }

    fn create_team(&self, tournament_id: &str, name: &str) -> Result<Team, StoreError> {
        let mut g = self.write()?;
        if !g.tournaments.iter().any(|t| t.id == tournament_id) {
            return Err(StoreError::not_found(Entity::Tournament, tournament_id));
        }
        let team = Team::new(TeamId::from(new_id()), tournament_id, name);
        g.teams.push(team.clone());
        Ok(team)
    }

    fn get_team(&self, id: &str) -> Result<Team, StoreError> {
        self.read()?
            .teams
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Team, id))
    }

    fn save_team(&self, team: &Team) -> Result<(), StoreError> {
        let mut g = self.write()?;
        let slot = g
            .teams
            .iter_mut()
            .find(|t| t.id == team.id)
            .ok_or_else(|| StoreError::not_found(Entity::Team, &team.id))?;
        *slot = team.clone();
        Ok(())
    }

    fn delete_team(&self, id: &str) -> Result<(), StoreError> {
        let mut g = self.write()?;
        let idx = g
            .teams
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found(Entity::Team, id))?;
        g.teams.remove(idx);
        Ok(())
    }

    fn fetch_teams(&self, tournament_id: &str) -> Result<Vec<Team>, StoreError> {
        Ok(self
            .read()?
            .teams
            .iter()
            .filter(|t| t.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    fn create_match(&self, new: NewMatch) -> Result<GameMatch, StoreError> {
        let mut g = self.write()?;
        if !g.tournaments.iter().any(|t| t.id == new.tournament_id) {
            return Err(StoreError::not_found(Entity::Tournament, &new.tournament_id));
        }
        let m = GameMatch::from_new(MatchId::from(new_id()), new);
        g.matches.push(m.clone());
        Ok(m)
    }

    fn get_match(&self, id: &str) -> Result<GameMatch, StoreError> {
        self.read()?
            .matches
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(Entity::Match, id))
    }

    fn update_match(&self, id: &str, update: &MatchUpdate) -> Result<GameMatch, StoreError> {
        let mut g = self.write()?;
        let m = g
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::not_found(Entity::Match, id))?;
        m.apply(update);
        Ok(m.clone())
    }

    fn fetch_matches(&self, tournament_id: &str) -> Result<Vec<GameMatch>, StoreError> {
        Ok(self
            .read()?
            .matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect())
    }
}
