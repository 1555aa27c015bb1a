//! Team and roster data structures.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = String;

/// Unique identifier for a roster member.
pub type MemberId = String;

/// Errors from roster and team edits.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RosterError {
    /// Names must contain at least one non-whitespace character.
    EmptyName,
    /// No member with this id on the roster.
    MemberNotFound(MemberId),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::EmptyName => write!(f, "Name must not be empty"),
            RosterError::MemberNotFound(id) => write!(f, "Member {} not found on roster", id),
        }
    }
}

impl std::error::Error for RosterError {}

/// Role of a member within the team.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Regular,
    Substitute,
}

impl Role {
    pub fn toggled(self) -> Self {
        match self {
            Role::Regular => Role::Substitute,
            Role::Substitute => Role::Regular,
        }
    }
}

/// A player on a team's roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

/// A team in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub tournament_id: TournamentId,
    pub name: String,
    /// Ordered roster; per-role order is the order of this list filtered by role.
    #[serde(default)]
    pub roster: Vec<Member>,
}

impl Team {
    pub fn new(
        id: impl Into<TeamId>,
        tournament_id: impl Into<TournamentId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tournament_id: tournament_id.into(),
            name: name.into(),
            roster: Vec::new(),
        }
    }

    /// Rename the team. The name is trimmed and must not be empty.
    pub fn rename(&mut self, name: &str) -> Result<(), RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        self.name = name.to_string();
        Ok(())
    }

    /// Append a new member with the given role and return its id.
    pub fn add_member(&mut self, name: &str, role: Role) -> Result<MemberId, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        let id = Uuid::new_v4().to_string();
        self.roster.push(Member {
            id: id.clone(),
            name: name.to_string(),
            role,
        });
        Ok(id)
    }

    /// Remove a member and return it.
    pub fn remove_member(&mut self, member_id: &str) -> Result<Member, RosterError> {
        let idx = self.position(member_id)?;
        Ok(self.roster.remove(idx))
    }

    /// Move a member to the other role: removed from its place, appended at the end.
    pub fn toggle_role(&mut self, member_id: &str) -> Result<Role, RosterError> {
        let idx = self.position(member_id)?;
        let role = self.roster[idx].role.toggled();
        self.move_to_role(idx, role);
        Ok(role)
    }

    /// Put a member into `role`. A no-op when it already has that role.
    pub fn set_role(&mut self, member_id: &str, role: Role) -> Result<(), RosterError> {
        let idx = self.position(member_id)?;
        if self.roster[idx].role != role {
            self.move_to_role(idx, role);
        }
        Ok(())
    }

    pub fn regulars(&self) -> impl Iterator<Item = &Member> {
        self.roster.iter().filter(|m| m.role == Role::Regular)
    }

    pub fn substitutes(&self) -> impl Iterator<Item = &Member> {
        self.roster.iter().filter(|m| m.role == Role::Substitute)
    }

    fn position(&self, member_id: &str) -> Result<usize, RosterError> {
        self.roster
            .iter()
            .position(|m| m.id == member_id)
            .ok_or_else(|| RosterError::MemberNotFound(member_id.to_string()))
    }

    fn move_to_role(&mut self, idx: usize, role: Role) {
        let mut member = self.roster.remove(idx);
        member.role = role;
        self.roster.push(member);
    }
}
