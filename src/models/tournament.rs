//! Tournament record and its creation payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for a tournament.
pub type TournamentId = String;

/// Bracket size used when none is given (Round of 16 through Final).
pub const DEFAULT_BRACKET_SIZE: usize = 16;

/// Errors that can occur when setting up a tournament.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Tournament name is blank.
    EmptyName,
    /// Bracket size must be a power of two, at least 2.
    InvalidBracketSize(usize),
    /// Two team names are equal (case-insensitive).
    DuplicateTeamName(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::EmptyName => write!(f, "Tournament name must not be empty"),
            TournamentError::InvalidBracketSize(size) => {
                write!(f, "Bracket size {} is not a power of two (>= 2)", size)
            }
            TournamentError::DuplicateTeamName(name) => {
                write!(f, "A team named {} already exists", name)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// A tournament: the owner of teams and matches.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Number of round-robin rounds scheduled at creation.
    #[serde(default)]
    pub rounds: u32,
    pub created_on: NaiveDate,
    #[serde(default = "default_bracket_size")]
    pub bracket_size: usize,
}

fn default_bracket_size() -> usize {
    DEFAULT_BRACKET_SIZE
}

/// Creation payload for a tournament; storage assigns the id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub rounds: u32,
    #[serde(default = "default_bracket_size")]
    pub bracket_size: usize,
    /// Defaults to today when absent.
    #[serde(default)]
    pub created_on: Option<NaiveDate>,
}

impl NewTournament {
    pub fn new(name: impl Into<String>, rounds: u32) -> Self {
        Self {
            name: name.into(),
            rounds,
            bracket_size: DEFAULT_BRACKET_SIZE,
            created_on: None,
        }
    }

    /// Trim the name and check the bracket size.
    pub fn validate(mut self) -> Result<Self, TournamentError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        if !is_valid_bracket_size(self.bracket_size) {
            return Err(TournamentError::InvalidBracketSize(self.bracket_size));
        }
        Ok(self)
    }
}

/// Power of two, at least 2.
pub fn is_valid_bracket_size(size: usize) -> bool {
    size >= 2 && size.is_power_of_two()
}

/// Trim names, drop blanks, and reject case-insensitive duplicates.
pub fn normalize_team_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>, TournamentError> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        if out.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateTeamName(name.to_string()));
        }
        out.push(name.to_string());
    }
    Ok(out)
}
