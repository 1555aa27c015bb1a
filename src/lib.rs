//! Dodgeball tournament manager: library with models, standings/bracket logic and storage.

pub mod config;
pub mod logic;
pub mod models;
pub mod storage;

pub use config::{ConfigError, ServerConfig};
pub use logic::{
    audit, compute_bracket, compute_bracket_with, compute_standings, compute_standings_with,
    materialize_bracket_match, record_bracket_winner, Bracket, BracketError, BracketNode,
    DataIntegrityWarning, InvalidOperation, MatchCommand, RankingRule, SeededTeam,
    StandingRecord,
};
pub use models::{
    GameMatch, MatchId, MatchUpdate, Member, MemberId, NewMatch, NewTournament, Role,
    RosterError, Side, SidePair, Stage, Team, TeamId, Tournament, TournamentError, TournamentId,
};
pub use storage::{Entity, MemoryStore, StoreError, TournamentStore};
