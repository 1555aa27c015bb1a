//! Data structures for the dodgeball tournament: tournaments, teams, matches.

mod game;
mod team;
mod tournament;

pub use game::{GameMatch, MatchId, MatchUpdate, NewMatch, Side, SidePair, Stage};
pub use team::{Member, MemberId, Role, RosterError, Team, TeamId};
pub use tournament::{
    is_valid_bracket_size, normalize_team_names, NewTournament, Tournament, TournamentError,
    TournamentId, DEFAULT_BRACKET_SIZE,
};
