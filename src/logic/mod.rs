//! Tournament business logic: standings, bracket, scoring, scheduling.

mod bracket;
mod command;
mod export;
mod integrity;
mod schedule;
mod scoring;
mod standings;

pub use bracket::{
    compute_bracket, compute_bracket_with, materialize_bracket_match, record_bracket_winner,
    seeding_pairs, Bracket, BracketError, BracketNode, InvalidOperation, SeededTeam,
};
pub use command::MatchCommand;
pub use export::{standings_csv, write_standings_csv};
pub use integrity::{audit, check_match, DataIntegrityWarning};
pub use schedule::{
    generate_round_robin, matches_by_date, schedule_match, unschedule_match, unscheduled,
    upcoming_match,
};
pub use scoring::{
    adjust_pins, adjust_score, complete_match, reopen_match, reset_match, set_score, ScoringError,
};
pub use standings::{
    compare_records, compute_standings, compute_standings_with, RankingRule, StandingRecord,
};
