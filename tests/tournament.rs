//! Integration tests for tournament setup: names, bracket size, team names.

use dodgeball_tournament_web::models::{is_valid_bracket_size, normalize_team_names};
use dodgeball_tournament_web::{NewTournament, TournamentError};

#[test]
fn bracket_sizes_are_powers_of_two() {
    for ok in [2, 4, 8, 16, 32] {
        assert!(is_valid_bracket_size(ok), "{ok}");
    }
    for bad in [0, 1, 3, 6, 12] {
        assert!(!is_valid_bracket_size(bad), "{bad}");
    }
}

#[test]
fn new_tournament_validation() {
    let ok = NewTournament::new("  Cup ", 3).validate().unwrap();
    assert_eq!(ok.name, "Cup");
    assert_eq!(
        NewTournament::new(" ", 3).validate(),
        Err(TournamentError::EmptyName)
    );
    let bad = NewTournament {
        bracket_size: 12,
        ..NewTournament::new("Cup", 3)
    };
    assert_eq!(bad.validate(), Err(TournamentError::InvalidBracketSize(12)));
}

#[test]
fn team_names_are_trimmed_and_unique() {
    assert_eq!(
        normalize_team_names(&[" Alpha", "", "Bravo ", "  "]).unwrap(),
        ["Alpha", "Bravo"]
    );
    assert_eq!(
        normalize_team_names(&["Alpha", "ALPHA"]),
        Err(TournamentError::DuplicateTeamName("ALPHA".to_string()))
    );
}
