//! Integration tests for data-integrity audits and the standings CSV export.

use dodgeball_tournament_web::logic::standings_csv;
use dodgeball_tournament_web::{
    audit, compute_standings, DataIntegrityWarning, GameMatch, NewMatch, SidePair, Team,
};

fn teams() -> Vec<Team> {
    vec![Team::new("a", "tour", "Alpha"), Team::new("b", "tour", "Bravo")]
}

fn game(id: &str, a: &str, b: &str) -> GameMatch {
    GameMatch::from_new(id.to_string(), NewMatch::round_robin("tour", a, b, 1))
}

#[test]
fn clean_snapshot_has_no_warnings() {
    assert!(audit(&teams(), &[game("m1", "a", "b")]).is_empty());
}

#[test]
fn audit_reports_each_problem() {
    let mut missing = game("m2", "a", "b");
    missing.team_b = None;
    missing.is_completed = true;

    let mut outsider = game("m3", "a", "b");
    outsider.is_completed = true;
    outsider.winner = Some("zed".to_string());

    let mut premature = game("m4", "b", "a");
    premature.winner = Some("a".to_string());

    let matches = vec![game("m1", "a", "ghost"), missing, outsider, premature];
    let warnings = audit(&teams(), &matches);
    assert_eq!(
        warnings,
        vec![
            DataIntegrityWarning::UnknownTeam {
                match_id: "m1".into(),
                team_id: "ghost".into()
            },
            DataIntegrityWarning::MissingTeam {
                match_id: "m2".into()
            },
            DataIntegrityWarning::WinnerNotParticipant {
                match_id: "m3".into(),
                winner: "zed".into()
            },
            DataIntegrityWarning::WinnerOnIncompleteMatch {
                match_id: "m4".into()
            },
            DataIntegrityWarning::AmbiguousPairing {
                team_a: "a".into(),
                team_b: "b".into(),
                match_ids: vec!["m3".into(), "m4".into()],
            },
        ]
    );
    assert!(warnings[4].to_string().contains("using the first"));
}

#[test]
fn csv_lists_ranked_rows() {
    let mut m = game("m1", "a", "b");
    m.score = SidePair::new(1, 4);
    m.pins = SidePair::new(2, 0);
    m.is_completed = true;
    m.winner = Some("b".to_string());
    let table = compute_standings(&teams(), &[m]);
    let csv = standings_csv(&table).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        [
            "rank,team,wins,ties,losses,gf,ga,gd,pins",
            "1,Bravo,1,0,0,4,1,3,0",
            "2,Alpha,0,0,1,1,4,-3,2",
        ]
    );
}

#[test]
fn csv_of_empty_table_is_header_only() {
    let csv = standings_csv(&[]).unwrap();
    assert_eq!(csv.trim_end(), "rank,team,wins,ties,losses,gf,ga,gd,pins");
}
