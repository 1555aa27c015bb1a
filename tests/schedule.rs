//! Integration tests for round-robin generation and calendar placement.

use chrono::{NaiveDate, NaiveTime};
use dodgeball_tournament_web::logic::{
    generate_round_robin, matches_by_date, schedule_match, unschedule_match, unscheduled,
    upcoming_match,
};
use dodgeball_tournament_web::{GameMatch, NewMatch, Team};
use std::collections::HashSet;

fn teams(n: usize) -> Vec<Team> {
    (1..=n)
        .map(|i| Team::new(format!("t{i}"), "tour", format!("Team {i}")))
        .collect()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn pair(m: &NewMatch) -> (String, String) {
    let a = m.team_a.clone().unwrap();
    let b = m.team_b.clone().unwrap();
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[test]
fn full_cycle_pairs_every_team_once() {
    let t = teams(4);
    let fixtures = generate_round_robin("tour", &t, 3);
    assert_eq!(fixtures.len(), 6);
    let pairs: HashSet<_> = fixtures.iter().map(pair).collect();
    assert_eq!(pairs.len(), 6);
    for round in 1..=3 {
        let ids: Vec<String> = fixtures
            .iter()
            .filter(|m| m.round == round)
            .flat_map(|m| [m.team_a.clone().unwrap(), m.team_b.clone().unwrap()])
            .collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(unique.len(), 4);
    }
    assert!(fixtures.iter().all(|m| m.tournament_id == "tour"));
}

#[test]
fn odd_count_gives_one_bye_per_round() {
    let t = teams(5);
    let fixtures = generate_round_robin("tour", &t, 5);
    // 2 matches per round, 5 rounds, every pair exactly once
    assert_eq!(fixtures.len(), 10);
    let pairs: HashSet<_> = fixtures.iter().map(pair).collect();
    assert_eq!(pairs.len(), 10);
    for round in 1..=5 {
        assert_eq!(fixtures.iter().filter(|m| m.round == round).count(), 2);
    }
}

#[test]
fn second_cycle_swaps_home_and_away() {
    let t = teams(2);
    let fixtures = generate_round_robin("tour", &t, 2);
    assert_eq!(fixtures.len(), 2);
    assert_eq!(fixtures[0].team_a, fixtures[1].team_b);
    assert_eq!(fixtures[0].team_b, fixtures[1].team_a);
}

#[test]
fn generation_is_deterministic() {
    let t = teams(6);
    assert_eq!(generate_round_robin("tour", &t, 7), generate_round_robin("tour", &t, 7));
}

#[test]
fn too_few_teams_or_rounds_gives_nothing() {
    assert!(generate_round_robin("tour", &teams(1), 3).is_empty());
    assert!(generate_round_robin("tour", &teams(4), 0).is_empty());
}

fn stored(id: &str, round: u32) -> GameMatch {
    GameMatch::from_new(id.into(), NewMatch::round_robin("tour", "a", "b", round))
}

#[test]
fn schedule_and_unschedule_round_trip_on_match() {
    let mut m = stored("m1", 1);
    let at = NaiveTime::from_hms_opt(18, 30, 0).unwrap();
    m.apply(&schedule_match(date(3), Some(at)));
    assert_eq!(m.scheduled_date, Some(date(3)));
    assert_eq!(m.scheduled_time, Some(at));
    m.apply(&unschedule_match());
    assert_eq!(m.scheduled_date, None);
    assert_eq!(m.scheduled_time, None);
}

#[test]
fn calendar_groups_by_date_and_lists_unscheduled() {
    let mut a = stored("a", 1);
    a.apply(&schedule_match(date(2), None));
    let mut b = stored("b", 2);
    b.apply(&schedule_match(date(2), NaiveTime::from_hms_opt(10, 0, 0)));
    let mut c = stored("c", 1);
    c.apply(&schedule_match(date(1), None));
    let d = stored("d", 3);
    let e = stored("e", 2);
    let all = vec![a, b, c, d, e];

    let days = matches_by_date(&all);
    let keys: Vec<_> = days.keys().copied().collect();
    assert_eq!(keys, vec![date(1), date(2)]);
    let day2: Vec<&str> = days[&date(2)].iter().map(|m| m.id.as_str()).collect();
    assert_eq!(day2, ["b", "a"]);

    let loose: Vec<&str> = unscheduled(&all).iter().map(|m| m.id.as_str()).collect();
    assert_eq!(loose, ["e", "d"]);
}

#[test]
fn upcoming_is_earliest_incomplete_scheduled() {
    let mut done = stored("done", 1);
    done.apply(&schedule_match(date(1), None));
    done.is_completed = true;
    let mut later = stored("later", 1);
    later.apply(&schedule_match(date(9), None));
    let mut soon = stored("soon", 2);
    soon.apply(&schedule_match(date(4), None));
    let loose = stored("loose", 1);
    let all = vec![done, later, soon, loose];
    assert_eq!(upcoming_match(&all).map(|m| m.id.as_str()), Some("soon"));
    assert!(upcoming_match(&all[3..]).is_none());
}
