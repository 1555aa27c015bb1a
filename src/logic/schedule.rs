//! Round-robin fixtures and calendar placement.

use crate::models::{GameMatch, MatchUpdate, NewMatch, Team};
use chrono::{NaiveDate, NaiveTime};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Generate `rounds` round-robin rounds with the circle method.
///
/// 1. Pad with a bye slot when the team count is odd.
/// 2. Keep slot 0 fixed and rotate the rest by one per round.
/// 3. Pair slot `i` with slot `len - 1 - i`; the team drawn against the bye sits out.
/// 4. After every full cycle (`len - 1` rounds) home and away swap.
///
/// Output is deterministic for a given team order.
pub fn generate_round_robin(tournament_id: &str, teams: &[Team], rounds: u32) -> Vec<NewMatch> {
    if teams.len() < 2 {
        return Vec::new();
    }
    let mut slots: Vec<Option<&Team>> = teams.iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let len = slots.len();
    let per_cycle = len - 1;

    let mut out = Vec::new();
    for r in 0..rounds as usize {
        let rotation = r % per_cycle;
        let swap = (r / per_cycle) % 2 == 1;
        let mut rest: Vec<Option<&Team>> = slots[1..].to_vec();
        rest.rotate_right(rotation);
        let mut order = Vec::with_capacity(len);
        order.push(slots[0]);
        order.extend(rest);

        for i in 0..len / 2 {
            let (home, away) = match (order[i], order[len - 1 - i]) {
                (Some(h), Some(a)) => (h, a),
                _ => continue,
            };
            // fixed slot alternates home/away between rotations
            let flip = swap ^ (i == 0 && rotation % 2 == 1);
            let (home, away) = if flip { (away, home) } else { (home, away) };
            out.push(NewMatch::round_robin(
                tournament_id,
                home.id.clone(),
                away.id.clone(),
                r as u32 + 1,
            ));
        }
    }
    log::debug!(
        "generated {} round-robin matches over {} rounds for {} teams",
        out.len(),
        rounds,
        teams.len()
    );
    out
}

/// Place a match on a calendar day (the drag-and-drop "move match to date").
pub fn schedule_match(date: NaiveDate, time: Option<NaiveTime>) -> MatchUpdate {
    MatchUpdate {
        scheduled_date: Some(Some(date)),
        scheduled_time: Some(time),
        ..MatchUpdate::default()
    }
}

/// Take a match off the calendar.
pub fn unschedule_match() -> MatchUpdate {
    MatchUpdate {
        scheduled_date: Some(None),
        scheduled_time: Some(None),
        ..MatchUpdate::default()
    }
}

/// Missing time sorts after any time on the same day.
fn cmp_time(a: Option<NaiveTime>, b: Option<NaiveTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Scheduled matches keyed by date; each day ordered by time, then round.
pub fn matches_by_date(matches: &[GameMatch]) -> BTreeMap<NaiveDate, Vec<&GameMatch>> {
    let mut days: BTreeMap<NaiveDate, Vec<&GameMatch>> = BTreeMap::new();
    for m in matches {
        if let Some(date) = m.scheduled_date {
            days.entry(date).or_default().push(m);
        }
    }
    for day in days.values_mut() {
        day.sort_by(|a, b| cmp_time(a.scheduled_time, b.scheduled_time).then(a.round.cmp(&b.round)));
    }
    days
}

/// Matches with no calendar date, by round.
pub fn unscheduled(matches: &[GameMatch]) -> Vec<&GameMatch> {
    let mut out: Vec<&GameMatch> = matches
        .iter()
        .filter(|m| m.scheduled_date.is_none())
        .collect();
    out.sort_by_key(|m| m.round);
    out
}

/// Earliest scheduled match that is not completed yet.
pub fn upcoming_match(matches: &[GameMatch]) -> Option<&GameMatch> {
    matches
        .iter()
        .filter(|m| !m.is_completed && m.scheduled_date.is_some())
        .min_by(|a, b| {
            a.scheduled_date
                .cmp(&b.scheduled_date)
                .then(cmp_time(a.scheduled_time, b.scheduled_time))
        })
}
