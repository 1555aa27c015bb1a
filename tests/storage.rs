//! Integration tests for the in-memory store.

use dodgeball_tournament_web::{
    Entity, MatchUpdate, MemoryStore, NewMatch, NewTournament, Role, StoreError, TournamentStore,
};

fn store_with_tournament() -> (MemoryStore, String) {
    let store = MemoryStore::new();
    let t = store.create_tournament(NewTournament::new("Spring Cup", 2)).unwrap();
    (store, t.id)
}

#[test]
fn tournament_crud() {
    let (store, id) = store_with_tournament();
    let t = store.get_tournament(&id).unwrap();
    assert_eq!(t.name, "Spring Cup");
    assert_eq!(t.rounds, 2);
    assert_eq!(t.bracket_size, 16);
    assert_eq!(store.list_tournaments().unwrap().len(), 1);

    store.delete_tournament(&id).unwrap();
    assert!(store.list_tournaments().unwrap().is_empty());
    assert_eq!(
        store.get_tournament(&id),
        Err(StoreError::NotFound {
            entity: Entity::Tournament,
            id: id.clone()
        })
    );
    assert!(store.delete_tournament(&id).is_err());
}

#[test]
fn explicit_creation_date_is_kept() {
    let store = MemoryStore::new();
    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let new = NewTournament {
        created_on: Some(date),
        ..NewTournament::new("Cup", 1)
    };
    assert_eq!(store.create_tournament(new).unwrap().created_on, date);
}

#[test]
fn teams_belong_to_an_existing_tournament() {
    let (store, id) = store_with_tournament();
    let a = store.create_team(&id, "Alpha").unwrap();
    let b = store.create_team(&id, "Bravo").unwrap();
    assert_ne!(a.id, b.id);
    let names: Vec<String> = store
        .fetch_teams(&id)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, ["Alpha", "Bravo"]);
    assert!(matches!(
        store.create_team("nope", "Charlie"),
        Err(StoreError::NotFound {
            entity: Entity::Tournament,
            ..
        })
    ));
}

#[test]
fn save_team_replaces_roster() {
    let (store, id) = store_with_tournament();
    let mut team = store.create_team(&id, "Alpha").unwrap();
    team.add_member("Kim", Role::Regular).unwrap();
    store.save_team(&team).unwrap();
    assert_eq!(store.get_team(&team.id).unwrap().roster.len(), 1);
}

#[test]
fn deleting_a_team_leaves_its_matches() {
    let (store, id) = store_with_tournament();
    let a = store.create_team(&id, "Alpha").unwrap();
    let b = store.create_team(&id, "Bravo").unwrap();
    let m = store
        .create_match(NewMatch::round_robin(id.as_str(), a.id.as_str(), b.id.as_str(), 1))
        .unwrap();
    store.delete_team(&a.id).unwrap();
    assert!(matches!(
        store.get_team(&a.id),
        Err(StoreError::NotFound {
            entity: Entity::Team,
            ..
        })
    ));
    assert_eq!(store.get_match(&m.id).unwrap().team_a, Some(a.id));
}

#[test]
fn deleting_a_tournament_cascades() {
    let (store, id) = store_with_tournament();
    let other_id = store
        .create_tournament(NewTournament::new("Other", 1))
        .unwrap()
        .id;
    let a = store.create_team(&id, "Alpha").unwrap();
    let b = store.create_team(&id, "Bravo").unwrap();
    store
        .create_match(NewMatch::round_robin(id.as_str(), a.id.as_str(), b.id.as_str(), 1))
        .unwrap();
    store.create_team(&other_id, "Kept").unwrap();

    store.delete_tournament(&id).unwrap();
    assert!(store.fetch_teams(&id).unwrap().is_empty());
    assert!(store.fetch_matches(&id).unwrap().is_empty());
    assert_eq!(store.fetch_teams(&other_id).unwrap().len(), 1);
}

#[test]
fn update_match_merges_fields() {
    let (store, id) = store_with_tournament();
    let m = store
        .create_match(NewMatch::round_robin(id.as_str(), "a", "b", 1))
        .unwrap();
    let update = MatchUpdate {
        score: Some(dodgeball_tournament_web::SidePair::new(3, 1)),
        is_completed: Some(true),
        winner: Some(Some("a".to_string())),
        ..MatchUpdate::default()
    };
    let stored = store.update_match(&m.id, &update).unwrap();
    assert_eq!(stored.winner.as_deref(), Some("a"));
    assert_eq!(store.get_match(&m.id).unwrap(), stored);

    let reopened = store
        .update_match(
            &m.id,
            &MatchUpdate {
                is_completed: Some(false),
                ..MatchUpdate::default()
            },
        )
        .unwrap();
    assert!(reopened.winner.is_none());
    assert_eq!(reopened.score.team_a, 3);
}

#[test]
fn match_lookups_report_missing_ids() {
    let (store, id) = store_with_tournament();
    assert!(matches!(
        store.update_match("missing", &MatchUpdate::default()),
        Err(StoreError::NotFound {
            entity: Entity::Match,
            ..
        })
    ));
    assert!(store
        .create_match(NewMatch::round_robin("elsewhere", "a", "b", 1))
        .is_err());
    assert!(store.fetch_matches(&id).unwrap().is_empty());
}
