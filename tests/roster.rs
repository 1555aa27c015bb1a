//! Integration tests for team rosters.

use dodgeball_tournament_web::{Role, RosterError, Team};

fn names<'a>(it: impl Iterator<Item = &'a dodgeball_tournament_web::Member>) -> Vec<&'a str> {
    it.map(|m| m.name.as_str()).collect()
}

fn team() -> Team {
    Team::new("t1", "tour", "Alpha")
}

#[test]
fn members_keep_insertion_order_per_role() {
    let mut t = team();
    t.add_member("Ann", Role::Regular).unwrap();
    t.add_member("Bo", Role::Substitute).unwrap();
    t.add_member(" Cy ", Role::Regular).unwrap();
    assert_eq!(names(t.regulars()), ["Ann", "Cy"]);
    assert_eq!(names(t.substitutes()), ["Bo"]);
}

#[test]
fn blank_names_are_rejected() {
    let mut t = team();
    assert_eq!(t.add_member("   ", Role::Regular), Err(RosterError::EmptyName));
    assert_eq!(t.rename(""), Err(RosterError::EmptyName));
    t.rename("  Bravo ").unwrap();
    assert_eq!(t.name, "Bravo");
}

#[test]
fn toggling_moves_member_to_end_of_other_role() {
    let mut t = team();
    let ann = t.add_member("Ann", Role::Regular).unwrap();
    t.add_member("Bo", Role::Substitute).unwrap();
    t.add_member("Cy", Role::Regular).unwrap();

    assert_eq!(t.toggle_role(&ann), Ok(Role::Substitute));
    assert_eq!(names(t.regulars()), ["Cy"]);
    assert_eq!(names(t.substitutes()), ["Bo", "Ann"]);

    assert_eq!(t.toggle_role(&ann), Ok(Role::Regular));
    assert_eq!(names(t.regulars()), ["Cy", "Ann"]);
}

#[test]
fn set_role_to_current_role_keeps_position() {
    let mut t = team();
    let ann = t.add_member("Ann", Role::Regular).unwrap();
    t.add_member("Cy", Role::Regular).unwrap();
    t.set_role(&ann, Role::Regular).unwrap();
    assert_eq!(names(t.regulars()), ["Ann", "Cy"]);
    t.set_role(&ann, Role::Substitute).unwrap();
    assert_eq!(names(t.substitutes()), ["Ann"]);
}

#[test]
fn removing_members() {
    let mut t = team();
    let ann = t.add_member("Ann", Role::Regular).unwrap();
    assert_eq!(t.remove_member(&ann).unwrap().name, "Ann");
    assert!(t.roster.is_empty());
    assert_eq!(
        t.remove_member(&ann),
        Err(RosterError::MemberNotFound(ann.clone()))
    );
    assert!(t.toggle_role(&ann).is_err());
}
