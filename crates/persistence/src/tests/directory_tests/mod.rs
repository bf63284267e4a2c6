// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_persistence, create_test_roster, pid};
use crate::Persistence;
use rota_domain::{Person, Role, Roster};

fn ids(people: &[Person]) -> Vec<String> {
    people.iter().map(|p| p.id.to_string()).collect()
}

#[test]
fn test_sync_people_stores_roster_in_order() {
    let mut persistence: Persistence = create_test_persistence();
    let people: Vec<Person> = persistence.list_people().unwrap();

    assert_eq!(ids(&people), vec!["f", "a", "b", "c", "d"]);
    assert_eq!(people[0].role, Role::Fixed);
    assert_eq!(people[1].name, "A");
}

#[test]
fn test_sync_people_is_idempotent() {
    let mut persistence: Persistence = create_test_persistence();
    assert_eq!(persistence.sync_people(&create_test_roster()).unwrap(), 5);
    assert_eq!(persistence.list_people().unwrap().len(), 5);
}

#[test]
fn test_sync_people_keeps_former_members() {
    let mut persistence: Persistence = create_test_persistence();
    let original: Roster = create_test_roster();
    let shrunk: Roster = Roster::new(
        original.fixed().clone(),
        vec![original.pool()[3].clone(), original.pool()[0].clone()],
        None,
    )
    .unwrap();

    persistence.sync_people(&shrunk).unwrap();
    let people: Vec<Person> = persistence.list_people().unwrap();

    // Current pool in its new order, then former members by id.
    assert_eq!(ids(&people), vec!["f", "d", "a", "b", "c"]);
    assert!(persistence.person_exists(&pid("b")).unwrap());
    assert!(!persistence.person_exists(&pid("zed")).unwrap());
}
