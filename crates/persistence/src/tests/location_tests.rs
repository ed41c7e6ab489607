// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use onboard_domain::{Location, LocationId, PlaceAttributes};

use super::{create_test_persistence, create_test_place};
use crate::{Persistence, PersistenceError};

#[test]
fn test_inserted_location_is_found_by_place_id() {
    let mut persistence: Persistence = create_test_persistence();
    let place: PlaceAttributes = create_test_place("p-oslo", "Oslo");

    let id: LocationId = persistence.insert_location(&place).unwrap();
    let found: Location = persistence
        .find_location_by_place_id("p-oslo")
        .unwrap()
        .unwrap();

    assert_eq!(found.id, id);
    assert_eq!(found.place, place);
}

#[test]
fn test_unknown_place_id_is_none() {
    let mut persistence: Persistence = create_test_persistence();

    assert_eq!(
        persistence.find_location_by_place_id("p-missing").unwrap(),
        None
    );
}

#[test]
fn test_duplicate_place_id_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .insert_location(&create_test_place("p-bern", "Bern"))
        .unwrap();

    let result: Result<LocationId, PersistenceError> =
        persistence.insert_location(&PlaceAttributes::new("p-bern", "Bern again"));

    assert_eq!(
        result,
        Err(PersistenceError::DuplicatePlaceId("p-bern".to_string()))
    );
}

#[test]
fn test_minimal_place_round_trips() {
    let mut persistence: Persistence = create_test_persistence();
    let place: PlaceAttributes = PlaceAttributes::new("p-bare", "Somewhere");

    persistence.insert_location(&place).unwrap();

    let found: Location = persistence
        .find_location_by_place_id("p-bare")
        .unwrap()
        .unwrap();
    assert_eq!(found.place, place);
    assert!(found.place.place_types.is_empty());
}

#[test]
fn test_batch_lookup_skips_unknown_ids() {
    let mut persistence: Persistence = create_test_persistence();
    let a: LocationId = persistence
        .insert_location(&create_test_place("p-a", "Aarhus"))
        .unwrap();
    let b: LocationId = persistence
        .insert_location(&create_test_place("p-b", "Bergen"))
        .unwrap();

    let found: Vec<Location> = persistence
        .get_locations_by_ids(&[b, LocationId::new(9_999), a])
        .unwrap();

    let ids: Vec<LocationId> = found.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![a, b]);
    assert!(persistence.get_locations_by_ids(&[]).unwrap().is_empty());
}
