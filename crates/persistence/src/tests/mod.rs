// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod location_tests;

use onboard_domain::{CountryCode, PlaceAttributes, UserId};

use crate::Persistence;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn create_test_user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

pub fn country(code: &str) -> CountryCode {
    CountryCode::new(code).unwrap()
}

/// A geocoded place with every attribute set.
pub fn create_test_place(place_id: &str, name: &str) -> PlaceAttributes {
    PlaceAttributes {
        formatted_address: Some(format!("{name}, Test Country")),
        city: Some(name.to_string()),
        state: Some("Test State".to_string()),
        country_code: Some("TC".to_string()),
        latitude: Some(12.5),
        longitude: Some(-45.25),
        place_types: vec!["locality".to_string(), "political".to_string()],
        ..PlaceAttributes::new(place_id, name)
    }
}
