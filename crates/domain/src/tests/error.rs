// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Category, DomainError};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidUserId(String::from("User id cannot be empty"));
    assert_eq!(format!("{err}"), "Invalid user id: User id cannot be empty");

    let err: DomainError = DomainError::InvalidCountryCode(String::from("USA"));
    assert_eq!(
        format!("{err}"),
        "Invalid country code 'USA': expected two ASCII letters"
    );

    let err: DomainError = DomainError::InvalidCategory(String::from("contract"));
    assert_eq!(
        format!("{err}"),
        "Invalid category 'contract': expected 'full_time' or 'fractional'"
    );

    let err: DomainError = DomainError::MissingPlaceId {
        name: String::from("Lisbon"),
    };
    assert_eq!(format!("{err}"), "Place 'Lisbon' has no external place id");

    let err: DomainError = DomainError::InvalidWeeklyHours { hours: 200 };
    assert_eq!(
        format!("{err}"),
        "Invalid weekly hours: 200. Must not exceed 168"
    );

    let err: DomainError = DomainError::InvalidTimezone(String::from("Mars/Olympus"));
    assert_eq!(format!("{err}"), "Unknown timezone 'Mars/Olympus'");

    let err: DomainError = DomainError::DateFormatError {
        date: String::from("2026-03-01"),
        error: String::from("insufficient information"),
    };
    assert_eq!(
        format!("{err}"),
        "Failed to format date 2026-03-01: insufficient information"
    );
}

#[test]
fn test_invalid_range_display_includes_category_when_known() {
    let err: DomainError = DomainError::InvalidRange {
        category: Some(Category::FullTime),
        field: "salary",
        min: 90_000,
        max: 80_000,
    };
    assert_eq!(
        format!("{err}"),
        "Invalid full_time salary range: minimum 90000 exceeds maximum 80000"
    );

    let err: DomainError = DomainError::InvalidRange {
        category: None,
        field: "salary",
        min: 2,
        max: 1,
    };
    assert_eq!(
        format!("{err}"),
        "Invalid salary range: minimum 2 exceeds maximum 1"
    );
}
