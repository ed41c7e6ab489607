// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Category, CountryCode, DomainError, LocationId, PaymentType, UserId};
use std::str::FromStr;

#[test]
fn test_user_id_trims_whitespace() {
    let user_id: UserId = UserId::new("  user-1 ").unwrap();
    assert_eq!(user_id.as_str(), "user-1");
}

#[test]
fn test_user_id_rejects_blank() {
    let result: Result<UserId, DomainError> = UserId::new("   ");
    assert!(matches!(result, Err(DomainError::InvalidUserId(_))));
}

#[test]
fn test_country_code_is_normalized_to_upper_case() {
    let code: CountryCode = CountryCode::new("ca").unwrap();
    assert_eq!(code.as_str(), "CA");
}

#[test]
fn test_country_code_rejects_wrong_length_and_digits() {
    assert!(matches!(
        CountryCode::new("USA"),
        Err(DomainError::InvalidCountryCode(_))
    ));
    assert!(matches!(
        CountryCode::new("U1"),
        Err(DomainError::InvalidCountryCode(_))
    ));
    assert!(matches!(
        CountryCode::new(""),
        Err(DomainError::InvalidCountryCode(_))
    ));
}

#[test]
fn test_country_code_deserialization_validates() {
    let code: CountryCode = serde_json::from_str("\"gb\"").unwrap();
    assert_eq!(code.as_str(), "GB");

    let result: Result<CountryCode, serde_json::Error> = serde_json::from_str("\"GBR\"");
    assert!(result.is_err());
}

#[test]
fn test_category_string_forms() {
    for category in Category::ALL {
        let parsed: Category = Category::from_str(category.as_str()).unwrap();
        assert_eq!(parsed, category);
    }
    assert_eq!(Category::FullTime.to_string(), "full_time");
    assert!(Category::from_str("part_time").is_err());
}

#[test]
fn test_payment_type_string_forms() {
    assert_eq!(PaymentType::from_str("hourly").unwrap(), PaymentType::Hourly);
    assert_eq!(PaymentType::from_str("daily").unwrap(), PaymentType::Daily);
    assert_eq!(PaymentType::from_str("either").unwrap(), PaymentType::Either);
    assert!(matches!(
        PaymentType::from_str("weekly"),
        Err(DomainError::InvalidPaymentType(_))
    ));
}

#[test]
fn test_location_id_serializes_as_plain_number() {
    let json: String = serde_json::to_string(&LocationId::new(42)).unwrap();
    assert_eq!(json, "42");
}
