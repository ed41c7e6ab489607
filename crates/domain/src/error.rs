// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::Category;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// User identifier is empty or invalid.
    InvalidUserId(String),
    /// Country code is not an ISO 3166-1 alpha-2 code.
    InvalidCountryCode(String),
    /// Category name is not recognized.
    InvalidCategory(String),
    /// Payment type name is not recognized.
    InvalidPaymentType(String),
    /// A place reference is missing its external place identifier.
    MissingPlaceId {
        /// The display name of the offending place.
        name: String,
    },
    /// Latitude or longitude is outside the valid range.
    InvalidCoordinates {
        /// The external place identifier.
        place_id: String,
        /// The latitude value.
        latitude: String,
        /// The longitude value.
        longitude: String,
    },
    /// A minimum bound exceeds its maximum bound.
    InvalidRange {
        /// The preference category the band belongs to, if any.
        category: Option<Category>,
        /// The band name (e.g. `salary`).
        field: &'static str,
        /// The minimum value.
        min: u32,
        /// The maximum value.
        max: u32,
    },
    /// Weekly hours exceed the number of hours in a week.
    InvalidWeeklyHours {
        /// The offending value.
        hours: u32,
    },
    /// Timezone is not a known IANA zone name.
    InvalidTimezone(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to render a date as text.
    DateFormatError {
        /// The date that could not be formatted.
        date: String,
        /// The formatting error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUserId(msg) => write!(f, "Invalid user id: {msg}"),
            Self::InvalidCountryCode(code) => {
                write!(
                    f,
                    "Invalid country code '{code}': expected two ASCII letters"
                )
            }
            Self::InvalidCategory(name) => {
                write!(
                    f,
                    "Invalid category '{name}': expected 'full_time' or 'fractional'"
                )
            }
            Self::InvalidPaymentType(name) => write!(f, "Invalid payment type '{name}'"),
            Self::MissingPlaceId { name } => {
                write!(f, "Place '{name}' has no external place id")
            }
            Self::InvalidCoordinates {
                place_id,
                latitude,
                longitude,
            } => {
                write!(
                    f,
                    "Place '{place_id}' has out-of-range coordinates ({latitude}, {longitude})"
                )
            }
            Self::InvalidRange {
                category,
                field,
                min,
                max,
            } => match category {
                Some(category) => write!(
                    f,
                    "Invalid {category} {field} range: minimum {min} exceeds maximum {max}"
                ),
                None => write!(
                    f,
                    "Invalid {field} range: minimum {min} exceeds maximum {max}"
                ),
            },
            Self::InvalidWeeklyHours { hours } => {
                write!(
                    f,
                    "Invalid weekly hours: {hours}. Must not exceed 168"
                )
            }
            Self::InvalidTimezone(tz) => write!(f, "Unknown timezone '{tz}'"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateFormatError { date, error } => {
                write!(f, "Failed to format date {date}: {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
