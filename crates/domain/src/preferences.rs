// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{LocationId, PaymentType};
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns an error if the string is not a valid calendar date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the date cannot be rendered with the `YYYY-MM-DD`
/// description.
pub fn format_date(date: Date) -> Result<String, DomainError> {
    date.format(DATE_FORMAT)
        .map_err(|e| DomainError::DateFormatError {
            date: date.to_string(),
            error: e.to_string(),
        })
}

/// The per-user full-time preferences row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FullTimePreferences {
    #[serde(default)]
    pub salary_min: Option<u32>,
    #[serde(default)]
    pub salary_max: Option<u32>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default, with = "iso_date::option")]
    pub earliest_start_date: Option<Date>,
    #[serde(default)]
    pub open_for_work: bool,
}

/// The per-user fractional preferences row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FractionalPreferences {
    #[serde(default)]
    pub hourly_rate_min: Option<u32>,
    #[serde(default)]
    pub hourly_rate_max: Option<u32>,
    #[serde(default)]
    pub daily_rate_min: Option<u32>,
    #[serde(default)]
    pub daily_rate_max: Option<u32>,
    #[serde(default)]
    pub hours_per_week_min: Option<u32>,
    #[serde(default)]
    pub hours_per_week_max: Option<u32>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    #[serde(default, with = "iso_date::option")]
    pub earliest_start_date: Option<Date>,
    #[serde(default)]
    pub open_for_work: bool,
}

/// The per-user general work preferences row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkPreferences {
    #[serde(default)]
    pub current_location_id: Option<LocationId>,
    /// IANA timezone name.
    #[serde(default)]
    pub timezone: Option<String>,
}
