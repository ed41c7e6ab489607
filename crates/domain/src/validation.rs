// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::form::CombinedWorkPreferencesForm;
use crate::location::{LocationRef, PlaceAttributes};
use crate::preferences::{FractionalPreferences, FullTimePreferences};
use crate::types::Category;
use chrono_tz::Tz;

/// Hours in a week.
const MAX_WEEKLY_HOURS: u32 = 168;

fn validate_band(
    category: Option<Category>,
    field: &'static str,
    min: Option<u32>,
    max: Option<u32>,
) -> Result<(), DomainError> {
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        return Err(DomainError::InvalidRange {
            category,
            field,
            min,
            max,
        });
    }
    Ok(())
}

/// Validates the full-time preferences row.
///
/// # Errors
///
/// Returns an error if the salary band is inverted.
pub fn validate_full_time_preferences(prefs: &FullTimePreferences) -> Result<(), DomainError> {
    validate_band(
        Some(Category::FullTime),
        "salary",
        prefs.salary_min,
        prefs.salary_max,
    )
}

/// Validates the fractional preferences row.
///
/// # Errors
///
/// Returns an error if:
/// - Any rate or hours band is inverted
/// - Either weekly hours bound exceeds 168
pub fn validate_fractional_preferences(prefs: &FractionalPreferences) -> Result<(), DomainError> {
    let category: Option<Category> = Some(Category::Fractional);
    validate_band(
        category,
        "hourly rate",
        prefs.hourly_rate_min,
        prefs.hourly_rate_max,
    )?;
    validate_band(
        category,
        "daily rate",
        prefs.daily_rate_min,
        prefs.daily_rate_max,
    )?;
    validate_band(
        category,
        "weekly hours",
        prefs.hours_per_week_min,
        prefs.hours_per_week_max,
    )?;

    for hours in [prefs.hours_per_week_min, prefs.hours_per_week_max]
        .into_iter()
        .flatten()
    {
        if hours > MAX_WEEKLY_HOURS {
            return Err(DomainError::InvalidWeeklyHours { hours });
        }
    }
    Ok(())
}

/// Validates the attributes of a place that may be inserted.
///
/// # Errors
///
/// Returns an error if the place id is blank or a coordinate is out of range.
pub fn validate_place(place: &PlaceAttributes) -> Result<(), DomainError> {
    if place.place_id.trim().is_empty() {
        return Err(DomainError::MissingPlaceId {
            name: place.name.clone(),
        });
    }

    let latitude_ok: bool = place
        .latitude
        .is_none_or(|lat| (-90.0..=90.0).contains(&lat));
    let longitude_ok: bool = place
        .longitude
        .is_none_or(|lng| (-180.0..=180.0).contains(&lng));
    if !latitude_ok || !longitude_ok {
        return Err(DomainError::InvalidCoordinates {
            place_id: place.place_id.clone(),
            latitude: format!("{:?}", place.latitude),
            longitude: format!("{:?}", place.longitude),
        });
    }
    Ok(())
}

/// Validates that a timezone is a known IANA zone name.
///
/// # Errors
///
/// Returns an error if the zone is unknown.
pub fn validate_timezone(timezone: &str) -> Result<(), DomainError> {
    timezone
        .parse::<Tz>()
        .map(|_| ())
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))
}

fn validate_location_ref(location: &LocationRef) -> Result<(), DomainError> {
    match location {
        LocationRef::Resolved { .. } => Ok(()),
        LocationRef::Unresolved(place) => validate_place(place),
    }
}

/// Validates a combined form before it is saved.
///
/// Nothing is written when this fails.
///
/// # Errors
///
/// Returns the first rule violation found.
pub fn validate_form(form: &CombinedWorkPreferencesForm) -> Result<(), DomainError> {
    validate_full_time_preferences(&form.full_time.preferences)?;
    validate_fractional_preferences(&form.fractional.preferences)?;

    for category in Category::ALL {
        for location in form.locations(category) {
            validate_location_ref(location)?;
        }
    }

    if let Some(location) = &form.general.current_location {
        validate_location_ref(location)?;
    }

    if let Some(timezone) = &form.general.timezone {
        validate_timezone(timezone)?;
    }

    Ok(())
}
