// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and their conversions to and from domain types.

use diesel::prelude::*;
use onboard_domain::{
    FractionalPreferences, FullTimePreferences, Industry, IndustryId, Location, LocationId,
    PaymentType, PlaceAttributes, UserId, WorkPreferences, format_date, parse_date,
};
use time::Date;

use crate::diesel_schema::{
    fractional_preferences, full_time_preferences, industries, locations, work_preferences,
};
use crate::error::PersistenceError;

fn to_column(value: Option<u32>) -> Option<i64> {
    value.map(i64::from)
}

fn from_column(value: Option<i64>, column: &'static str) -> Result<Option<u32>, PersistenceError> {
    value
        .map(|v| {
            u32::try_from(v).map_err(|_| PersistenceError::InvalidStoredValue {
                column,
                value: v.to_string(),
            })
        })
        .transpose()
}

fn date_to_column(
    value: Option<Date>,
    column: &'static str,
) -> Result<Option<String>, PersistenceError> {
    value
        .map(|date| {
            format_date(date).map_err(|_| PersistenceError::InvalidStoredValue {
                column,
                value: date.to_string(),
            })
        })
        .transpose()
}

fn date_from_column(
    value: Option<String>,
    column: &'static str,
) -> Result<Option<Date>, PersistenceError> {
    value
        .map(|v| {
            parse_date(&v).map_err(|_| PersistenceError::InvalidStoredValue { column, value: v })
        })
        .transpose()
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LocationRow {
    pub location_id: i64,
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// JSON array of place-type tags.
    pub place_types: String,
}

impl LocationRow {
    /// # Errors
    ///
    /// Returns an error if the stored place types are not a JSON string array.
    pub fn into_domain(self) -> Result<Location, PersistenceError> {
        let place_types: Vec<String> = serde_json::from_str(&self.place_types)?;
        Ok(Location {
            id: LocationId::new(self.location_id),
            place: PlaceAttributes {
                place_id: self.place_id,
                name: self.name,
                formatted_address: self.formatted_address,
                city: self.city,
                state: self.state,
                country_code: self.country_code,
                latitude: self.latitude,
                longitude: self.longitude,
                place_types,
            },
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = locations)]
pub struct NewLocationRow<'a> {
    pub place_id: &'a str,
    pub name: &'a str,
    pub formatted_address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub country_code: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub place_types: String,
}

impl<'a> NewLocationRow<'a> {
    /// # Errors
    ///
    /// Returns an error if the place types cannot be serialized.
    pub fn from_place(place: &'a PlaceAttributes) -> Result<Self, PersistenceError> {
        Ok(Self {
            place_id: &place.place_id,
            name: &place.name,
            formatted_address: place.formatted_address.as_deref(),
            city: place.city.as_deref(),
            state: place.state.as_deref(),
            country_code: place.country_code.as_deref(),
            latitude: place.latitude,
            longitude: place.longitude,
            place_types: serde_json::to_string(&place.place_types)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = industries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IndustryRow {
    pub industry_id: i64,
    pub name: String,
}

impl From<IndustryRow> for Industry {
    fn from(row: IndustryRow) -> Self {
        Self {
            id: IndustryId::new(row.industry_id),
            name: row.name,
        }
    }
}

/// A whole `full_time_preferences` row. Upserts replace every column.
#[derive(Debug, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = full_time_preferences)]
#[diesel(primary_key(user_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FullTimePreferencesRow {
    pub user_id: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub remote: i32,
    pub earliest_start_date: Option<String>,
    pub open_for_work: i32,
}

impl FullTimePreferencesRow {
    /// # Errors
    ///
    /// Returns an error if the start date cannot be rendered.
    pub fn from_domain(
        user: &UserId,
        prefs: &FullTimePreferences,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            user_id: user.as_str().to_string(),
            salary_min: to_column(prefs.salary_min),
            salary_max: to_column(prefs.salary_max),
            remote: i32::from(prefs.remote),
            earliest_start_date: date_to_column(prefs.earliest_start_date, "earliest_start_date")?,
            open_for_work: i32::from(prefs.open_for_work),
        })
    }

    /// # Errors
    ///
    /// Returns an error if a stored amount or date is out of range.
    pub fn into_domain(self) -> Result<FullTimePreferences, PersistenceError> {
        Ok(FullTimePreferences {
            salary_min: from_column(self.salary_min, "salary_min")?,
            salary_max: from_column(self.salary_max, "salary_max")?,
            remote: self.remote != 0,
            earliest_start_date: date_from_column(self.earliest_start_date, "earliest_start_date")?,
            open_for_work: self.open_for_work != 0,
        })
    }
}

/// A whole `fractional_preferences` row. Upserts replace every column.
#[derive(Debug, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = fractional_preferences)]
#[diesel(primary_key(user_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FractionalPreferencesRow {
    pub user_id: String,
    pub hourly_rate_min: Option<i64>,
    pub hourly_rate_max: Option<i64>,
    pub daily_rate_min: Option<i64>,
    pub daily_rate_max: Option<i64>,
    pub hours_per_week_min: Option<i64>,
    pub hours_per_week_max: Option<i64>,
    pub remote: i32,
    pub payment_type: Option<String>,
    pub earliest_start_date: Option<String>,
    pub open_for_work: i32,
}

impl FractionalPreferencesRow {
    /// # Errors
    ///
    /// Returns an error if the start date cannot be rendered.
    pub fn from_domain(
        user: &UserId,
        prefs: &FractionalPreferences,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            user_id: user.as_str().to_string(),
            hourly_rate_min: to_column(prefs.hourly_rate_min),
            hourly_rate_max: to_column(prefs.hourly_rate_max),
            daily_rate_min: to_column(prefs.daily_rate_min),
            daily_rate_max: to_column(prefs.daily_rate_max),
            hours_per_week_min: to_column(prefs.hours_per_week_min),
            hours_per_week_max: to_column(prefs.hours_per_week_max),
            remote: i32::from(prefs.remote),
            payment_type: prefs.payment_type.map(|p| p.as_str().to_string()),
            earliest_start_date: date_to_column(prefs.earliest_start_date, "earliest_start_date")?,
            open_for_work: i32::from(prefs.open_for_work),
        })
    }

    /// # Errors
    ///
    /// Returns an error if a stored amount, payment type or date is invalid.
    pub fn into_domain(self) -> Result<FractionalPreferences, PersistenceError> {
        let payment_type: Option<PaymentType> = self
            .payment_type
            .map(|p| {
                p.parse::<PaymentType>()
                    .map_err(|_| PersistenceError::InvalidStoredValue {
                        column: "payment_type",
                        value: p,
                    })
            })
            .transpose()?;

        Ok(FractionalPreferences {
            hourly_rate_min: from_column(self.hourly_rate_min, "hourly_rate_min")?,
            hourly_rate_max: from_column(self.hourly_rate_max, "hourly_rate_max")?,
            daily_rate_min: from_column(self.daily_rate_min, "daily_rate_min")?,
            daily_rate_max: from_column(self.daily_rate_max, "daily_rate_max")?,
            hours_per_week_min: from_column(self.hours_per_week_min, "hours_per_week_min")?,
            hours_per_week_max: from_column(self.hours_per_week_max, "hours_per_week_max")?,
            remote: self.remote != 0,
            payment_type,
            earliest_start_date: date_from_column(self.earliest_start_date, "earliest_start_date")?,
            open_for_work: self.open_for_work != 0,
        })
    }
}

#[derive(Debug, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = work_preferences)]
#[diesel(primary_key(user_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkPreferencesRow {
    pub user_id: String,
    pub current_location_id: Option<i64>,
    pub timezone: Option<String>,
}

impl WorkPreferencesRow {
    #[must_use]
    pub fn from_domain(user: &UserId, prefs: &WorkPreferences) -> Self {
        Self {
            user_id: user.as_str().to_string(),
            current_location_id: prefs.current_location_id.map(|id| id.value()),
            timezone: prefs.timezone.clone(),
        }
    }

    #[must_use]
    pub fn into_domain(self) -> WorkPreferences {
        WorkPreferences {
            current_location_id: self.current_location_id.map(LocationId::new),
            timezone: self.timezone,
        }
    }
}
