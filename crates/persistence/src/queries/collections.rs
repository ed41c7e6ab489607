// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Junction-row reads. Each returns the full id set for one user.

use diesel::prelude::*;
use diesel::SqliteConnection;
use onboard_domain::{Category, CountryCode, IndustryId, LocationId, UserId};
use std::collections::BTreeSet;

use crate::diesel_schema::{
    fractional_industry_preferences, fractional_location_preferences,
    full_time_industry_preferences, full_time_location_preferences, work_eligibility,
};
use crate::error::PersistenceError;

/// Retrieves the countries a user is eligible to work in.
///
/// # Errors
///
/// Returns an error if the query fails or a stored code is malformed.
pub fn get_work_eligibility(
    conn: &mut SqliteConnection,
    user: &UserId,
) -> Result<BTreeSet<CountryCode>, PersistenceError> {
    let codes: Vec<String> = work_eligibility::table
        .filter(work_eligibility::user_id.eq(user.as_str()))
        .select(work_eligibility::country_code)
        .load(conn)?;

    codes
        .into_iter()
        .map(|code| {
            CountryCode::new(&code).map_err(|_| PersistenceError::InvalidStoredValue {
                column: "country_code",
                value: code,
            })
        })
        .collect()
}

/// Retrieves a user's preferred location ids for one category.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_location_preferences(
    conn: &mut SqliteConnection,
    user: &UserId,
    category: Category,
) -> Result<BTreeSet<LocationId>, PersistenceError> {
    let ids: Vec<i64> = match category {
        Category::FullTime => full_time_location_preferences::table
            .filter(full_time_location_preferences::user_id.eq(user.as_str()))
            .select(full_time_location_preferences::location_id)
            .load(conn)?,
        Category::Fractional => fractional_location_preferences::table
            .filter(fractional_location_preferences::user_id.eq(user.as_str()))
            .select(fractional_location_preferences::location_id)
            .load(conn)?,
    };
    Ok(ids.into_iter().map(LocationId::new).collect())
}

/// Retrieves a user's preferred industry ids for one category.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_industry_preferences(
    conn: &mut SqliteConnection,
    user: &UserId,
    category: Category,
) -> Result<BTreeSet<IndustryId>, PersistenceError> {
    let ids: Vec<i64> = match category {
        Category::FullTime => full_time_industry_preferences::table
            .filter(full_time_industry_preferences::user_id.eq(user.as_str()))
            .select(full_time_industry_preferences::industry_id)
            .load(conn)?,
        Category::Fractional => fractional_industry_preferences::table
            .filter(fractional_industry_preferences::user_id.eq(user.as_str()))
            .select(fractional_industry_preferences::industry_id)
            .load(conn)?,
    };
    Ok(ids.into_iter().map(IndustryId::new).collect())
}
