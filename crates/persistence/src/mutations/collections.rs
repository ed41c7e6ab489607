// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Junction-row adds and removes.

use diesel::prelude::*;
use diesel::SqliteConnection;
use onboard_domain::{Category, CountryCode, IndustryId, LocationId, UserId};
use tracing::debug;

use crate::diesel_schema::{
    fractional_industry_preferences, fractional_location_preferences,
    full_time_industry_preferences, full_time_location_preferences, work_eligibility,
};
use crate::error::PersistenceError;

/// Adds a work-eligibility country for a user.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn add_eligibility(
    conn: &mut SqliteConnection,
    user: &UserId,
    country: &CountryCode,
) -> Result<(), PersistenceError> {
    let inserted: usize = diesel::insert_or_ignore_into(work_eligibility::table)
        .values((
            work_eligibility::user_id.eq(user.as_str()),
            work_eligibility::country_code.eq(country.as_str()),
        ))
        .execute(conn)?;
    debug!(user = %user, country = %country, inserted, "Added work eligibility");
    Ok(())
}

/// Removes a work-eligibility country for a user.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn remove_eligibility(
    conn: &mut SqliteConnection,
    user: &UserId,
    country: &CountryCode,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        work_eligibility::table
            .filter(work_eligibility::user_id.eq(user.as_str()))
            .filter(work_eligibility::country_code.eq(country.as_str())),
    )
    .execute(conn)?;
    debug!(user = %user, country = %country, deleted, "Removed work eligibility");
    Ok(())
}

/// Links a location to a user's preferences for one category.
///
/// # Errors
///
/// Returns an error if the write fails, including when the location does not
/// exist.
pub fn add_location_preference(
    conn: &mut SqliteConnection,
    user: &UserId,
    category: Category,
    location: LocationId,
) -> Result<(), PersistenceError> {
    let inserted: usize = match category {
        Category::FullTime => diesel::insert_or_ignore_into(full_time_location_preferences::table)
            .values((
                full_time_location_preferences::user_id.eq(user.as_str()),
                full_time_location_preferences::location_id.eq(location.value()),
            ))
            .execute(conn)?,
        Category::Fractional => {
            diesel::insert_or_ignore_into(fractional_location_preferences::table)
                .values((
                    fractional_location_preferences::user_id.eq(user.as_str()),
                    fractional_location_preferences::location_id.eq(location.value()),
                ))
                .execute(conn)?
        }
    };
    debug!(user = %user, %category, location = %location, inserted, "Added location preference");
    Ok(())
}

/// Unlinks a location from a user's preferences for one category.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn remove_location_preference(
    conn: &mut SqliteConnection,
    user: &UserId,
    category: Category,
    location: LocationId,
) -> Result<(), PersistenceError> {
    let deleted: usize = match category {
        Category::FullTime => diesel::delete(
            full_time_location_preferences::table
                .filter(full_time_location_preferences::user_id.eq(user.as_str()))
                .filter(full_time_location_preferences::location_id.eq(location.value())),
        )
        .execute(conn)?,
        Category::Fractional => diesel::delete(
            fractional_location_preferences::table
                .filter(fractional_location_preferences::user_id.eq(user.as_str()))
                .filter(fractional_location_preferences::location_id.eq(location.value())),
        )
        .execute(conn)?,
    };
    debug!(user = %user, %category, location = %location, deleted, "Removed location preference");
    Ok(())
}

/// Adds an industry to a user's preferences for one category.
///
/// # Errors
///
/// Returns an error if the write fails, including when the industry is not in
/// the catalog.
pub fn add_industry_preference(
    conn: &mut SqliteConnection,
    user: &UserId,
    category: Category,
    industry: IndustryId,
) -> Result<(), PersistenceError> {
    let inserted: usize = match category {
        Category::FullTime => diesel::insert_or_ignore_into(full_time_industry_preferences::table)
            .values((
                full_time_industry_preferences::user_id.eq(user.as_str()),
                full_time_industry_preferences::industry_id.eq(industry.value()),
            ))
            .execute(conn)?,
        Category::Fractional => {
            diesel::insert_or_ignore_into(fractional_industry_preferences::table)
                .values((
                    fractional_industry_preferences::user_id.eq(user.as_str()),
                    fractional_industry_preferences::industry_id.eq(industry.value()),
                ))
                .execute(conn)?
        }
    };
    debug!(user = %user, %category, industry = %industry, inserted, "Added industry preference");
    Ok(())
}

/// Removes an industry from a user's preferences for one category.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn remove_industry_preference(
    conn: &mut SqliteConnection,
    user: &UserId,
    category: Category,
    industry: IndustryId,
) -> Result<(), PersistenceError> {
    let deleted: usize = match category {
        Category::FullTime => diesel::delete(
            full_time_industry_preferences::table
                .filter(full_time_industry_preferences::user_id.eq(user.as_str()))
                .filter(full_time_industry_preferences::industry_id.eq(industry.value())),
        )
        .execute(conn)?,
        Category::Fractional => diesel::delete(
            fractional_industry_preferences::table
                .filter(fractional_industry_preferences::user_id.eq(user.as_str()))
                .filter(fractional_industry_preferences::industry_id.eq(industry.value())),
        )
        .execute(conn)?,
    };
    debug!(user = %user, %category, industry = %industry, deleted, "Removed industry preference");
    Ok(())
}
