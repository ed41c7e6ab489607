// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use onboard_domain::{FractionalPreferences, FullTimePreferences, UserId, WorkPreferences};
use tracing::debug;

use crate::data_models::{FractionalPreferencesRow, FullTimePreferencesRow, WorkPreferencesRow};
use crate::diesel_schema::{fractional_preferences, full_time_preferences, work_preferences};
use crate::error::PersistenceError;

/// Retrieves a user's full-time preferences row.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is invalid.
/// Returns `Ok(None)` if the user has no row.
pub fn get_full_time_preferences(
    conn: &mut SqliteConnection,
    user: &UserId,
) -> Result<Option<FullTimePreferences>, PersistenceError> {
    debug!(user = %user, "Loading full-time preferences");

    full_time_preferences::table
        .filter(full_time_preferences::user_id.eq(user.as_str()))
        .select(FullTimePreferencesRow::as_select())
        .first(conn)
        .optional()?
        .map(FullTimePreferencesRow::into_domain)
        .transpose()
}

/// Retrieves a user's fractional preferences row.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is invalid.
/// Returns `Ok(None)` if the user has no row.
pub fn get_fractional_preferences(
    conn: &mut SqliteConnection,
    user: &UserId,
) -> Result<Option<FractionalPreferences>, PersistenceError> {
    debug!(user = %user, "Loading fractional preferences");

    fractional_preferences::table
        .filter(fractional_preferences::user_id.eq(user.as_str()))
        .select(FractionalPreferencesRow::as_select())
        .first(conn)
        .optional()?
        .map(FractionalPreferencesRow::into_domain)
        .transpose()
}

/// Retrieves a user's general work preferences row.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_work_preferences(
    conn: &mut SqliteConnection,
    user: &UserId,
) -> Result<Option<WorkPreferences>, PersistenceError> {
    let row: Option<WorkPreferencesRow> = work_preferences::table
        .filter(work_preferences::user_id.eq(user.as_str()))
        .select(WorkPreferencesRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(WorkPreferencesRow::into_domain))
}
