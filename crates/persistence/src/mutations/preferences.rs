// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Whole-row upserts of the one-row-per-user preference tables.

use diesel::prelude::*;
use diesel::SqliteConnection;
use onboard_domain::{FractionalPreferences, FullTimePreferences, UserId, WorkPreferences};
use tracing::debug;

use crate::data_models::{FractionalPreferencesRow, FullTimePreferencesRow, WorkPreferencesRow};
use crate::diesel_schema::{fractional_preferences, full_time_preferences, work_preferences};
use crate::error::PersistenceError;

/// Inserts or replaces a user's full-time preferences row.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_full_time_preferences(
    conn: &mut SqliteConnection,
    user: &UserId,
    prefs: &FullTimePreferences,
) -> Result<(), PersistenceError> {
    let row: FullTimePreferencesRow = FullTimePreferencesRow::from_domain(user, prefs)?;

    diesel::insert_into(full_time_preferences::table)
        .values(&row)
        .on_conflict(full_time_preferences::user_id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    debug!(user = %user, "Upserted full-time preferences");
    Ok(())
}

/// Inserts or replaces a user's fractional preferences row.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_fractional_preferences(
    conn: &mut SqliteConnection,
    user: &UserId,
    prefs: &FractionalPreferences,
) -> Result<(), PersistenceError> {
    let row: FractionalPreferencesRow = FractionalPreferencesRow::from_domain(user, prefs)?;

    diesel::insert_into(fractional_preferences::table)
        .values(&row)
        .on_conflict(fractional_preferences::user_id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    debug!(user = %user, "Upserted fractional preferences");
    Ok(())
}

/// Inserts or replaces a user's general work preferences row.
///
/// # Errors
///
/// Returns an error if the database write fails, including when the current
/// location id does not exist.
pub fn upsert_work_preferences(
    conn: &mut SqliteConnection,
    user: &UserId,
    prefs: &WorkPreferences,
) -> Result<(), PersistenceError> {
    let row: WorkPreferencesRow = WorkPreferencesRow::from_domain(user, prefs);

    diesel::insert_into(work_preferences::table)
        .values(&row)
        .on_conflict(work_preferences::user_id)
        .do_update()
        .set(&row)
        .execute(conn)?;

    debug!(user = %user, "Upserted work preferences");
    Ok(())
}
