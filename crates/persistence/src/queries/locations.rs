// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use onboard_domain::{Location, LocationId};
use tracing::debug;

use crate::data_models::LocationRow;
use crate::diesel_schema::locations;
use crate::error::PersistenceError;

/// Retrieves locations by internal id, ordered by id. Unknown ids are skipped.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn get_locations_by_ids(
    conn: &mut SqliteConnection,
    ids: &[LocationId],
) -> Result<Vec<Location>, PersistenceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let raw_ids: Vec<i64> = ids.iter().map(LocationId::value).collect();

    let rows: Vec<LocationRow> = locations::table
        .filter(locations::location_id.eq_any(raw_ids))
        .order(locations::location_id.asc())
        .select(LocationRow::as_select())
        .load(conn)?;

    debug!(requested = ids.len(), found = rows.len(), "Loaded locations");
    rows.into_iter().map(LocationRow::into_domain).collect()
}

/// Retrieves a location by its external place id.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if no location has this place id.
pub fn find_location_by_place_id(
    conn: &mut SqliteConnection,
    place_id: &str,
) -> Result<Option<Location>, PersistenceError> {
    let result: Result<LocationRow, diesel::result::Error> = locations::table
        .filter(locations::place_id.eq(place_id))
        .select(LocationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
