// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::result::DatabaseErrorKind;
use onboard_domain::{LocationId, PlaceAttributes};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::NewLocationRow;
use crate::diesel_schema::locations;
use crate::error::PersistenceError;

/// Inserts a new location row.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicatePlaceId` if a row with the same place
/// id already exists, or another error if the write fails.
pub fn insert_location(
    conn: &mut SqliteConnection,
    place: &PlaceAttributes,
) -> Result<LocationId, PersistenceError> {
    let row: NewLocationRow<'_> = NewLocationRow::from_place(place)?;

    match diesel::insert_into(locations::table)
        .values(&row)
        .execute(conn)
    {
        Ok(_) => {}
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(PersistenceError::DuplicatePlaceId(place.place_id.clone()));
        }
        Err(e) => return Err(PersistenceError::from(e)),
    }

    let location_id: i64 = conn.get_last_insert_rowid()?;
    info!(location_id, place_id = %place.place_id, "Inserted location");

    Ok(LocationId::new(location_id))
}
