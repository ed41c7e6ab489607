// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use onboard_domain::Industry;

use crate::data_models::IndustryRow;
use crate::diesel_schema::industries;
use crate::error::PersistenceError;

/// Lists the industry catalog, ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_industries(conn: &mut SqliteConnection) -> Result<Vec<Industry>, PersistenceError> {
    let rows: Vec<IndustryRow> = industries::table
        .order(industries::name.asc())
        .select(IndustryRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Industry::from).collect())
}
