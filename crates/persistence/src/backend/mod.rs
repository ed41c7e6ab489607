// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection-level helpers that Diesel DSL cannot express.
//!
//! Only `SQLite` is supported. Preference reads and writes stay in `queries/`
//! and `mutations/`; this module holds setup and the few raw-SQL helpers they
//! lean on.

pub mod sqlite;

use diesel::{Connection, SqliteConnection};

use crate::error::PersistenceError;

/// Raw-SQL helpers, called through the connection.
pub trait PersistenceBackend: Connection {
    /// The rowid assigned by this connection's latest insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// # Errors
    ///
    /// Returns [`PersistenceError::ForeignKeysDisabled`] if enforcement is off.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}
