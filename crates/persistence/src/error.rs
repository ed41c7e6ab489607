// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use onboard::RepositoryError;

/// Errors raised by the `SQLite` store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The database could not be opened.
    Connection(String),
    /// The database path is not valid UTF-8.
    InvalidDatabasePath,
    /// A schema migration failed.
    Migration(String),
    /// `PRAGMA foreign_keys` reads back as off.
    ForeignKeysDisabled,
    /// A statement failed.
    Query(String),
    /// A junction or work-preferences row names a location or industry
    /// that does not exist.
    UnknownReference(String),
    /// A location with this place id already exists.
    DuplicatePlaceId(String),
    /// A stored value does not fit its domain type.
    InvalidStoredValue { column: &'static str, value: String },
    /// Place-type tags could not be encoded or decoded.
    PlaceTypes(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "Cannot open database: {msg}"),
            Self::InvalidDatabasePath => write!(f, "Database path is not valid UTF-8"),
            Self::Migration(msg) => write!(f, "Migration failed: {msg}"),
            Self::ForeignKeysDisabled => {
                write!(f, "SQLite foreign key enforcement is disabled")
            }
            Self::Query(msg) => write!(f, "Query failed: {msg}"),
            Self::UnknownReference(msg) => write!(f, "Unknown reference: {msg}"),
            Self::DuplicatePlaceId(place_id) => {
                write!(f, "A location with place id '{place_id}' already exists")
            }
            Self::InvalidStoredValue { column, value } => {
                write!(f, "Invalid stored value for {column}: '{value}'")
            }
            Self::PlaceTypes(msg) => write!(f, "Invalid place types: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl PersistenceError {
    /// Converts a failed read into the repository's error type.
    #[must_use]
    pub fn into_read_error(self) -> RepositoryError {
        match self {
            Self::Connection(msg) => RepositoryError::Unavailable(msg),
            other => RepositoryError::Read(other.to_string()),
        }
    }

    /// Converts a failed write into the repository's error type.
    #[must_use]
    pub fn into_write_error(self) -> RepositoryError {
        match self {
            Self::Connection(msg) => RepositoryError::Unavailable(msg),
            Self::UnknownReference(msg) => RepositoryError::UnknownReference(msg),
            other => RepositoryError::Write(other.to_string()),
        }
    }
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::UnknownReference(info.message().to_string())
            }
            _ => Self::Query(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::PlaceTypes(err.to_string())
    }
}
