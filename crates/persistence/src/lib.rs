// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for candidate work preferences.
//!
//! This crate stores the normalized preference relations in `SQLite` through
//! Diesel and exposes them to the core as a [`PreferencesRepository`].
//!
//! ## Layout
//!
//! - `backend`: connection setup, embedded migrations, PRAGMA checks
//! - `queries`: read-only Diesel DSL queries
//! - `mutations`: upserts, inserts and junction adds/removes
//! - [`SharedPersistence`]: the async repository adapter
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives every caller its own shared in-memory
//! database, so tests never see each other's rows.
//!
//! [`PreferencesRepository`]: onboard::PreferencesRepository

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use onboard_domain::{
    Category, CountryCode, FractionalPreferences, FullTimePreferences, Industry, IndustryId,
    Location, LocationId, PlaceAttributes, UserId, WorkPreferences,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

// Linked for its bundled SQLite build only.
use libsqlite3_sys as _;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod repository;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use repository::SharedPersistence;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Synchronous persistence adapter over one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter backed by a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_onboard_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter backed by a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path
            .as_ref()
            .to_str()
            .ok_or(PersistenceError::InvalidDatabasePath)?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Preference rows
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_full_time_preferences(
        &mut self,
        user: &UserId,
    ) -> Result<Option<FullTimePreferences>, PersistenceError> {
        queries::preferences::get_full_time_preferences(&mut self.conn, user)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_fractional_preferences(
        &mut self,
        user: &UserId,
    ) -> Result<Option<FractionalPreferences>, PersistenceError> {
        queries::preferences::get_fractional_preferences(&mut self.conn, user)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_work_preferences(
        &mut self,
        user: &UserId,
    ) -> Result<Option<WorkPreferences>, PersistenceError> {
        queries::preferences::get_work_preferences(&mut self.conn, user)
    }

    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_full_time_preferences(
        &mut self,
        user: &UserId,
        prefs: &FullTimePreferences,
    ) -> Result<(), PersistenceError> {
        mutations::preferences::upsert_full_time_preferences(&mut self.conn, user, prefs)
    }

    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_fractional_preferences(
        &mut self,
        user: &UserId,
        prefs: &FractionalPreferences,
    ) -> Result<(), PersistenceError> {
        mutations::preferences::upsert_fractional_preferences(&mut self.conn, user, prefs)
    }

    /// # Errors
    ///
    /// Returns an error if the write fails or the current location is unknown.
    pub fn upsert_work_preferences(
        &mut self,
        user: &UserId,
        prefs: &WorkPreferences,
    ) -> Result<(), PersistenceError> {
        mutations::preferences::upsert_work_preferences(&mut self.conn, user, prefs)
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_work_eligibility(
        &mut self,
        user: &UserId,
    ) -> Result<BTreeSet<CountryCode>, PersistenceError> {
        queries::collections::get_work_eligibility(&mut self.conn, user)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_location_preferences(
        &mut self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<LocationId>, PersistenceError> {
        queries::collections::get_location_preferences(&mut self.conn, user, category)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_industry_preferences(
        &mut self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<IndustryId>, PersistenceError> {
        queries::collections::get_industry_preferences(&mut self.conn, user, category)
    }

    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn add_eligibility(
        &mut self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), PersistenceError> {
        mutations::collections::add_eligibility(&mut self.conn, user, country)
    }

    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn remove_eligibility(
        &mut self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), PersistenceError> {
        mutations::collections::remove_eligibility(&mut self.conn, user, country)
    }

    /// # Errors
    ///
    /// Returns an error if the write fails or the location is unknown.
    pub fn add_location_preference(
        &mut self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), PersistenceError> {
        mutations::collections::add_location_preference(&mut self.conn, user, category, location)
    }

    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn remove_location_preference(
        &mut self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), PersistenceError> {
        mutations::collections::remove_location_preference(
            &mut self.conn,
            user,
            category,
            location,
        )
    }

    /// # Errors
    ///
    /// Returns an error if the write fails or the industry is unknown.
    pub fn add_industry_preference(
        &mut self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), PersistenceError> {
        mutations::collections::add_industry_preference(&mut self.conn, user, category, industry)
    }

    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn remove_industry_preference(
        &mut self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), PersistenceError> {
        mutations::collections::remove_industry_preference(
            &mut self.conn,
            user,
            category,
            industry,
        )
    }

    // ========================================================================
    // Locations & catalog
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_locations_by_ids(
        &mut self,
        ids: &[LocationId],
    ) -> Result<Vec<Location>, PersistenceError> {
        queries::locations::get_locations_by_ids(&mut self.conn, ids)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if no location
    /// has this place id.
    pub fn find_location_by_place_id(
        &mut self,
        place_id: &str,
    ) -> Result<Option<Location>, PersistenceError> {
        queries::locations::find_location_by_place_id(&mut self.conn, place_id)
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::DuplicatePlaceId`] if the place id is taken.
    pub fn insert_location(&mut self, place: &PlaceAttributes) -> Result<LocationId, PersistenceError> {
        mutations::locations::insert_location(&mut self.conn, place)
    }

    /// Lists the industry catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_industries(&mut self) -> Result<Vec<Industry>, PersistenceError> {
        queries::industries::list_industries(&mut self.conn)
    }
}
