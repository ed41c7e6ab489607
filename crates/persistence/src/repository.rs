// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The async repository adapter.

use async_trait::async_trait;
use onboard::{CacheKey, PreferencesRepository, RepositoryError};
use onboard_domain::{
    Category, CountryCode, FractionalPreferences, FullTimePreferences, Industry, IndustryId,
    Location, LocationId, PlaceAttributes, UserId, WorkPreferences,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::{Persistence, PersistenceError};

/// A [`Persistence`] shared between request handlers.
///
/// Every call takes the connection lock for the duration of one statement.
#[derive(Clone)]
pub struct SharedPersistence {
    inner: Arc<Mutex<Persistence>>,
}

impl SharedPersistence {
    #[must_use]
    pub fn new(persistence: Persistence) -> Self {
        Self {
            inner: Arc::new(Mutex::new(persistence)),
        }
    }

    /// Locks the underlying connection.
    pub async fn lock(&self) -> MutexGuard<'_, Persistence> {
        self.inner.lock().await
    }

    /// Lists the industry catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_industries(&self) -> Result<Vec<Industry>, PersistenceError> {
        self.lock().await.list_industries()
    }
}

#[async_trait]
impl PreferencesRepository for SharedPersistence {
    async fn get_full_time_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<FullTimePreferences>, RepositoryError> {
        self.lock()
            .await
            .get_full_time_preferences(user)
            .map_err(PersistenceError::into_read_error)
    }

    async fn get_fractional_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<FractionalPreferences>, RepositoryError> {
        self.lock()
            .await
            .get_fractional_preferences(user)
            .map_err(PersistenceError::into_read_error)
    }

    async fn get_work_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<WorkPreferences>, RepositoryError> {
        self.lock()
            .await
            .get_work_preferences(user)
            .map_err(PersistenceError::into_read_error)
    }

    async fn get_work_eligibility(
        &self,
        user: &UserId,
    ) -> Result<BTreeSet<CountryCode>, RepositoryError> {
        self.lock()
            .await
            .get_work_eligibility(user)
            .map_err(PersistenceError::into_read_error)
    }

    async fn get_location_preferences(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<LocationId>, RepositoryError> {
        self.lock()
            .await
            .get_location_preferences(user, category)
            .map_err(PersistenceError::into_read_error)
    }

    async fn get_industry_preferences(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<IndustryId>, RepositoryError> {
        self.lock()
            .await
            .get_industry_preferences(user, category)
            .map_err(PersistenceError::into_read_error)
    }

    async fn get_locations_by_ids(
        &self,
        ids: &[LocationId],
    ) -> Result<Vec<Location>, RepositoryError> {
        self.lock()
            .await
            .get_locations_by_ids(ids)
            .map_err(PersistenceError::into_read_error)
    }

    async fn find_location_by_place_id(
        &self,
        place_id: &str,
    ) -> Result<Option<Location>, RepositoryError> {
        self.lock()
            .await
            .find_location_by_place_id(place_id)
            .map_err(PersistenceError::into_read_error)
    }

    async fn insert_location(&self, place: &PlaceAttributes) -> Result<LocationId, RepositoryError> {
        self.lock()
            .await
            .insert_location(place)
            .map_err(PersistenceError::into_write_error)
    }

    async fn upsert_full_time_preferences(
        &self,
        user: &UserId,
        preferences: &FullTimePreferences,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .await
            .upsert_full_time_preferences(user, preferences)
            .map_err(PersistenceError::into_write_error)
    }

    async fn upsert_fractional_preferences(
        &self,
        user: &UserId,
        preferences: &FractionalPreferences,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .await
            .upsert_fractional_preferences(user, preferences)
            .map_err(PersistenceError::into_write_error)
    }

    async fn upsert_work_preferences(
        &self,
        user: &UserId,
        preferences: &WorkPreferences,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .await
            .upsert_work_preferences(user, preferences)
            .map_err(PersistenceError::into_write_error)
    }

    async fn add_eligibility(
        &self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .await
            .add_eligibility(user, country)
            .map_err(PersistenceError::into_write_error)
    }

    async fn remove_eligibility(
        &self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .await
            .remove_eligibility(user, country)
            .map_err(PersistenceError::into_write_error)
    }

    async fn add_location_preference(
        &self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .await
            .add_location_preference(user, category, location)
            .map_err(PersistenceError::into_write_error)
    }

    async fn remove_location_preference(
        &self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .await
            .remove_location_preference(user, category, location)
            .map_err(PersistenceError::into_write_error)
    }

    async fn add_industry_preference(
        &self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .await
            .add_industry_preference(user, category, industry)
            .map_err(PersistenceError::into_write_error)
    }

    async fn remove_industry_preference(
        &self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .await
            .remove_industry_preference(user, category, industry)
            .map_err(PersistenceError::into_write_error)
    }

    async fn invalidate(&self, keys: &[CacheKey]) {
        // Reads always hit the database; there is nothing to drop here.
        debug!(buckets = keys.len(), "Invalidation requested on uncached repository");
    }
}
