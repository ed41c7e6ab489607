// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cached reads.
//!
//! A [`QueryCache`] is an explicit handle: create one when a session starts,
//! share it with a [`CachedRepository`], and call [`QueryCache::clear`] on
//! logout. Saves invalidate buckets through
//! [`PreferencesRepository::invalidate`].

use async_trait::async_trait;
use onboard_domain::{
    Category, CountryCode, FractionalPreferences, FullTimePreferences, IndustryId, Location,
    LocationId, PlaceAttributes, UserId, WorkPreferences,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::error::RepositoryError;
use crate::repository::PreferencesRepository;

/// A named bucket of cached reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    WorkPreferences,
    WorkEligibility,
    FullTimePreferences,
    FullTimeLocations,
    FullTimeIndustries,
    FractionalPreferences,
    FractionalLocations,
    FractionalIndustries,
}

impl CacheKey {
    /// Every bucket the work-preferences core reads from.
    pub const ALL: [Self; 8] = [
        Self::WorkPreferences,
        Self::WorkEligibility,
        Self::FullTimePreferences,
        Self::FullTimeLocations,
        Self::FullTimeIndustries,
        Self::FractionalPreferences,
        Self::FractionalLocations,
        Self::FractionalIndustries,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WorkPreferences => "work_preferences",
            Self::WorkEligibility => "work_eligibility",
            Self::FullTimePreferences => "full_time_preferences",
            Self::FullTimeLocations => "full_time_location_preferences",
            Self::FullTimeIndustries => "full_time_industry_preferences",
            Self::FractionalPreferences => "fractional_preferences",
            Self::FractionalLocations => "fractional_location_preferences",
            Self::FractionalIndustries => "fractional_industry_preferences",
        }
    }

    #[must_use]
    pub const fn locations(category: Category) -> Self {
        match category {
            Category::FullTime => Self::FullTimeLocations,
            Category::Fractional => Self::FractionalLocations,
        }
    }

    #[must_use]
    pub const fn industries(category: Category) -> Self {
        match category {
            Category::FullTime => Self::FullTimeIndustries,
            Category::Fractional => Self::FractionalIndustries,
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
enum CachedValue {
    FullTime(Option<FullTimePreferences>),
    Fractional(Option<FractionalPreferences>),
    Work(Option<WorkPreferences>),
    Countries(BTreeSet<CountryCode>),
    Locations(BTreeSet<LocationId>),
    Industries(BTreeSet<IndustryId>),
}

/// Cached read results keyed by bucket and user.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<(CacheKey, UserId), CachedValue>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<(CacheKey, UserId), CachedValue>> {
        // Entries are plain values; a panic elsewhere cannot leave one half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get(&self, key: CacheKey, user: &UserId) -> Option<CachedValue> {
        self.entries().get(&(key, user.clone())).cloned()
    }

    fn put(&self, key: CacheKey, user: &UserId, value: CachedValue) {
        self.entries().insert((key, user.clone()), value);
    }

    /// Returns `true` if a read for this bucket and user is cached.
    #[must_use]
    pub fn contains(&self, key: CacheKey, user: &UserId) -> bool {
        self.entries().contains_key(&(key, user.clone()))
    }

    /// Drops every cached read in the given buckets, for all users.
    pub fn invalidate(&self, keys: &[CacheKey]) {
        let mut entries = self.entries();
        let before: usize = entries.len();
        entries.retain(|(key, _), _| !keys.contains(key));
        debug!(
            buckets = keys.len(),
            dropped = before - entries.len(),
            "Invalidated cached reads"
        );
    }

    /// Drops everything. Call on logout.
    pub fn clear(&self) {
        self.entries().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// A repository that serves the eight preference buckets from a [`QueryCache`].
///
/// Location lookups and all writes go straight to the inner repository.
pub struct CachedRepository<R> {
    inner: R,
    cache: Arc<QueryCache>,
}

impl<R> CachedRepository<R> {
    pub const fn new(inner: R, cache: Arc<QueryCache>) -> Self {
        Self { inner, cache }
    }

    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.inner
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }
}

#[async_trait]
impl<R: PreferencesRepository> PreferencesRepository for CachedRepository<R> {
    async fn get_full_time_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<FullTimePreferences>, RepositoryError> {
        if let Some(CachedValue::FullTime(value)) =
            self.cache.get(CacheKey::FullTimePreferences, user)
        {
            return Ok(value);
        }
        let value: Option<FullTimePreferences> =
            self.inner.get_full_time_preferences(user).await?;
        self.cache.put(
            CacheKey::FullTimePreferences,
            user,
            CachedValue::FullTime(value.clone()),
        );
        Ok(value)
    }

    async fn get_fractional_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<FractionalPreferences>, RepositoryError> {
        if let Some(CachedValue::Fractional(value)) =
            self.cache.get(CacheKey::FractionalPreferences, user)
        {
            return Ok(value);
        }
        let value: Option<FractionalPreferences> =
            self.inner.get_fractional_preferences(user).await?;
        self.cache.put(
            CacheKey::FractionalPreferences,
            user,
            CachedValue::Fractional(value.clone()),
        );
        Ok(value)
    }

    async fn get_work_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<WorkPreferences>, RepositoryError> {
        if let Some(CachedValue::Work(value)) = self.cache.get(CacheKey::WorkPreferences, user) {
            return Ok(value);
        }
        let value: Option<WorkPreferences> = self.inner.get_work_preferences(user).await?;
        self.cache.put(
            CacheKey::WorkPreferences,
            user,
            CachedValue::Work(value.clone()),
        );
        Ok(value)
    }

    async fn get_work_eligibility(
        &self,
        user: &UserId,
    ) -> Result<BTreeSet<CountryCode>, RepositoryError> {
        if let Some(CachedValue::Countries(value)) =
            self.cache.get(CacheKey::WorkEligibility, user)
        {
            return Ok(value);
        }
        let value: BTreeSet<CountryCode> = self.inner.get_work_eligibility(user).await?;
        self.cache.put(
            CacheKey::WorkEligibility,
            user,
            CachedValue::Countries(value.clone()),
        );
        Ok(value)
    }

    async fn get_location_preferences(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<LocationId>, RepositoryError> {
        let key: CacheKey = CacheKey::locations(category);
        if let Some(CachedValue::Locations(value)) = self.cache.get(key, user) {
            return Ok(value);
        }
        let value: BTreeSet<LocationId> =
            self.inner.get_location_preferences(user, category).await?;
        self.cache
            .put(key, user, CachedValue::Locations(value.clone()));
        Ok(value)
    }

    async fn get_industry_preferences(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<IndustryId>, RepositoryError> {
        let key: CacheKey = CacheKey::industries(category);
        if let Some(CachedValue::Industries(value)) = self.cache.get(key, user) {
            return Ok(value);
        }
        let value: BTreeSet<IndustryId> =
            self.inner.get_industry_preferences(user, category).await?;
        self.cache
            .put(key, user, CachedValue::Industries(value.clone()));
        Ok(value)
    }

    async fn get_locations_by_ids(
        &self,
        ids: &[LocationId],
    ) -> Result<Vec<Location>, RepositoryError> {
        self.inner.get_locations_by_ids(ids).await
    }

    async fn find_location_by_place_id(
        &self,
        place_id: &str,
    ) -> Result<Option<Location>, RepositoryError> {
        self.inner.find_location_by_place_id(place_id).await
    }

    async fn insert_location(&self, place: &PlaceAttributes) -> Result<LocationId, RepositoryError> {
        self.inner.insert_location(place).await
    }

    async fn upsert_full_time_preferences(
        &self,
        user: &UserId,
        preferences: &FullTimePreferences,
    ) -> Result<(), RepositoryError> {
        self.inner
            .upsert_full_time_preferences(user, preferences)
            .await
    }

    async fn upsert_fractional_preferences(
        &self,
        user: &UserId,
        preferences: &FractionalPreferences,
    ) -> Result<(), RepositoryError> {
        self.inner
            .upsert_fractional_preferences(user, preferences)
            .await
    }

    async fn upsert_work_preferences(
        &self,
        user: &UserId,
        preferences: &WorkPreferences,
    ) -> Result<(), RepositoryError> {
        self.inner.upsert_work_preferences(user, preferences).await
    }

    async fn add_eligibility(
        &self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), RepositoryError> {
        self.inner.add_eligibility(user, country).await
    }

    async fn remove_eligibility(
        &self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), RepositoryError> {
        self.inner.remove_eligibility(user, country).await
    }

    async fn add_location_preference(
        &self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), RepositoryError> {
        self.inner
            .add_location_preference(user, category, location)
            .await
    }

    async fn remove_location_preference(
        &self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), RepositoryError> {
        self.inner
            .remove_location_preference(user, category, location)
            .await
    }

    async fn add_industry_preference(
        &self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), RepositoryError> {
        self.inner
            .add_industry_preference(user, category, industry)
            .await
    }

    async fn remove_industry_preference(
        &self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), RepositoryError> {
        self.inner
            .remove_industry_preference(user, category, industry)
            .await
    }

    async fn invalidate(&self, keys: &[CacheKey]) {
        self.cache.invalidate(keys);
        self.inner.invalidate(keys).await;
    }
}
