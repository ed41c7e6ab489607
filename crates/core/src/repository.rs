// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The preferences repository port.
//!
//! Everything the core knows about storage goes through this trait. Add and
//! remove operations must be idempotent: adding a present row or removing an
//! absent one succeeds without effect.

use async_trait::async_trait;
use onboard_domain::{
    Category, CountryCode, FractionalPreferences, FullTimePreferences, IndustryId, Location,
    LocationId, PlaceAttributes, UserId, WorkPreferences,
};
use std::collections::BTreeSet;

use crate::cache::CacheKey;
use crate::error::RepositoryError;

/// Storage operations used by hydration and reconciliation.
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    async fn get_full_time_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<FullTimePreferences>, RepositoryError>;

    async fn get_fractional_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<FractionalPreferences>, RepositoryError>;

    async fn get_work_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<WorkPreferences>, RepositoryError>;

    async fn get_work_eligibility(
        &self,
        user: &UserId,
    ) -> Result<BTreeSet<CountryCode>, RepositoryError>;

    async fn get_location_preferences(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<LocationId>, RepositoryError>;

    async fn get_industry_preferences(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<IndustryId>, RepositoryError>;

    /// Looks up location rows by internal id. Unknown ids are skipped.
    async fn get_locations_by_ids(
        &self,
        ids: &[LocationId],
    ) -> Result<Vec<Location>, RepositoryError>;

    /// Looks up a location by external place id.
    ///
    /// `Ok(None)` is the "no rows" signal; only that case may lead to an insert.
    async fn find_location_by_place_id(
        &self,
        place_id: &str,
    ) -> Result<Option<Location>, RepositoryError>;

    /// Inserts a location row and returns its new internal id.
    async fn insert_location(&self, place: &PlaceAttributes) -> Result<LocationId, RepositoryError>;

    async fn upsert_full_time_preferences(
        &self,
        user: &UserId,
        preferences: &FullTimePreferences,
    ) -> Result<(), RepositoryError>;

    async fn upsert_fractional_preferences(
        &self,
        user: &UserId,
        preferences: &FractionalPreferences,
    ) -> Result<(), RepositoryError>;

    async fn upsert_work_preferences(
        &self,
        user: &UserId,
        preferences: &WorkPreferences,
    ) -> Result<(), RepositoryError>;

    async fn add_eligibility(
        &self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), RepositoryError>;

    async fn remove_eligibility(
        &self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), RepositoryError>;

    async fn add_location_preference(
        &self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), RepositoryError>;

    async fn remove_location_preference(
        &self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), RepositoryError>;

    async fn add_industry_preference(
        &self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), RepositoryError>;

    async fn remove_industry_preference(
        &self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), RepositoryError>;

    /// Drops cached reads for the given buckets. Best effort, never fails.
    async fn invalidate(&self, keys: &[CacheKey]);
}
