// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Upsert-or-fetch of locations by external place id.

use onboard_domain::{LocationId, LocationRef, PlaceAttributes};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{CoreError, RepositoryError};
use crate::repository::PreferencesRepository;

/// Converts location references into internal ids, inserting unknown places.
///
/// Results are memoized by place id for the resolver's lifetime, so one place
/// never causes more than one insert.
pub struct LocationResolver<'a, R: ?Sized> {
    repo: &'a R,
    resolved: HashMap<String, LocationId>,
    inserted: usize,
}

impl<'a, R> LocationResolver<'a, R>
where
    R: PreferencesRepository + ?Sized,
{
    pub fn new(repo: &'a R) -> Self {
        Self {
            repo,
            resolved: HashMap::new(),
            inserted: 0,
        }
    }

    /// Number of location rows this resolver inserted.
    #[must_use]
    pub const fn inserted(&self) -> usize {
        self.inserted
    }

    /// Resolves a reference. Already-resolved references never touch the
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Resolution`] if the lookup or insert fails.
    pub async fn resolve(&mut self, location: &LocationRef) -> Result<LocationId, CoreError> {
        match location {
            LocationRef::Resolved { id, .. } => Ok(*id),
            LocationRef::Unresolved(place) => self.resolve_place(place).await,
        }
    }

    /// Resolves every reference in order.
    ///
    /// # Errors
    ///
    /// Returns the first resolution failure.
    pub async fn resolve_all(
        &mut self,
        locations: &[LocationRef],
    ) -> Result<Vec<LocationId>, CoreError> {
        let mut ids: Vec<LocationId> = Vec::with_capacity(locations.len());
        for location in locations {
            ids.push(self.resolve(location).await?);
        }
        Ok(ids)
    }

    /// Looks a place up by place id, inserting it if there is no row.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Resolution`] if the lookup fails for any reason
    /// other than "no rows", or if the insert fails and no row appeared
    /// concurrently.
    pub async fn resolve_place(&mut self, place: &PlaceAttributes) -> Result<LocationId, CoreError> {
        if let Some(id) = self.resolved.get(&place.place_id) {
            return Ok(*id);
        }

        let id: LocationId = match self
            .repo
            .find_location_by_place_id(&place.place_id)
            .await
            .map_err(|e| resolution_error(place, &e))?
        {
            Some(existing) => {
                debug!(place_id = %place.place_id, location_id = %existing.id, "Place already known");
                existing.id
            }
            None => self.insert(place).await?,
        };

        self.resolved.insert(place.place_id.clone(), id);
        Ok(id)
    }

    async fn insert(&mut self, place: &PlaceAttributes) -> Result<LocationId, CoreError> {
        match self.repo.insert_location(place).await {
            Ok(id) => {
                self.inserted += 1;
                info!(place_id = %place.place_id, location_id = %id, "Inserted new location");
                Ok(id)
            }
            Err(insert_err) => {
                // Another writer may have inserted the same place between the
                // lookup and the insert.
                warn!(
                    place_id = %place.place_id,
                    error = %insert_err,
                    "Location insert failed; checking for a concurrent insert"
                );
                match self.repo.find_location_by_place_id(&place.place_id).await {
                    Ok(Some(existing)) => Ok(existing.id),
                    Ok(None) | Err(_) => Err(resolution_error(place, &insert_err)),
                }
            }
        }
    }
}

fn resolution_error(place: &PlaceAttributes, err: &RepositoryError) -> CoreError {
    CoreError::Resolution {
        place_id: place.place_id.clone(),
        message: err.to_string(),
    }
}
