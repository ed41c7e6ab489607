// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-memory repository that records every call and can be told to fail.

use async_trait::async_trait;
use onboard_domain::{
    Category, CountryCode, FractionalPreferences, FullTimePreferences, IndustryId, Location,
    LocationId, PlaceAttributes, UserId, WorkPreferences,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use crate::{CacheKey, PreferencesRepository, RepositoryError};

/// A repository call, as recorded by [`MemoryRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetFullTime,
    GetFractional,
    GetWork,
    GetEligibility,
    GetLocations(Category),
    GetIndustries(Category),
    GetLocationsByIds(Vec<LocationId>),
    FindLocation(String),
    InsertLocation(String),
    UpsertFullTime,
    UpsertFractional,
    UpsertWork,
    AddEligibility(String),
    RemoveEligibility(String),
    AddLocation(Category, LocationId),
    RemoveLocation(Category, LocationId),
    AddIndustry(Category, IndustryId),
    RemoveIndustry(Category, IndustryId),
    Invalidate(Vec<CacheKey>),
}

impl Call {
    pub const fn is_collection_write(&self) -> bool {
        matches!(
            self,
            Self::AddEligibility(_)
                | Self::RemoveEligibility(_)
                | Self::AddLocation(..)
                | Self::RemoveLocation(..)
                | Self::AddIndustry(..)
                | Self::RemoveIndustry(..)
        )
    }

    pub const fn is_write(&self) -> bool {
        self.is_collection_write()
            || matches!(
                self,
                Self::InsertLocation(_)
                    | Self::UpsertFullTime
                    | Self::UpsertFractional
                    | Self::UpsertWork
            )
    }
}

/// A read that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFault {
    FullTime,
    Fractional,
    Work,
    Eligibility,
    Locations(Category),
    Industries(Category),
    LocationsByIds,
}

/// Stored rows, keyed by user.
#[derive(Debug, Default)]
pub struct State {
    pub full_time: HashMap<UserId, FullTimePreferences>,
    pub fractional: HashMap<UserId, FractionalPreferences>,
    pub work: HashMap<UserId, WorkPreferences>,
    pub eligibility: HashMap<UserId, BTreeSet<CountryCode>>,
    pub locations: BTreeMap<LocationId, Location>,
    pub location_prefs: HashMap<(UserId, Category), BTreeSet<LocationId>>,
    pub industry_prefs: HashMap<(UserId, Category), BTreeSet<IndustryId>>,
    next_location_id: i64,
}

/// Pauses the first write of one kind until released.
#[derive(Debug, Default)]
pub struct Gate {
    pub reached: Notify,
    pub release: Notify,
}

impl Gate {
    async fn pass(slot: &Mutex<Option<Arc<Self>>>) {
        let gate: Option<Arc<Self>> = slot.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
    calls: Mutex<Vec<Call>>,
    read_faults: Mutex<Vec<ReadFault>>,
    fail_collection_write_at: Mutex<Option<usize>>,
    collection_writes: AtomicUsize,
    fail_lookups: Mutex<bool>,
    fail_inserts: Mutex<bool>,
    race_inserts: Mutex<bool>,
    gate: Mutex<Option<Arc<Gate>>>,
    removal_gate: Mutex<Option<Arc<Gate>>>,
    industry_catalog: Mutex<Option<BTreeSet<IndustryId>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn collection_writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(Call::is_collection_write)
            .collect()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn inserts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::InsertLocation(place_id) => Some(place_id),
                _ => None,
            })
            .collect()
    }

    pub fn fail_read(&self, fault: ReadFault) {
        self.read_faults.lock().unwrap().push(fault);
    }

    pub fn clear_faults(&self) {
        self.read_faults.lock().unwrap().clear();
        *self.fail_collection_write_at.lock().unwrap() = None;
        *self.fail_lookups.lock().unwrap() = false;
        *self.fail_inserts.lock().unwrap() = false;
        *self.race_inserts.lock().unwrap() = false;
    }

    /// Fails the `n`th junction add or remove (1-based) issued from now on.
    pub fn fail_collection_write_at(&self, n: usize) {
        self.collection_writes.store(0, Ordering::SeqCst);
        *self.fail_collection_write_at.lock().unwrap() = Some(n);
    }

    pub fn fail_place_lookups(&self) {
        *self.fail_lookups.lock().unwrap() = true;
    }

    pub fn fail_inserts(&self) {
        *self.fail_inserts.lock().unwrap() = true;
    }

    /// Makes every insert lose a race: the row appears, but the insert errors.
    pub fn race_inserts(&self) {
        *self.race_inserts.lock().unwrap() = true;
    }

    pub fn install_gate(&self) -> Arc<Gate> {
        let gate: Arc<Gate> = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Rejects industry adds outside `ids`, the way a foreign key would.
    pub fn restrict_industries(&self, ids: &[IndustryId]) {
        *self.industry_catalog.lock().unwrap() = Some(ids.iter().copied().collect());
    }

    /// Like [`Self::install_gate`], but pauses the first eligibility removal.
    pub fn install_removal_gate(&self) -> Arc<Gate> {
        let gate: Arc<Gate> = Arc::new(Gate::default());
        *self.removal_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn seed_location(&self, place_id: &str, name: &str) -> LocationId {
        self.state().store_location(&PlaceAttributes::new(place_id, name))
    }

    pub fn seed_eligibility(&self, user: &UserId, codes: &[&str]) {
        self.state()
            .eligibility
            .entry(user.clone())
            .or_default()
            .extend(codes.iter().map(|c| CountryCode::new(c).unwrap()));
    }

    pub fn seed_location_prefs(&self, user: &UserId, category: Category, ids: &[LocationId]) {
        self.state()
            .location_prefs
            .entry((user.clone(), category))
            .or_default()
            .extend(ids.iter().copied());
    }

    pub fn seed_industry_prefs(&self, user: &UserId, category: Category, ids: &[i64]) {
        self.state()
            .industry_prefs
            .entry((user.clone(), category))
            .or_default()
            .extend(ids.iter().map(|id| IndustryId::new(*id)));
    }

    pub fn eligibility_of(&self, user: &UserId) -> BTreeSet<CountryCode> {
        self.state()
            .eligibility
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    pub fn location_prefs_of(&self, user: &UserId, category: Category) -> BTreeSet<LocationId> {
        self.state()
            .location_prefs
            .get(&(user.clone(), category))
            .cloned()
            .unwrap_or_default()
    }

    pub fn industry_prefs_of(&self, user: &UserId, category: Category) -> BTreeSet<IndustryId> {
        self.state()
            .industry_prefs
            .get(&(user.clone(), category))
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_read(&self, fault: ReadFault) -> Result<(), RepositoryError> {
        if self.read_faults.lock().unwrap().contains(&fault) {
            return Err(RepositoryError::Read(format!("injected {fault:?} failure")));
        }
        Ok(())
    }

    fn check_collection_write(&self) -> Result<(), RepositoryError> {
        let n: usize = self.collection_writes.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_collection_write_at.lock().unwrap() == Some(n) {
            return Err(RepositoryError::Write(format!("injected failure on write {n}")));
        }
        Ok(())
    }
}

impl State {
    fn store_location(&mut self, place: &PlaceAttributes) -> LocationId {
        self.next_location_id += 1;
        let id: LocationId = LocationId::new(self.next_location_id);
        self.locations.insert(
            id,
            Location {
                id,
                place: place.clone(),
            },
        );
        id
    }

    fn find_by_place_id(&self, place_id: &str) -> Option<Location> {
        self.locations
            .values()
            .find(|l| l.place.place_id == place_id)
            .cloned()
    }
}

pub fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

pub fn country(code: &str) -> CountryCode {
    CountryCode::new(code).unwrap()
}

pub fn countries(codes: &[&str]) -> BTreeSet<CountryCode> {
    codes.iter().map(|c| country(c)).collect()
}

pub fn place(place_id: &str, name: &str) -> PlaceAttributes {
    PlaceAttributes::new(place_id, name)
}

#[async_trait]
impl PreferencesRepository for MemoryRepository {
    async fn get_full_time_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<FullTimePreferences>, RepositoryError> {
        self.record(Call::GetFullTime);
        self.check_read(ReadFault::FullTime)?;
        Ok(self.state().full_time.get(user).cloned())
    }

    async fn get_fractional_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<FractionalPreferences>, RepositoryError> {
        self.record(Call::GetFractional);
        self.check_read(ReadFault::Fractional)?;
        Ok(self.state().fractional.get(user).cloned())
    }

    async fn get_work_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<WorkPreferences>, RepositoryError> {
        self.record(Call::GetWork);
        self.check_read(ReadFault::Work)?;
        Ok(self.state().work.get(user).cloned())
    }

    async fn get_work_eligibility(
        &self,
        user: &UserId,
    ) -> Result<BTreeSet<CountryCode>, RepositoryError> {
        self.record(Call::GetEligibility);
        self.check_read(ReadFault::Eligibility)?;
        Ok(self.eligibility_of(user))
    }

    async fn get_location_preferences(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<LocationId>, RepositoryError> {
        self.record(Call::GetLocations(category));
        self.check_read(ReadFault::Locations(category))?;
        Ok(self.location_prefs_of(user, category))
    }

    async fn get_industry_preferences(
        &self,
        user: &UserId,
        category: Category,
    ) -> Result<BTreeSet<IndustryId>, RepositoryError> {
        self.record(Call::GetIndustries(category));
        self.check_read(ReadFault::Industries(category))?;
        Ok(self.industry_prefs_of(user, category))
    }

    async fn get_locations_by_ids(
        &self,
        ids: &[LocationId],
    ) -> Result<Vec<Location>, RepositoryError> {
        self.record(Call::GetLocationsByIds(ids.to_vec()));
        self.check_read(ReadFault::LocationsByIds)?;
        let state = self.state();
        Ok(ids
            .iter()
            .filter_map(|id| state.locations.get(id).cloned())
            .collect())
    }

    async fn find_location_by_place_id(
        &self,
        place_id: &str,
    ) -> Result<Option<Location>, RepositoryError> {
        self.record(Call::FindLocation(place_id.to_string()));
        if *self.fail_lookups.lock().unwrap() {
            return Err(RepositoryError::Unavailable("injected lookup failure".to_string()));
        }
        Ok(self.state().find_by_place_id(place_id))
    }

    async fn insert_location(&self, place: &PlaceAttributes) -> Result<LocationId, RepositoryError> {
        self.record(Call::InsertLocation(place.place_id.clone()));
        if *self.race_inserts.lock().unwrap() {
            self.state().store_location(place);
            return Err(RepositoryError::Write(format!(
                "UNIQUE constraint failed: locations.place_id ({})",
                place.place_id
            )));
        }
        if *self.fail_inserts.lock().unwrap() {
            return Err(RepositoryError::Write("injected insert failure".to_string()));
        }
        Ok(self.state().store_location(place))
    }

    async fn upsert_full_time_preferences(
        &self,
        user: &UserId,
        preferences: &FullTimePreferences,
    ) -> Result<(), RepositoryError> {
        self.record(Call::UpsertFullTime);
        Gate::pass(&self.gate).await;
        self.state()
            .full_time
            .insert(user.clone(), preferences.clone());
        Ok(())
    }

    async fn upsert_fractional_preferences(
        &self,
        user: &UserId,
        preferences: &FractionalPreferences,
    ) -> Result<(), RepositoryError> {
        self.record(Call::UpsertFractional);
        self.state()
            .fractional
            .insert(user.clone(), preferences.clone());
        Ok(())
    }

    async fn upsert_work_preferences(
        &self,
        user: &UserId,
        preferences: &WorkPreferences,
    ) -> Result<(), RepositoryError> {
        self.record(Call::UpsertWork);
        self.state().work.insert(user.clone(), preferences.clone());
        Ok(())
    }

    async fn add_eligibility(
        &self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), RepositoryError> {
        self.record(Call::AddEligibility(country.to_string()));
        self.check_collection_write()?;
        self.state()
            .eligibility
            .entry(user.clone())
            .or_default()
            .insert(country.clone());
        Ok(())
    }

    async fn remove_eligibility(
        &self,
        user: &UserId,
        country: &CountryCode,
    ) -> Result<(), RepositoryError> {
        self.record(Call::RemoveEligibility(country.to_string()));
        Gate::pass(&self.removal_gate).await;
        self.check_collection_write()?;
        if let Some(set) = self.state().eligibility.get_mut(user) {
            set.remove(country);
        }
        Ok(())
    }

    async fn add_location_preference(
        &self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), RepositoryError> {
        self.record(Call::AddLocation(category, location));
        self.check_collection_write()?;
        self.state()
            .location_prefs
            .entry((user.clone(), category))
            .or_default()
            .insert(location);
        Ok(())
    }

    async fn remove_location_preference(
        &self,
        user: &UserId,
        category: Category,
        location: LocationId,
    ) -> Result<(), RepositoryError> {
        self.record(Call::RemoveLocation(category, location));
        self.check_collection_write()?;
        if let Some(set) = self
            .state()
            .location_prefs
            .get_mut(&(user.clone(), category))
        {
            set.remove(&location);
        }
        Ok(())
    }

    async fn add_industry_preference(
        &self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), RepositoryError> {
        self.record(Call::AddIndustry(category, industry));
        self.check_collection_write()?;
        let known: bool = self
            .industry_catalog
            .lock()
            .unwrap()
            .as_ref()
            .is_none_or(|catalog| catalog.contains(&industry));
        if !known {
            return Err(RepositoryError::UnknownReference(format!(
                "no industry {industry}"
            )));
        }
        self.state()
            .industry_prefs
            .entry((user.clone(), category))
            .or_default()
            .insert(industry);
        Ok(())
    }

    async fn remove_industry_preference(
        &self,
        user: &UserId,
        category: Category,
        industry: IndustryId,
    ) -> Result<(), RepositoryError> {
        self.record(Call::RemoveIndustry(category, industry));
        self.check_collection_write()?;
        if let Some(set) = self
            .state()
            .industry_prefs
            .get_mut(&(user.clone(), category))
        {
            set.remove(&industry);
        }
        Ok(())
    }

    async fn invalidate(&self, keys: &[CacheKey]) {
        self.record(Call::Invalidate(keys.to_vec()));
    }
}
