// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Saving a combined form back to the normalized relations.
//!
//! A save runs as ordered stages:
//!
//! 1. Validate the form. Nothing is written if this fails.
//! 2. Read the current junction ids of all five collection relations
//!    concurrently.
//! 3. Resolve location references to internal ids, inserting unknown places.
//!    Every junction add that needs a resolved id happens after this stage.
//! 4. Build a [`SavePlan`]: whole-row upserts for the three scalar rows, plus
//!    a [`SetDiff`] per collection relation.
//! 5. Apply the plan one operation at a time. The first failure stops the
//!    save; operations already applied stay applied.
//! 6. Invalidate every cache bucket the core reads from.
//!
//! Because each relation is diffed against fresh state, re-running a save
//! after a partial failure issues only the operations that did not land.
//! This holds even when a save future is dropped between writes: the next
//! save on the same reconciler drops the cache before reading.

use futures::try_join;
use onboard_domain::{
    Category, CombinedWorkPreferencesForm, CountryCode, FractionalPreferences,
    FullTimePreferences, IndustryId, LocationId, SetDiff, UserId, WorkPreferences, validate_form,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

use crate::cache::CacheKey;
use crate::error::{CoreError, ReadError, ReadSource, RepositoryError};
use crate::repository::PreferencesRepository;
use crate::resolve::LocationResolver;

/// The persisted ids of every collection relation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrentSnapshot {
    pub eligibility: BTreeSet<CountryCode>,
    pub full_time_locations: BTreeSet<LocationId>,
    pub fractional_locations: BTreeSet<LocationId>,
    pub full_time_industries: BTreeSet<IndustryId>,
    pub fractional_industries: BTreeSet<IndustryId>,
}

impl CurrentSnapshot {
    /// Reads the current ids of every collection relation concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first read failure.
    pub async fn load<R>(repo: &R, user: &UserId) -> Result<Self, CoreError>
    where
        R: PreferencesRepository + ?Sized,
    {
        let tag = |origin: ReadSource| move |e: RepositoryError| ReadError::new(origin, &e);

        let (
            eligibility,
            full_time_locations,
            fractional_locations,
            full_time_industries,
            fractional_industries,
        ) = try_join!(
            async {
                repo.get_work_eligibility(user)
                    .await
                    .map_err(tag(ReadSource::Eligibility))
            },
            async {
                repo.get_location_preferences(user, Category::FullTime)
                    .await
                    .map_err(tag(ReadSource::FullTime))
            },
            async {
                repo.get_location_preferences(user, Category::Fractional)
                    .await
                    .map_err(tag(ReadSource::Fractional))
            },
            async {
                repo.get_industry_preferences(user, Category::FullTime)
                    .await
                    .map_err(tag(ReadSource::FullTime))
            },
            async {
                repo.get_industry_preferences(user, Category::Fractional)
                    .await
                    .map_err(tag(ReadSource::Fractional))
            },
        )?;

        Ok(Self {
            eligibility,
            full_time_locations,
            fractional_locations,
            full_time_industries,
            fractional_industries,
        })
    }

    const fn locations(&self, category: Category) -> &BTreeSet<LocationId> {
        match category {
            Category::FullTime => &self.full_time_locations,
            Category::Fractional => &self.fractional_locations,
        }
    }

    const fn industries(&self, category: Category) -> &BTreeSet<IndustryId> {
        match category {
            Category::FullTime => &self.full_time_industries,
            Category::Fractional => &self.fractional_industries,
        }
    }
}

/// Internal ids of every location the form refers to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedLocations {
    pub full_time: BTreeSet<LocationId>,
    pub fractional: BTreeSet<LocationId>,
    pub current: Option<LocationId>,
}

impl ResolvedLocations {
    /// Resolves the form's location lists and current location.
    ///
    /// # Errors
    ///
    /// Returns the first resolution failure.
    pub async fn resolve<R>(
        resolver: &mut LocationResolver<'_, R>,
        form: &CombinedWorkPreferencesForm,
    ) -> Result<Self, CoreError>
    where
        R: PreferencesRepository + ?Sized,
    {
        let full_time: Vec<LocationId> = resolver
            .resolve_all(form.locations(Category::FullTime))
            .await?;
        let fractional: Vec<LocationId> = resolver
            .resolve_all(form.locations(Category::Fractional))
            .await?;
        let current: Option<LocationId> = match &form.general.current_location {
            Some(location) => Some(resolver.resolve(location).await?),
            None => None,
        };
        Ok(Self {
            full_time: full_time.into_iter().collect(),
            fractional: fractional.into_iter().collect(),
            current,
        })
    }

    const fn for_category(&self, category: Category) -> &BTreeSet<LocationId> {
        match category {
            Category::FullTime => &self.full_time,
            Category::Fractional => &self.fractional,
        }
    }
}

/// One repository write issued by a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SaveOperation {
    UpsertFullTimePreferences,
    UpsertFractionalPreferences,
    UpsertWorkPreferences,
    AddEligibility {
        country: CountryCode,
    },
    RemoveEligibility {
        country: CountryCode,
    },
    AddLocation {
        category: Category,
        location: LocationId,
    },
    RemoveLocation {
        category: Category,
        location: LocationId,
    },
    AddIndustry {
        category: Category,
        industry: IndustryId,
    },
    RemoveIndustry {
        category: Category,
        industry: IndustryId,
    },
}

impl SaveOperation {
    /// Returns `true` for junction adds and removes, `false` for row upserts.
    #[must_use]
    pub const fn is_collection_change(&self) -> bool {
        !matches!(
            self,
            Self::UpsertFullTimePreferences
                | Self::UpsertFractionalPreferences
                | Self::UpsertWorkPreferences
        )
    }
}

impl std::fmt::Display for SaveOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpsertFullTimePreferences => write!(f, "upsert full-time preferences"),
            Self::UpsertFractionalPreferences => write!(f, "upsert fractional preferences"),
            Self::UpsertWorkPreferences => write!(f, "upsert work preferences"),
            Self::AddEligibility { country } => write!(f, "add work eligibility {country}"),
            Self::RemoveEligibility { country } => {
                write!(f, "remove work eligibility {country}")
            }
            Self::AddLocation { category, location } => {
                write!(f, "add {category} location {location}")
            }
            Self::RemoveLocation { category, location } => {
                write!(f, "remove {category} location {location}")
            }
            Self::AddIndustry { category, industry } => {
                write!(f, "add {category} industry {industry}")
            }
            Self::RemoveIndustry { category, industry } => {
                write!(f, "remove {category} industry {industry}")
            }
        }
    }
}

/// Everything a save will write, computed before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlan {
    pub full_time: FullTimePreferences,
    pub fractional: FractionalPreferences,
    pub general: WorkPreferences,
    pub eligibility: SetDiff<CountryCode>,
    pub full_time_locations: SetDiff<LocationId>,
    pub fractional_locations: SetDiff<LocationId>,
    pub full_time_industries: SetDiff<IndustryId>,
    pub fractional_industries: SetDiff<IndustryId>,
}

impl SavePlan {
    /// Diffs the form against the current snapshot.
    #[must_use]
    pub fn build(
        form: &CombinedWorkPreferencesForm,
        current: &CurrentSnapshot,
        resolved: &ResolvedLocations,
    ) -> Self {
        let desired_eligibility: BTreeSet<CountryCode> =
            form.general.work_eligibility.iter().cloned().collect();
        let desired_industries = |category: Category| -> BTreeSet<IndustryId> {
            form.industries(category).iter().copied().collect()
        };

        Self {
            full_time: form.full_time.preferences.clone(),
            fractional: form.fractional.preferences.clone(),
            general: WorkPreferences {
                current_location_id: resolved.current,
                timezone: form.general.timezone.clone(),
            },
            eligibility: SetDiff::between(&current.eligibility, &desired_eligibility),
            full_time_locations: SetDiff::between(
                current.locations(Category::FullTime),
                resolved.for_category(Category::FullTime),
            ),
            fractional_locations: SetDiff::between(
                current.locations(Category::Fractional),
                resolved.for_category(Category::Fractional),
            ),
            full_time_industries: SetDiff::between(
                current.industries(Category::FullTime),
                &desired_industries(Category::FullTime),
            ),
            fractional_industries: SetDiff::between(
                current.industries(Category::Fractional),
                &desired_industries(Category::Fractional),
            ),
        }
    }

    const fn locations(&self, category: Category) -> &SetDiff<LocationId> {
        match category {
            Category::FullTime => &self.full_time_locations,
            Category::Fractional => &self.fractional_locations,
        }
    }

    const fn industries(&self, category: Category) -> &SetDiff<IndustryId> {
        match category {
            Category::FullTime => &self.full_time_industries,
            Category::Fractional => &self.fractional_industries,
        }
    }

    /// Number of junction adds and removes in the plan.
    #[must_use]
    pub fn collection_change_count(&self) -> usize {
        self.eligibility.len()
            + self.full_time_locations.len()
            + self.fractional_locations.len()
            + self.full_time_industries.len()
            + self.fractional_industries.len()
    }

    /// The plan as an ordered list of writes.
    ///
    /// Row upserts come first, then each relation's adds followed by its
    /// removes.
    #[must_use]
    pub fn operations(&self) -> Vec<SaveOperation> {
        let mut ops: Vec<SaveOperation> = vec![
            SaveOperation::UpsertFullTimePreferences,
            SaveOperation::UpsertFractionalPreferences,
            SaveOperation::UpsertWorkPreferences,
        ];

        ops.extend(
            self.eligibility
                .to_add
                .iter()
                .map(|country| SaveOperation::AddEligibility {
                    country: country.clone(),
                }),
        );
        ops.extend(
            self.eligibility
                .to_remove
                .iter()
                .map(|country| SaveOperation::RemoveEligibility {
                    country: country.clone(),
                }),
        );

        for category in Category::ALL {
            let locations: &SetDiff<LocationId> = self.locations(category);
            ops.extend(
                locations
                    .to_add
                    .iter()
                    .map(|&location| SaveOperation::AddLocation { category, location }),
            );
            ops.extend(
                locations
                    .to_remove
                    .iter()
                    .map(|&location| SaveOperation::RemoveLocation { category, location }),
            );

            let industries: &SetDiff<IndustryId> = self.industries(category);
            ops.extend(
                industries
                    .to_add
                    .iter()
                    .map(|&industry| SaveOperation::AddIndustry { category, industry }),
            );
            ops.extend(
                industries
                    .to_remove
                    .iter()
                    .map(|&industry| SaveOperation::RemoveIndustry { category, industry }),
            );
        }

        ops
    }
}

/// The outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SaveReport {
    /// Writes issued, in order.
    pub operations: Vec<SaveOperation>,
    /// Location rows inserted while resolving places.
    pub inserted_locations: usize,
}

impl SaveReport {
    /// Number of junction adds and removes issued.
    #[must_use]
    pub fn collection_changes(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| op.is_collection_change())
            .count()
    }
}

async fn apply_operation<R>(
    repo: &R,
    user: &UserId,
    plan: &SavePlan,
    op: &SaveOperation,
) -> Result<(), RepositoryError>
where
    R: PreferencesRepository + ?Sized,
{
    match op {
        SaveOperation::UpsertFullTimePreferences => {
            repo.upsert_full_time_preferences(user, &plan.full_time)
                .await
        }
        SaveOperation::UpsertFractionalPreferences => {
            repo.upsert_fractional_preferences(user, &plan.fractional)
                .await
        }
        SaveOperation::UpsertWorkPreferences => {
            repo.upsert_work_preferences(user, &plan.general).await
        }
        SaveOperation::AddEligibility { country } => repo.add_eligibility(user, country).await,
        SaveOperation::RemoveEligibility { country } => {
            repo.remove_eligibility(user, country).await
        }
        SaveOperation::AddLocation { category, location } => {
            repo.add_location_preference(user, *category, *location)
                .await
        }
        SaveOperation::RemoveLocation { category, location } => {
            repo.remove_location_preference(user, *category, *location)
                .await
        }
        SaveOperation::AddIndustry { category, industry } => {
            repo.add_industry_preference(user, *category, *industry)
                .await
        }
        SaveOperation::RemoveIndustry { category, industry } => {
            repo.remove_industry_preference(user, *category, *industry)
                .await
        }
    }
}

/// Clears the saving flag when a save finishes or its future is dropped.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Saves combined forms, one at a time.
///
/// State machine: idle → saving → idle. A second save started while one is
/// in flight is rejected with [`CoreError::SaveInProgress`] rather than queued.
#[derive(Debug, Default)]
pub struct PreferenceReconciler {
    saving: AtomicBool,
    /// Set while writes may have landed that the cache has not seen yet.
    /// Still set at the start of a save only if an earlier one was dropped
    /// mid-flight.
    stale_cache: AtomicBool,
    last_error: Mutex<Option<CoreError>>,
    last_applied: Mutex<Vec<SaveOperation>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PreferenceReconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a save is in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// The error of the most recent save, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<CoreError> {
        lock(&self.last_error).clone()
    }

    /// Writes applied by the most recent save, including a failed one.
    #[must_use]
    pub fn last_applied(&self) -> Vec<SaveOperation> {
        lock(&self.last_applied).clone()
    }

    /// Saves a form for a user.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`CoreError::SaveInProgress`] if another save is in flight
    /// - [`CoreError::Validation`] if the form is invalid
    /// - [`CoreError::Read`] if the current snapshot cannot be read
    /// - [`CoreError::Resolution`] if a place cannot be resolved
    /// - [`CoreError::UnknownReference`] if a write names an unknown id
    /// - [`CoreError::Write`] if any other write fails
    pub async fn save<R>(
        &self,
        repo: &R,
        user: &UserId,
        form: &CombinedWorkPreferencesForm,
    ) -> Result<SaveReport, CoreError>
    where
        R: PreferencesRepository + ?Sized,
    {
        if self
            .saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CoreError::SaveInProgress);
        }
        let _guard: SavingGuard<'_> = SavingGuard(&self.saving);

        *lock(&self.last_error) = None;
        lock(&self.last_applied).clear();

        info!(user = %user, "Saving work preferences");

        if self.stale_cache.load(Ordering::Acquire) {
            warn!(user = %user, "Previous save was interrupted, dropping cached reads");
            repo.invalidate(&CacheKey::ALL).await;
            self.stale_cache.store(false, Ordering::Release);
        }

        let mut report: SaveReport = SaveReport::default();
        let result: Result<(), CoreError> =
            run_save(repo, user, form, &self.stale_cache, &mut report).await;

        *lock(&self.last_applied) = report.operations.clone();

        match result {
            Ok(()) => {
                repo.invalidate(&CacheKey::ALL).await;
                self.stale_cache.store(false, Ordering::Release);
                info!(
                    user = %user,
                    operations = report.operations.len(),
                    inserted_locations = report.inserted_locations,
                    "Work preferences saved"
                );
                Ok(report)
            }
            Err(err) => {
                // Writes that landed are not rolled back; drop cached reads so
                // a retry diffs against what is actually stored.
                if !report.operations.is_empty() || report.inserted_locations > 0 {
                    repo.invalidate(&CacheKey::ALL).await;
                }
                self.stale_cache.store(false, Ordering::Release);
                error!(
                    user = %user,
                    error = %err,
                    applied = report.operations.len(),
                    "Saving work preferences failed"
                );
                *lock(&self.last_error) = Some(err.clone());
                Err(err)
            }
        }
    }
}

fn write_error(op: &SaveOperation, err: RepositoryError) -> CoreError {
    match err {
        RepositoryError::UnknownReference(message) => CoreError::UnknownReference {
            operation: op.to_string(),
            message,
        },
        other => CoreError::Write {
            operation: op.to_string(),
            message: other.to_string(),
        },
    }
}

async fn run_save<R>(
    repo: &R,
    user: &UserId,
    form: &CombinedWorkPreferencesForm,
    stale_cache: &AtomicBool,
    report: &mut SaveReport,
) -> Result<(), CoreError>
where
    R: PreferencesRepository + ?Sized,
{
    validate_form(form)?;

    let current: CurrentSnapshot = CurrentSnapshot::load(repo, user).await?;

    // Resolution may insert places. From here on, dropping this future can
    // leave the cache behind the store.
    stale_cache.store(true, Ordering::Release);

    let mut resolver: LocationResolver<'_, R> = LocationResolver::new(repo);
    let resolved: Result<ResolvedLocations, CoreError> =
        ResolvedLocations::resolve(&mut resolver, form).await;
    report.inserted_locations = resolver.inserted();
    let resolved: ResolvedLocations = resolved?;

    let plan: SavePlan = SavePlan::build(form, &current, &resolved);
    debug!(
        user = %user,
        collection_changes = plan.collection_change_count(),
        "Save plan built"
    );

    for op in plan.operations() {
        apply_operation(repo, user, &plan, &op)
            .await
            .map_err(|e| write_error(&op, e))?;
        debug!(user = %user, operation = %op, "Applied");
        report.operations.push(op);
    }

    Ok(())
}
