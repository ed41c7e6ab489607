// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Building the combined form from independent reads.
//!
//! Loading happens in two stages. The four preference sources are fetched
//! concurrently and joined; then the location ids they reference are turned
//! into location objects with one batch lookup. [`PreferenceFormState`]
//! consumes the resulting [`HydrationInputs`] and builds its form exactly once.

use futures::try_join;
use onboard_domain::{
    Category, CombinedWorkPreferencesForm, CountryCode, FractionalPreferences, FractionalSection,
    FullTimePreferences, FullTimeSection, GeneralSection, IndustryId, Location, LocationId,
    LocationRef, UserId, WorkPreferences,
};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use tracing::{debug, info, warn};

use crate::error::{ReadError, ReadSource, RepositoryError};
use crate::repository::PreferencesRepository;

/// The state of one hydration source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceState<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(ReadError),
}

impl<T> SourceState<T> {
    /// Wraps a repository result, tagging failures with their source.
    pub fn from_result(result: Result<T, RepositoryError>, origin: ReadSource) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(ReadError::new(origin, &err)),
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ReadError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// A category's scalar row plus its junction rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySnapshot<P> {
    pub preferences: Option<P>,
    pub location_ids: BTreeSet<LocationId>,
    pub industry_ids: BTreeSet<IndustryId>,
}

impl<P> Default for CategorySnapshot<P> {
    fn default() -> Self {
        Self {
            preferences: None,
            location_ids: BTreeSet::new(),
            industry_ids: BTreeSet::new(),
        }
    }
}

/// The five sources a form is hydrated from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HydrationInputs {
    pub full_time: SourceState<CategorySnapshot<FullTimePreferences>>,
    pub fractional: SourceState<CategorySnapshot<FractionalPreferences>>,
    pub general: SourceState<Option<WorkPreferences>>,
    pub eligibility: SourceState<BTreeSet<CountryCode>>,
    /// Details of every location referenced by the other sources.
    pub locations: SourceState<Vec<Location>>,
}

impl HydrationInputs {
    /// Inputs with every source still loading.
    #[must_use]
    pub fn loading() -> Self {
        Self::default()
    }

    /// Returns `true` once no source is loading.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !(self.full_time.is_loading()
            || self.fractional.is_loading()
            || self.general.is_loading()
            || self.eligibility.is_loading()
            || self.locations.is_loading())
    }

    /// The first failure, in source declaration order.
    #[must_use]
    pub fn first_error(&self) -> Option<&ReadError> {
        self.full_time
            .error()
            .or_else(|| self.fractional.error())
            .or_else(|| self.general.error())
            .or_else(|| self.eligibility.error())
            .or_else(|| self.locations.error())
    }

    /// Location ids referenced by the loaded category and general sources.
    #[must_use]
    pub fn referenced_location_ids(&self) -> BTreeSet<LocationId> {
        let mut ids: BTreeSet<LocationId> = BTreeSet::new();
        if let Some(snapshot) = self.full_time.ready() {
            ids.extend(snapshot.location_ids.iter().copied());
        }
        if let Some(snapshot) = self.fractional.ready() {
            ids.extend(snapshot.location_ids.iter().copied());
        }
        if let Some(Some(general)) = self.general.ready()
            && let Some(id) = general.current_location_id
        {
            ids.insert(id);
        }
        ids
    }
}

async fn load_category<R, P, F>(
    repo: &R,
    user: &UserId,
    category: Category,
    preferences: F,
) -> Result<CategorySnapshot<P>, RepositoryError>
where
    R: PreferencesRepository + ?Sized,
    F: Future<Output = Result<Option<P>, RepositoryError>>,
{
    let (preferences, location_ids, industry_ids) = try_join!(
        preferences,
        repo.get_location_preferences(user, category),
        repo.get_industry_preferences(user, category),
    )?;
    Ok(CategorySnapshot {
        preferences,
        location_ids,
        industry_ids,
    })
}

/// Loads every hydration source for a user.
///
/// The four preference sources are fetched concurrently and joined before the
/// location lookup runs. Failures are captured per source, never returned.
pub async fn load_hydration_inputs<R>(repo: &R, user: &UserId) -> HydrationInputs
where
    R: PreferencesRepository + ?Sized,
{
    debug!(user = %user, "Loading work preference sources");

    let (full_time, fractional, general, eligibility) = futures::join!(
        load_category(
            repo,
            user,
            Category::FullTime,
            repo.get_full_time_preferences(user)
        ),
        load_category(
            repo,
            user,
            Category::Fractional,
            repo.get_fractional_preferences(user)
        ),
        repo.get_work_preferences(user),
        repo.get_work_eligibility(user),
    );

    let mut inputs: HydrationInputs = HydrationInputs {
        full_time: SourceState::from_result(full_time, ReadSource::FullTime),
        fractional: SourceState::from_result(fractional, ReadSource::Fractional),
        general: SourceState::from_result(general, ReadSource::General),
        eligibility: SourceState::from_result(eligibility, ReadSource::Eligibility),
        locations: SourceState::Loading,
    };

    let ids: Vec<LocationId> = inputs.referenced_location_ids().into_iter().collect();
    inputs.locations = if ids.is_empty() {
        SourceState::Ready(Vec::new())
    } else {
        SourceState::from_result(repo.get_locations_by_ids(&ids).await, ReadSource::Locations)
    };

    if let Some(err) = inputs.first_error() {
        warn!(user = %user, error = %err, "Work preference source failed to load");
    }

    inputs
}

fn location_refs(
    ids: &BTreeSet<LocationId>,
    details: &HashMap<LocationId, &Location>,
) -> Vec<LocationRef> {
    ids.iter()
        .map(|id| {
            details.get(id).map_or_else(
                || LocationRef::from_id(*id),
                |location| LocationRef::from((*location).clone()),
            )
        })
        .collect()
}

/// Builds a form from loaded sources.
///
/// Absent rows produce default sections; ids without details produce
/// references without details.
#[must_use]
pub fn build_form(
    full_time: &CategorySnapshot<FullTimePreferences>,
    fractional: &CategorySnapshot<FractionalPreferences>,
    general: Option<&WorkPreferences>,
    eligibility: &BTreeSet<CountryCode>,
    locations: &[Location],
) -> CombinedWorkPreferencesForm {
    let details: HashMap<LocationId, &Location> = locations.iter().map(|l| (l.id, l)).collect();

    let current_location: Option<LocationRef> = general
        .and_then(|g| g.current_location_id)
        .map(|id| {
            details.get(&id).map_or_else(
                || LocationRef::from_id(id),
                |location| LocationRef::from((*location).clone()),
            )
        });

    CombinedWorkPreferencesForm {
        full_time: FullTimeSection {
            preferences: full_time.preferences.clone().unwrap_or_default(),
            locations: location_refs(&full_time.location_ids, &details),
            industries: full_time.industry_ids.iter().copied().collect(),
        },
        fractional: FractionalSection {
            preferences: fractional.preferences.clone().unwrap_or_default(),
            locations: location_refs(&fractional.location_ids, &details),
            industries: fractional.industry_ids.iter().copied().collect(),
        },
        general: GeneralSection {
            current_location,
            timezone: general.and_then(|g| g.timezone.clone()),
            work_eligibility: eligibility.iter().cloned().collect(),
        },
    }
}

/// Where a [`PreferenceFormState`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationStatus {
    /// Waiting for sources to settle.
    Pending,
    /// A source failed; the form holds defaults.
    Failed,
    /// The form was built from the sources.
    Hydrated,
}

/// The editable work-preferences form and its hydration guard.
#[derive(Debug, Clone, Default)]
pub struct PreferenceFormState {
    initialized: bool,
    form: CombinedWorkPreferencesForm,
    error: Option<ReadError>,
}

impl PreferenceFormState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the latest source states into the form.
    ///
    /// The aggregate error always tracks the first failing source. The form is
    /// built only when every source has settled without error, and only once;
    /// later calls leave it untouched until [`Self::reset`].
    ///
    /// Returns `true` if this call hydrated the form.
    pub fn observe(&mut self, inputs: &HydrationInputs) -> bool {
        self.error = inputs.first_error().cloned();

        if self.initialized || self.error.is_some() {
            return false;
        }

        let (
            SourceState::Ready(full_time),
            SourceState::Ready(fractional),
            SourceState::Ready(general),
            SourceState::Ready(eligibility),
            SourceState::Ready(locations),
        ) = (
            &inputs.full_time,
            &inputs.fractional,
            &inputs.general,
            &inputs.eligibility,
            &inputs.locations,
        )
        else {
            return false;
        };

        self.form = build_form(
            full_time,
            fractional,
            general.as_ref(),
            eligibility,
            locations,
        );
        self.initialized = true;
        info!("Work preferences form hydrated");
        true
    }

    /// Forgets the hydrated form so the next settled inputs hydrate again.
    pub fn reset(&mut self) {
        self.initialized = false;
        self.form = CombinedWorkPreferencesForm::default();
        self.error = None;
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub const fn status(&self) -> HydrationStatus {
        if self.initialized {
            HydrationStatus::Hydrated
        } else if self.error.is_some() {
            HydrationStatus::Failed
        } else {
            HydrationStatus::Pending
        }
    }

    /// The first error among the sources, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ReadError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn form(&self) -> &CombinedWorkPreferencesForm {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut CombinedWorkPreferencesForm {
        &mut self.form
    }

    /// Sets the current location from a bare id or a picked place.
    pub fn set_current_location(&mut self, location: Option<LocationRef>) {
        self.form.set_current_location(location);
    }

    #[must_use]
    pub fn into_form(self) -> CombinedWorkPreferencesForm {
        self.form
    }
}
