// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The combined, denormalized work-preferences form.
//!
//! The form is never persisted as a whole. It is rebuilt from the normalized
//! relations on every load and written back relation by relation.

use crate::location::LocationRef;
use crate::preferences::{FractionalPreferences, FullTimePreferences};
use crate::types::{Category, CountryCode, IndustryId};
use serde::{Deserialize, Serialize};

/// The full-time track of the form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FullTimeSection {
    #[serde(default)]
    pub preferences: FullTimePreferences,
    #[serde(default)]
    pub locations: Vec<LocationRef>,
    #[serde(default)]
    pub industries: Vec<IndustryId>,
}

/// The fractional track of the form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FractionalSection {
    #[serde(default)]
    pub preferences: FractionalPreferences,
    #[serde(default)]
    pub locations: Vec<LocationRef>,
    #[serde(default)]
    pub industries: Vec<IndustryId>,
}

/// Fields shared by both tracks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneralSection {
    #[serde(default)]
    pub current_location: Option<LocationRef>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub work_eligibility: Vec<CountryCode>,
}

/// All of a candidate's work preferences in one editable structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CombinedWorkPreferencesForm {
    #[serde(default)]
    pub full_time: FullTimeSection,
    #[serde(default)]
    pub fractional: FractionalSection,
    #[serde(default)]
    pub general: GeneralSection,
}

impl CombinedWorkPreferencesForm {
    /// Returns the location list for a category.
    #[must_use]
    pub fn locations(&self, category: Category) -> &[LocationRef] {
        match category {
            Category::FullTime => &self.full_time.locations,
            Category::Fractional => &self.fractional.locations,
        }
    }

    fn locations_mut(&mut self, category: Category) -> &mut Vec<LocationRef> {
        match category {
            Category::FullTime => &mut self.full_time.locations,
            Category::Fractional => &mut self.fractional.locations,
        }
    }

    /// Returns the industry list for a category.
    #[must_use]
    pub fn industries(&self, category: Category) -> &[IndustryId] {
        match category {
            Category::FullTime => &self.full_time.industries,
            Category::Fractional => &self.fractional.industries,
        }
    }

    /// Sets the current location.
    ///
    /// A bare internal id produces a resolved reference without details; a
    /// place produces an unresolved reference that save will upsert. The id
    /// and the details always change together.
    pub fn set_current_location(&mut self, location: Option<LocationRef>) {
        self.general.current_location = location;
    }

    /// Adds a location to a category unless it is already present.
    ///
    /// Returns `true` if the list changed.
    pub fn add_location(&mut self, category: Category, location: LocationRef) -> bool {
        let locations: &mut Vec<LocationRef> = self.locations_mut(category);
        if locations.iter().any(|l| l.same_location(&location)) {
            return false;
        }
        locations.push(location);
        true
    }

    /// Removes every entry denoting the given location from a category.
    ///
    /// Returns `true` if the list changed.
    pub fn remove_location(&mut self, category: Category, location: &LocationRef) -> bool {
        let locations: &mut Vec<LocationRef> = self.locations_mut(category);
        let before: usize = locations.len();
        locations.retain(|l| !l.same_location(location));
        locations.len() != before
    }

    /// Replaces the industry list for a category, dropping duplicates.
    pub fn set_industries(&mut self, category: Category, industries: &[IndustryId]) {
        let mut deduped: Vec<IndustryId> = Vec::with_capacity(industries.len());
        for industry in industries {
            if !deduped.contains(industry) {
                deduped.push(*industry);
            }
        }
        match category {
            Category::FullTime => self.full_time.industries = deduped,
            Category::Fractional => self.fractional.industries = deduped,
        }
    }

    /// Marks the candidate as eligible to work in a country.
    ///
    /// Returns `true` if the list changed.
    pub fn add_eligibility(&mut self, country: CountryCode) -> bool {
        if self.general.work_eligibility.contains(&country) {
            return false;
        }
        self.general.work_eligibility.push(country);
        true
    }

    /// Removes a country from the eligibility list.
    ///
    /// Returns `true` if the list changed.
    pub fn remove_eligibility(&mut self, country: &CountryCode) -> bool {
        let before: usize = self.general.work_eligibility.len();
        self.general.work_eligibility.retain(|c| c != country);
        self.general.work_eligibility.len() != before
    }
}
