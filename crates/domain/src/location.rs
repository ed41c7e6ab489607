// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Locations and references to them.
//!
//! A location is keyed externally by the geocoder's `place_id` and internally
//! by a [`LocationId`] assigned on first insert. Form fields that point at a
//! location hold a [`LocationRef`], which records whether the internal id is
//! already known or the place still has to be resolved before it can be
//! linked.

use crate::types::LocationId;
use serde::{Deserialize, Serialize};

/// Attributes of a place as returned by the geocoder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceAttributes {
    /// External place identifier. Unique across all locations.
    pub place_id: String,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// State or province.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Place-type tags (e.g. `locality`, `country`).
    #[serde(default)]
    pub place_types: Vec<String>,
}

impl PlaceAttributes {
    /// Creates place attributes with only the identifying fields set.
    #[must_use]
    pub fn new(place_id: &str, name: &str) -> Self {
        Self {
            place_id: place_id.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// A persisted location row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    #[serde(flatten)]
    pub place: PlaceAttributes,
}

/// A reference to a location held by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationRef {
    /// The internal id is known. `place` carries display details when they
    /// were available (e.g. after hydration).
    Resolved {
        id: LocationId,
        #[serde(default)]
        place: Option<PlaceAttributes>,
    },
    /// A place that may not have a location row yet.
    Unresolved(PlaceAttributes),
}

impl LocationRef {
    /// A reference to an already-known internal id without display details.
    #[must_use]
    pub const fn from_id(id: LocationId) -> Self {
        Self::Resolved { id, place: None }
    }

    /// Returns the internal id if it is already known.
    #[must_use]
    pub const fn id(&self) -> Option<LocationId> {
        match self {
            Self::Resolved { id, .. } => Some(*id),
            Self::Unresolved(_) => None,
        }
    }

    /// Returns the place details if present.
    #[must_use]
    pub const fn place(&self) -> Option<&PlaceAttributes> {
        match self {
            Self::Resolved { place, .. } => place.as_ref(),
            Self::Unresolved(place) => Some(place),
        }
    }

    /// Returns `true` if both references denote the same location.
    ///
    /// Two references match when their internal ids are equal, or when both
    /// carry place details with the same external place id.
    #[must_use]
    pub fn same_location(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.id(), other.id()) {
            return a == b;
        }
        match (self.place(), other.place()) {
            (Some(a), Some(b)) => a.place_id == b.place_id,
            _ => false,
        }
    }
}

impl From<Location> for LocationRef {
    fn from(location: Location) -> Self {
        Self::Resolved {
            id: location.id,
            place: Some(location.place),
        }
    }
}

impl From<PlaceAttributes> for LocationRef {
    fn from(place: PlaceAttributes) -> Self {
        Self::Unresolved(place)
    }
}
