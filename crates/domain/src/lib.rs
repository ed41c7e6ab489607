// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod diff;
mod error;
mod form;
mod location;
mod preferences;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use diff::SetDiff;
pub use error::DomainError;
pub use form::{CombinedWorkPreferencesForm, FractionalSection, FullTimeSection, GeneralSection};
pub use location::{Location, LocationRef, PlaceAttributes};
pub use preferences::{
    FractionalPreferences, FullTimePreferences, WorkPreferences, format_date, parse_date,
};
pub use types::{Category, CountryCode, Industry, IndustryId, LocationId, PaymentType, UserId};
pub use validation::{
    validate_form, validate_fractional_preferences, validate_full_time_preferences,
    validate_place, validate_timezone,
};
