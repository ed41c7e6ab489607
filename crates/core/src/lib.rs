// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Combined work-preferences synchronization.
//!
//! A candidate edits one denormalized [`CombinedWorkPreferencesForm`], while
//! storage keeps the same information in several normalized relations. This
//! crate moves data between the two:
//!
//! - [`load_hydration_inputs`] and [`PreferenceFormState`] build the form once
//!   from independent reads.
//! - [`PreferenceReconciler`] diffs the form against storage and issues the
//!   minimal adds and removes per relation.
//!
//! Storage is reached only through the [`PreferencesRepository`] port.
//!
//! [`CombinedWorkPreferencesForm`]: onboard_domain::CombinedWorkPreferencesForm

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
#![allow(clippy::multiple_crate_versions)]

mod cache;
mod error;
mod hydration;
mod reconcile;
mod repository;
mod resolve;

#[cfg(test)]
mod tests;

pub use cache::{CacheKey, CachedRepository, QueryCache};
pub use error::{CoreError, ReadError, ReadSource, RepositoryError};
pub use hydration::{
    CategorySnapshot, HydrationInputs, HydrationStatus, PreferenceFormState, SourceState,
    build_form, load_hydration_inputs,
};
pub use reconcile::{
    CurrentSnapshot, PreferenceReconciler, ResolvedLocations, SaveOperation, SavePlan, SaveReport,
};
pub use repository::PreferencesRepository;
pub use resolve::LocationResolver;
