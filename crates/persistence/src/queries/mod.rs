// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `preferences`: the three one-row-per-user preference tables
//! - `collections`: eligibility, location and industry junction rows
//! - `locations`: location lookups by internal or external id
//! - `industries`: the industry catalog

pub mod collections;
pub mod industries;
pub mod locations;
pub mod preferences;
