// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Set reconciliation.
//!
//! Collection relations are never overwritten wholesale. Saving computes the
//! difference between the persisted ids and the ids implied by the form and
//! issues one add or remove per element of that difference.
//!
//! For any finite `current` and `desired`:
//! - `to_add` and `to_remove` are disjoint
//! - `current ∪ to_add − to_remove == desired`

use serde::Serialize;
use std::collections::BTreeSet;

/// The minimal changes that turn one id set into another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetDiff<T: Ord> {
    /// Ids present in the desired set but not the current one, ascending.
    pub to_add: Vec<T>,
    /// Ids present in the current set but not the desired one, ascending.
    pub to_remove: Vec<T>,
}

impl<T: Ord + Clone> SetDiff<T> {
    /// Computes `desired − current` and `current − desired`.
    #[must_use]
    pub fn between(current: &BTreeSet<T>, desired: &BTreeSet<T>) -> Self {
        Self {
            to_add: desired.difference(current).cloned().collect(),
            to_remove: current.difference(desired).cloned().collect(),
        }
    }

    /// Returns `true` if no changes are needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of operations this diff implies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }

    /// Applies the diff to a set, returning the resulting set.
    #[must_use]
    pub fn apply_to(&self, current: &BTreeSet<T>) -> BTreeSet<T> {
        let mut result: BTreeSet<T> = current.clone();
        result.extend(self.to_add.iter().cloned());
        for id in &self.to_remove {
            result.remove(id);
        }
        result
    }
}
