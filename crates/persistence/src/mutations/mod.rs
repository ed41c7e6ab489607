// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Junction adds are insert-or-ignore and removes are plain deletes, so both
//! succeed when the row is already in the requested state. Only
//! `insert_location` relies on a backend helper (`last_insert_rowid()`).

pub mod collections;
pub mod locations;
pub mod preferences;
