// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use onboard_domain::DomainError;
use thiserror::Error;

/// Errors reported by a preferences repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A read failed.
    #[error("Read failed: {0}")]
    Read(String),
    /// A write failed.
    #[error("Write failed: {0}")]
    Write(String),
    /// The backing store could not be reached.
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
    /// A write referenced a row that does not exist, such as an unknown
    /// industry id.
    #[error("Unknown reference: {0}")]
    UnknownReference(String),
}

/// The read that produced a [`ReadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSource {
    FullTime,
    Fractional,
    General,
    Eligibility,
    /// The batch lookup of location details.
    Locations,
}

impl ReadSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time preferences",
            Self::Fractional => "fractional preferences",
            Self::General => "work preferences",
            Self::Eligibility => "work eligibility",
            Self::Locations => "locations",
        }
    }
}

impl std::fmt::Display for ReadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A read of one hydration source failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load {origin}: {message}")]
pub struct ReadError {
    /// The source that failed.
    pub origin: ReadSource,
    /// The repository's error message.
    pub message: String,
}

impl ReadError {
    #[must_use]
    pub fn new(origin: ReadSource, err: &RepositoryError) -> Self {
        Self {
            origin,
            message: err.to_string(),
        }
    }
}

/// Errors that can occur while loading or saving work preferences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The form violates a domain rule. Nothing was written.
    #[error("Invalid work preferences: {0}")]
    Validation(#[from] DomainError),
    /// A read failed.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// A place could not be resolved to an internal location id.
    #[error("Failed to resolve location '{place_id}': {message}")]
    Resolution {
        /// The external place identifier.
        place_id: String,
        /// The repository's error message.
        message: String,
    },
    /// A repository write failed. Earlier writes of the same save stay applied.
    #[error("Failed to {operation}: {message}")]
    Write {
        /// Description of the failed operation.
        operation: String,
        /// The repository's error message.
        message: String,
    },
    /// A write referenced an id the store does not know. Earlier writes of the
    /// same save stay applied.
    #[error("Failed to {operation}: {message}")]
    UnknownReference {
        /// Description of the rejected operation.
        operation: String,
        /// The repository's error message.
        message: String,
    },
    /// Another save for the same form is still in flight.
    #[error("A save is already in progress")]
    SaveInProgress,
}
