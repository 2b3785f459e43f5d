//!  Flight Search Aggregator
//!
//!  Copyright (C) 2026  Flight Search Aggregator Contributors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Tagged error kinds for the search path.
//!
//! These are kinds, not HTTP statuses: a host wraps them into whatever
//! transport it exposes. `SearchError` never carries a status code itself.

use thiserror::Error;

/// A single field-level validation failure, keyed by the JSON field path it
/// refers to (e.g. `"filters.maxPrice"`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the search orchestrator (C7) and its collaborators.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Criteria or filter DTO failed validation (C8). Carries every field
    /// error found, not just the first.
    #[error("invalid request: {0:?}")]
    InvalidRequest(Vec<FieldError>),

    /// Every registered provider failed (or the registry was empty).
    #[error("all providers failed")]
    AllProvidersFailed,

    /// A single provider's `search` call returned an error.
    #[error("provider {name} failed: {cause}")]
    ProviderError {
        name: String,
        cause: String,
        retryable: bool,
    },

    /// A single provider exceeded its per-provider deadline.
    #[error("provider {name} timed out")]
    ProviderTimeout { name: String },

    /// A single provider is not available to take the call at all (e.g. it
    /// failed its own health check).
    #[error("provider {name} unavailable")]
    ProviderUnavailable { name: String },

    /// The caller's own cancellation signal fired while the search was in
    /// flight. Propagated unchanged, never recovered from.
    #[error("search cancelled")]
    Cancelled,
}

impl SearchError {
    pub fn invalid(errors: Vec<FieldError>) -> Self {
        SearchError::InvalidRequest(errors)
    }
}
