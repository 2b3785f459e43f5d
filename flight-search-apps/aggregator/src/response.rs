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

//! The `SearchResponse` wire shape (C1, §6).

use serde::Serialize;

use crate::criteria::SearchCriteria;
use crate::flight::Flight;

#[derive(Debug, Clone, Serialize)]
pub struct SearchMetadata {
    pub total_results: usize,
    pub providers_queried: usize,
    pub providers_succeeded: usize,
    pub providers_failed: usize,
    pub search_time_ms: u128,
    pub cache_hit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// Echo of the normalized input (spec.md §9 open question, resolved in
    /// favor of including it).
    pub search_criteria: SearchCriteria,
    pub flights: Vec<Flight>,
    pub metadata: SearchMetadata,
}
