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

//! Search criteria, filter options, and the sort key enum (C1).
//!
//! These are pure data types; normalization and validation live in
//! [`crate::validator`] so this module stays a plain shape definition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub origin: String,
    pub destination: String,
    /// Kept as `NaiveDate`: the data model does not carry a timezone for
    /// the search date itself, only for concrete `Flight` instants.
    pub departure_date: NaiveDate,
    pub passengers: u8,
    pub class: String,
}

/// Inclusive `[start, end]` time-of-day window, minute resolution. The date
/// portion of whatever instant it is compared against is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Minutes since midnight, 0..=1439.
    pub start: u16,
    pub end: u16,
}

/// Inclusive `[min, max]` duration window in minutes; either bound absent
/// means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DurationRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stops: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airlines: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time_range: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time_range: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_range: Option<DurationRange>,
}

/// Sort key for the final response; invalid input is silently coerced to
/// `BestValue` at normalization time (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    BestValue,
    Price,
    Duration,
    Departure,
}

impl Default for SortOption {
    fn default() -> Self {
        SortOption::BestValue
    }
}

impl SortOption {
    /// Parses the wire aliases from §4.6 (`best`/`best_value` both mean
    /// `BestValue`), coercing anything unrecognized to the default.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "price" => SortOption::Price,
            "duration" => SortOption::Duration,
            "departure" => SortOption::Departure,
            "best" | "bestvalue" | "best_value" => SortOption::BestValue,
            _ => SortOption::BestValue,
        }
    }
}
