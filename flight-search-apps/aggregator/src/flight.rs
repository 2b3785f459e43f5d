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

//! The canonical `Flight` record every provider adapter must produce.
//!
//! Nothing in this module talks to a provider or the network; it is pure
//! data plus the formatting/normalization rules spec'd for the shape
//! itself (duration text, cabin class coercion).

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One of the three cabin classes the core understands. Adapters map their
/// own airline-specific codes onto this; unknown codes default to `Economy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    Economy,
    Business,
    First,
}

impl Default for CabinClass {
    fn default() -> Self {
        CabinClass::Economy
    }
}

impl CabinClass {
    /// Case-insensitive parse with an unknown-defaults-to-economy rule,
    /// matching the adapter-mapping contract in the data model (§3).
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "business" => CabinClass::Business,
            "first" => CabinClass::First,
            _ => CabinClass::Economy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineInfo {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportDetail {
    pub airport_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airport_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    pub date_time: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Flight duration, pre-rendered into the `"Xh Ym"` form the response wire
/// shape carries so hosts never need to re-derive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightDuration {
    pub total_minutes: u32,
    pub formatted: String,
}

impl FlightDuration {
    pub fn new(total_minutes: u32) -> Self {
        Self {
            total_minutes,
            formatted: format_duration(total_minutes),
        }
    }
}

/// `"2h 30m"`, `"2h"`, `"0m"`/`"45m"` — both parts only when both are
/// nonzero, hours-only when minutes are exactly zero, minutes-only
/// (including the zero case) otherwise.
pub fn format_duration(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baggage {
    pub cabin_kg: u32,
    pub checked_kg: u32,
}

/// A single normalized flight offer, comparable across providers regardless
/// of the shape each provider's backend actually speaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    pub flight_number: String,
    pub airline: AirlineInfo,
    pub departure: AirportDetail,
    pub arrival: AirportDetail,
    pub duration: FlightDuration,
    pub price: PriceInfo,
    pub baggage: Baggage,
    pub class: CabinClass,
    pub stops: u32,
    pub provider: String,
    /// Assigned by ranking (C6); zero until then.
    #[serde(default)]
    pub ranking_score: f64,
}

impl Flight {
    /// `arrival.date_time > departure.date_time`, the one cross-field
    /// invariant the model itself enforces rather than leaving to adapters.
    pub fn is_chronologically_valid(&self) -> bool {
        self.arrival.date_time > self.departure.date_time
    }
}
