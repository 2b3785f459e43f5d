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

//! Filter pipeline (C5): a pure function from `(flights, options) -> flights`.

use std::collections::HashSet;

use chrono::Timelike;

use crate::criteria::{DurationRange, FilterOptions, TimeRange};
use crate::flight::{AirportDetail, Flight};

fn time_of_day_minutes(detail: &AirportDetail) -> u32 {
    detail.date_time.hour() * 60 + detail.date_time.minute()
}

fn in_time_range(minutes: u32, range: &TimeRange) -> bool {
    // No wrap-around semantics: a range with `start > end` is an empty set
    // rather than an implicit midnight crossing (spec.md §4.3, §9).
    minutes as u16 >= range.start && minutes as u16 <= range.end
}

fn in_duration_range(total_minutes: u32, range: &DurationRange) -> bool {
    let min_ok = range.min_minutes.map_or(true, |min| total_minutes >= min);
    let max_ok = range.max_minutes.map_or(true, |max| total_minutes <= max);
    min_ok && max_ok
}

/// Keeps a flight iff every applicable predicate passes (conjunction).
/// Never mutates `flights`; `options == None` is the identity.
pub fn apply(flights: &[Flight], options: Option<&FilterOptions>) -> Vec<Flight> {
    let options = match options {
        None => return flights.to_vec(),
        Some(o) => o,
    };

    // Built once per call so airline membership is O(1) (§4.3 performance
    // contract), not re-built per flight.
    let airline_set: Option<HashSet<String>> = options
        .airlines
        .as_ref()
        .map(|codes| codes.iter().map(|c| c.to_ascii_uppercase()).collect());

    flights
        .iter()
        .filter(|f| {
            if let Some(max_price) = options.max_price {
                if f.price.amount > max_price {
                    return false;
                }
            }
            if let Some(max_stops) = options.max_stops {
                if f.stops > max_stops {
                    return false;
                }
            }
            if let Some(set) = &airline_set {
                if !set.is_empty() && !set.contains(&f.airline.code.to_ascii_uppercase()) {
                    return false;
                }
            }
            if let Some(range) = &options.departure_time_range {
                if !in_time_range(time_of_day_minutes(&f.departure), range) {
                    return false;
                }
            }
            if let Some(range) = &options.arrival_time_range {
                if !in_time_range(time_of_day_minutes(&f.arrival), range) {
                    return false;
                }
            }
            if let Some(range) = &options.duration_range {
                if !in_duration_range(f.duration.total_minutes, range) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}
