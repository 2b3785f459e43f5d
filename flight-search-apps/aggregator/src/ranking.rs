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

//! Ranking & sort (C6).
//!
//! Two independent stages: `compute_scores` assigns a `[0,1]`-minimizing
//! "best value" score per flight over the current search's union, and
//! `sort_flights` stably orders by a chosen key. The corpus this was
//! distilled from carries a second, `[0,100]`-maximizing scoring variant;
//! this crate picks the `[0,1]`-minimizing one and applies it consistently
//! to both scoring and `bestValue` sorting (spec.md §4.4, §9).

use crate::criteria::SortOption;
use crate::flight::Flight;

const WEIGHT_PRICE: f64 = 0.5;
const WEIGHT_DURATION: f64 = 0.3;
const WEIGHT_STOPS: f64 = 0.2;

fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        0.0
    } else {
        (value - min) / (max - min)
    }
}

/// Returns a new collection with `ranking_score` populated; never mutates
/// `flights` in place. Min/max are taken over this call's union only —
/// scores are intentionally non-monotonic across searches and MUST NOT be
/// cached (spec.md §9).
pub fn compute_scores(flights: &[Flight]) -> Vec<Flight> {
    if flights.is_empty() {
        return Vec::new();
    }

    let (mut min_price, mut max_price) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_duration, mut max_duration) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_stops, mut max_stops) = (f64::INFINITY, f64::NEG_INFINITY);

    for f in flights {
        min_price = min_price.min(f.price.amount);
        max_price = max_price.max(f.price.amount);
        min_duration = min_duration.min(f.duration.total_minutes as f64);
        max_duration = max_duration.max(f.duration.total_minutes as f64);
        min_stops = min_stops.min(f.stops as f64);
        max_stops = max_stops.max(f.stops as f64);
    }

    flights
        .iter()
        .cloned()
        .map(|mut f| {
            let norm_price = normalize(f.price.amount, min_price, max_price);
            let norm_duration = normalize(f.duration.total_minutes as f64, min_duration, max_duration);
            let norm_stops = normalize(f.stops as f64, min_stops, max_stops);
            f.ranking_score =
                WEIGHT_PRICE * norm_price + WEIGHT_DURATION * norm_duration + WEIGHT_STOPS * norm_stops;
            f
        })
        .collect()
}

/// Stably sorts `flights` by `key`. Stability is load-bearing: it preserves
/// the aggregator's (non-deterministic) arrival order among ties, which is
/// the only determinism guarantee the overall response gets (spec.md §4.2,
/// §4.4, testable property 3).
pub fn sort_flights(mut flights: Vec<Flight>, key: SortOption) -> Vec<Flight> {
    match key {
        SortOption::Price => {
            flights.sort_by(|a, b| a.price.amount.partial_cmp(&b.price.amount).unwrap())
        }
        SortOption::Duration => flights.sort_by_key(|f| f.duration.total_minutes),
        SortOption::Departure => flights.sort_by_key(|f| f.departure.date_time),
        SortOption::BestValue => {
            flights.sort_by(|a, b| a.ranking_score.partial_cmp(&b.ranking_score).unwrap())
        }
    }
    flights
}
