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

//! An in-memory provider adapter backed by a fixed set of flights, plus the
//! sample-flight builders used across this crate's unit tests.
//!
//! Grounded on the failure-injection shape of `MockGdsProvider` in the
//! reference GDS trait module: an `AtomicBool` flag that test code flips to
//! force the adapter into an error path without touching its happy-path
//! logic.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use tokio_util::sync::CancellationToken;

use crate::criteria::SearchCriteria;
use crate::error::SearchError;
use crate::flight::{AirlineInfo, AirportDetail, Baggage, CabinClass, Flight, FlightDuration, PriceInfo};
use crate::provider::Provider;

/// Builds a minimal, schema-valid flight for tests: CGK -> DPS, economy,
/// zero stops, two-hour duration.
pub fn sample_flight(id: &str, provider: &str) -> Flight {
    sample_flight_priced(id, provider, 1_000_000.0, 120, 0)
}

/// Same shape as [`sample_flight`] with price, duration, and stop count
/// controllable, for filter/ranking tests.
pub fn sample_flight_priced(id: &str, provider: &str, price: f64, duration_minutes: u32, stops: u32) -> Flight {
    let departure_dt = fixed_offset_datetime(2025, 12, 15, 9, 0);
    let arrival_dt = departure_dt + chrono::Duration::minutes(duration_minutes as i64);
    Flight {
        id: id.to_string(),
        flight_number: format!("{provider}123"),
        airline: AirlineInfo {
            code: provider.to_string(),
            name: format!("{provider} Airways"),
            logo: None,
        },
        departure: AirportDetail {
            airport_code: "CGK".to_string(),
            airport_name: None,
            terminal: None,
            date_time: departure_dt,
            timezone: None,
        },
        arrival: AirportDetail {
            airport_code: "DPS".to_string(),
            airport_name: None,
            terminal: None,
            date_time: arrival_dt,
            timezone: None,
        },
        duration: FlightDuration::new(duration_minutes),
        price: PriceInfo {
            amount: price,
            currency: "IDR".to_string(),
            formatted: None,
        },
        baggage: Baggage {
            cabin_kg: 7,
            checked_kg: 20,
        },
        class: CabinClass::Economy,
        stops,
        provider: provider.to_string(),
        ranking_score: 0.0,
    }
}

fn fixed_offset_datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(7 * 3600).unwrap();
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap();
    offset.from_local_datetime(&naive).unwrap()
}

/// An adapter backed by a fixed, in-memory flight list. Used both as a test
/// double and as a minimal always-available provider a host can register
/// when it has no real backend to reach yet.
pub struct FixtureProvider {
    name: String,
    flights: Vec<Flight>,
    should_fail: AtomicBool,
    healthy: AtomicBool,
}

impl FixtureProvider {
    pub fn new(name: impl Into<String>, flights: Vec<Flight>) -> Self {
        Self {
            name: name.into(),
            flights,
            should_fail: AtomicBool::new(false),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn arc(name: impl Into<String>, flights: Vec<Flight>) -> Arc<Self> {
        Arc::new(Self::new(name, flights))
    }

    /// Forces the next (and every subsequent) `search` call to fail, for
    /// exercising partial- and total-failure paths in the aggregator.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl Provider for FixtureProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        criteria: &SearchCriteria,
        cancel: CancellationToken,
    ) -> Result<Vec<Flight>, SearchError> {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SearchError::ProviderError {
                name: self.name.clone(),
                cause: "fixture provider configured to fail".to_string(),
                retryable: false,
            });
        }

        Ok(self
            .flights
            .iter()
            .filter(|f| {
                f.departure.airport_code == criteria.origin
                    && f.arrival.airport_code == criteria.destination
            })
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> SearchCriteria {
        SearchCriteria {
            origin: "CGK".into(),
            destination: "DPS".into(),
            departure_date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            passengers: 1,
            class: "economy".into(),
        }
    }

    #[tokio::test]
    async fn returns_only_matching_flights() {
        let mismatched = sample_flight_priced("x", "XX", 1.0, 10, 0);
        let mut mismatched = mismatched;
        mismatched.departure.airport_code = "SUB".into();
        let provider = FixtureProvider::new("A", vec![sample_flight("a1", "A"), mismatched]);
        let flights = provider.search(&criteria(), CancellationToken::new()).await.unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].id, "a1");
    }

    #[tokio::test]
    async fn set_should_fail_forces_an_error() {
        let provider = FixtureProvider::new("A", vec![sample_flight("a1", "A")]);
        provider.set_should_fail(true);
        let result = provider.search(&criteria(), CancellationToken::new()).await;
        assert!(matches!(result, Err(SearchError::ProviderError { retryable: false, .. })));
    }
}
