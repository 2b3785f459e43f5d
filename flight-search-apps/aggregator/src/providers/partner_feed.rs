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

//! A provider adapter that reads a partner's flight feed from a JSON file
//! on disk, using the rate-limit/backoff queue for its own I/O retries.
//!
//! This illustrates the retryable/fatal split the interface contract
//! requires (§4.1): a file read that fails transiently is retried and, if
//! still failing, reported with `retryable=true`; a payload that reads
//! fine but fails to parse is reported with `retryable=false` and never
//! retried, since retrying would just reproduce the same bad bytes.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use flightsearch_provider_queue::ProviderQueue;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::criteria::SearchCriteria;
use crate::error::SearchError;
use crate::flight::{AirlineInfo, AirportDetail, Baggage, CabinClass, Flight, FlightDuration, PriceInfo};
use crate::provider::Provider;

#[derive(Debug, Deserialize)]
struct RawPartnerFlight {
    flight_number: String,
    airline_code: String,
    airline_name: String,
    departure_airport: String,
    arrival_airport: String,
    departure_time: DateTime<FixedOffset>,
    arrival_time: DateTime<FixedOffset>,
    price_amount: f64,
    currency: String,
    cabin_class: String,
    cabin_kg: u32,
    checked_kg: u32,
    #[serde(default)]
    segments: Option<u32>,
    #[serde(default)]
    stops: u32,
}

/// Reads a JSON array of [`RawPartnerFlight`] records from `path` and
/// normalizes each into a canonical [`Flight`].
pub struct PartnerFeedProvider {
    name: String,
    path: PathBuf,
    queue: ProviderQueue,
    inject_io_failure: AtomicBool,
}

impl PartnerFeedProvider {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            queue: ProviderQueue::new(name.clone(), 4),
            name,
            path: path.into(),
            inject_io_failure: AtomicBool::new(false),
        }
    }

    /// Forces the underlying read to fail with a retryable I/O error, for
    /// exercising the retryable-classification path in tests.
    pub fn set_inject_io_failure(&self, inject: bool) {
        self.inject_io_failure.store(inject, Ordering::SeqCst);
    }

    async fn read_raw(&self) -> Result<String, anyhow::Error> {
        if self.inject_io_failure.load(Ordering::SeqCst) {
            anyhow::bail!("simulated transient read failure for {}", self.name);
        }
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(anyhow::Error::from)
    }
}

fn to_flight(raw: RawPartnerFlight, provider: &str) -> Flight {
    let stops = match raw.segments {
        Some(n) if n >= 2 => n - 1,
        _ => raw.stops,
    };
    let total_minutes = (raw.arrival_time - raw.departure_time).num_minutes().max(0) as u32;
    Flight {
        id: format!(
            "{provider}-{}-{}-{}",
            raw.flight_number, raw.departure_airport, raw.arrival_airport
        ),
        flight_number: raw.flight_number,
        airline: AirlineInfo {
            code: raw.airline_code,
            name: raw.airline_name,
            logo: None,
        },
        departure: AirportDetail {
            airport_code: raw.departure_airport,
            airport_name: None,
            terminal: None,
            date_time: raw.departure_time,
            timezone: None,
        },
        arrival: AirportDetail {
            airport_code: raw.arrival_airport,
            airport_name: None,
            terminal: None,
            date_time: raw.arrival_time,
            timezone: None,
        },
        duration: FlightDuration::new(total_minutes),
        price: PriceInfo {
            amount: raw.price_amount,
            currency: raw.currency,
            formatted: None,
        },
        baggage: Baggage {
            cabin_kg: raw.cabin_kg,
            checked_kg: raw.checked_kg,
        },
        class: CabinClass::parse_lenient(&raw.cabin_class),
        stops,
        provider: provider.to_string(),
        ranking_score: 0.0,
    }
}

#[async_trait]
impl Provider for PartnerFeedProvider {
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

        let contents = self
            .queue
            .with_retry(|| self.read_raw())
            .await
            .map_err(|e| {
                warn!(provider = %self.name, error = %e, "partner feed read exhausted retries");
                SearchError::ProviderError {
                    name: self.name.clone(),
                    cause: e.to_string(),
                    retryable: true,
                }
            })?;

        let raw_flights: Vec<RawPartnerFlight> = serde_json::from_str(&contents).map_err(|e| {
            SearchError::ProviderError {
                name: self.name.clone(),
                cause: format!("malformed partner feed payload: {e}"),
                retryable: false,
            }
        })?;

        let origin = criteria.origin.as_str();
        let destination = criteria.destination.as_str();
        let departure_date: NaiveDate = criteria.departure_date;

        Ok(raw_flights
            .into_iter()
            .map(|raw| to_flight(raw, &self.name))
            .filter(|f| {
                f.departure.airport_code == origin
                    && f.arrival.airport_code == destination
                    && f.departure.date_time.date_naive() == departure_date
            })
            .collect())
    }
}
