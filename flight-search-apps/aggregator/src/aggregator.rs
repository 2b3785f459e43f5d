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

//! Scatter/gather aggregator (C4).
//!
//! One task per registered provider, a per-provider deadline, a global
//! deadline bounding the whole fan-out, and a panic boundary around every
//! task so a broken adapter can never take the others down with it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::criteria::SearchCriteria;
use crate::error::SearchError;
use crate::flight::Flight;
use crate::provider::Provider;

/// Bounds on the fan-out. `provider_timeout` MUST be strictly less than
/// `global_timeout` (§4.2) — callers are expected to uphold this; it is not
/// re-checked on every call since it's a property of configuration, not of
/// any one request.
#[derive(Debug, Clone, Copy)]
pub struct AggregatorConfig {
    pub provider_timeout: Duration,
    pub global_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(2),
            global_timeout: Duration::from_secs(5),
        }
    }
}

/// Per-provider outcome recorded by the fan-out, independent of whether the
/// provider's flights survive filtering downstream.
#[derive(Debug)]
enum ProviderOutcome {
    Succeeded { name: String, flights: Vec<Flight> },
    Failed { name: String },
}

/// Result of one full scatter/gather pass: the union of flights from every
/// provider that succeeded, plus the names that succeeded/failed for
/// metadata accounting (§3, invariant 6).
#[derive(Debug)]
pub struct AggregateResult {
    pub flights: Vec<Flight>,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

/// Runs one provider's search inside a panic boundary and its own
/// `provider_timeout` deadline, producing an outcome that never propagates
/// a panic or an error past this function.
async fn run_one(
    provider: Arc<dyn Provider>,
    criteria: SearchCriteria,
    provider_timeout: Duration,
    cancel: CancellationToken,
) -> ProviderOutcome {
    let name = provider.name().to_string();
    let started = Instant::now();

    let inner_cancel = cancel.clone();
    let task = tokio::spawn({
        let name = name.clone();
        async move {
            provider.search(&criteria, inner_cancel).await.map_err(|e| (name, e))
        }
    });

    let outcome = tokio::time::timeout(provider_timeout, task).await;

    match outcome {
        // Provider responded within its deadline.
        Ok(Ok(Ok(flights))) => {
            debug!(provider = %name, elapsed_ms = started.elapsed().as_millis(), count = flights.len(), "provider succeeded");
            ProviderOutcome::Succeeded { name, flights }
        }
        Ok(Ok(Err((name, err)))) => {
            warn!(provider = %name, error = %err, "provider returned an error");
            ProviderOutcome::Failed { name }
        }
        // The task panicked; isolate it as a plain failure (§4.2.b, §7).
        Ok(Err(join_err)) => {
            warn!(provider = %name, panicked = join_err.is_panic(), "provider task ended abnormally");
            ProviderOutcome::Failed { name }
        }
        // provider_timeout elapsed before the task finished.
        Err(_elapsed) => {
            warn!(provider = %name, timeout_ms = provider_timeout.as_millis(), "provider timed out");
            ProviderOutcome::Failed { name }
        }
    }
}

/// Fans out `criteria` to every provider in `providers` concurrently,
/// gathers results under `config.global_timeout`, and returns the union of
/// flights from providers that succeeded.
///
/// An empty provider list is an immediate [`SearchError::AllProvidersFailed`].
/// Cancelling `cancel` terminates every in-flight provider task; results
/// already emitted before cancellation are still collected.
#[instrument(skip(providers, cancel), fields(provider_count = providers.len()))]
pub async fn aggregate(
    criteria: &SearchCriteria,
    providers: Vec<Arc<dyn Provider>>,
    config: AggregatorConfig,
    cancel: CancellationToken,
) -> Result<AggregateResult, SearchError> {
    if providers.is_empty() {
        return Err(SearchError::AllProvidersFailed);
    }

    let global_cancel = cancel.child_token();
    let provider_count = providers.len();
    let (tx, mut rx) = mpsc::channel::<ProviderOutcome>(provider_count);

    for provider in providers {
        let tx = tx.clone();
        let criteria = criteria.clone();
        let provider_timeout = config.provider_timeout;
        let task_cancel = global_cancel.child_token();
        tokio::spawn(async move {
            let outcome = run_one(provider, criteria, provider_timeout, task_cancel).await;
            // The channel is sized to the provider count, so this never
            // blocks waiting for a reader (§4.2.c).
            let _ = tx.send(outcome).await;
        });
    }
    drop(tx);

    let deadline = Instant::now() + config.global_timeout;
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    let mut flights = Vec::new();
    let mut received = 0usize;

    while received < provider_count {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                global_cancel.cancel();
                break;
            }
            recv = tokio::time::timeout(remaining, rx.recv()) => {
                match recv {
                    Ok(Some(outcome)) => {
                        received += 1;
                        match outcome {
                            ProviderOutcome::Succeeded { name, flights: mut f } => {
                                succeeded.push(name);
                                flights.append(&mut f);
                            }
                            ProviderOutcome::Failed { name } => failed.push(name),
                        }
                    }
                    Ok(None) => break,
                    Err(_elapsed) => break,
                }
            }
        }
    }

    // Anything still unaccounted for when we stopped draining — global
    // deadline hit or cancellation fired — is recorded as failed (§4.2.6).
    if received < provider_count {
        global_cancel.cancel();
        let missing = provider_count - received;
        debug!(missing, "global deadline or cancellation ended the fan-out early");
        for _ in 0..missing {
            failed.push("<unresponsive>".to_string());
        }
    }

    if succeeded.is_empty() {
        return Err(SearchError::AllProvidersFailed);
    }

    Ok(AggregateResult {
        flights,
        succeeded,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::SearchCriteria;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Duration as StdDuration;

    fn criteria() -> SearchCriteria {
        SearchCriteria {
            origin: "CGK".into(),
            destination: "DPS".into(),
            departure_date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            passengers: 1,
            class: "economy".into(),
        }
    }

    struct Immediate {
        name: &'static str,
        flight_id: &'static str,
    }

    #[async_trait]
    impl Provider for Immediate {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(
            &self,
            _criteria: &SearchCriteria,
            _cancel: CancellationToken,
        ) -> Result<Vec<Flight>, SearchError> {
            Ok(vec![crate::providers::fixture::sample_flight(
                self.flight_id,
                self.name,
            )])
        }
    }

    struct Slow {
        name: &'static str,
        delay: StdDuration,
    }

    #[async_trait]
    impl Provider for Slow {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(
            &self,
            _criteria: &SearchCriteria,
            _cancel: CancellationToken,
        ) -> Result<Vec<Flight>, SearchError> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![])
        }
    }

    struct Erroring {
        name: &'static str,
    }

    #[async_trait]
    impl Provider for Erroring {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(
            &self,
            _criteria: &SearchCriteria,
            _cancel: CancellationToken,
        ) -> Result<Vec<Flight>, SearchError> {
            Err(SearchError::ProviderError {
                name: self.name.to_string(),
                cause: "simulated backend error".into(),
                retryable: true,
            })
        }
    }

    #[tokio::test]
    async fn empty_registry_is_all_providers_failed() {
        let result = aggregate(
            &criteria(),
            vec![],
            AggregatorConfig::default(),
            CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(SearchError::AllProvidersFailed)));
    }

    #[tokio::test]
    async fn merges_flights_from_all_succeeding_providers() {
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(Immediate { name: "A", flight_id: "a1" }),
            Arc::new(Immediate { name: "B", flight_id: "b1" }),
        ];
        let result = aggregate(
            &criteria(),
            providers,
            AggregatorConfig::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(result.flights.len(), 2);
        assert_eq!(result.succeeded.len(), 2);
        assert!(result.failed.is_empty());
    }

    #[tokio::test]
    async fn partial_failure_still_returns_successful_flights() {
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(Immediate { name: "A", flight_id: "a1" }),
            Arc::new(Erroring { name: "B" }),
        ];
        let result = aggregate(
            &criteria(),
            providers,
            AggregatorConfig::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(result.flights.len(), 1);
        assert_eq!(result.succeeded, vec!["A"]);
        assert_eq!(result.failed, vec!["B"]);
    }

    #[tokio::test]
    async fn all_providers_failing_is_all_providers_failed() {
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(Erroring { name: "A" }),
            Arc::new(Erroring { name: "B" }),
        ];
        let result = aggregate(
            &criteria(),
            providers,
            AggregatorConfig::default(),
            CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(SearchError::AllProvidersFailed)));
    }

    #[tokio::test]
    async fn slow_provider_is_recorded_failed_under_tight_provider_timeout() {
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(Immediate { name: "A", flight_id: "a1" }),
            Arc::new(Slow { name: "B", delay: StdDuration::from_secs(5) }),
        ];
        let config = AggregatorConfig {
            provider_timeout: StdDuration::from_millis(100),
            global_timeout: StdDuration::from_secs(1),
        };
        let started = Instant::now();
        let result = aggregate(&criteria(), providers, config, CancellationToken::new())
            .await
            .unwrap();
        assert!(started.elapsed() < StdDuration::from_millis(500));
        assert_eq!(result.flights.len(), 1);
        assert!(result.failed.contains(&"B".to_string()));
    }
}
