//! End-to-end scenarios S1-S7 from the search orchestrator's testable
//! properties, run against the public API a host would actually call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use flightsearch_aggregator::aggregator::AggregatorConfig;
use flightsearch_aggregator::provider::ProviderRegistry;
use flightsearch_aggregator::providers::fixture::{sample_flight_priced, FixtureProvider};
use flightsearch_aggregator::search;
use flightsearch_aggregator::validator::{RawFilterOptions, RawSearchRequest};
use flightsearch_aggregator::SearchError;

fn base_request() -> RawSearchRequest {
    RawSearchRequest {
        origin: "CGK".into(),
        destination: "DPS".into(),
        departure_date: "2025-12-15".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn s1_happy_multi_provider_merge() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(FixtureProvider::new(
        "A",
        vec![sample_flight_priced("a1", "AA", 1_000_000.0, 120, 0)],
    )));
    registry.register(Arc::new(FixtureProvider::new(
        "B",
        vec![sample_flight_priced("b1", "BB", 900_000.0, 130, 0)],
    )));

    let mut request = base_request();
    request.sort_by = Some("price".into());

    let response = search(
        request,
        &registry,
        AggregatorConfig::default(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let ids: Vec<_> = response.flights.iter().map(|f| f.id.clone()).collect();
    assert_eq!(ids, vec!["b1", "a1"]);
    assert_eq!(response.metadata.total_results, 2);
    assert_eq!(response.metadata.providers_succeeded, 2);
    assert_eq!(response.metadata.providers_failed, 0);
}

#[tokio::test]
async fn s2_partial_failure() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(FixtureProvider::new(
        "A",
        vec![sample_flight_priced("a1", "AA", 1_000_000.0, 120, 0)],
    )));
    let failing = Arc::new(FixtureProvider::new("B", vec![]));
    failing.set_should_fail(true);
    registry.register(failing);

    let response = search(
        base_request(),
        &registry,
        AggregatorConfig::default(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(response.flights.len(), 1);
    assert_eq!(response.metadata.providers_succeeded, 1);
    assert_eq!(response.metadata.providers_failed, 1);
}

#[tokio::test]
async fn s3_all_fail() {
    let mut registry = ProviderRegistry::new();
    for name in ["A", "B"] {
        let provider = Arc::new(FixtureProvider::new(name, vec![]));
        provider.set_should_fail(true);
        registry.register(provider);
    }

    let result = search(
        base_request(),
        &registry,
        AggregatorConfig::default(),
        CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(SearchError::AllProvidersFailed)));
}

#[tokio::test]
async fn s4_filter_then_sort_by_price() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(FixtureProvider::new(
        "A",
        vec![
            sample_flight_priced("cheap", "AA", 500_000.0, 100, 0),
            sample_flight_priced("mid", "AA", 1_000_000.0, 110, 0),
            sample_flight_priced("expensive", "AA", 2_000_000.0, 120, 0),
        ],
    )));

    let mut request = base_request();
    request.sort_by = Some("price".into());
    request.filters = Some(RawFilterOptions {
        max_price: Some(1_000_000.0),
        ..Default::default()
    });

    let response = search(
        request,
        &registry,
        AggregatorConfig::default(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let ids: Vec<_> = response.flights.iter().map(|f| f.id.clone()).collect();
    assert_eq!(ids, vec!["cheap", "mid"]);
}

#[tokio::test]
async fn s5_best_value_tiebreak_preserves_arrival_order() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(FixtureProvider::new(
        "A",
        vec![
            sample_flight_priced("x", "AA", 500_000.0, 100, 0),
            sample_flight_priced("y", "AA", 500_000.0, 100, 0),
            sample_flight_priced("z", "AA", 500_000.0, 100, 0),
        ],
    )));

    let mut request = base_request();
    request.sort_by = Some("bestValue".into());

    let response = search(
        request,
        &registry,
        AggregatorConfig::default(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let ids: Vec<_> = response.flights.iter().map(|f| f.id.clone()).collect();
    assert_eq!(ids, vec!["x", "y", "z"]);
    assert!(response.flights.iter().all(|f| f.ranking_score == 0.0));
}

#[tokio::test]
async fn s6_per_provider_timeout_does_not_delay_the_response() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(FixtureProvider::new(
        "A",
        vec![sample_flight_priced("a1", "AA", 1_000_000.0, 120, 0)],
    )));

    struct SlowProvider;
    #[async_trait::async_trait]
    impl flightsearch_aggregator::Provider for SlowProvider {
        fn name(&self) -> &str {
            "B"
        }
        async fn search(
            &self,
            _criteria: &flightsearch_aggregator::SearchCriteria,
            _cancel: CancellationToken,
        ) -> Result<Vec<flightsearch_aggregator::Flight>, SearchError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![])
        }
    }
    registry.register(Arc::new(SlowProvider));

    let config = AggregatorConfig {
        provider_timeout: Duration::from_millis(100),
        global_timeout: Duration::from_secs(1),
    };

    let started = Instant::now();
    let response = search(base_request(), &registry, config, CancellationToken::new())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(response.flights.len(), 1);
    assert_eq!(response.metadata.providers_failed, 1);
}

#[tokio::test]
async fn s7_invalid_input_calls_no_providers() {
    let provider_was_called = Arc::new(std::sync::atomic::AtomicBool::new(false));

    struct TrackingProvider(Arc<std::sync::atomic::AtomicBool>);
    #[async_trait::async_trait]
    impl flightsearch_aggregator::Provider for TrackingProvider {
        fn name(&self) -> &str {
            "A"
        }
        async fn search(
            &self,
            _criteria: &flightsearch_aggregator::SearchCriteria,
            _cancel: CancellationToken,
        ) -> Result<Vec<flightsearch_aggregator::Flight>, SearchError> {
            self.0.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(vec![])
        }
    }

    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(TrackingProvider(provider_was_called.clone())));

    let mut request = base_request();
    request.origin = "CG".into();

    let result = search(
        request,
        &registry,
        AggregatorConfig::default(),
        CancellationToken::new(),
    )
    .await;

    match result {
        Err(SearchError::InvalidRequest(errors)) => {
            assert!(errors.iter().any(|e| e.field == "origin"));
        }
        other => panic!("expected InvalidRequest, got {other:?}"),
    }
    assert!(!provider_was_called.load(std::sync::atomic::Ordering::SeqCst));
}
