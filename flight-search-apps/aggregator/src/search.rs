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

//! Search orchestrator (C7): validate -> aggregate -> filter -> rank -> sort
//! -> assemble.

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::aggregator::{self, AggregatorConfig};
use crate::criteria::SortOption;
use crate::error::SearchError;
use crate::filter;
use crate::provider::ProviderRegistry;
use crate::ranking;
use crate::response::{SearchMetadata, SearchResponse};
use crate::validator::{self, NormalizedCriteria, RawFilterOptions, RawSearchRequest};

/// Runs one end-to-end search: validate the raw request, fan out to every
/// registered provider, filter, rank, sort, and assemble the response.
///
/// Propagates [`SearchError::AllProvidersFailed`] and cancellation from the
/// aggregation stage unchanged; everything from filter/rank/sort onward is
/// a total function over its input (spec.md §4.5), so no error variant is
/// expected to originate there.
#[instrument(skip(request, registry, cancel), fields(origin = %request.origin, destination = %request.destination))]
pub async fn search(
    request: RawSearchRequest,
    registry: &ProviderRegistry,
    config: AggregatorConfig,
    cancel: CancellationToken,
) -> Result<SearchResponse, SearchError> {
    let started = Instant::now();

    let normalized: NormalizedCriteria = validator::normalize_criteria(&request);
    let sort_by = request.sort_by.as_deref();
    let raw_filters: Option<&RawFilterOptions> = request.filters.as_ref();

    let (criteria, filter_options, sort_key) =
        validator::validate(&normalized, raw_filters, sort_by).map_err(SearchError::invalid)?;

    let providers = registry.all();
    let providers_queried = providers.len();

    let aggregate_result = aggregator::aggregate(&criteria, providers, config, cancel).await?;

    let filtered = filter::apply(&aggregate_result.flights, filter_options.as_ref());
    let scored = ranking::compute_scores(&filtered);
    let sorted = ranking::sort_flights(scored, sort_key);

    let metadata = SearchMetadata {
        total_results: sorted.len(),
        providers_queried,
        providers_succeeded: aggregate_result.succeeded.len(),
        providers_failed: aggregate_result.failed.len(),
        search_time_ms: started.elapsed().as_millis(),
        cache_hit: false,
    };

    info!(
        total_results = metadata.total_results,
        providers_succeeded = metadata.providers_succeeded,
        providers_failed = metadata.providers_failed,
        search_time_ms = metadata.search_time_ms,
        "search completed"
    );

    Ok(SearchResponse {
        search_criteria: criteria,
        flights: sorted,
        metadata,
    })
}

/// Default sort when a request omits `sortBy`.
pub fn default_sort() -> SortOption {
    SortOption::BestValue
}
