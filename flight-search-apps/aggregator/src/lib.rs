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

//! Flight search aggregation: scatter/gather across independent airline
//! providers, merged and ranked into one comparable result set.
//!
//! See [`search::search`] for the orchestrator entry point and
//! [`provider::Provider`] for the contract a new adapter must satisfy.

pub mod aggregator;
pub mod criteria;
pub mod error;
pub mod filter;
pub mod flight;
pub mod provider;
pub mod providers;
pub mod ranking;
pub mod response;
pub mod search;
pub mod validator;

pub use aggregator::AggregatorConfig;
pub use criteria::{FilterOptions, SearchCriteria, SortOption};
pub use error::{FieldError, SearchError};
pub use flight::Flight;
pub use provider::{Provider, ProviderRegistry};
pub use response::SearchResponse;
pub use search::search;
