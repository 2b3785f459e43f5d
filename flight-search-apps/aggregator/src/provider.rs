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

//! Provider interface and registry (C2).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::criteria::SearchCriteria;
use crate::error::SearchError;
use crate::flight::Flight;

/// One airline backend's adapter. Implementations normalize their own
/// foreign payload into canonical [`Flight`] values.
///
/// `search` MUST:
/// - honor `cancel` and return promptly once it fires;
/// - only return flights matching `criteria`'s origin/destination/date;
/// - classify I/O failures as retryable and parse/shape failures as not,
///   via the `retryable` field on [`SearchError::ProviderError`];
/// - never panic — but if it does, [`crate::aggregator`] isolates it.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable, case-sensitive, unique identifier within one registry.
    fn name(&self) -> &str;

    async fn search(
        &self,
        criteria: &SearchCriteria,
        cancel: CancellationToken,
    ) -> Result<Vec<Flight>, SearchError>;

    /// Diagnostic-only liveness probe, independent of `search`. Defaults to
    /// always healthy; adapters backed by a real upstream may override it.
    async fn health_check(&self) -> bool {
        true
    }
}

/// Process-wide `name -> Provider` registry, populated once at startup and
/// read-only thereafter (no locking needed after init, per §5).
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<(String, std::sync::Arc<dyn Provider>)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider. Re-registering an existing name replaces the
    /// prior entry in place, preserving its original position so insertion
    /// order elsewhere in the registry stays stable.
    pub fn register(&mut self, provider: std::sync::Arc<dyn Provider>) {
        let name = provider.name().to_string();
        if let Some(slot) = self.providers.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = provider;
        } else {
            self.providers.push((name, provider));
        }
    }

    /// All registered providers, in insertion order.
    pub fn all(&self) -> Vec<std::sync::Arc<dyn Provider>> {
        self.providers.iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
