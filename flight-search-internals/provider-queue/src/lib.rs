//! flight-search-internals/provider-queue
//! Copyright (c) 2026 Flight Search Aggregator Contributors
//! Licensed and distributed under either of
//!   * MIT license (license terms at the root of the package or at http://opensource.org/licenses/MIT).
//!   * Apache v2 license (license terms at the root of the package or at http://www.apache.org/licenses/LICENSE-2.0).
//! at your option. This file may not be copied, modified, or distributed except according to those terms.

//! Per-provider I/O retry queue.
//!
//! A provider adapter (C3) that reads its own upstream is free to retry its
//! own transient I/O failures before ever reporting back to the aggregator
//! (C4), which itself never retries (spec §7 — the aggregator's `retryable`
//! tag is informational, not acted on). One [`ProviderQueue`] is meant to be
//! owned by a single adapter instance: it is constructed with that
//! provider's name, which then tags every retry log line and every
//! exhausted-retries error so a host can tell which upstream is flaky
//! without threading the name through call sites by hand.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time;
use tracing::{debug, warn};

/// Error returned when a provider's retry budget is exhausted or its queue
/// can no longer accept work.
#[derive(Debug, Error)]
pub enum ProviderQueueError {
    #[error("provider {provider}: exhausted {attempts} attempt(s): {source}")]
    RetriesExhausted {
        provider: String,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },
    #[error("provider {provider}: retry queue is closed")]
    QueueClosed { provider: String },
}

/// Bounds a provider adapter's concurrent in-flight requests and retries
/// its transient I/O failures with exponential backoff and jitter.
///
/// # Example
///
/// ```ignore
/// let queue = ProviderQueue::new("garuda-indonesia", 4);
/// let body = queue.with_retry(|| fetch_upstream_payload()).await?;
/// ```
#[derive(Clone, Debug)]
pub struct ProviderQueue {
    provider: String,
    permits: Arc<Semaphore>,
    initial_delay: Duration,
    max_delay: Duration,
    jitter_factor: f64,
    max_retries: u32,
}

impl ProviderQueue {
    /// One queue per provider adapter, named so its retries and failures
    /// are attributable in logs and in [`ProviderQueueError`]. `max_concurrent`
    /// bounds how many of this *one* provider's requests may be in flight at
    /// once — it has no effect on other providers' queues.
    pub fn new(provider: impl Into<String>, max_concurrent: usize) -> Self {
        Self {
            provider: provider.into(),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(5),
            jitter_factor: 0.5,
            max_retries: 3,
        }
    }

    /// Overrides the default backoff schedule (50ms initial, 5s cap, 3
    /// retries). Adapters whose upstream has a known rate limit can use
    /// this to back off more aggressively than the default.
    pub fn with_backoff(mut self, max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.initial_delay = initial_delay;
        self.max_delay = max_delay;
        self
    }

    /// Runs `f`, retrying with exponential backoff and jitter while it
    /// returns `Err`, until `max_retries` is exhausted. Every attempt after
    /// the first is logged with this queue's provider name attached.
    pub async fn with_retry<T, F, Fut>(&self, mut f: F) -> Result<T, ProviderQueueError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, anyhow::Error>> + Send,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ProviderQueueError::QueueClosed {
                provider: self.provider.clone(),
            })?;

        let mut attempt: u32 = 0;
        let mut delay = self.initial_delay;

        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(provider = %self.provider, attempt, "provider queue retry succeeded");
                    }
                    return Ok(value);
                }
                Err(source) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        return Err(ProviderQueueError::RetriesExhausted {
                            provider: self.provider.clone(),
                            attempts: attempt,
                            source,
                        });
                    }

                    let jittered = self.apply_jitter(delay);
                    warn!(
                        provider = %self.provider,
                        attempt,
                        delay_ms = jittered.as_millis() as u64,
                        error = %source,
                        "provider queue retrying after transient failure"
                    );
                    time::sleep(jittered).await;
                    delay = std::cmp::min(delay * 2, self.max_delay);
                }
            }
        }
    }

    fn apply_jitter(&self, delay: Duration) -> Duration {
        if self.jitter_factor == 0.0 {
            return delay;
        }

        let jitter_ms = (delay.as_millis() as f64 * self.jitter_factor) as u64;
        let rand_jitter = rand::thread_rng().gen_range(0..=jitter_ms);

        Duration::from_millis(delay.as_millis() as u64 + rand_jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_without_retry() {
        let queue = ProviderQueue::new("garuda", 2);
        let result = queue.with_retry(|| async { Ok::<_, anyhow::Error>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let queue = ProviderQueue::new("garuda", 2).with_backoff(3, Duration::from_millis(1), Duration::from_millis(5));
        let attempts = AtomicU32::new(0);
        let result = queue
            .with_retry(|| {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        anyhow::bail!("transient failure")
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 2);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries_and_names_the_provider() {
        let queue = ProviderQueue::new("airasia", 2).with_backoff(1, Duration::from_millis(1), Duration::from_millis(2));
        let result = queue
            .with_retry(|| async { anyhow::bail!("always fails") as Result<(), _> })
            .await;
        match result {
            Err(ProviderQueueError::RetriesExhausted { provider, attempts, .. }) => {
                assert_eq!(provider, "airasia");
                assert_eq!(attempts, 2);
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }
}
