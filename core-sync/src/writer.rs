//! Rate-limited access to the destination service
//!
//! Every outbound call (search, membership fetch, or mutation) goes
//! through one [`RemoteGate`]: a minimum-delay limiter shared across
//! the whole job, plus bounded retry with exponential backoff on
//! transient failures. Read and write paths hit the same service, so
//! they share the same gate.

use bridge_traits::catalog::DestinationCatalog;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::time::Clock;
use core_model::{DestTrackId, PlaylistHandle};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Initial backoff delay in milliseconds; doubles per retry
const INITIAL_BACKOFF_MS: u64 = 100;

/// Minimum-delay limiter for outbound calls
///
/// Measures gaps against an injected [`Clock`] so tests can pin time.
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    min_delay: Duration,
    last_call_ms: Option<i64>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            min_delay,
            last_call_ms: None,
        }
    }

    /// Remaining wait before another call is allowed at `now_ms`
    pub fn required_wait(&self, now_ms: i64) -> Option<Duration> {
        let last = self.last_call_ms?;
        let elapsed = now_ms - last;
        let required = self.min_delay.as_millis() as i64;
        if elapsed < required {
            Some(Duration::from_millis((required - elapsed) as u64))
        } else {
            None
        }
    }

    /// Wait out the remaining delay, then stamp this call
    pub async fn acquire(&mut self) {
        if let Some(wait) = self.required_wait(self.clock.unix_timestamp_millis()) {
            debug!(wait_ms = wait.as_millis() as u64, "rate limiting outbound call");
            sleep(wait).await;
        }
        self.last_call_ms = Some(self.clock.unix_timestamp_millis());
    }
}

/// Shared gate combining the rate limiter with transient-failure retry
#[derive(Clone)]
pub struct RemoteGate {
    limiter: Arc<Mutex<RateLimiter>>,
    retry_attempts: u32,
}

impl RemoteGate {
    pub fn new(min_call_delay: Duration, clock: Arc<dyn Clock>, retry_attempts: u32) -> Self {
        Self {
            limiter: Arc::new(Mutex::new(RateLimiter::new(min_call_delay, clock))),
            retry_attempts: retry_attempts.max(1),
        }
    }

    /// Run a remote call through the gate.
    ///
    /// Each attempt (including retries) waits out the minimum delay
    /// first. Transient failures retry with exponential backoff up to
    /// the attempt cap; all other failures, and exhaustion, surface to
    /// the caller.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> BridgeResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = BridgeResult<T>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.limiter.lock().await.acquire().await;

            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.retry_attempts => {
                    let backoff_ms = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.retry_attempts,
                        error = %err,
                        backoff_ms,
                        "transient failure, retrying"
                    );
                    sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(err) => {
                    if err.is_retryable() {
                        warn!(
                            operation,
                            attempts = attempt,
                            error = %err,
                            "transient failures exhausted retry attempts"
                        );
                    }
                    return Err(err);
                }
            }
        }
    }
}

/// Serialized writer for destination mutations
///
/// The only path by which the engine mutates the destination service.
pub struct RateLimitedWriter {
    catalog: Arc<dyn DestinationCatalog>,
    gate: RemoteGate,
}

impl RateLimitedWriter {
    pub fn new(catalog: Arc<dyn DestinationCatalog>, gate: RemoteGate) -> Self {
        Self { catalog, gate }
    }

    /// Add one track to a destination playlist, retrying transient
    /// failures behind the shared gate.
    ///
    /// # Errors
    ///
    /// Surfaces `Duplicate` unchanged (the caller records it as
    /// already-present) and any non-transient or retry-exhausted
    /// failure.
    pub async fn add_track(
        &self,
        playlist: &PlaylistHandle,
        track: &DestTrackId,
    ) -> BridgeResult<()> {
        self.gate
            .run("add_track", || async {
                self.catalog.add_track(playlist, track).await
            })
            .await
    }

    /// The gate shared with the read path
    pub fn gate(&self) -> &RemoteGate {
        &self.gate
    }
}
