//! Bounded retry with exponential backoff and jitter.
//!
//! Retries transient transport failures (429, 500, 502, 503, 504, and
//! requests that never got an HTTP status). Configuration errors, other
//! statuses and malformed envelopes fail immediately. The default config
//! performs no retries.

use std::time::Duration;

use tracing::warn;

use super::{CompletionFuture, CompletionGateway, CompletionRequest};
use crate::error::{CoachError, TransportError};

/// Per-attempt scale factors applied when [`RetryConfig::jitter`] is set,
/// cycled by attempt number. Fixed rather than random so delays are
/// reproducible in tests.
const JITTER_FACTORS: [f64; 4] = [0.75, 0.90, 0.60, 0.85];

/// How many times, and how patiently, a transient failure is retried.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Extra attempts after the first call. 0 disables retrying.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub initial_delay: Duration,
    /// Ceiling for any single wait.
    pub max_delay: Duration,
    /// Growth factor between consecutive waits.
    pub multiplier: f64,
    /// Spread waits with [`JITTER_FACTORS`].
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_retries: retries,
            ..Default::default()
        }
    }

    /// Retries with no waiting between attempts.
    pub fn immediate(retries: u32) -> Self {
        Self {
            max_retries: retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
            ..Default::default()
        }
    }

    /// Wait before retry number `attempt` (0 = first retry).
    ///
    /// Never negative, never above `max_delay`, whatever `multiplier` is.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let grown = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let ceiling = self.max_delay.as_secs_f64();
        // NaN falls through `min` to the ceiling; negatives clamp to zero.
        let mut secs = grown.min(ceiling).max(0.0);
        if self.jitter {
            secs *= JITTER_FACTORS[attempt as usize % JITTER_FACTORS.len()];
        }
        Duration::from_secs_f64(secs)
    }
}

/// Whether `error` is worth another attempt.
pub fn is_transient(error: &CoachError) -> bool {
    match error {
        CoachError::Transport(TransportError::Request(_)) => true,
        CoachError::Transport(TransportError::Status { status, .. }) => {
            matches!(status, 429 | 500 | 502 | 503 | 504)
        }
        _ => false,
    }
}

/// Wraps another gateway and retries transient failures per [`RetryConfig`].
pub struct RetryingGateway<G> {
    inner: G,
    config: RetryConfig,
}

impl<G: CompletionGateway> RetryingGateway<G> {
    pub fn new(inner: G, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    async fn run(&self, request: &CompletionRequest) -> Result<String, CoachError> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(request).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.config.max_retries && is_transient(&e) => {
                    let delay = self.config.delay_for_attempt(attempt);
                    attempt += 1;
                    warn!(
                        "Transient completion error (attempt {}/{}), retrying in {:?}: {}",
                        attempt, self.config.max_retries, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<G: CompletionGateway> CompletionGateway for RetryingGateway<G> {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.run(request))
    }
}
