//! Quote fetcher with bounded retry
//!
//! Up to `max_attempts` provider calls per symbol with doubling delays between them
//! (1s, 2s with the defaults). Exhausted retries become `None`; no error reaches the caller.

use std::sync::Arc;
use std::time::Duration;

use crate::config::FetcherConfig;
use crate::models::Quote;
use crate::services::stock::QuoteProvider;

/// Retry schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay slept after the failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl From<&FetcherConfig> for RetryPolicy {
    fn from(config: &FetcherConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay(),
        }
    }
}

/// Provider wrapper applying the retry policy
#[derive(Clone)]
pub struct QuoteFetcher {
    provider: Arc<dyn QuoteProvider>,
    policy: RetryPolicy,
}

impl QuoteFetcher {
    pub fn new(provider: Arc<dyn QuoteProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Fetch one symbol, `None` once every attempt failed
    pub async fn fetch(&self, symbol: &str) -> Option<Quote> {
        for attempt in 1..=self.policy.max_attempts {
            match self.provider.fetch_quote(symbol).await {
                Ok(quote) => return Some(quote),
                Err(e) if attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_after(attempt);
                    log::warn!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempt,
                        self.policy.max_attempts,
                        symbol,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    log::error!(
                        "Giving up on {} after {} attempts: {}",
                        symbol,
                        self.policy.max_attempts,
                        e
                    );
                }
            }
        }
        None
    }
}
