//! Blocking retry with exponential backoff.

use std::{fmt::Display, thread, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::*;

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first failure
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    pub base_delay_ms: u64,

    /// Multiplier for each subsequent retry
    pub multiplier: f64,

    /// Maximum delay cap in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 500,
            multiplier: 2.0,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    /// Delay to wait before retry number `retry_count` (0-based).
    pub fn calculate_delay(&self, retry_count: u32) -> Duration {
        let delay = self.base_delay_ms as f64 * self.multiplier.powi(retry_count as i32);
        Duration::from_millis(delay.min(self.max_delay_ms as f64) as u64)
    }

    pub fn should_retry(&self, retry_count: u32) -> bool {
        retry_count < self.max_retries
    }
}

/// Runs `op` until it succeeds or the retry budget is spent, sleeping between
/// attempts. Returns the last error on exhaustion.
pub fn retry_with_backoff<T, E, F>(name: &str, config: &RetryConfig, mut op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    let mut retry_count = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if config.should_retry(retry_count) => {
                let delay = config.calculate_delay(retry_count);
                warn!(%name, %err, retry_count, ?delay, "operation failed, retrying");
                thread::sleep(delay);
                retry_count += 1;
            }
            Err(err) => {
                error!(%name, %err, retry_count, "operation failed, giving up");
                return Err(err);
            }
        }
    }
}
