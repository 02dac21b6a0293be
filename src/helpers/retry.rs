use std::time::Duration;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::clock::Clock;

/// Longest single wait between two attempts
const MAX_DELAY: Duration = Duration::from_secs(60);

/// Retry settings as they appear in the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Wait before the second attempt
    #[serde(default = "default_initial_wait_ms")]
    pub initial_wait_ms: u64,

    /// Factor applied to the wait after every failed attempt
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,

    /// Total number of attempts, 0 retries forever
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_initial_wait_ms() -> u64 {
    100
}

fn default_multiplier() -> u32 {
    2
}

fn default_max_attempts() -> usize {
    5
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            initial_wait_ms: default_initial_wait_ms(),
            multiplier: default_multiplier(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Returned when every attempt of an operation failed
#[derive(Debug, Error)]
#[error("giving up after {attempts} attempts: {last_error}")]
pub struct RetryExhausted<E: std::error::Error + 'static> {
    /// Number of attempts that were made
    pub attempts: usize,
    /// Error of the final attempt
    #[source]
    pub last_error: E,
}

/// Retry mechanism with exponential backoff
///
/// With the default policy the waits are 100ms, 200ms, 400ms, 800ms
/// between five attempts.
pub struct RetryHandler {
    /// Current attempt number (0-based)
    attempt: usize,
    /// Maximum number of attempts before giving up
    max_attempts: Option<usize>,
    initial_wait: Duration,
    multiplier: u32,
}

impl RetryHandler {
    /// Create a handler that never gives up
    pub fn new(initial_wait: Duration, multiplier: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts: None,
            initial_wait,
            multiplier,
        }
    }

    /// Create a handler with a maximum number of attempts
    pub fn with_max_attempts(initial_wait: Duration, multiplier: u32, max_attempts: usize) -> Self {
        Self {
            attempt: 0,
            max_attempts: Some(max_attempts.max(1)),
            initial_wait,
            multiplier,
        }
    }

    /// Create a handler from configured settings, `max_attempts == 0` means unlimited
    pub fn from_policy(policy: &RetryPolicy) -> Self {
        let initial_wait = Duration::from_millis(policy.initial_wait_ms);
        if policy.max_attempts == 0 {
            Self::new(initial_wait, policy.multiplier)
        } else {
            Self::with_max_attempts(initial_wait, policy.multiplier, policy.max_attempts)
        }
    }

    /// Check if another attempt is allowed after the current one failed
    pub fn should_retry(&self) -> bool {
        if let Some(max) = self.max_attempts {
            self.attempt + 1 < max
        } else {
            true // Retry indefinitely if no max is set
        }
    }

    /// Get the delay that follows the current attempt
    pub fn get_delay(&self) -> Duration {
        let factor = (self.multiplier.max(1) as u64)
            .checked_pow(self.attempt.min(u32::MAX as usize) as u32)
            .unwrap_or(u64::MAX);
        let millis = (self.initial_wait.as_millis() as u64).saturating_mul(factor);
        std::cmp::min(Duration::from_millis(millis), MAX_DELAY)
    }

    /// Wait for the current retry interval on the given clock
    pub fn wait(&mut self, clock: &dyn Clock) {
        let delay = self.get_delay();
        debug!("Retry attempt {}: waiting {:?} before next attempt", self.attempt + 1, delay);
        clock.sleep(delay);
        self.attempt += 1;
    }

    /// Execute a closure with retry logic
    ///
    /// # Arguments
    /// * `operation` - The operation to retry
    /// * `clock` - Clock used for the waits between attempts
    /// * `operation_name` - Name for logging purposes
    ///
    /// # Returns
    /// * `Ok(T)` from the first successful attempt
    /// * `Err(RetryExhausted)` carrying the error of the last attempt
    pub fn execute_with_retry<T, E, F>(
        &mut self,
        mut operation: F,
        clock: &dyn Clock,
        operation_name: &str,
    ) -> Result<T, RetryExhausted<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut() -> Result<T, E>,
    {
        loop {
            match operation() {
                Ok(result) => {
                    if self.attempt > 0 {
                        debug!("{} succeeded on attempt {}", operation_name, self.attempt + 1);
                    }
                    return Ok(result);
                }
                Err(e) => {
                    warn!("{} failed on attempt {}: {}", operation_name, self.attempt + 1, e);
                    if !self.should_retry() {
                        warn!("{} failed after {} attempts, giving up", operation_name, self.attempt + 1);
                        return Err(RetryExhausted {
                            attempts: self.attempt + 1,
                            last_error: e,
                        });
                    }
                }
            }

            self.wait(clock);
        }
    }
}

impl Default for RetryHandler {
    fn default() -> Self {
        Self::from_policy(&RetryPolicy::default())
    }
}
