// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry state machine for remote configuration fetches.
//!
//! [`RetryState`] only tracks attempts and the back-off interval; the caller
//! owns the loop. [`retry_with_state`] is the loop used by the remote reader:
//! register a retry, wait the current interval, re-invoke, repeat.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::lenient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default total number of fetch attempts, the initial one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;
/// Default upper bound for the back-off interval in milliseconds.
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 1500;
/// Default first back-off interval in milliseconds.
pub const DEFAULT_INITIAL_INTERVAL_MS: u64 = 1000;
/// Default growth factor applied to the interval after each retry.
pub const DEFAULT_MULTIPLIER: f64 = 1.1;

/// Retry settings as they appear under `spring.cloud.config.retry`.
///
/// Unset or zero numbers fall back to the defaults above.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryOptions {
    /// Whether failed fetches are retried at all
    #[serde(deserialize_with = "lenient::bool")]
    pub enabled: bool,
    /// Total number of attempts including the first fetch
    #[serde(default, deserialize_with = "lenient::option")]
    pub max_attempts: Option<u32>,
    /// Upper bound for the back-off interval, in milliseconds
    #[serde(default, deserialize_with = "lenient::option")]
    pub max_interval: Option<u64>,
    /// First back-off interval, in milliseconds
    #[serde(default, deserialize_with = "lenient::option")]
    pub initial_interval: Option<u64>,
    /// Growth factor for the interval
    #[serde(default, deserialize_with = "lenient::option")]
    pub multiplier: Option<f64>,
}

impl RetryOptions {
    /// Creates enabled retry options with default tuning.
    pub fn enabled() -> Self {
        RetryOptions {
            enabled: true,
            ..Default::default()
        }
    }

    /// Sets the total number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Sets the interval bounds in milliseconds.
    pub fn with_intervals(mut self, initial_ms: u64, max_ms: u64) -> Self {
        self.initial_interval = Some(initial_ms);
        self.max_interval = Some(max_ms);
        self
    }

    /// Sets the interval growth factor.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Checks the numeric settings.
    pub fn validate(&self) -> Result<()> {
        if let Some(multiplier) = self.multiplier {
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(ConfigError::validation(format!(
                    "\"retry.multiplier\" must be a positive number, got {}",
                    multiplier
                )));
            }
        }
        if let (Some(initial), Some(max)) = (self.initial_interval, self.max_interval) {
            if initial > max && max > 0 {
                return Err(ConfigError::validation(format!(
                    "\"retry.initial-interval\" ({}) must not exceed \"retry.max-interval\" ({})",
                    initial, max
                )));
            }
        }
        Ok(())
    }
}

/// Tracks attempts and back-off for one sequence of remote fetches.
///
/// A fresh state is idle. The first [`register_retry`](Self::register_retry)
/// activates it with the initial interval; each later one grows the interval
/// by the multiplier, capped at the maximum. Once the attempt budget is spent
/// the state resets itself and reports [`ConfigError::RetryExhausted`].
///
/// # Examples
///
/// ```
/// use profilecfg::domain::{RetryOptions, RetryState};
/// use std::time::Duration;
///
/// let mut state = RetryState::new(&RetryOptions::enabled().with_max_attempts(3));
/// state.register_retry().unwrap();
/// assert_eq!(state.current_interval(), Duration::from_millis(1000));
/// state.register_retry().unwrap();
/// assert_eq!(state.current_interval(), Duration::from_millis(1100));
/// assert!(state.register_retry().is_err());
/// assert!(!state.is_active());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RetryState {
    active: bool,
    attempts: u32,
    current_interval_ms: u64,

    max_attempts: u32,
    max_interval_ms: u64,
    initial_interval_ms: u64,
    multiplier: f64,
}

impl RetryState {
    /// Creates an idle state from retry options.
    pub fn new(options: &RetryOptions) -> Self {
        Self {
            active: false,
            attempts: 0,
            current_interval_ms: 0,
            max_attempts: options
                .max_attempts
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            max_interval_ms: options
                .max_interval
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_INTERVAL_MS),
            initial_interval_ms: options
                .initial_interval
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_INITIAL_INTERVAL_MS),
            multiplier: options
                .multiplier
                .filter(|m| *m > 0.0)
                .unwrap_or(DEFAULT_MULTIPLIER),
        }
    }

    /// Records that the caller is about to retry.
    ///
    /// Fails with [`ConfigError::RetryExhausted`] when the attempt budget is
    /// used up, resetting the state first.
    pub fn register_retry(&mut self) -> Result<()> {
        // The initial fetch already consumed one of the attempts.
        if self.attempts.saturating_add(1) >= self.max_attempts {
            let attempts = self.attempts;
            self.reset();
            return Err(ConfigError::RetryExhausted { attempts });
        }

        if self.attempts == 0 {
            self.active = true;
            self.current_interval_ms = self.initial_interval_ms;
        } else {
            let next = (self.current_interval_ms as f64 * self.multiplier).round() as u64;
            self.current_interval_ms = next.min(self.max_interval_ms);
        }

        self.attempts += 1;
        Ok(())
    }

    /// Returns the state to idle.
    pub fn reset(&mut self) {
        self.active = false;
        self.attempts = 0;
        self.current_interval_ms = 0;
    }

    /// Returns true between the first registered retry and a reset.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the number of retries registered so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns how long to wait before the next attempt.
    pub fn current_interval(&self) -> Duration {
        Duration::from_millis(self.current_interval_ms)
    }

    /// Returns the configured total number of attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the configured interval cap.
    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    /// Returns the configured first interval.
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    /// Returns the configured growth factor.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new(&RetryOptions::default())
    }
}

/// Re-invokes `operation` until it succeeds or the retry budget runs out.
///
/// Each iteration registers a retry, hands the current interval to `sleep`, and
/// then calls the operation. Attempts never overlap. The state is reset after a
/// success; exhaustion resets it as well and returns
/// [`ConfigError::RetryExhausted`].
pub fn retry_with_state<T, F, S>(mut operation: F, state: &mut RetryState, mut sleep: S) -> Result<T>
where
    F: FnMut() -> Result<T>,
    S: FnMut(Duration),
{
    loop {
        state.register_retry()?;
        tracing::debug!(
            "Retrying remote configuration fetch (retry {} of {}) in {:?}",
            state.attempts(),
            state.max_attempts() - 1,
            state.current_interval()
        );
        sleep(state.current_interval());

        match operation() {
            Ok(value) => {
                state.reset();
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!("Retry {} failed: {}", state.attempts(), e);
            }
        }
    }
}
