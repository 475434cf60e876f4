//! Retry policy for transient completion failures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 2_000;

/// Default cap on a single backoff window in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 60_000;

/// Default exponential growth factor.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Randomized exponential backoff.
///
/// The wait before retry `n` (1-based) is drawn uniformly from
/// `[0, min(base * multiplier^(n-1), max)]`.
///
/// # Examples
///
/// ```
/// use survey_retrieval::llm::retry::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 100);
/// assert!(policy.delay_for_attempt(1).as_millis() <= 2_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first (1 = never retry).
    pub max_attempts: u32,
    /// Upper bound of the first backoff window in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound of any backoff window in milliseconds.
    pub max_delay_ms: u64,
    /// Growth factor of the window per retry.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries `max_attempts - 1` times without waiting.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::default()
            .with_max_attempts(max_attempts)
            .with_base_delay_ms(0)
            .with_max_delay_ms(0)
    }

    /// Set the total number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the base delay in milliseconds.
    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    /// Set the maximum delay in milliseconds.
    pub fn with_max_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Upper bound of the backoff window before retry `attempt`.
    pub fn window_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exp = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1).min(i32::MAX as u32) as i32);
        let window = (self.base_delay_ms as f64 * exp).min(self.max_delay_ms as f64);
        Duration::from_millis(window as u64)
    }

    /// A random delay inside the window for retry `attempt`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let window = self.window_for_attempt(attempt);
        if window.is_zero() {
            return window;
        }
        window.mul_f64(rand::random::<f64>())
    }
}
