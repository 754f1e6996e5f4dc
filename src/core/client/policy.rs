//! Retry policy for calls against the hosted inference service.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::{VoiceError, VoiceResult};

/// HTTP status the upstream returns while the model is loading or the
/// service is overloaded. Must always be in the retryable set.
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Retry behavior for transient upstream failures.
///
/// Immutable after startup; carried by `AppConfig` and shared by every
/// request. The delay schedule is pure exponential backoff with no jitter:
/// `base_delay * backoff_multiplier^(attempt - 1)`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total request budget, including the first attempt. Always >= 1.
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Multiplier applied per additional retry
    pub backoff_multiplier: f64,
    /// Status codes treated as transient-unavailable
    pub retryable_status: HashSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // Matches the upstream client behavior this crate replaces:
        // three attempts, sleeping 2s then 4s between them.
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
            retryable_status: HashSet::from([SERVICE_UNAVAILABLE]),
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> VoiceResult<()> {
        if self.max_attempts == 0 {
            return Err(VoiceError::InvalidConfiguration(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }
        if self.backoff_multiplier <= 0.0 || !self.backoff_multiplier.is_finite() {
            return Err(VoiceError::InvalidConfiguration(format!(
                "retry backoff_multiplier must be a positive number, got {}",
                self.backoff_multiplier
            )));
        }
        if !self.retryable_status.contains(&SERVICE_UNAVAILABLE) {
            return Err(VoiceError::InvalidConfiguration(
                "retryable status set must include 503".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a response status is in the transient-unavailable class
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status.contains(&status)
    }

    /// Delay to sleep after a failed attempt, before attempt `attempt + 1`.
    ///
    /// Pure function of the attempt number (1-based) so tests can verify the
    /// schedule without a clock. Saturates at `Duration::MAX` for attempt
    /// counts that overflow the multiplication.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        Duration::try_from_secs_f64(self.base_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
    }
}
