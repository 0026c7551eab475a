//! Retry Logic with Fixed Delay
//!
//! Handles transient failures from the image generation endpoint by
//! retrying failed requests with a fixed delay between attempts.
//!
//! ## Retriable vs Non-Retriable Outcomes
//!
//! **Retriable** (will be retried):
//! - Any transport error (connection refused, timeout, DNS failure)
//! - Any non-200 HTTP status
//!
//! **Non-Retriable**:
//! - 200 OK - Request succeeded
//!
//! The generation endpoint is a free public service that fails in bursts;
//! there is no value in distinguishing 4xx from 5xx for a fire-and-forget
//! scheduled run, so everything short of success is retried until the
//! attempt cap is reached.

use std::time::Duration;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt)
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: crate::constants::GENERATION_MAX_ATTEMPTS,
            delay: Duration::from_secs(crate::constants::GENERATION_RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Check if an HTTP status code should be retried
    pub fn is_retriable_status(&self, status_code: u16) -> bool {
        status_code != 200
    }

    /// Delay to wait before a given attempt number (0-indexed)
    ///
    /// # Arguments
    /// * `attempt` - The attempt number (0 = first attempt, 1 = first retry, etc.)
    ///
    /// # Returns
    /// Duration to wait before the attempt (zero for the first attempt)
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.delay
    }

    /// Check if another attempt should be made after a failed one
    ///
    /// # Arguments
    /// * `attempt` - Current attempt number (0-indexed)
    ///
    /// # Returns
    /// true if we should retry, false if attempts are exhausted
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }

    #[test]
    fn test_retriable_status_codes() {
        let policy = RetryPolicy::default();

        assert!(policy.is_retriable_status(500), "500 should be retriable");
        assert!(policy.is_retriable_status(502), "502 should be retriable");
        assert!(policy.is_retriable_status(404), "404 should be retriable");
        assert!(policy.is_retriable_status(429), "429 should be retriable");

        assert!(
            !policy.is_retriable_status(200),
            "200 should not be retriable"
        );
    }

    #[test]
    fn test_fixed_delay() {
        let policy = RetryPolicy::new(3, Duration::from_secs(5));

        // First attempt: no delay
        assert_eq!(policy.delay_before(0), Duration::ZERO);

        // Every retry waits the same fixed delay
        assert_eq!(policy.delay_before(1), Duration::from_secs(5));
        assert_eq!(policy.delay_before(2), Duration::from_secs(5));
    }

    #[test]
    fn test_should_retry_logic() {
        let policy = RetryPolicy::new(3, Duration::from_secs(5));

        assert!(policy.should_retry(0), "Should retry after attempt 0");
        assert!(policy.should_retry(1), "Should retry after attempt 1");
        assert!(
            !policy.should_retry(2),
            "Should not retry after attempt 2 (max attempts reached)"
        );
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = RetryPolicy::new(1, Duration::from_secs(5));
        assert!(!policy.should_retry(0));
    }
}
