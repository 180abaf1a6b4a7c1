//! Retry policy for uploads.

use derive_getters::Getters;
use pinway_core::UploadConfig;
use std::time::Duration;

/// How many times to try an upload and how long to wait in between.
///
/// The wait before attempt `k` (`k >= 2`) is
/// `min(initial_backoff * 2^(k-2), max_backoff)`.
///
/// # Examples
///
/// ```
/// use pinway_upload::UploadPolicy;
/// use std::time::Duration;
///
/// let policy = UploadPolicy::default();
/// assert_eq!(policy.delay_before_attempt(2), Duration::from_millis(1000));
/// assert_eq!(policy.delay_before_attempt(3), Duration::from_millis(2000));
/// assert_eq!(policy.delay_before_attempt(9), Duration::from_millis(10_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct UploadPolicy {
    /// Total attempts, first try included
    max_retries: u32,
    /// Wait before the second attempt
    initial_backoff: Duration,
    /// Cap on any single wait
    max_backoff: Duration,
    /// Scale each wait by a random factor in `[0, 1)`
    jitter: bool,
    /// CID version requested from the backend
    cid_version: u8,
    /// Ask the backend to wrap the file in a directory
    wrap_with_directory: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(1_000),
            max_backoff: Duration::from_millis(10_000),
            jitter: false,
            cid_version: 1,
            wrap_with_directory: false,
        }
    }
}

impl UploadPolicy {
    /// Start a builder seeded with the defaults.
    pub fn builder() -> UploadPolicyBuilder {
        UploadPolicyBuilder::default()
    }

    /// Policy described by configuration.
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            max_retries: config.max_retries.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            jitter: config.jitter,
            cid_version: config.cid_version,
            wrap_with_directory: config.wrap_with_directory,
        }
    }

    /// Wait before attempt number `attempt` (1-based). Zero for the first attempt.
    pub fn delay_before_attempt(&self, attempt: u32) -> Duration {
        if attempt < 2 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Waits between consecutive attempts of an upload allowed `max_retries` attempts.
    ///
    /// Has `max_retries - 1` entries: one before each attempt after the first.
    pub fn backoff_schedule(&self, max_retries: u32) -> Vec<Duration> {
        (2..=max_retries)
            .map(|attempt| self.delay_before_attempt(attempt))
            .map(|delay| {
                if self.jitter {
                    tokio_retry2::strategy::jitter(delay)
                } else {
                    delay
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_double_then_cap() {
        let policy = UploadPolicy::default();
        let expected = [1_000, 2_000, 4_000, 8_000, 10_000, 10_000, 10_000];
        for (offset, ms) in expected.iter().enumerate() {
            let attempt = offset as u32 + 2;
            assert_eq!(policy.delay_before_attempt(attempt), Duration::from_millis(*ms));
        }
    }

    #[test]
    fn huge_attempt_numbers_stay_capped() {
        let policy = UploadPolicy::default();
        for attempt in [40, 64, 1_000, u32::MAX] {
            assert_eq!(policy.delay_before_attempt(attempt), Duration::from_secs(10));
        }
    }

    #[test]
    fn first_attempt_has_no_wait() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.delay_before_attempt(0), Duration::ZERO);
        assert_eq!(policy.delay_before_attempt(1), Duration::ZERO);
    }

    #[test]
    fn schedule_has_one_wait_per_retry() {
        let policy = UploadPolicy::default();
        assert!(policy.backoff_schedule(1).is_empty());
        assert_eq!(
            policy.backoff_schedule(4),
            vec![
                Duration::from_millis(1_000),
                Duration::from_millis(2_000),
                Duration::from_millis(4_000)
            ]
        );
    }

    #[test]
    fn jittered_waits_never_exceed_cap() {
        let policy = UploadPolicy::builder().jitter(true).build().unwrap();
        for (index, delay) in policy.backoff_schedule(12).into_iter().enumerate() {
            assert!(delay <= policy.delay_before_attempt(index as u32 + 2));
            assert!(delay <= Duration::from_secs(10));
        }
    }
}
