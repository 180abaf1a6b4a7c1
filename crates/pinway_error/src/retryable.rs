//! Retry classification shared by fallible network operations.

/// Trait for errors that support retry logic.
///
/// Transient failures (connection reset, 5xx) return true. Failures that no
/// amount of waiting will fix (bad credentials, malformed payload) return false.
pub trait RetryableError {
    /// Returns true if this error should trigger another attempt.
    fn is_retryable(&self) -> bool;
}
