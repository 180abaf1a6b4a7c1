//! Pinning upload errors and their retry classification.

use crate::RetryableError;

/// Upload failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UploadErrorKind {
    /// The call was rejected before any request was sent
    #[display("Invalid upload input: {}", _0)]
    InvalidInput(String),
    /// The request never produced an HTTP response (connect, TLS, timeout)
    #[display("Network failure: {}", _0)]
    Network(String),
    /// Backend answered with a 5xx status
    #[display("Pinning backend error {}: {}", status, body)]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },
    /// Backend refused the request (4xx or any other non-success, non-5xx status)
    #[display("Pinning backend rejected request with {}: {}", status, body)]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },
    /// Backend reported success but the body carried no usable CID
    #[display("Malformed pin response: {}", _0)]
    MalformedResponse(String),
    /// Every allowed attempt failed with a retryable error
    #[display("Upload of '{}' failed after {} attempts: {}", file_name, attempts, last_error)]
    Exhausted {
        /// Destination file name used for every attempt
        file_name: String,
        /// Attempts made
        attempts: u32,
        /// Display form of the final attempt's error
        last_error: String,
    },
    /// Two uploads that must address distinct assets returned the same CID
    #[display("Paired upload returned the same CID for both assets: {}", _0)]
    CidCollision(String),
}

impl UploadErrorKind {
    /// Transport and server failures may succeed on a later attempt; nothing else will.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UploadErrorKind::Network(_) | UploadErrorKind::Server { .. }
        )
    }

    /// Classify a non-success HTTP status into the matching kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinway_error::UploadErrorKind;
    ///
    /// assert!(UploadErrorKind::from_status(503, String::new()).is_retryable());
    /// assert!(!UploadErrorKind::from_status(403, String::new()).is_retryable());
    /// ```
    pub fn from_status(status: u16, body: String) -> Self {
        if (500..600).contains(&status) {
            UploadErrorKind::Server { status, body }
        } else {
            UploadErrorKind::Rejected { status, body }
        }
    }
}

/// Upload error with location tracking.
///
/// # Examples
///
/// ```
/// use pinway_error::{RetryableError, UploadError, UploadErrorKind};
///
/// let err = UploadError::new(UploadErrorKind::Server {
///     status: 502,
///     body: "bad gateway".to_string(),
/// });
/// assert!(err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upload Error: {} at line {} in {}", kind, line, file)]
pub struct UploadError {
    /// The kind of error that occurred
    pub kind: UploadErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UploadError {
    /// Create a new upload error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UploadErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for UploadError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
