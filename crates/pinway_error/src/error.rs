//! Top-level error wrapper types.

use crate::{ConfigError, GatewayError, MediaError, UploadError};

/// Every failure pinway can report, one variant per concern.
///
/// # Examples
///
/// ```
/// use pinway_error::{GatewayError, GatewayErrorKind, PinwayError, PinwayErrorKind};
///
/// let err: PinwayError = GatewayError::new(GatewayErrorKind::EmptyList).into();
/// assert!(matches!(err.kind(), PinwayErrorKind::Gateway(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PinwayErrorKind {
    /// Configuration could not be loaded or is invalid
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gateway list construction or probing failed
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Upload or unpin against the pinning backend failed
    #[from(UploadError)]
    Upload(UploadError),
    /// A media record could not be parsed or normalized
    #[from(MediaError)]
    Media(MediaError),
}

/// Pinway error with kind discrimination.
///
/// The kind is boxed so `PinwayResult` stays one pointer wide on the error path.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Pinway Error: {}", _0)]
pub struct PinwayError(Box<PinwayErrorKind>);

impl PinwayError {
    /// Create a new error from a kind.
    pub fn new(kind: PinwayErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PinwayErrorKind {
        &self.0
    }

    /// The upload error inside, if this is one.
    pub fn as_upload(&self) -> Option<&UploadError> {
        match self.kind() {
            PinwayErrorKind::Upload(e) => Some(e),
            _ => None,
        }
    }
}

impl<T> From<T> for PinwayError
where
    T: Into<PinwayErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for pinway operations.
pub type PinwayResult<T> = std::result::Result<T, PinwayError>;
