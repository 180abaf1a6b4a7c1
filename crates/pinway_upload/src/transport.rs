//! Pinning backend seam.

use crate::PinRequest;
use pinway_core::ContentId;
use pinway_error::UploadError;

/// A backend that can pin and unpin content.
///
/// Implementations make exactly one request per call and classify the outcome
/// into an [`UploadError`] kind; retrying is the caller's business.
#[async_trait::async_trait]
pub trait PinTransport: Send + Sync {
    /// Short backend name used in logs.
    fn backend_name(&self) -> &'static str;

    /// Send one pin request and return the CID the backend assigned.
    async fn pin_file(&self, request: &PinRequest) -> Result<ContentId, UploadError>;

    /// Ask the backend to stop pinning `cid`.
    async fn unpin(&self, cid: &ContentId) -> Result<(), UploadError>;
}
