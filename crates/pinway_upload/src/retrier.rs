//! Bounded-retry upload loop.

use crate::{PinRequest, PinTransport, UploadPolicy, UploadSource};
use chrono::Utc;
use derive_getters::Getters;
use pinway_core::{ContentId, MediaKind, MediaReference};
use pinway_error::{PinwayResult, RetryableError, UploadError, UploadErrorKind};
use std::sync::atomic::{AtomicU32, Ordering};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, instrument, warn};

/// Position of one attempt within an upload.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct UploadAttempt {
    /// Destination file name, identical for every attempt of one upload
    file_name: String,
    /// 1-based attempt number
    attempt_number: u32,
    /// Attempts allowed in total
    max_retries: u32,
}

impl UploadAttempt {
    /// Describe attempt `attempt_number` of `max_retries`.
    pub fn new(file_name: impl Into<String>, attempt_number: u32, max_retries: u32) -> Self {
        Self {
            file_name: file_name.into(),
            attempt_number,
            max_retries,
        }
    }

    /// No attempt follows this one.
    pub fn is_last(&self) -> bool {
        self.attempt_number >= self.max_retries
    }
}

/// CIDs of a video and selfie uploaded together.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PairedUpload {
    /// CID of the video
    video_cid: ContentId,
    /// CID of the selfie
    selfie_cid: ContentId,
}

impl PairedUpload {
    /// Media reference addressing both assets.
    pub fn into_media_reference(self) -> MediaReference {
        MediaReference::from_pair(self.video_cid, self.selfie_cid)
    }
}

/// Uploads payloads through a [`PinTransport`] under an [`UploadPolicy`].
#[derive(Debug, Clone)]
pub struct UploadRetrier<T> {
    transport: T,
    policy: UploadPolicy,
}

impl<T: PinTransport> UploadRetrier<T> {
    /// Retrier sending through `transport`.
    pub fn new(transport: T, policy: UploadPolicy) -> Self {
        Self { transport, policy }
    }

    /// Transport in use.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Policy in use.
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Upload with the policy's attempt budget.
    pub async fn upload(
        &self,
        source: UploadSource,
        owner_id: &str,
    ) -> Result<ContentId, UploadError> {
        self.upload_with_retries(source, owner_id, *self.policy.max_retries())
            .await
    }

    /// Upload allowing at most `max_retries` attempts in total.
    ///
    /// Network failures and 5xx answers are retried after the policy's
    /// backoff; any other failure ends the upload at once. Every attempt
    /// sends the same destination name, fixed before the first attempt.
    /// Exhausting the budget yields [`UploadErrorKind::Exhausted`].
    #[instrument(
        skip(self, source),
        fields(
            backend = self.transport.backend_name(),
            file_name = %source.file_name(),
            kind = %source.kind(),
            size = source.payload().len(),
        )
    )]
    pub async fn upload_with_retries(
        &self,
        source: UploadSource,
        owner_id: &str,
        max_retries: u32,
    ) -> Result<ContentId, UploadError> {
        if source.payload().is_empty() {
            return Err(UploadError::new(UploadErrorKind::InvalidInput(
                "payload is empty".to_string(),
            )));
        }
        if source.file_name().trim().is_empty() {
            return Err(UploadError::new(UploadErrorKind::InvalidInput(
                "file name is empty".to_string(),
            )));
        }
        if max_retries == 0 {
            return Err(UploadError::new(UploadErrorKind::InvalidInput(
                "max_retries must be at least 1".to_string(),
            )));
        }

        let request = PinRequest::prepare(source, owner_id, &self.policy, Utc::now());
        let schedule = self.policy.backoff_schedule(max_retries);
        let attempts = AtomicU32::new(0);
        debug!(
            destination = %request.file_name(),
            max_retries,
            "Starting upload"
        );

        let result = Retry::spawn(schedule, || {
            let request = &request;
            let attempts = &attempts;
            async move {
                let attempt = UploadAttempt::new(
                    request.file_name().clone(),
                    attempts.fetch_add(1, Ordering::SeqCst) + 1,
                    max_retries,
                );
                debug!(attempt = attempt.attempt_number, "Pin attempt");

                match self.transport.pin_file(request).await {
                    Ok(cid) => Ok(cid),
                    Err(e) if e.is_retryable() => {
                        warn!(
                            attempt = attempt.attempt_number,
                            last = attempt.is_last(),
                            error = %e.kind,
                            "Pin attempt failed, retryable"
                        );
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(e) => {
                        warn!(
                            attempt = attempt.attempt_number,
                            error = %e.kind,
                            "Pin attempt failed, not retrying"
                        );
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await;

        let made = attempts.load(Ordering::SeqCst);
        match result {
            Ok(cid) => {
                info!(cid = %cid, attempts = made, "Upload pinned");
                Ok(cid)
            }
            Err(e) if e.is_retryable() => {
                warn!(attempts = made, error = %e.kind, "Upload attempts exhausted");
                Err(UploadError::new(UploadErrorKind::Exhausted {
                    file_name: request.file_name().clone(),
                    attempts: made,
                    last_error: e.kind.to_string(),
                }))
            }
            Err(e) => Err(e),
        }
    }

    /// Upload a video and a selfie concurrently.
    ///
    /// Both uploads run to completion even when one fails; the video's error
    /// is reported first. Equal CIDs fail with [`UploadErrorKind::CidCollision`].
    #[instrument(skip(self, video, selfie))]
    pub async fn upload_pair(
        &self,
        video: UploadSource,
        selfie: UploadSource,
        owner_id: &str,
    ) -> PinwayResult<PairedUpload> {
        for (source, expected) in [(&video, MediaKind::Video), (&selfie, MediaKind::Image)] {
            if *source.kind() != expected {
                return Err(UploadError::new(UploadErrorKind::InvalidInput(format!(
                    "'{}' is {}, expected {}",
                    source.file_name(),
                    source.kind(),
                    expected
                )))
                .into());
            }
        }

        let (video_cid, selfie_cid) =
            tokio::join!(self.upload(video, owner_id), self.upload(selfie, owner_id));
        let video_cid = video_cid?;
        let selfie_cid = selfie_cid?;

        if video_cid == selfie_cid {
            warn!(cid = %video_cid, "Video and selfie share a CID");
            return Err(UploadError::new(UploadErrorKind::CidCollision(video_cid.to_string())).into());
        }

        Ok(PairedUpload {
            video_cid,
            selfie_cid,
        })
    }

    /// Stop pinning `cid`. One request, no retry.
    #[instrument(skip(self), fields(backend = self.transport.backend_name()))]
    pub async fn unpin(&self, cid: &ContentId) -> Result<(), UploadError> {
        self.transport.unpin(cid).await
    }
}
