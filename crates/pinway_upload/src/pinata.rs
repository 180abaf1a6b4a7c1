//! Pinata HTTP transport.

use crate::{PinRequest, PinTransport};
use pinway_core::{ContentId, PinwayConfig};
use pinway_error::{PinwayResult, UploadError, UploadErrorKind};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Pin endpoint, relative to the API root.
pub const PINATA_PIN_FILE_PATH: &str = "/pinning/pinFileToIPFS";
/// Unpin endpoint prefix, relative to the API root; the CID follows.
pub const PINATA_UNPIN_PATH: &str = "/pinning/unpin";

#[derive(Debug, Deserialize)]
struct PinFileResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: Option<String>,
}

/// Turn a pin response into a CID or a classified error.
///
/// 2xx needs a valid `IpfsHash` in the body; anything else is malformed.
/// 5xx is a server error (retryable); every other status is a rejection.
///
/// # Examples
///
/// ```
/// use pinway_upload::classify_pin_response;
/// use pinway_error::UploadErrorKind;
///
/// let cid = classify_pin_response(200, r#"{"IpfsHash":"bafyabc","PinSize":3}"#).unwrap();
/// assert_eq!(cid.as_str(), "bafyabc");
///
/// let err = classify_pin_response(401, "bad jwt").unwrap_err();
/// assert!(matches!(err.kind, UploadErrorKind::Rejected { status: 401, .. }));
/// ```
#[track_caller]
pub fn classify_pin_response(status: u16, body: &str) -> Result<ContentId, UploadError> {
    if !(200..300).contains(&status) {
        return Err(UploadError::new(UploadErrorKind::from_status(
            status,
            body.to_string(),
        )));
    }

    let parsed: PinFileResponse = serde_json::from_str(body).map_err(|e| {
        UploadError::new(UploadErrorKind::MalformedResponse(format!(
            "unreadable body: {e}"
        )))
    })?;

    let hash = parsed.ipfs_hash.ok_or_else(|| {
        UploadError::new(UploadErrorKind::MalformedResponse(
            "IpfsHash missing from success response".to_string(),
        ))
    })?;

    ContentId::new(&hash).map_err(|_| {
        UploadError::new(UploadErrorKind::MalformedResponse(format!(
            "IpfsHash '{hash}' is not a usable CID"
        )))
    })
}

/// Pinata pinning API client.
#[derive(Debug, Clone)]
pub struct PinataTransport {
    client: Client,
    endpoint: String,
    jwt: String,
}

impl PinataTransport {
    /// Client for the API rooted at `endpoint`, authenticating with `jwt`.
    pub fn new(
        endpoint: impl Into<String>,
        jwt: impl Into<String>,
        request_timeout: Duration,
    ) -> PinwayResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                UploadError::new(UploadErrorKind::InvalidInput(format!(
                    "cannot build HTTP client: {e}"
                )))
            })?;
        Ok(Self::with_client(client, endpoint, jwt))
    }

    /// Client sharing an existing `reqwest::Client`.
    pub fn with_client(client: Client, endpoint: impl Into<String>, jwt: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            jwt: jwt.into(),
        }
    }

    /// Client described by configuration. Requires `upload.jwt`.
    pub fn from_config(config: &PinwayConfig) -> PinwayResult<Self> {
        let jwt = config.require_jwt()?;
        Self::new(
            &config.upload.endpoint,
            jwt,
            Duration::from_millis(config.upload.request_timeout_ms),
        )
    }

    /// API root in use.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(request: &PinRequest) -> Result<Form, UploadError> {
        let encode = |e: serde_json::Error| {
            UploadError::new(UploadErrorKind::InvalidInput(format!(
                "cannot encode pin metadata: {e}"
            )))
        };
        let metadata = serde_json::to_string(&request.metadata()).map_err(encode)?;
        let options = serde_json::to_string(request.options()).map_err(encode)?;

        let file = Part::bytes(request.payload().clone())
            .file_name(request.file_name().clone())
            .mime_str(request.mime_type())
            .map_err(|e| {
                UploadError::new(UploadErrorKind::InvalidInput(format!(
                    "invalid MIME type '{}': {e}",
                    request.mime_type()
                )))
            })?;

        Ok(Form::new()
            .part("file", file)
            .text("pinataMetadata", metadata)
            .text("pinataOptions", options))
    }
}

fn network_error(context: &str, e: reqwest::Error) -> UploadError {
    UploadError::new(UploadErrorKind::Network(format!("{context}: {e}")))
}

#[async_trait::async_trait]
impl PinTransport for PinataTransport {
    fn backend_name(&self) -> &'static str {
        "pinata"
    }

    #[instrument(skip(self, request), fields(file_name = %request.file_name(), size = request.payload().len()))]
    async fn pin_file(&self, request: &PinRequest) -> Result<ContentId, UploadError> {
        let url = format!("{}{}", self.endpoint, PINATA_PIN_FILE_PATH);
        debug!(url = %url, "Sending pin request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.jwt)
            .multipart(Self::form(request)?)
            .send()
            .await
            .map_err(|e| network_error("pin request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| network_error("reading pin response failed", e))?;

        if !status.is_success() {
            error!(%status, body = %body, "Pinning backend returned error");
        }
        classify_pin_response(status.as_u16(), &body)
    }

    #[instrument(skip(self), fields(cid = %cid))]
    async fn unpin(&self, cid: &ContentId) -> Result<(), UploadError> {
        let url = format!("{}{}/{}", self.endpoint, PINATA_UNPIN_PATH, cid);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.jwt)
            .send()
            .await
            .map_err(|e| network_error("unpin request failed", e))?;

        let status = response.status();
        if status.is_success() {
            debug!("Unpinned");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!(%status, body = %body, "Unpin failed");
        Err(UploadError::new(UploadErrorKind::from_status(
            status.as_u16(),
            body,
        )))
    }
}
