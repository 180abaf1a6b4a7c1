//! Scripted pinning backend for testing.

use async_trait::async_trait;
use pinway_core::ContentId;
use pinway_error::{UploadError, UploadErrorKind};
use pinway_upload::{PinRequest, PinTransport};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// A single scripted answer to a pin request.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 2xx carrying this CID
    Pinned(String),
    /// 2xx carrying a CID derived from the destination file name
    PinnedByName,
    /// Any failure kind
    Error(UploadErrorKind),
}

impl MockResponse {
    /// 5xx with an empty body.
    pub fn server(status: u16) -> Self {
        Self::Error(UploadErrorKind::Server {
            status,
            body: String::new(),
        })
    }

    /// 4xx with an empty body.
    pub fn rejected(status: u16) -> Self {
        Self::Error(UploadErrorKind::Rejected {
            status,
            body: String::new(),
        })
    }

    /// Connection-level failure.
    pub fn network() -> Self {
        Self::Error(UploadErrorKind::Network("connection reset".to_string()))
    }
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<(String, Instant)>,
    unpinned: Vec<String>,
}

/// Mock transport that plays back scripted responses and records each call.
///
/// Once the script runs out, the last response repeats.
#[derive(Debug, Clone)]
pub struct MockPinTransport {
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    last: Arc<Mutex<Option<MockResponse>>>,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockPinTransport {
    /// Mock answering with `responses` in order.
    pub fn new(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into_iter().collect())),
            last: Arc::new(Mutex::new(None)),
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// Mock that always pins as `cid`.
    pub fn always(cid: &str) -> Self {
        Self::new([MockResponse::Pinned(cid.to_string())])
    }

    /// Number of pin requests received.
    pub fn call_count(&self) -> usize {
        self.recorded.lock().unwrap().calls.len()
    }

    /// Destination file name of every pin request, in order.
    pub fn file_names(&self) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Instant each pin request arrived.
    pub fn call_times(&self) -> Vec<Instant> {
        self.recorded
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }

    /// CIDs passed to `unpin`.
    pub fn unpinned(&self) -> Vec<String> {
        self.recorded.lock().unwrap().unpinned.clone()
    }

    fn next_response(&self) -> MockResponse {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        match script.pop_front() {
            Some(response) => {
                *last = Some(response.clone());
                response
            }
            None => last
                .clone()
                .unwrap_or_else(|| MockResponse::Error(UploadErrorKind::MalformedResponse(
                    "empty script".to_string(),
                ))),
        }
    }
}

#[async_trait]
impl PinTransport for MockPinTransport {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn pin_file(&self, request: &PinRequest) -> Result<ContentId, UploadError> {
        self.recorded
            .lock()
            .unwrap()
            .calls
            .push((request.file_name().clone(), Instant::now()));

        match self.next_response() {
            MockResponse::Pinned(cid) => Ok(ContentId::new(cid).unwrap()),
            MockResponse::PinnedByName => {
                Ok(ContentId::new(format!("bafy-{}", request.file_name())).unwrap())
            }
            MockResponse::Error(kind) => Err(UploadError::new(kind)),
        }
    }

    async fn unpin(&self, cid: &ContentId) -> Result<(), UploadError> {
        self.recorded.lock().unwrap().unpinned.push(cid.to_string());
        Ok(())
    }
}
