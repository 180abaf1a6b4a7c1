//! Test utilities for pinway_upload tests.

pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_transport::{MockPinTransport, MockResponse};
