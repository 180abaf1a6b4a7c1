//! Error types for pinway.
//!
//! Every concern in the workspace reports failures through this crate.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with the source location that raised it
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! Everything converts into [`PinwayError`], so `?` works across crate boundaries.
//!
//! # Examples
//!
//! ```
//! use pinway_error::{PinwayResult, UploadError, UploadErrorKind};
//!
//! fn pin() -> PinwayResult<String> {
//!     Err(UploadError::new(UploadErrorKind::Rejected {
//!         status: 401,
//!         body: "invalid token".to_string(),
//!     }))?
//! }
//!
//! assert!(pin().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gateway;
mod media;
mod retryable;
mod upload;

pub use config::{ConfigError, ConfigErrorKind};
pub use error::{PinwayError, PinwayErrorKind, PinwayResult};
pub use gateway::{GatewayError, GatewayErrorKind};
pub use media::{MediaError, MediaErrorKind};
pub use retryable::RetryableError;
pub use upload::{UploadError, UploadErrorKind};
