//! Pinning uploads with bounded retry.
//!
//! [`UploadRetrier`] sends a payload to a pinning backend and returns the CID
//! it was stored under. Network failures and 5xx answers are retried with
//! capped exponential backoff; 4xx answers fail at once. The backend is
//! reached through the [`PinTransport`] trait, implemented for Pinata's HTTP
//! API by [`PinataTransport`].
//!
//! # Example
//!
//! ```rust,no_run
//! use pinway_core::{MediaKind, PinwayConfig};
//! use pinway_upload::{PinataTransport, UploadPolicy, UploadRetrier, UploadSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PinwayConfig::load()?;
//! let retrier = UploadRetrier::new(
//!     PinataTransport::from_config(&config)?,
//!     UploadPolicy::from_config(&config.upload),
//! );
//!
//! let photo = UploadSource::new(std::fs::read("selfie.jpg")?, "selfie.jpg", MediaKind::Image);
//! let cid = retrier.upload(photo, "0xA11ce").await?;
//! println!("pinned as {cid}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pinata;
mod policy;
mod request;
mod retrier;
mod transport;

pub use pinata::{PINATA_PIN_FILE_PATH, PINATA_UNPIN_PATH, PinataTransport, classify_pin_response};
pub use policy::{UploadPolicy, UploadPolicyBuilder};
pub use request::{
    PinKeyValues, PinMetadata, PinOptions, PinRequest, UploadSource, destination_file_name,
    sanitize_owner_id,
};
pub use retrier::{PairedUpload, UploadAttempt, UploadRetrier};
pub use transport::PinTransport;
