//! Pinway - IPFS media addressing
//!
//! Pinway covers the two halves of keeping user media on IPFS: pinning it
//! through a pinning service, and reading it back through public gateways
//! that come and go.
//!
//! # Features
//!
//! - **Gateway fallback**: resolve a CID on an ordered gateway list and rebase
//!   failed URLs onto the next gateway until the attempt budget runs out
//! - **Liveness probing**: bounded `HEAD` checks for diagnostics
//! - **Retrying uploads**: pin payloads with capped exponential backoff,
//!   retrying only failures that can succeed later
//! - **Paired uploads**: video and selfie pinned together, with a CID collision check
//! - **Legacy records**: flatten media records that hide their CIDs in a nested JSON string
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pinway::{GatewayResolver, MediaKind, PinataTransport, PinwayConfig, UploadPolicy,
//!     UploadRetrier, UploadSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PinwayConfig::load()?;
//!
//! let retrier = UploadRetrier::new(
//!     PinataTransport::from_config(&config)?,
//!     UploadPolicy::from_config(&config.upload),
//! );
//! let source = UploadSource::new(std::fs::read("selfie.jpg")?, "selfie.jpg", MediaKind::Image);
//! let cid = retrier.upload(source, "0xA11ce").await?;
//!
//! let resolver = GatewayResolver::from_config(&config.gateway)?;
//! println!("{:?}", resolver.resolve_url(cid.as_str(), None, 0));
//! # Ok(())
//! # }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry span export to stdout alongside the log output
//!
//! # Architecture
//!
//! - `pinway_error` - Error types
//! - `pinway_core` - CIDs, media records, configuration, tracing setup
//! - `pinway_gateway` - Gateway list, resolver, attempt state, probe
//! - `pinway_upload` - Pin transport, retry policy, upload retrier
//!
//! This crate re-exports everything for convenience.

pub use pinway_core::*;
pub use pinway_error::*;
pub use pinway_gateway::*;
pub use pinway_upload::*;

#[cfg(feature = "observability")]
mod observability;

#[cfg(feature = "observability")]
pub use observability::{ObservabilityConfig, init_observability, shutdown_observability};
