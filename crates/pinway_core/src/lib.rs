//! Core data types for pinway.
//!
//! This crate holds the vocabulary shared by the gateway resolver and the
//! upload retrier: content identifiers, media kinds, the media record model
//! with its legacy normalization, configuration loading and tracing setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cid;
mod config;
mod media;
mod media_kind;
mod telemetry;

pub use cid::ContentId;
pub use config::{
    DEFAULT_MAX_GATEWAY_ATTEMPTS, GatewayConfig, LoggingConfig, PinwayConfig, UploadConfig,
};
pub use media::{MediaRecord, MediaReference, MediaTimestamp};
pub use media_kind::MediaKind;
pub use telemetry::init_tracing;
