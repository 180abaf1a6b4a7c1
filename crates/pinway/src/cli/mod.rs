//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the pinway binary.

mod commands;
mod gateway;
mod media;
mod upload;

pub use commands::{Cli, Commands};
pub use gateway::{next, probe, resolve};
pub use media::{normalize_record, show_config};
pub use upload::{unpin, upload, upload_pair};
