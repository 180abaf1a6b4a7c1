//! CLI command definitions.

use clap::{Parser, Subcommand};
use pinway::{MediaKind, PinwayConfig, PinwayResult};
use std::path::PathBuf;

/// Pinway - IPFS gateway fallback and retrying pin uploads
#[derive(Parser, Debug)]
#[command(name = "pinway")]
#[command(about = "IPFS gateway fallback and retrying pin uploads", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Read configuration from this file instead of the usual locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

impl Cli {
    /// Configuration selected by `--config`, or the layered default.
    pub fn load_config(&self) -> PinwayResult<PinwayConfig> {
        match &self.config {
            Some(path) => PinwayConfig::from_file(path),
            None => PinwayConfig::load(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the gateway URL for a CID
    Resolve {
        /// Content identifier
        cid: String,

        /// Path inside the CID, e.g. `video.webm`
        #[arg(long)]
        path: Option<String>,

        /// Gateway index, 0 being the most preferred
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Print the URL on every gateway within the attempt budget
        #[arg(long, conflicts_with = "index")]
        all: bool,
    },

    /// Rebase a gateway URL onto the gateway for the given attempt
    Next {
        /// URL that failed to load
        url: String,

        /// Attempt index to move to
        #[arg(long)]
        attempt: usize,
    },

    /// HEAD-probe every gateway for a CID
    Probe {
        /// Content identifier
        cid: String,

        /// Path inside the CID
        #[arg(long)]
        path: Option<String>,

        /// Per-gateway timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Pin a file
    Upload {
        /// File to upload
        file: PathBuf,

        /// Owner identifier embedded in the pinned name
        #[arg(long)]
        owner: String,

        /// Media kind
        #[arg(long, default_value = "image")]
        kind: MediaKind,

        /// MIME type; defaults by kind
        #[arg(long)]
        mime: Option<String>,

        /// Attempts allowed; defaults to configuration
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Pin a video and a selfie together and print the media reference
    UploadPair {
        /// Video file
        #[arg(long)]
        video: PathBuf,

        /// Selfie image file
        #[arg(long)]
        selfie: PathBuf,

        /// Owner identifier embedded in the pinned names
        #[arg(long)]
        owner: String,
    },

    /// Stop pinning a CID
    Unpin {
        /// Content identifier
        cid: String,
    },

    /// Flatten a media record JSON document (file or stdin)
    Normalize {
        /// JSON file; stdin when omitted
        input: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}
