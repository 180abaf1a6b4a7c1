//! IPFS gateway resolution with ordered fallback.
//!
//! A CID is readable through many HTTP gateways. This crate turns a CID (plus
//! optional sub-path) into a URL on the most preferred gateway and, each time
//! the caller reports a load failure, rebases that URL onto the next gateway
//! in a fixed order until the list or the attempt budget runs out.
//!
//! # Features
//!
//! - **Pure resolution**: [`GatewayResolver`] does no I/O and holds no mutable state
//! - **Rebasing**: any `.../ipfs/{cid}/{path}` URL can be moved to another gateway
//! - **Caller-owned progress**: [`GatewayAttemptState`] is a plain value threaded by the caller
//! - **Diagnostics**: [`GatewayProbe`] issues bounded `HEAD` requests, never retried
//!
//! # Example
//!
//! ```rust
//! use pinway_gateway::{GatewayList, GatewayResolver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateways = GatewayList::new(["https://gw1/ipfs", "https://gw2/ipfs"])?;
//! let resolver = GatewayResolver::new(gateways);
//!
//! let first = resolver.resolve_url("bafkreExample", Some("video.webm"), 0).unwrap();
//! assert_eq!(first, "https://gw1/ipfs/bafkreExample/video.webm");
//!
//! let second = resolver.next_gateway_url(&first, 1).unwrap();
//! assert_eq!(second, "https://gw2/ipfs/bafkreExample/video.webm");
//!
//! assert!(resolver.next_gateway_url(&second, 2).is_none());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attempt;
mod list;
mod probe;
mod resolver;

pub use attempt::{AttemptOutcome, GatewayAttemptState};
pub use list::GatewayList;
pub use probe::{GatewayProbe, ProbeReport};
pub use resolver::{CidPath, GatewayResolver, ResolveFailure};
