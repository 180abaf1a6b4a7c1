//! CID to URL resolution and gateway rebasing.

use crate::list::IPFS_SEGMENT;
use crate::{GatewayAttemptState, GatewayList};
use derive_getters::Getters;
use pinway_core::{ContentId, DEFAULT_MAX_GATEWAY_ATTEMPTS, GatewayConfig};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use pinway_error::PinwayResult;
use reqwest::Url;
use tracing::{debug, warn};

/// Bytes escaped inside one path segment. `/` is never seen here since paths
/// are split before encoding.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// CID and sub-path recovered from a gateway URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct CidPath {
    /// Content identifier following the `ipfs` segment
    cid: String,
    /// Remaining path below the CID, empty when there is none
    subpath: String,
}

impl CidPath {
    /// Pair a CID with a sub-path.
    pub fn new(cid: impl Into<String>, subpath: impl Into<String>) -> Self {
        Self {
            cid: cid.into(),
            subpath: subpath.into(),
        }
    }

    /// Sub-path as an option, `None` when empty.
    pub fn subpath_opt(&self) -> Option<&str> {
        (!self.subpath.is_empty()).then_some(self.subpath.as_str())
    }
}

/// Why a resolution produced no URL.
///
/// Callers treat every variant as "stop"; the distinction exists for logs.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ResolveFailure {
    /// Every gateway has been tried
    #[display("gateway index {} is past the {} configured gateways", index, gateways)]
    Exhausted {
        /// Requested gateway index
        index: usize,
        /// Number of gateways configured
        gateways: usize,
    },
    /// The CID is empty or cannot sit in a URL path segment
    #[display("invalid CID '{}'", _0)]
    InvalidCid(String),
    /// The URL is malformed or has no `/ipfs/{cid}` section
    #[display("cannot extract a CID from '{}'", _0)]
    UnparseableUrl(String),
}

/// Maps CIDs onto an ordered [`GatewayList`].
///
/// Stateless: each call depends only on its arguments and the list, so one
/// resolver is shared by every in-flight media load.
#[derive(Debug, Clone)]
pub struct GatewayResolver {
    gateways: GatewayList,
    max_attempts: usize,
}

impl GatewayResolver {
    /// Resolver over `gateways` with the default attempt budget.
    pub fn new(gateways: GatewayList) -> Self {
        Self {
            gateways,
            max_attempts: DEFAULT_MAX_GATEWAY_ATTEMPTS,
        }
    }

    /// Resolver built from configuration, dedicated gateway first.
    pub fn from_config(config: &GatewayConfig) -> PinwayResult<Self> {
        Ok(Self::new(GatewayList::from_config(config)?).with_max_attempts(config.max_attempts))
    }

    /// Override the per-asset attempt budget (minimum 1).
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// The gateway list.
    pub fn gateways(&self) -> &GatewayList {
        &self.gateways
    }

    /// Attempts an asset may make: the configured budget, capped by the list length.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts.min(self.gateways.len())
    }

    /// URL for `cid` on the gateway at `gateway_index`.
    ///
    /// Returns `None` when the index is past the list or the CID is invalid.
    /// Leading and trailing slashes on `subpath` are ignored. Each segment is
    /// percent-encoded, so spaces and non-ASCII names survive a round trip
    /// through [`extract_cid_from_url`](Self::extract_cid_from_url).
    pub fn resolve_url(
        &self,
        cid: &str,
        subpath: Option<&str>,
        gateway_index: usize,
    ) -> Option<String> {
        log_failure(self.try_resolve_url(cid, subpath, gateway_index))
    }

    /// [`resolve_url`](Self::resolve_url) with the failure reason kept.
    pub fn try_resolve_url(
        &self,
        cid: &str,
        subpath: Option<&str>,
        gateway_index: usize,
    ) -> Result<String, ResolveFailure> {
        if !ContentId::is_valid(cid) {
            return Err(ResolveFailure::InvalidCid(cid.to_string()));
        }
        let base = self
            .gateways
            .get(gateway_index)
            .ok_or(ResolveFailure::Exhausted {
                index: gateway_index,
                gateways: self.gateways.len(),
            })?;

        let cid = utf8_percent_encode(cid, SEGMENT);
        let subpath = subpath.map(|p| p.trim_matches('/')).unwrap_or_default();
        if subpath.is_empty() {
            Ok(format!("{base}/{cid}"))
        } else {
            Ok(format!("{base}/{cid}/{}", encode_path(subpath)))
        }
    }

    /// Recover the CID and sub-path from `.../ipfs/{cid}[/{subpath}]`.
    ///
    /// The first `ipfs` path segment is the anchor. Query and fragment are
    /// ignored. Segments are percent-decoded and read as written, so `.` and
    /// `..` come back unchanged rather than collapsed.
    pub fn extract_cid_from_url(url: &str) -> Option<CidPath> {
        let url = url.trim();
        let parsed = Url::parse(url).ok()?;
        if parsed.cannot_be_a_base() {
            return None;
        }

        let segments: Vec<&str> = raw_path(url).split('/').collect();
        let anchor = segments.iter().position(|s| *s == IPFS_SEGMENT)?;

        let cid = decode_segment(segments.get(anchor + 1)?)?;
        if !ContentId::is_valid(&cid) {
            return None;
        }
        let subpath = segments[anchor + 2..]
            .iter()
            .map(|segment| decode_segment(segment))
            .collect::<Option<Vec<_>>>()?
            .join("/");

        Some(CidPath::new(cid, subpath.trim_end_matches('/')))
    }

    /// Rebase `current_url` onto the gateway at `attempt_index`.
    ///
    /// This is what a media element calls after each load error. `None`
    /// means stop retrying and show the unavailable state.
    pub fn next_gateway_url(&self, current_url: &str, attempt_index: usize) -> Option<String> {
        log_failure(self.try_next_gateway_url(current_url, attempt_index))
    }

    /// [`next_gateway_url`](Self::next_gateway_url) with the failure reason kept.
    pub fn try_next_gateway_url(
        &self,
        current_url: &str,
        attempt_index: usize,
    ) -> Result<String, ResolveFailure> {
        let path = Self::extract_cid_from_url(current_url)
            .ok_or_else(|| ResolveFailure::UnparseableUrl(current_url.to_string()))?;
        self.try_resolve_url(path.cid(), path.subpath_opt(), attempt_index)
    }

    /// Fresh fallback state for one asset, starting at the preferred gateway.
    pub fn attempt_state(&self, cid: ContentId, subpath: impl Into<String>) -> GatewayAttemptState {
        GatewayAttemptState::new(cid, subpath, self.max_attempts())
    }

    /// Fallback state for an asset known only by URL.
    pub fn attempt_state_for_url(&self, url: &str) -> Option<GatewayAttemptState> {
        GatewayAttemptState::from_url(url, self.max_attempts())
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn decode_segment(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Path of `url` exactly as written, without query or fragment.
fn raw_path(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let rest = rest.find(['?', '#']).map_or(rest, |end| &rest[..end]);
    rest.find('/').map_or("", |start| &rest[start..])
}

fn log_failure(result: Result<String, ResolveFailure>) -> Option<String> {
    match result {
        Ok(url) => Some(url),
        Err(failure @ ResolveFailure::Exhausted { .. }) => {
            debug!(%failure, "Gateways exhausted");
            None
        }
        Err(failure) => {
            warn!(%failure, "Cannot resolve media URL");
            None
        }
    }
}
