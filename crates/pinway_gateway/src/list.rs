//! Ordered gateway list.

use pinway_core::GatewayConfig;
use pinway_error::{GatewayError, GatewayErrorKind, PinwayResult};
use reqwest::Url;
use std::sync::Arc;

/// Path segment every gateway base must end with.
pub(crate) const IPFS_SEGMENT: &str = "ipfs";

/// Non-empty, ordered list of gateway base URLs, most preferred first.
///
/// Bases are path-style (`https://host/ipfs`) so that any URL built from them
/// can be parsed back into its CID. The list is immutable and cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayList {
    bases: Arc<[String]>,
}

impl GatewayList {
    /// Build a list from base URLs in preference order.
    ///
    /// Trailing slashes are dropped and exact duplicates keep only their first
    /// position.
    ///
    /// # Errors
    ///
    /// Fails if the list is empty or any base is not an absolute http(s) URL
    /// ending in an `ipfs` path segment.
    pub fn new<I, S>(bases: I) -> PinwayResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for base in bases {
            let base = normalize_base(base.as_ref())?;
            if !normalized.contains(&base) {
                normalized.push(base);
            }
        }

        if normalized.is_empty() {
            return Err(GatewayError::new(GatewayErrorKind::EmptyList).into());
        }

        Ok(Self {
            bases: normalized.into(),
        })
    }

    /// Put a dedicated gateway first. If it is already listed it moves to the front.
    pub fn with_dedicated(self, dedicated: &str) -> PinwayResult<Self> {
        let dedicated = normalize_base(dedicated)?;
        let mut bases = Vec::with_capacity(self.bases.len() + 1);
        bases.push(dedicated.clone());
        bases.extend(self.bases.iter().filter(|b| **b != dedicated).cloned());

        tracing::info!(gateway = %dedicated, "Using dedicated gateway");
        Ok(Self {
            bases: bases.into(),
        })
    }

    /// Build the list described by configuration, dedicated gateway included.
    pub fn from_config(config: &GatewayConfig) -> PinwayResult<Self> {
        let dedicated = config
            .dedicated
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        match dedicated {
            Some(dedicated) if config.gateways.is_empty() => Self::new([dedicated]),
            Some(dedicated) => Self::new(&config.gateways)?.with_dedicated(dedicated),
            None => Self::new(&config.gateways),
        }
    }

    /// Number of gateways.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// True when no gateway is listed; never the case for a constructed list.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Base URL at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.bases.get(index).map(String::as_str)
    }

    /// Bases in preference order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.bases.iter().map(String::as_str)
    }
}

fn normalize_base(base: &str) -> PinwayResult<String> {
    let trimmed = base.trim().trim_end_matches('/');
    let invalid = |reason: &str| {
        GatewayError::new(GatewayErrorKind::InvalidBase {
            url: base.to_string(),
            reason: reason.to_string(),
        })
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https").into());
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host").into());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed").into());
    }
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back());
    if last_segment != Some(IPFS_SEGMENT) {
        return Err(invalid("path must end with /ipfs").into());
    }

    Ok(trimmed.to_string())
}
