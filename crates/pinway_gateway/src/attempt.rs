//! Per-asset fallback progress.

use crate::GatewayResolver;
use pinway_core::ContentId;

/// What the caller should do after reporting a load failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Point the media element at this URL
    Retry(String),
    /// Stop and show the unavailable state until the user asks again
    Exhausted,
}

/// Fallback progress for a single media load.
///
/// Owned by whoever renders the asset. The index starts at the preferred
/// gateway and moves forward by exactly one per reported failure; it never
/// skips ahead and is never shared between assets.
///
/// # Examples
///
/// ```
/// use pinway_core::ContentId;
/// use pinway_gateway::{AttemptOutcome, GatewayList, GatewayResolver};
///
/// let resolver = GatewayResolver::new(GatewayList::new(["https://gw1/ipfs", "https://gw2/ipfs"]).unwrap());
/// let mut state = resolver.attempt_state(ContentId::new("bafy").unwrap(), "");
///
/// assert_eq!(state.current_url(&resolver).unwrap(), "https://gw1/ipfs/bafy");
/// assert_eq!(state.record_failure(&resolver), AttemptOutcome::Retry("https://gw2/ipfs/bafy".into()));
/// assert_eq!(state.record_failure(&resolver), AttemptOutcome::Exhausted);
/// assert!(state.is_terminal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayAttemptState {
    cid: ContentId,
    subpath: String,
    attempt_index: usize,
    max_attempts: usize,
}

impl GatewayAttemptState {
    /// Start at the preferred gateway. A budget of zero is raised to one.
    pub fn new(cid: ContentId, subpath: impl Into<String>, max_attempts: usize) -> Self {
        let subpath: String = subpath.into();
        Self {
            cid,
            subpath: subpath.trim_matches('/').to_string(),
            attempt_index: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Start from an already gateway-qualified URL.
    pub fn from_url(url: &str, max_attempts: usize) -> Option<Self> {
        let path = GatewayResolver::extract_cid_from_url(url)?;
        let cid = ContentId::new(path.cid()).ok()?;
        Some(Self::new(cid, path.subpath().clone(), max_attempts))
    }

    /// The asset's CID.
    pub fn cid(&self) -> &ContentId {
        &self.cid
    }

    /// The asset's sub-path, empty when none.
    pub fn subpath(&self) -> &str {
        &self.subpath
    }

    /// Index of the gateway currently in use.
    pub fn attempt_index(&self) -> usize {
        self.attempt_index
    }

    /// Attempt budget.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// True once the budget is spent.
    pub fn is_terminal(&self) -> bool {
        self.attempt_index >= self.max_attempts
    }

    /// URL for the current attempt, or `None` when terminal.
    pub fn current_url(&self, resolver: &GatewayResolver) -> Option<String> {
        if self.is_terminal() {
            return None;
        }
        let subpath = (!self.subpath.is_empty()).then_some(self.subpath.as_str());
        resolver.resolve_url(self.cid.as_str(), subpath, self.attempt_index)
    }

    /// Record that the current URL failed to load and move to the next gateway.
    ///
    /// Once terminal, further calls change nothing and keep returning
    /// [`AttemptOutcome::Exhausted`].
    pub fn record_failure(&mut self, resolver: &GatewayResolver) -> AttemptOutcome {
        if self.is_terminal() {
            return AttemptOutcome::Exhausted;
        }
        self.attempt_index += 1;

        match self.current_url(resolver) {
            Some(url) => {
                tracing::debug!(
                    cid = %self.cid,
                    attempt = self.attempt_index,
                    max_attempts = self.max_attempts,
                    url = %url,
                    "Falling back to next gateway"
                );
                AttemptOutcome::Retry(url)
            }
            None => {
                tracing::warn!(
                    cid = %self.cid,
                    attempts = self.attempt_index,
                    "Media unavailable on every gateway"
                );
                AttemptOutcome::Exhausted
            }
        }
    }

    /// Start over from the preferred gateway after an explicit user action.
    pub fn restart(&mut self) {
        self.attempt_index = 0;
    }
}
