//! Gateway list and probe errors.
//!
//! Resolution itself never errors: exhausted or malformed lookups come back as
//! `None` from the resolver. These kinds cover building the gateway list and
//! the diagnostic probe client.

/// Gateway failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GatewayErrorKind {
    /// No gateways were supplied
    #[display("Gateway list must not be empty")]
    EmptyList,
    /// A gateway base URL could not be used
    #[display("Invalid gateway base URL '{}': {}", url, reason)]
    InvalidBase {
        /// The rejected base URL
        url: String,
        /// Why it was rejected
        reason: String,
    },
    /// The HTTP client used for probing could not be built
    #[display("Failed to build probe client: {}", _0)]
    ProbeClient(String),
}

/// Gateway error with location tracking.
///
/// # Examples
///
/// ```
/// use pinway_error::{GatewayError, GatewayErrorKind};
///
/// let err = GatewayError::new(GatewayErrorKind::EmptyList);
/// assert!(format!("{}", err).contains("must not be empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The kind of error that occurred
    pub kind: GatewayErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new gateway error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
