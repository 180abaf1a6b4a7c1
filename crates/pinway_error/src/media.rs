//! Media record errors.

/// Media record failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MediaErrorKind {
    /// The record is not valid JSON or does not match either known shape
    #[display("Malformed media record: {}", _0)]
    Malformed(String),
    /// The legacy `directoryCID` field does not hold a JSON object
    #[display("Legacy directoryCID is not a nested JSON object: {}", _0)]
    LegacyDirectory(String),
    /// A CID string failed validation
    #[display("Invalid content identifier '{}'", _0)]
    InvalidCid(String),
}

/// Media record error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new media error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
