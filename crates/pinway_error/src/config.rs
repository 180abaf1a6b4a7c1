//! Configuration error types.

/// Configuration failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// The merged configuration did not match the expected shape
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
    /// A value was present but unusable
    #[display("Invalid value for '{}': {}", field, reason)]
    InvalidValue {
        /// Dotted path of the offending key
        field: String,
        /// Why it was rejected
        reason: String,
    },
    /// A credential required for the requested operation is not set
    #[display("Missing credential: {}", _0)]
    MissingCredential(String),
}

/// Configuration error with location tracking.
///
/// # Examples
///
/// ```
/// use pinway_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::MissingCredential("upload.jwt".to_string()));
/// assert!(format!("{}", err).contains("upload.jwt"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
