//! Content identifiers.

use pinway_error::{MediaError, MediaErrorKind};
use serde::{Deserialize, Serialize};

/// Hash-derived, immutable name of a piece of content.
///
/// The value is opaque: pinway never decodes the multihash. Construction only
/// guarantees the string can sit in a single URL path segment.
///
/// # Examples
///
/// ```
/// use pinway_core::ContentId;
///
/// let cid = ContentId::new("bafkreExample").unwrap();
/// assert_eq!(cid.as_str(), "bafkreExample");
/// assert!(ContentId::new("").is_err());
/// assert!(ContentId::new("a/b").is_err());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Validate and wrap a CID string. Surrounding whitespace is trimmed.
    #[track_caller]
    pub fn new(value: impl AsRef<str>) -> Result<Self, MediaError> {
        let trimmed = value.as_ref().trim();
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(MediaError::new(MediaErrorKind::InvalidCid(
                value.as_ref().to_string(),
            )))
        }
    }

    /// Whether `value` is usable as a CID path segment.
    pub fn is_valid(value: &str) -> bool {
        !value.is_empty()
            && !value
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '?' | '#'))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ContentId {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContentId {
    type Error = MediaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentId> for String {
    fn from(cid: ContentId) -> Self {
        cid.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let cid = ContentId::new("  QmYwAPJzv5CZsnA  ").unwrap();
        assert_eq!(cid.as_str(), "QmYwAPJzv5CZsnA");
    }

    #[test]
    fn rejects_path_and_query_characters() {
        for bad in ["", "   ", "a b", "a/b", "a?b", "a#b", "a\\b"] {
            assert!(ContentId::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn serializes_as_plain_string() {
        let cid = ContentId::new("bafyabc").unwrap();
        assert_eq!(serde_json::to_string(&cid).unwrap(), "\"bafyabc\"");
        let back: ContentId = serde_json::from_str("\"bafyabc\"").unwrap();
        assert_eq!(back, cid);
        assert!(serde_json::from_str::<ContentId>("\"\"").is_err());
    }
}
