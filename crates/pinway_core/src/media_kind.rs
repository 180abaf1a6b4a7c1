//! Media kind enumeration.

use serde::{Deserialize, Serialize};

/// Kind of media a challenge proof carries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::EnumString,
    strum::AsRefStr,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MediaKind {
    /// Still photo (the selfie half of a proof)
    #[display("image")]
    Image,
    /// Recorded clip
    #[display("video")]
    Video,
}

impl MediaKind {
    /// Convert to the string sent in pin metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// MIME type assumed when the caller does not supply one.
    pub fn default_mime_type(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg",
            MediaKind::Video => "video/webm",
        }
    }
}
