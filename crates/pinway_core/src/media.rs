//! Media records attached to challenge completions.
//!
//! Two wire shapes exist. Current records carry the CIDs as direct fields.
//! Older records put a JSON document inside a string field named
//! `directoryCID`, and that nested document carries the CIDs. Both are parsed
//! into [`MediaRecord`] and flattened by [`MediaRecord::normalize`], which is
//! the only place the legacy shape is understood.

use crate::{ContentId, MediaKind};
use chrono::{DateTime, TimeZone, Utc};
use derive_getters::Getters;
use pinway_error::{MediaError, MediaErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const LEGACY_DIRECTORY_FIELD: &str = "directoryCID";

/// When a proof was captured, as either epoch milliseconds or an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaTimestamp {
    /// Milliseconds since the Unix epoch
    Millis(i64),
    /// RFC 3339 timestamp
    Rfc3339(DateTime<Utc>),
}

impl MediaTimestamp {
    /// Convert to a UTC datetime, if the millisecond value is in range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            MediaTimestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            MediaTimestamp::Rfc3339(dt) => Some(*dt),
        }
    }
}

/// Flat media reference: the shape every consumer works with.
///
/// # Examples
///
/// ```
/// use pinway_core::{MediaKind, MediaRecord};
///
/// let record = MediaRecord::from_json(r#"{"videoCID":"bafyvid","selfieCID":"bafyimg"}"#).unwrap();
/// let media = record.normalize().unwrap();
/// assert_eq!(media.cid_for(MediaKind::Video).unwrap().as_str(), "bafyvid");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct MediaReference {
    /// CID of the recorded clip
    #[serde(
        rename = "videoCID",
        default,
        deserialize_with = "blank_cid_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    video_cid: Option<ContentId>,
    /// CID of the still photo
    #[serde(
        rename = "selfieCID",
        default,
        deserialize_with = "blank_cid_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    selfie_cid: Option<ContentId>,
    /// File name under which the clip was pinned
    #[serde(rename = "videoFileName", default, skip_serializing_if = "Option::is_none")]
    video_file_name: Option<String>,
    /// File name under which the photo was pinned
    #[serde(rename = "selfieFileName", default, skip_serializing_if = "Option::is_none")]
    selfie_file_name: Option<String>,
    /// Capture time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<MediaTimestamp>,
    /// Free-text description supplied by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Verification or annotation payload, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    verification: Option<Value>,
}

impl MediaReference {
    /// Reference holding a freshly uploaded video/photo pair.
    pub fn from_pair(video_cid: ContentId, selfie_cid: ContentId) -> Self {
        Self {
            video_cid: Some(video_cid),
            selfie_cid: Some(selfie_cid),
            ..Self::default()
        }
    }

    /// Attach pinned file names.
    pub fn with_file_names(
        mut self,
        video_file_name: impl Into<String>,
        selfie_file_name: impl Into<String>,
    ) -> Self {
        self.video_file_name = Some(video_file_name.into());
        self.selfie_file_name = Some(selfie_file_name.into());
        self
    }

    /// Attach a capture time.
    pub fn with_timestamp(mut self, timestamp: MediaTimestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The CID stored for the given kind of media.
    pub fn cid_for(&self, kind: MediaKind) -> Option<&ContentId> {
        match kind {
            MediaKind::Video => self.video_cid.as_ref(),
            MediaKind::Image => self.selfie_cid.as_ref(),
        }
    }

    /// Field-wise merge where every value present in `top` replaces ours.
    fn overlay(self, top: MediaReference) -> MediaReference {
        MediaReference {
            video_cid: top.video_cid.or(self.video_cid),
            selfie_cid: top.selfie_cid.or(self.selfie_cid),
            video_file_name: top.video_file_name.or(self.video_file_name),
            selfie_file_name: top.selfie_file_name.or(self.selfie_file_name),
            timestamp: top.timestamp.or(self.timestamp),
            description: top.description.or(self.description),
            verification: top.verification.or(self.verification),
        }
    }
}

/// A media record as found in storage, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaRecord {
    /// Current shape: fields sit directly on the record
    Flat(MediaReference),
    /// Old shape: a JSON document nested inside `directoryCID`
    LegacyNested {
        /// Fields found beside `directoryCID`
        outer: MediaReference,
        /// The nested document, still unparsed
        directory: String,
    },
}

impl MediaRecord {
    /// Parse a record from JSON text.
    #[track_caller]
    pub fn from_json(json: &str) -> Result<Self, MediaError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| MediaError::new(MediaErrorKind::Malformed(e.to_string())))?;
        Self::from_value(value)
    }

    /// Classify a JSON value as flat or legacy.
    ///
    /// A `directoryCID` holding an object (rather than a string of JSON) is
    /// accepted as already-decoded legacy content.
    #[track_caller]
    pub fn from_value(value: Value) -> Result<Self, MediaError> {
        let Value::Object(mut fields) = value else {
            return Err(MediaError::new(MediaErrorKind::Malformed(
                "media record must be a JSON object".to_string(),
            )));
        };

        let directory = match fields.remove(LEGACY_DIRECTORY_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(obj @ Value::Object(_)) => Some(obj.to_string()),
            Some(other) => {
                return Err(MediaError::new(MediaErrorKind::LegacyDirectory(
                    other.to_string(),
                )));
            }
        };

        let outer = reference_from_map(fields)?;
        Ok(match directory {
            Some(directory) => MediaRecord::LegacyNested { outer, directory },
            None => MediaRecord::Flat(outer),
        })
    }

    /// Whether this record uses the old nested encoding.
    pub fn is_legacy(&self) -> bool {
        matches!(self, MediaRecord::LegacyNested { .. })
    }

    /// Flatten into a [`MediaReference`].
    ///
    /// For legacy records the nested document's values win over outer ones.
    /// A record that ends up with neither CID is rejected.
    #[track_caller]
    pub fn normalize(self) -> Result<MediaReference, MediaError> {
        let reference = match self {
            MediaRecord::Flat(reference) => reference,
            MediaRecord::LegacyNested { outer, directory } => {
                let nested = match serde_json::from_str::<Value>(&directory) {
                    Ok(Value::Object(map)) => reference_from_map(map)?,
                    _ => {
                        return Err(MediaError::new(MediaErrorKind::LegacyDirectory(
                            directory,
                        )));
                    }
                };
                tracing::debug!(
                    nested_video = nested.video_cid.is_some(),
                    nested_selfie = nested.selfie_cid.is_some(),
                    "Normalizing legacy media record"
                );
                outer.overlay(nested)
            }
        };

        if reference.video_cid.is_none() && reference.selfie_cid.is_none() {
            return Err(MediaError::new(MediaErrorKind::Malformed(
                "record carries no CID".to_string(),
            )));
        }
        Ok(reference)
    }
}

#[track_caller]
fn reference_from_map(map: Map<String, Value>) -> Result<MediaReference, MediaError> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| MediaError::new(MediaErrorKind::Malformed(e.to_string())))
}

/// Empty or whitespace-only CID fields are placeholders, read as absent.
fn blank_cid_as_none<'de, D>(deserializer: D) -> Result<Option<ContentId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => ContentId::new(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
