//! Upload inputs and the pin request built from them.

use crate::UploadPolicy;
use chrono::{DateTime, SecondsFormat, Utc};
use derive_getters::Getters;
use pinway_core::MediaKind;
use serde::Serialize;

/// Owner label used when nothing usable survives sanitization.
const ANONYMOUS_OWNER: &str = "anonymous";

/// A payload the caller wants pinned.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct UploadSource {
    /// Raw bytes
    payload: Vec<u8>,
    /// Caller-facing file name, e.g. `selfie.jpg`
    file_name: String,
    /// What the payload is
    kind: MediaKind,
    /// MIME type; the kind's default when unset
    mime_type: Option<String>,
}

impl UploadSource {
    /// Describe a payload.
    pub fn new(payload: impl Into<Vec<u8>>, file_name: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            payload: payload.into(),
            file_name: file_name.into(),
            kind,
            mime_type: None,
        }
    }

    /// Set an explicit MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// MIME type sent to the backend.
    pub fn effective_mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or_else(|| self.kind.default_mime_type())
    }
}

/// Keep ASCII alphanumerics, `-` and `_`; fall back to `anonymous`.
///
/// # Examples
///
/// ```
/// use pinway_upload::sanitize_owner_id;
///
/// assert_eq!(sanitize_owner_id("0xAbC:12/34"), "0xAbC1234");
/// assert_eq!(sanitize_owner_id("!!!"), "anonymous");
/// ```
pub fn sanitize_owner_id(owner_id: &str) -> String {
    let cleaned: String = owner_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    if cleaned.is_empty() {
        ANONYMOUS_OWNER.to_string()
    } else {
        cleaned
    }
}

/// Name under which a payload is pinned: `{owner}_{millis}_{file_name}`.
///
/// Embedding the owner and a timestamp taken once per upload keeps
/// concurrent uploads apart while every retry of one upload reuses the name.
pub fn destination_file_name(owner_id: &str, timestamp: DateTime<Utc>, file_name: &str) -> String {
    let file_name = file_name.trim().replace(['/', '\\'], "_");
    format!(
        "{}_{}_{}",
        sanitize_owner_id(owner_id),
        timestamp.timestamp_millis(),
        file_name
    )
}

/// `keyvalues` block of the pin metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinKeyValues<'a> {
    /// Media kind, `image` or `video`
    #[serde(rename = "type")]
    pub kind: &'a str,
    /// MIME type
    pub file_type: &'a str,
    /// Owner identifier as given by the caller
    pub user_id: &'a str,
    /// RFC 3339 upload time
    pub uploaded_at: String,
}

/// `pinataMetadata` form part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinMetadata<'a> {
    /// Destination file name
    pub name: &'a str,
    /// Searchable key/value tags
    pub keyvalues: PinKeyValues<'a>,
}

/// `pinataOptions` form part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinOptions {
    /// CID version the backend should produce
    pub cid_version: u8,
    /// Wrap the file in a directory
    pub wrap_with_directory: bool,
}

/// Everything one pin attempt sends. Built once per upload, reused by every retry.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PinRequest {
    /// Unique destination name
    file_name: String,
    /// Raw bytes
    payload: Vec<u8>,
    /// What the payload is
    kind: MediaKind,
    /// MIME type
    mime_type: String,
    /// Owner identifier as given by the caller
    owner_id: String,
    /// Time the upload began
    uploaded_at: DateTime<Utc>,
    /// Backend options
    options: PinOptions,
}

impl PinRequest {
    /// Fix the destination name and metadata for an upload starting at `now`.
    pub fn prepare(
        source: UploadSource,
        owner_id: &str,
        policy: &UploadPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let file_name = destination_file_name(owner_id, now, source.file_name());
        let mime_type = source.effective_mime_type().to_string();
        Self {
            file_name,
            payload: source.payload,
            kind: source.kind,
            mime_type,
            owner_id: owner_id.to_string(),
            uploaded_at: now,
            options: PinOptions {
                cid_version: *policy.cid_version(),
                wrap_with_directory: *policy.wrap_with_directory(),
            },
        }
    }

    /// The `pinataMetadata` document.
    pub fn metadata(&self) -> PinMetadata<'_> {
        PinMetadata {
            name: &self.file_name,
            keyvalues: PinKeyValues {
                kind: self.kind.as_str(),
                file_type: &self.mime_type,
                user_id: &self.owner_id,
                uploaded_at: self.uploaded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_714_560_000_123).unwrap()
    }

    #[test]
    fn destination_name_embeds_owner_and_time() {
        assert_eq!(
            destination_file_name("0xAb/Cd", at(), "clip.webm"),
            "0xAbCd_1714560000123_clip.webm"
        );
    }

    #[test]
    fn destination_name_flattens_path_separators() {
        assert_eq!(
            destination_file_name("", at(), "../etc/passwd"),
            "anonymous_1714560000123_.._etc_passwd"
        );
    }

    #[test]
    fn metadata_matches_backend_contract() {
        let source = UploadSource::new(vec![1, 2, 3], "selfie.png", MediaKind::Image)
            .with_mime_type("image/png");
        let request = PinRequest::prepare(source, "user-1", &UploadPolicy::default(), at());

        let metadata = serde_json::to_value(request.metadata()).unwrap();
        assert_eq!(
            metadata,
            serde_json::json!({
                "name": "user-1_1714560000123_selfie.png",
                "keyvalues": {
                    "type": "image",
                    "fileType": "image/png",
                    "userId": "user-1",
                    "uploadedAt": "2024-05-01T10:40:00.123Z"
                }
            })
        );

        let options = serde_json::to_value(request.options()).unwrap();
        assert_eq!(
            options,
            serde_json::json!({ "cidVersion": 1, "wrapWithDirectory": false })
        );
    }

    #[test]
    fn default_mime_type_follows_kind() {
        let source = UploadSource::new(vec![1], "clip", MediaKind::Video);
        assert_eq!(source.effective_mime_type(), "video/webm");
    }
}
