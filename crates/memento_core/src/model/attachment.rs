//! Attachment records and the stored attachment payload codec.
//!
//! # Responsibility
//! - Model attachments as explicit typed records.
//! - Validate the JSON attachment payload at the storage boundary.
//!
//! # Invariants
//! - Only `AttachmentLocation::Remote` attachments are ever encoded back
//!   into a stored payload.
//! - A local preview reference is never treated as a durable location.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Attachment category, derived from the uploaded MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Video,
    File,
}

impl AttachmentKind {
    /// `image/*` and `video/*` map to their kinds; anything else is a file.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else {
            Self::File
        }
    }
}

/// Opaque handle to a locally generated preview (e.g. an object URL).
///
/// Owned by the editing session that created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewRef(String);

impl PreviewRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where an attachment's bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentLocation {
    /// Durable reference returned by blob storage.
    Remote { url: String },
    /// Transient local preview for a not-yet-uploaded file.
    LocalPreview(PreviewRef),
}

/// One attachment shown under an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub display_name: String,
    pub location: AttachmentLocation,
}

impl Attachment {
    /// Creates an attachment backed by a durable remote reference.
    pub fn remote(
        kind: AttachmentKind,
        display_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            display_name: display_name.into(),
            location: AttachmentLocation::Remote { url: url.into() },
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        match &self.location {
            AttachmentLocation::Remote { url } => Some(url.as_str()),
            AttachmentLocation::LocalPreview(_) => None,
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind == AttachmentKind::Image
    }
}

/// Error raised while decoding or encoding the stored attachment payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentPayloadError {
    /// Payload is not valid JSON.
    Malformed(String),
    /// Payload is valid JSON but not an array.
    NotAList,
    /// One array item has the wrong shape.
    InvalidItem { index: usize, message: String },
    /// Serialization of outgoing records failed.
    Encode(String),
}

impl Display for AttachmentPayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "attachment payload is not JSON: {message}"),
            Self::NotAList => write!(f, "attachment payload must be a JSON array"),
            Self::InvalidItem { index, message } => {
                write!(f, "invalid attachment at index {index}: {message}")
            }
            Self::Encode(message) => write!(f, "failed to encode attachments: {message}"),
        }
    }
}

impl Error for AttachmentPayloadError {}

/// Stored wire shape: `{"type": "image", "name": "...", "url": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
struct AttachmentRecord {
    #[serde(rename = "type")]
    kind: AttachmentKind,
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: Option<String>,
}

/// Decodes the stored attachment payload into typed records.
///
/// Rules:
/// - `None` or a blank payload decodes to an empty list.
/// - `null` items and items without a non-empty `url` are skipped, since
///   they never finished uploading.
/// - Any other shape mismatch is rejected.
pub fn decode_attachment_payload(
    payload: Option<&str>,
) -> Result<Vec<Attachment>, AttachmentPayloadError> {
    let Some(raw) = payload.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Vec::new());
    };

    let value: Value = serde_json::from_str(raw)
        .map_err(|err| AttachmentPayloadError::Malformed(err.to_string()))?;
    let Value::Array(items) = value else {
        return Err(AttachmentPayloadError::NotAList);
    };

    let mut attachments = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if item.is_null() {
            continue;
        }
        let record: AttachmentRecord =
            serde_json::from_value(item).map_err(|err| AttachmentPayloadError::InvalidItem {
                index,
                message: err.to_string(),
            })?;
        let Some(url) = record.url.filter(|url| !url.trim().is_empty()) else {
            continue;
        };
        attachments.push(Attachment::remote(record.kind, record.name, url));
    }

    Ok(attachments)
}

/// Encodes remote attachments into the stored payload.
///
/// Returns `Ok(None)` when there is nothing durable to store. Local previews
/// are skipped.
pub fn encode_attachment_payload(
    attachments: &[Attachment],
) -> Result<Option<String>, AttachmentPayloadError> {
    let records = attachments
        .iter()
        .filter_map(|attachment| {
            attachment.remote_url().map(|url| AttachmentRecord {
                kind: attachment.kind,
                name: attachment.display_name.clone(),
                url: Some(url.to_string()),
            })
        })
        .collect::<Vec<_>>();

    if records.is_empty() {
        return Ok(None);
    }

    serde_json::to_string(&records)
        .map(Some)
        .map_err(|err| AttachmentPayloadError::Encode(err.to_string()))
}
