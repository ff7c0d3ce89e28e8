#![warn(missing_docs)]
//! # nutrition-track-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `nutrition-track` workspace.
//!
//! ## Responsibilities
//! - Represent the persisted session record.
//! - Represent the single pending image file and where it came from.
//! - Validate declared media types and upload size limits.
//! - Produce displayable previews (`data:` URLs) from file bytes.
//!
//! ## Data flow
//! The browser shell reads a picked or dropped file into a [`PendingFile`].
//! The intake layer validates it with [`validate_image`] and derives an
//! [`ImagePreview`]. The upload layer later packages the same bytes into a
//! multipart request.
//!
//! ## Ownership and lifetimes
//! File payloads are held in [`bytes::Bytes`] so the preview, the pending slot,
//! and an in-flight request can share one buffer without copying.
//!
//! ## Error model
//! Media type and size violations return [`ImageRejection`]. Session record
//! codec failures return [`CoreError`].
//!
//! ## Security and privacy notes
//! [`SessionRecord`] intentionally has no password field. Passwords never leave
//! the form that collected them.
//!
//! ## Example
//! ```rust
//! use nutrition_track_core::{FileSource, PendingFile, validate_image};
//!
//! let file = PendingFile::new("meal.png", "image/png", vec![1, 2, 3], FileSource::ManualPick);
//! assert!(validate_image(&file, 1024).is_ok());
//! assert_eq!(file.preview().data_url(), "data:image/png;base64,AQID");
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Media type prefix accepted by the upload flow.
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Default upload cap in bytes, matching the analysis backend request limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Locally persisted "logged in" record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Account email as entered (trimmed).
    pub email: String,
    /// Name shown in the greeting.
    pub name: String,
}

impl SessionRecord {
    /// Creates a record from owned or borrowed strings.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Encodes the record as the JSON object stored under the session key.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when serialization fails.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(CoreError::Codec)
    }

    /// Decodes a stored record.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when `raw` is not a `{email, name}` object.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(CoreError::Codec)
    }
}

/// How a file reached the upload box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    /// Chosen through the file picker.
    ManualPick,
    /// Dropped onto the upload box.
    DragDrop,
}

impl FileSource {
    /// Short label used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileSource::ManualPick => "manual_pick",
            FileSource::DragDrop => "drag_drop",
        }
    }
}

/// The single image queued for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    /// Original file name, forwarded as the multipart filename.
    pub name: String,
    /// Declared media type (for example `image/jpeg`).
    pub media_type: String,
    /// Raw file bytes.
    pub bytes: Bytes,
    /// Where the file came from.
    pub source: FileSource,
}

impl PendingFile {
    /// Creates a pending file from its parts.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
        source: FileSource,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
            source,
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for a zero-byte file.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns `true` when the declared media type is an image type.
    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }

    /// Builds a displayable preview of the file bytes.
    pub fn preview(&self) -> ImagePreview {
        ImagePreview::from_bytes(&self.media_type, &self.bytes)
    }
}

/// Displayable representation of a pending image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    data_url: String,
}

impl ImagePreview {
    /// Encodes `bytes` as a `data:` URL with the given media type.
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        let encoded = STANDARD.encode(bytes);
        Self {
            data_url: format!("data:{media_type};base64,{encoded}"),
        }
    }

    /// Returns the `data:` URL, usable as an `<img src>`.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// Returns `true` when `media_type` names an image (`image/*`).
///
/// The type token is compared case-insensitively.
pub fn is_image_media_type(media_type: &str) -> bool {
    let trimmed = media_type.trim();
    trimmed
        .get(..IMAGE_MEDIA_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(IMAGE_MEDIA_PREFIX))
}

/// Validates a pending file for the upload flow.
///
/// # Errors
/// Returns [`ImageRejection::InvalidMediaType`] for non-image files and
/// [`ImageRejection::FileTooLarge`] when the payload exceeds `max_bytes`.
pub fn validate_image(file: &PendingFile, max_bytes: usize) -> Result<(), ImageRejection> {
    if !file.is_image() {
        return Err(ImageRejection::InvalidMediaType(file.media_type.clone()));
    }

    if file.len() > max_bytes {
        return Err(ImageRejection::FileTooLarge {
            size: file.len(),
            limit: max_bytes,
        });
    }

    Ok(())
}

/// Reasons a file is refused before it becomes the pending file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageRejection {
    /// Declared media type is not an image type.
    #[error("unsupported media type: {0:?}")]
    InvalidMediaType(String),
    /// File exceeds the configured upload cap.
    #[error("file is {size} bytes, limit is {limit}")]
    FileTooLarge {
        /// Actual payload size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// Session record codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON encoding/decoding error.
    #[error("session record codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    //! Unit tests for media type checks and preview encoding.

    use super::*;

    #[test]
    fn accepts_image_types_case_insensitively() {
        assert!(is_image_media_type("image/jpeg"));
        assert!(is_image_media_type("IMAGE/PNG"));
        assert!(is_image_media_type(" image/webp "));
        assert!(!is_image_media_type("application/pdf"));
        assert!(!is_image_media_type("text/plain"));
        assert!(!is_image_media_type(""));
        assert!(!is_image_media_type("imag"));
    }

    #[test]
    fn rejects_oversized_images() {
        let file = PendingFile::new("big.jpg", "image/jpeg", vec![0; 11], FileSource::DragDrop);
        assert!(validate_image(&file, 11).is_ok());
        assert!(matches!(
            validate_image(&file, 10),
            Err(ImageRejection::FileTooLarge { size: 11, limit: 10 })
        ));
    }

    #[test]
    fn preview_is_a_data_url() {
        let preview = ImagePreview::from_bytes("image/gif", b"GIF89a");
        assert_eq!(preview.data_url(), "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn session_record_rejects_wrong_shape() {
        assert!(SessionRecord::from_json(r#"{"email":"a@b.c","name":"A"}"#).is_ok());
        assert!(SessionRecord::from_json(r#"{"email":"a@b.c"}"#).is_err());
        assert!(SessionRecord::from_json("not json").is_err());
        assert!(SessionRecord::from_json("[1,2]").is_err());
    }
}
