#![warn(missing_docs)]
//! # nutrition-track-intake
//!
//! ## Purpose
//! Owns the single pending image between selection and analysis.
//!
//! ## Responsibilities
//! - Accept files from the picker and from drag-and-drop through one path.
//! - Reject non-image and oversized files without touching the pending slot.
//! - Keep the preview that matches the pending file.
//! - Return to an idle slot on reset.
//!
//! ## Data flow
//! Shell reads file bytes -> [`UploadHandler::select_file`] validates and stores
//! the [`PendingFile`] plus its [`ImagePreview`] -> the analysis step borrows
//! the pending file to build a request.
//!
//! ## Error model
//! Rejections are [`UploadError`] values. A rejected file leaves the previous
//! selection in place.

use nutrition_track_core::{
    DEFAULT_MAX_UPLOAD_BYTES, ImageRejection, ImagePreview, PendingFile, validate_image,
};
use thiserror::Error;

/// Holder of the pending file and its preview.
#[derive(Debug, Clone)]
pub struct UploadHandler {
    max_bytes: usize,
    pending: Option<(PendingFile, ImagePreview)>,
}

impl UploadHandler {
    /// Creates an empty handler with the given size cap.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            pending: None,
        }
    }

    /// Configured size cap in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validates and stores `file`, replacing any previous selection.
    ///
    /// # Errors
    /// Returns [`UploadError::InvalidType`] for non-image media types and
    /// [`UploadError::TooLarge`] when the file exceeds the size cap. In both
    /// cases the previous selection is kept.
    pub fn select_file(&mut self, file: PendingFile) -> Result<&ImagePreview, UploadError> {
        if let Err(error) = validate_image(&file, self.max_bytes) {
            tracing::warn!(
                stage = "intake",
                action = "file_rejected",
                source = file.source.as_str(),
                media_type = %file.media_type,
                size = file.len(),
                "file rejected"
            );
            return Err(error.into());
        }

        tracing::info!(
            stage = "intake",
            action = "file_accepted",
            source = file.source.as_str(),
            media_type = %file.media_type,
            size = file.len(),
            "file queued for analysis"
        );

        let preview = file.preview();
        let (_, preview) = self.pending.insert((file, preview));
        Ok(&*preview)
    }

    /// Drops the pending file and its preview.
    pub fn reset(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!(stage = "intake", action = "reset", "pending file cleared");
        }
    }

    /// The pending file, if any.
    pub fn pending(&self) -> Option<&PendingFile> {
        self.pending.as_ref().map(|(file, _)| file)
    }

    /// Preview of the pending file, if any.
    pub fn preview(&self) -> Option<&ImagePreview> {
        self.pending.as_ref().map(|(_, preview)| preview)
    }

    /// Returns `true` when a file is ready for analysis.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for UploadHandler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

/// File selection rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Declared media type is not `image/*`.
    #[error("invalid file type: {0:?}")]
    InvalidType(String),
    /// File is larger than the configured cap.
    #[error("file too large: {size} bytes exceeds {limit}")]
    TooLarge {
        /// Actual size.
        size: usize,
        /// Configured cap.
        limit: usize,
    },
    /// The browser could not read the file's bytes.
    #[error("file could not be read: {0}")]
    Unreadable(String),
}

impl UploadError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::InvalidType(_) => "Please select an image file".to_string(),
            UploadError::Unreadable(_) => "Could not read that file. Please try another image.".to_string(),
            UploadError::TooLarge { limit, .. } => {
                format!("Image is too large (max {} MB)", limit / (1024 * 1024))
            }
        }
    }
}

impl From<ImageRejection> for UploadError {
    fn from(rejection: ImageRejection) -> Self {
        match rejection {
            ImageRejection::InvalidMediaType(media_type) => UploadError::InvalidType(media_type),
            ImageRejection::FileTooLarge { size, limit } => UploadError::TooLarge { size, limit },
        }
    }
}
