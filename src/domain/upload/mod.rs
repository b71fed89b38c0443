// SPDX-License-Identifier: MPL-2.0
//! Upload validation gate and the selected-file value type.
//!
//! The gate works on metadata only: it never decodes pixel data.

use crate::config::{ACCEPTED_MEDIA_TYPES, MAX_UPLOAD_BYTES};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Media type declared for files whose extension is not recognized.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

// =============================================================================
// ValidationError
// =============================================================================

/// Reasons a file is refused by the upload gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Declared media type is not on the allow-list.
    UnsupportedType,
    /// File is larger than the upload ceiling.
    TooLarge,
}

impl ValidationError {
    /// User-facing message shown inline on the upload surface.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ValidationError::UnsupportedType => "Please upload a JPG, PNG, or GIF file",
            ValidationError::TooLarge => "File size must be less than 10MB",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

// =============================================================================
// FileMeta / SelectedFile
// =============================================================================

/// Metadata the gate inspects.
pub trait FileMeta {
    /// Declared media type (e.g. `image/png`).
    fn media_type(&self) -> &str;
    /// Size in bytes.
    fn size(&self) -> u64;
}

/// A file picked by the user, with its declared media type and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    /// Creates a file from already-loaded contents.
    #[must_use]
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, declaring its media type from the extension.
    pub fn from_path(path: &Path) -> crate::error::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, media_type_for_path(path), bytes))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }
}

impl FileMeta for SelectedFile {
    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Declared media type for a path, based on its extension.
#[must_use]
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg" | "jpeg" | "jpe" | "jfif") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => UNKNOWN_MEDIA_TYPE,
    }
}

// =============================================================================
// Gate
// =============================================================================

/// Checks a file's declared media type, then its size.
///
/// Returns `None` when the file may enter the pipeline.
#[must_use]
pub fn validate(file: &impl FileMeta) -> Option<ValidationError> {
    if !ACCEPTED_MEDIA_TYPES.contains(&file.media_type()) {
        return Some(ValidationError::UnsupportedType);
    }
    if file.size() > MAX_UPLOAD_BYTES {
        return Some(ValidationError::TooLarge);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct Meta(&'static str, u64);

    impl FileMeta for Meta {
        fn media_type(&self) -> &str {
            self.0
        }
        fn size(&self) -> u64 {
            self.1
        }
    }

    #[test]
    fn accepts_allowed_types_within_limit() {
        for media_type in ACCEPTED_MEDIA_TYPES {
            assert_eq!(validate(&Meta(media_type, 1024)), None);
        }
    }

    #[test]
    fn rejects_disallowed_types() {
        for media_type in ["image/webp", "image/bmp", "text/plain", ""] {
            assert_eq!(
                validate(&Meta(media_type, 10)),
                Some(ValidationError::UnsupportedType)
            );
        }
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        assert_eq!(validate(&Meta("image/png", MAX_UPLOAD_BYTES)), None);
        assert_eq!(
            validate(&Meta("image/png", MAX_UPLOAD_BYTES + 1)),
            Some(ValidationError::TooLarge)
        );
    }

    #[test]
    fn media_type_is_checked_before_size() {
        assert_eq!(
            validate(&Meta("video/mp4", MAX_UPLOAD_BYTES * 2)),
            Some(ValidationError::UnsupportedType)
        );
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            ValidationError::UnsupportedType.to_string(),
            "Please upload a JPG, PNG, or GIF file"
        );
        assert_eq!(
            ValidationError::TooLarge.to_string(),
            "File size must be less than 10MB"
        );
    }

    #[test]
    fn media_type_follows_extension() {
        assert_eq!(media_type_for_path(&PathBuf::from("a/b/cat.JPG")), "image/jpeg");
        assert_eq!(media_type_for_path(&PathBuf::from("cat.png")), "image/png");
        assert_eq!(media_type_for_path(&PathBuf::from("cat.gif")), "image/gif");
        assert_eq!(media_type_for_path(&PathBuf::from("cat")), UNKNOWN_MEDIA_TYPE);
    }

    #[test]
    fn from_path_reads_bytes_and_declares_type() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("photo.png");
        std::fs::write(&path, [1u8, 2, 3]).expect("failed to write file");

        let file = SelectedFile::from_path(&path).expect("file should load");
        assert_eq!(file.name(), "photo.png");
        assert_eq!(file.media_type(), "image/png");
        assert_eq!(file.size(), 3);
    }
}
