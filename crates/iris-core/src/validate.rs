//! Input validation before anything is sent to a provider.

use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::{VisionError, VisionResult};
use crate::image::{ImageFormat, ImagePayload};

/// Checks uploads and image files against the format set and size ceiling.
#[derive(Debug, Clone)]
pub struct Validator {
    max_bytes: u64,
}

impl Validator {
    /// Create a validator from the configured limits.
    pub fn new(limits: &LimitsConfig) -> Self {
        Self::with_max_bytes(limits.max_upload_bytes())
    }

    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Check an uploaded file name and its size.
    ///
    /// Returns the format implied by the extension.
    pub fn check_upload(&self, file_name: &str, size_bytes: u64) -> VisionResult<ImageFormat> {
        let format = ImageFormat::from_path(Path::new(file_name))?;
        self.check_size(size_bytes)?;
        Ok(format)
    }

    pub fn check_size(&self, size_bytes: u64) -> VisionResult<()> {
        if size_bytes > self.max_bytes {
            return Err(VisionError::SizeExceeded {
                size_bytes,
                max_bytes: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Check that the bytes really are an image.
    ///
    /// When the content is a supported format other than the declared one,
    /// the detected format wins so providers receive the right MIME type.
    pub fn check_content(&self, declared: ImageFormat, bytes: &[u8]) -> VisionResult<ImageFormat> {
        match ImageFormat::sniff(bytes) {
            Some(actual) => {
                if actual != declared {
                    tracing::debug!("Declared {declared} but content is {actual}, using {actual}");
                }
                Ok(actual)
            }
            None => Err(VisionError::UnsupportedFormat {
                format: format!("{declared} (unrecognized image content)"),
            }),
        }
    }

    /// Validate and read an image file.
    ///
    /// Checks, in order:
    /// - extension is a supported format
    /// - file exists and is within the size ceiling (before reading it)
    /// - file is not empty
    /// - content has valid image magic bytes
    pub async fn load(&self, path: &Path) -> VisionResult<ImagePayload> {
        let declared = ImageFormat::from_path(path)?;

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| VisionError::ReadFailure {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        self.check_size(metadata.len())?;

        let payload = ImagePayload::load(path).await?;
        if payload.is_empty() {
            return Err(VisionError::UnsupportedFormat {
                format: format!("{declared} (empty file)"),
            });
        }
        let format = self.check_content(declared, payload.bytes())?;
        Ok(payload.with_format(format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_check_upload_accepts_supported_extension() {
        let validator = Validator::with_max_bytes(1024);
        assert_eq!(
            validator.check_upload("cat.PNG", 512).unwrap(),
            ImageFormat::Png
        );
    }

    #[test]
    fn test_check_upload_rejects_bmp() {
        let validator = Validator::with_max_bytes(1024);
        let err = validator.check_upload("scan.bmp", 10).unwrap_err();
        assert!(matches!(err, VisionError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_check_upload_rejects_oversize() {
        let validator = Validator::with_max_bytes(1024);
        let err = validator.check_upload("cat.png", 1025).unwrap_err();
        assert!(matches!(
            err,
            VisionError::SizeExceeded {
                size_bytes: 1025,
                max_bytes: 1024
            }
        ));
    }

    #[test]
    fn test_size_at_ceiling_is_allowed() {
        let validator = Validator::with_max_bytes(1024);
        assert!(validator.check_size(1024).is_ok());
    }

    #[test]
    fn test_check_content_prefers_detected_format() {
        let validator = Validator::with_max_bytes(1024);
        let format = validator
            .check_content(ImageFormat::Jpeg, &PNG_HEADER)
            .unwrap();
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn test_check_content_rejects_non_image() {
        let validator = Validator::with_max_bytes(1024);
        let err = validator
            .check_content(ImageFormat::Png, b"not an image at all")
            .unwrap_err();
        assert!(matches!(err, VisionError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_load_valid_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let payload = Validator::with_max_bytes(1024).load(&path).await.unwrap();
        assert_eq!(payload.format(), ImageFormat::Png);
        assert_eq!(payload.len(), PNG_HEADER.len());
    }

    #[tokio::test]
    async fn test_load_rejects_oversize_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(4096, 0);
        std::fs::write(&path, bytes).unwrap();

        let err = Validator::with_max_bytes(1024).load(&path).await.unwrap_err();
        assert!(matches!(err, VisionError::SizeExceeded { .. }));
    }

    #[tokio::test]
    async fn test_load_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.gif");
        std::fs::write(&path, b"").unwrap();

        let err = Validator::with_max_bytes(1024).load(&path).await.unwrap_err();
        assert!(err.to_string().contains("empty file"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = Validator::with_max_bytes(1024)
            .load(Path::new("/nonexistent/ghost.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, VisionError::ReadFailure { .. }));
    }
}
