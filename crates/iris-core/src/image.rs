//! Image payloads and the supported-format set.

use crate::error::{VisionError, VisionResult};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Image formats every provider accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 4] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Webp,
    ];

    /// File extensions accepted on upload.
    pub const EXTENSIONS: [&'static str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

    /// Resolve a file extension (without the dot, case-insensitive).
    pub fn from_extension(ext: &str) -> VisionResult<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "gif" => Ok(Self::Gif),
            "webp" => Ok(Self::Webp),
            other => Err(VisionError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }

    /// Resolve the format of a file name or path from its extension.
    pub fn from_path(path: &Path) -> VisionResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| VisionError::UnsupportedFormat {
                format: format!("no extension on {}", path.display()),
            })?;
        Self::from_extension(ext)
    }

    /// MIME type sent to providers.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Canonical extension used for temp files.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// Detect the format from magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // PNG: 89 50 4E 47
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            return Some(Self::Png);
        }

        // GIF: GIF8
        if bytes.starts_with(b"GIF8") {
            return Some(Self::Gif);
        }

        // WebP: RIFF....WEBP
        if bytes.starts_with(b"RIFF") && bytes.len() >= 12 && &bytes[8..12] == b"WEBP" {
            return Some(Self::Webp);
        }

        None
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Raw image bytes plus their declared format. Lives for one request.
#[derive(Clone)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, format: ImageFormat) -> Self {
        Self { bytes, format }
    }

    /// Read an image from disk, taking the format from its extension.
    ///
    /// No size or content checks; see [`crate::Validator::load`] for that.
    pub async fn load(path: &Path) -> VisionResult<Self> {
        let format = ImageFormat::from_path(path)?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| VisionError::ReadFailure {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self::new(bytes, format))
    }

    /// Replace the declared format, keeping the bytes.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 encoding of the bytes.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_extension_case_insensitive() {
        assert_eq!(ImageFormat::from_extension("JPG").unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("jpeg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_extension("WebP").unwrap(), ImageFormat::Webp);
    }

    #[test]
    fn test_bmp_is_unsupported() {
        let err = ImageFormat::from_path(&PathBuf::from("scan.bmp")).unwrap_err();
        assert!(matches!(err, VisionError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let err = ImageFormat::from_path(&PathBuf::from("README")).unwrap_err();
        assert!(matches!(err, VisionError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_sniff_known_signatures() {
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(
            ImageFormat::sniff(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::Webp));
    }

    #[test]
    fn test_sniff_rejects_bmp_and_short_input() {
        assert_eq!(ImageFormat::sniff(b"BM\0\0\0\0"), None);
        assert_eq!(ImageFormat::sniff(b"RIFF\0\0\0\0WAVE"), None);
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8]), None);
    }

    #[test]
    fn test_payload_base64() {
        let payload = ImagePayload::new(vec![1, 2, 3], ImageFormat::Png);
        assert_eq!(payload.to_base64(), "AQID");
        assert_eq!(payload.len(), 3);
    }

    #[tokio::test]
    async fn test_load_reads_bytes_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.JPEG");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let payload = ImagePayload::load(&path).await.unwrap();
        assert_eq!(payload.format(), ImageFormat::Jpeg);
        assert_eq!(payload.bytes(), &[0xFFu8, 0xD8, 0xFF, 0xE0]);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ImagePayload::load(&PathBuf::from("/nonexistent/ghost.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, VisionError::ReadFailure { .. }));
    }
}
