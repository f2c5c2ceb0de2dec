//! Multipart upload parsing and request-scoped temp files.

use axum::extract::Multipart;
use iris_core::{ImageFormat, VisionError, VisionResult};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::ApiError;

/// Fields of an analysis upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub model: Option<String>,
    pub analysis_type: Option<String>,
    pub custom_prompt: Option<String>,
}

impl UploadForm {
    /// Read every field. Unknown fields are ignored.
    ///
    /// Fails when no `image` part was sent or it carries no file name.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();
        let mut saw_image = false;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    saw_image = true;
                    form.file_name = field.file_name().unwrap_or_default().to_string();
                    form.bytes = field.bytes().await?.to_vec();
                }
                "model" => form.model = Some(field.text().await?),
                "analysis_type" => form.analysis_type = Some(field.text().await?),
                "custom_prompt" => form.custom_prompt = Some(field.text().await?),
                other => tracing::debug!("Ignoring unknown form field '{other}'"),
            }
        }

        if !saw_image {
            return Err(ApiError::missing_file("No image file provided"));
        }
        if form.file_name.trim().is_empty() {
            return Err(ApiError::missing_file("No file selected"));
        }
        Ok(form)
    }
}

/// An uploaded image on disk for the lifetime of one request.
///
/// The file is deleted when this value drops, whichever way the handler exits.
pub struct ScopedUpload {
    file: NamedTempFile,
}

impl ScopedUpload {
    /// Write `bytes` to a fresh file in `dir` with the format's extension.
    ///
    /// The file I/O runs on the blocking pool.
    pub async fn write(dir: &Path, format: ImageFormat, bytes: Vec<u8>) -> VisionResult<Self> {
        let dir_owned = dir.to_path_buf();
        let written =
            tokio::task::spawn_blocking(move || Self::write_sync(&dir_owned, format, &bytes)).await;
        match written {
            Ok(result) => result,
            Err(e) => Err(VisionError::WriteFailure {
                path: dir.to_path_buf(),
                source: std::io::Error::other(e),
            }),
        }
    }

    fn write_sync(dir: &Path, format: ImageFormat, bytes: &[u8]) -> VisionResult<Self> {
        let write_failure = |source: std::io::Error| VisionError::WriteFailure {
            path: dir.to_path_buf(),
            source,
        };

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile_in(dir)
            .map_err(write_failure)?;
        file.write_all(bytes).map_err(write_failure)?;
        file.flush().map_err(write_failure)?;

        tracing::debug!("Staged upload at {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
