//! JSON error responses.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use iris_core::{ErrorKind, VisionError};
use serde::Serialize;

/// An error rendered as `{ "success": false, "error", "kind" }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: String,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    kind: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn missing_file(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "missing_file", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::SizeExceeded => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorKind::UnknownAnalysisType | ErrorKind::UnknownProvider | ErrorKind::EmptyPrompt => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::MissingCredential => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::NetworkFailure | ErrorKind::ProviderError => StatusCode::BAD_GATEWAY,
        ErrorKind::WriteFailure | ErrorKind::ReadFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<VisionError> for ApiError {
    fn from(err: VisionError) -> Self {
        let kind = err.kind();
        Self::new(status_for(kind), kind.as_str(), err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        let kind = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "size_exceeded"
        } else {
            "bad_request"
        };
        Self::new(status, kind, err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!("{} ({}): {}", self.status, self.kind, self.message);
        } else {
            tracing::debug!("{} ({}): {}", self.status, self.kind, self.message);
        }
        let body = ErrorBody {
            success: false,
            error: &self.message,
            kind: &self.kind,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iris_core::Provider;

    #[test]
    fn test_vision_error_status_mapping() {
        let cases = [
            (
                VisionError::SizeExceeded {
                    size_bytes: 2,
                    max_bytes: 1,
                },
                StatusCode::PAYLOAD_TOO_LARGE,
                "size_exceeded",
            ),
            (
                VisionError::UnsupportedFormat {
                    format: "bmp".into(),
                },
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_format",
            ),
            (
                VisionError::UnknownAnalysisType("bogus".into()),
                StatusCode::BAD_REQUEST,
                "unknown_analysis_type",
            ),
            (
                VisionError::MissingCredential {
                    provider: Provider::OpenAi,
                    env_var: "OPENAI_API_KEY",
                },
                StatusCode::SERVICE_UNAVAILABLE,
                "missing_credential",
            ),
            (
                VisionError::NetworkFailure {
                    provider: Provider::Gemini,
                    message: "timed out".into(),
                },
                StatusCode::BAD_GATEWAY,
                "network_failure",
            ),
        ];

        for (err, status, kind) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status(), status);
            assert_eq!(api.kind(), kind);
        }
    }
}
