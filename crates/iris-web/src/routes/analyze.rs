//! Analysis route handlers.

use axum::{
    extract::{Multipart, State},
    Json,
};
use iris_core::{ComparisonResult, ImagePayload, Instruction, Provider};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::upload::{ScopedUpload, UploadForm};

const DEFAULT_MODEL: &str = "gpt4o";

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub provider: Provider,
    pub model: Option<String>,
    pub analysis: String,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

#[derive(Serialize)]
pub struct CompareResponse {
    pub success: bool,
    #[serde(flatten)]
    pub comparison: ComparisonResult,
}

/// POST /analyze - One image, one provider.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let format = state
        .validator
        .check_upload(&form.file_name, form.bytes.len() as u64)?;

    let provider: Provider = form
        .model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MODEL)
        .parse()?;
    let instruction = Instruction::from_selection(
        form.analysis_type.as_deref(),
        form.custom_prompt.as_deref(),
    )?;

    let upload = ScopedUpload::write(&state.upload_dir, format, form.bytes).await?;
    let image = stage(&state, &upload).await?;

    let result = state
        .analyzer
        .analyze_with(provider, &image, &instruction)
        .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        provider,
        analysis: result.text().to_string(),
        model: result.model,
        latency_ms: result.latency_ms,
        tokens_used: result.tokens_used,
    }))
}

/// POST /compare - One image, every provider that has a key.
pub async fn compare(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CompareResponse>, ApiError> {
    let form = UploadForm::from_multipart(multipart).await?;
    let format = state
        .validator
        .check_upload(&form.file_name, form.bytes.len() as u64)?;
    let instruction = Instruction::from_selection(
        form.analysis_type.as_deref(),
        form.custom_prompt.as_deref(),
    )?;

    let upload = ScopedUpload::write(&state.upload_dir, format, form.bytes).await?;
    let image = stage(&state, &upload).await?;

    let comparison = state.analyzer.compare_all(&image, &instruction).await?;
    Ok(Json(CompareResponse {
        success: true,
        comparison,
    }))
}

/// Read the staged file back through the validator (size and magic bytes).
async fn stage(state: &AppState, upload: &ScopedUpload) -> Result<ImagePayload, ApiError> {
    Ok(state.validator.load(upload.path()).await?)
}
