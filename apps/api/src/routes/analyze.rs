use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::analysis::{analyze_document, AnalysisReport};
use crate::config::MIN_UPLOAD_BYTES;
use crate::errors::AppError;
use crate::extraction::DocumentKind;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub filename: String,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

struct Upload {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let upload = read_upload(multipart).await?;

    let kind = DocumentKind::sniff(&upload.filename, upload.content_type.as_deref())
        .ok_or_else(|| {
            AppError::UnsupportedMediaType("Only PDF or DOCX files are supported".to_string())
        })?;

    if upload.data.len() < MIN_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "File is empty or too small to be a resume".to_string(),
        ));
    }

    debug!(
        "Upload '{}' ({} bytes) sniffed as {kind:?}",
        upload.filename,
        upload.data.len()
    );

    let analysis = state.config.analysis.clone();
    let data = upload.data;
    let report = tokio::task::spawn_blocking(move || analyze_document(&data, kind, &analysis))
        .await
        .context("analysis worker failed")?;

    Ok(Json(AnalyzeResponse {
        filename: upload.filename,
        report,
    }))
}

/// Pulls the `file` field out of the form, ignoring any other fields.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        return Ok(Upload {
            filename,
            content_type,
            data,
        });
    }
    Err(AppError::Validation("Missing 'file' field".to_string()))
}
