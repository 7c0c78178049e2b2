use axum::extract::Multipart;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::AnalyzeResponse;
use crate::services::upload_engine;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(analyze_file))
}

async fn analyze_file(mut multipart: Multipart) -> Result<Json<AnalyzeResponse>, AppError> {
    info!("POST /analyze - Receiving spreadsheet upload");

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("no file selected".to_string()))?;
    info!("Analyzing upload {} ({} bytes)", filename, bytes.len());

    let response = upload_engine::analyze_upload(&filename, &bytes).map_err(|e| {
        error!("Analysis of {} failed: {}", filename, e);
        e
    })?;
    Ok(Json(response))
}
