//! Web upload endpoints.
//!
//! `POST /upload` accepts a multipart form with a `file` field, stores the
//! image under the upload directory, and runs the pipeline.
//! `GET /process-default` runs the pipeline on a preconfigured image.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};
use tracing::error;

use crate::pipeline::process_image;
use crate::server::AppState;

/// Handle an image upload and process it end to end.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut upload: Option<(String, axum::body::Bytes)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field.file_name().unwrap_or("").to_string();
                match field.bytes().await {
                    Ok(data) => upload = Some((filename, data)),
                    Err(e) => {
                        return bad_request(format!("unreadable upload: {e}"));
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => return bad_request(format!("malformed multipart body: {e}")),
        }
    }

    let Some((filename, data)) = upload else {
        return bad_request("No file part".to_string());
    };
    if filename.is_empty() {
        return bad_request("No selected file".to_string());
    }
    if !media::allowed_file(&filename) {
        return bad_request("File type not allowed".to_string());
    }

    let dest = Path::new(&state.config.upload_dir).join(media::sanitize_filename(&filename));
    if let Err(e) = tokio::fs::write(&dest, &data).await {
        error!("[Gateway] Failed to store upload: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        );
    }

    respond_with_pipeline(&state, &dest).await
}

/// Process the preconfigured default image.
pub async fn process_default(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let path = Path::new(&state.config.default_image);
    if !path.exists() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Default image not found" })),
        );
    }
    respond_with_pipeline(&state, path).await
}

async fn respond_with_pipeline(state: &AppState, path: &Path) -> (StatusCode, Json<Value>) {
    match process_image(state, path).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "name": outcome.extraction.name,
                "platform": outcome.extraction.platform.to_string(),
                "streak": outcome.extraction.streak,
                "saved_to": outcome.report.sheet,
                "ocr_text": outcome.ocr_text,
            })),
        ),
        Err(e) if e.is_client_error() => bad_request(e.to_string()),
        Err(e) => {
            error!("[Gateway] Pipeline failed for {}: {}", path.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

fn bad_request(detail: String) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": detail })))
}
