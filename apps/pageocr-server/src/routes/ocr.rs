//! OCR Routes
//!
//! Endpoints:
//! - POST /api/v1/ocr/page - Run the page pipeline on an uploaded image
//!
//! The upload is a multipart form with an `image` file and optional
//! `language`, `version`, `modality` and `model` text fields. Missing fields
//! fall back to the configured pipeline defaults.

use std::path::{Path, PathBuf};

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{PageOcrError, Result};
use crate::ocr::{Language, Modality};
use crate::page::PageImage;
use crate::pipeline::{PageOcrResponse, PipelineOptions};
use crate::state::AppState;

/// Maximum accepted page upload: 50MB
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

// ============================================================================
// Error Response
// ============================================================================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl IntoResponse for PageOcrError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "Page OCR failed: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/page", post(ocr_page))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}

// ============================================================================
// Handlers
// ============================================================================

/// Parsed multipart upload
struct PageUpload {
    file_name: String,
    data: Vec<u8>,
    options: PipelineOptions,
}

async fn read_upload(mut multipart: Multipart, defaults: &PipelineOptions) -> Result<PageUpload> {
    let mut options = defaults.clone();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PageOcrError::InvalidRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = upload_file_name(field.file_name());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| PageOcrError::InvalidRequest(e.to_string()))?;
                image = Some((file_name, data.to_vec()));
            }
            "language" | "version" | "modality" | "model" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| PageOcrError::InvalidRequest(e.to_string()))?;
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                match name.as_str() {
                    "language" => options.language = value.parse::<Language>()?,
                    "modality" => options.modality = value.parse::<Modality>()?,
                    "version" => options.version = value.to_string(),
                    _ => options.layout_model = value.to_string(),
                }
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown upload field");
            }
        }
    }

    let (file_name, data) =
        image.ok_or_else(|| PageOcrError::InvalidRequest("missing `image` field".to_string()))?;
    if data.is_empty() {
        return Err(PageOcrError::InvalidRequest("empty `image` field".to_string()));
    }

    Ok(PageUpload {
        file_name,
        data,
        options,
    })
}

/// Keep only the final path component of a client-supplied file name
fn upload_file_name(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().trim().to_string())
        .filter(|name| !name.is_empty() && !name.starts_with('.'))
        .unwrap_or_else(|| "page.jpg".to_string())
}

/// POST /api/v1/ocr/page
///
/// Each request gets its own work directory, removed once the run finishes.
async fn ocr_page(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PageOcrResponse>> {
    let upload = read_upload(multipart, &state.config().pipeline).await?;

    let request_dir: PathBuf = state
        .config()
        .server
        .work_dir
        .join(Uuid::new_v4().to_string());
    tokio::fs::create_dir_all(&request_dir)
        .await
        .map_err(|e| {
            PageOcrError::Crop(crate::crop::CropError::Storage(format!(
                "Failed to create {}: {}",
                request_dir.display(),
                e
            )))
        })?;

    let page = PageImage::new(request_dir.join(&upload.file_name), upload.data);
    let result = state.pipeline().run_page(&page, &upload.options).await;

    if let Err(e) = tokio::fs::remove_dir_all(&request_dir).await {
        tracing::warn!(dir = %request_dir.display(), "Failed to remove work directory: {}", e);
    }

    Ok(Json(result?))
}
