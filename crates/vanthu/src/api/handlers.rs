//! API request handlers.

use axum::Json;
use axum::extract::{Multipart, State};

use super::error::ApiError;
use super::types::{ApiState, DeleteRequest, DeleteResponse, HealthResponse, ReadRequest, ReadResponse};
use crate::types::{IngestResponse, IngestedFile};

/// Destination folder when the client does not send a module field.
pub const DEFAULT_MODULE_TAG: &str = "vanban";

/// Upload endpoint handler.
///
/// POST /upload — multipart form data with a `file` field (binary) and an
/// optional `module` field naming the destination folder. Returns the blob
/// metadata plus the extracted text, when there is any.
pub async fn upload_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, ApiError> {
    let mut upload: Option<(Vec<u8>, String, String)> = None;
    let mut module_tag = DEFAULT_MODULE_TAG.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("untitled").to_string();
                let mime_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|e| ApiError::Validation(e.to_string()))?;
                upload = Some((data.to_vec(), mime_type, file_name));
            }
            "module" => {
                let value = field.text().await.map_err(|e| ApiError::Validation(e.to_string()))?;
                if !value.trim().is_empty() {
                    module_tag = value.trim().to_string();
                }
            }
            _ => {}
        }
    }

    let Some((bytes, mime_type, file_name)) = upload else {
        return Err(ApiError::Validation("no file uploaded".to_string()));
    };

    let file = IngestedFile::new(bytes, mime_type, &file_name, module_tag);
    let response = state.service.ingest(file).await?;
    Ok(Json(response))
}

/// Delete endpoint handler.
///
/// POST /delete
pub async fn delete_handler(
    State(state): State<ApiState>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if request.file_id.trim().is_empty() {
        return Err(ApiError::Validation("missing fileId".to_string()));
    }
    state.service.delete(&request.file_id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// Read-back endpoint handler: re-extract text from an already stored blob.
///
/// POST /read
pub async fn read_handler(
    State(state): State<ApiState>,
    Json(request): Json<ReadRequest>,
) -> Result<Json<ReadResponse>, ApiError> {
    if request.file_id.trim().is_empty() {
        return Err(ApiError::Validation("missing fileId".to_string()));
    }
    let content = state.service.read_back(&request.file_id).await?;
    Ok(Json(ReadResponse { content }))
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
