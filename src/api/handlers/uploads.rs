use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use chrono::SecondsFormat;
use serde::Serialize;
use std::sync::Arc;

use super::upload_error;
use crate::api::response::{ApiError, JSend};
use crate::coordinator::StatusSnapshot;
use crate::models::{DocumentRecord, UploadFile};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub canonical_url: String,
    pub id: Option<String>,
    pub key: String,
    pub owner_identity: String,
    pub uploaded_at: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Route: POST /uploads (multipart: `file`, `owner`)
pub async fn create_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<JSend<DocumentResponse>>, ApiError> {
    let mut file_data: Option<Bytes> = None;
    let mut file_name: Option<String> = None;
    let mut file_content_type: Option<String> = None;
    let mut owner: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                file_content_type = field.content_type().map(|s| s.to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {e}")))?;

                if data.len() as u64 > state.config.max_upload_size {
                    return Err(ApiError::payload_too_large(format!(
                        "File exceeds maximum upload size of {} bytes",
                        state.config.max_upload_size
                    )));
                }

                file_data = Some(data);
            }
            "owner" => {
                owner = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid owner: {e}")))?,
                );
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let file_data = file_data.ok_or_else(|| ApiError::bad_request("file field is required"))?;
    let owner = owner.ok_or_else(|| ApiError::bad_request("owner field is required"))?;
    if owner.trim().is_empty() {
        return Err(ApiError::bad_request("owner must not be empty"));
    }

    let file_name = file_name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("file must have a filename"))?;

    let content_type = file_content_type
        .filter(|ct| ct != "application/octet-stream")
        .or_else(|| mime_guess::from_path(&file_name).first().map(|m| m.to_string()))
        .unwrap_or_else(|| "application/octet-stream".to_string());

    // Runs detached from the request; a client disconnect does not stop it
    let file = UploadFile::new(file_name, content_type, file_data);
    let owner = owner.trim().to_string();
    let upload_state = Arc::clone(&state);
    let record = tokio::spawn(async move { upload_state.coordinator.upload(file, &owner).await })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Upload task failed");
            ApiError::internal("Upload task failed")
        })?
        .map_err(upload_error)?;

    Ok(JSend::success(record_to_response(&record)))
}

/// Route: GET /uploads/status
pub async fn upload_status(State(state): State<Arc<AppState>>) -> Json<JSend<StatusSnapshot>> {
    JSend::success(state.coordinator.status())
}

// ============================================================================
// Helpers
// ============================================================================

fn record_to_response(record: &DocumentRecord) -> DocumentResponse {
    DocumentResponse {
        canonical_url: record.canonical_url.clone(),
        id: record.id.clone(),
        key: record.storage_key.to_string(),
        owner_identity: record.owner_identity.clone(),
        uploaded_at: record
            .uploaded_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
