use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::delete_error;
use crate::api::response::{ApiError, AppQuery, JSend, JSendPaginated, Pagination};
use crate::journal::OrphanRecord;
use crate::naming::StorageKey;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DeleteObjectParams {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct ListOrphansParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Serialize)]
pub struct DeleteObjectResponse {
    pub key: String,
    /// Whether a journaled orphan entry was cleared along with the object
    pub orphan_cleared: bool,
    pub status: u16,
}

// ============================================================================
// Handlers
// ============================================================================

/// Route: DELETE /objects?key=...
///
/// Runs the presigned delete pair for one key. Never invoked by the upload path.
pub async fn delete_object(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<DeleteObjectParams>,
) -> Result<Json<JSend<DeleteObjectResponse>>, ApiError> {
    if params.key.trim().is_empty() {
        return Err(ApiError::bad_request("key must not be empty"));
    }
    let key = StorageKey::from_raw(params.key);

    let gateway = state.coordinator.gateway();
    let credential = gateway
        .request_delete_credential(&key)
        .await
        .map_err(delete_error)?;
    let result = gateway
        .transfer_delete(credential)
        .await
        .map_err(delete_error)?;

    let orphan_cleared = state
        .journal
        .remove_orphan(&key)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(key = %key, orphan_cleared, "Deleted object");

    Ok(JSend::success(DeleteObjectResponse {
        key: key.to_string(),
        orphan_cleared,
        status: result.status,
    }))
}

/// Route: GET /orphans
pub async fn list_orphans(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListOrphansParams>,
) -> Result<Json<JSendPaginated<OrphanRecord>>, ApiError> {
    if params.limit == 0 {
        return Err(ApiError::bad_request("limit must be greater than 0"));
    }

    let orphans = state
        .journal
        .list_orphans()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let total = orphans.len() as u64;
    let items: Vec<OrphanRecord> = orphans
        .into_iter()
        .skip(params.offset as usize)
        .take(params.limit as usize)
        .collect();

    Ok(JSendPaginated::success(
        items,
        Pagination {
            limit: params.limit,
            offset: params.offset,
            total,
        },
    ))
}
