mod admin;
mod objects;
mod uploads;

use crate::api::response::ApiError;
use crate::error::UploadError;

pub use admin::{admin_purge, health};
pub use objects::{delete_object, list_orphans};
pub use uploads::{create_upload, upload_status};

/// Map an upload failure to an ApiError. Only a stage-level message reaches
/// the caller; the detail is already logged by the coordinator.
fn upload_error(e: UploadError) -> ApiError {
    match e {
        UploadError::Validation(_) => {
            ApiError::unsupported_media_type("Only PDF and DOCX files are supported")
        }
        UploadError::Network(_) => ApiError::bad_gateway("Failed to get upload URL"),
        UploadError::Transfer(_) => ApiError::bad_gateway("Failed to upload file"),
        UploadError::Persistence(_) => ApiError::bad_gateway("Failed to save document record"),
    }
}

/// Map a failure of the standalone delete pair to an ApiError.
fn delete_error(e: UploadError) -> ApiError {
    tracing::error!(error = %e, "Object delete failed");
    match e {
        UploadError::Network(_) => ApiError::bad_gateway("Failed to get delete URL"),
        UploadError::Transfer(_) => ApiError::bad_gateway("Failed to delete file"),
        other => ApiError::internal(other.to_string()),
    }
}
