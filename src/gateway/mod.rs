mod http;

pub use http::HttpGateway;

use async_trait::async_trait;

use crate::error::UploadError;
use crate::models::{DeleteResult, PresignedCredential, TransferResult, UploadFile};
use crate::naming::StorageKey;

/// Presigned access to the object store.
///
/// Credentials are minted by the backend; bytes move directly between this
/// process and the store. Nothing here rolls back a completed transfer.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Fails with [`UploadError::Validation`] before any network call when
    /// `declared_type` is not an allowed type.
    async fn request_write_credential(
        &self,
        key: &StorageKey,
        declared_type: &str,
    ) -> Result<PresignedCredential, UploadError>;

    async fn transfer_bytes(
        &self,
        file: &UploadFile,
        credential: PresignedCredential,
    ) -> Result<TransferResult, UploadError>;

    async fn request_delete_credential(
        &self,
        key: &StorageKey,
    ) -> Result<PresignedCredential, UploadError>;

    async fn transfer_delete(
        &self,
        credential: PresignedCredential,
    ) -> Result<DeleteResult, UploadError>;
}
