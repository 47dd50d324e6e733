mod http;

pub use http::HttpRegistry;

use async_trait::async_trait;

use crate::error::UploadError;
use crate::models::DocumentRecord;

/// Persists document records. Creation is not idempotent: the same key
/// submitted twice may yield two records.
#[async_trait]
pub trait MetadataRegistry: Send + Sync {
    async fn create(&self, record: DocumentRecord) -> Result<DocumentRecord, UploadError>;
}
