use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::MetadataRegistry;
use crate::backend::BackendClient;
use crate::error::UploadError;
use crate::models::{id_from_value, DocumentRecord};

/// Registry backed by the backend's document-creation endpoint.
pub struct HttpRegistry {
    backend: BackendClient,
    documents_path: String,
}

impl HttpRegistry {
    pub fn new(backend: BackendClient, documents_path: impl Into<String>) -> Self {
        Self {
            backend,
            documents_path: documents_path.into(),
        }
    }
}

#[async_trait]
impl MetadataRegistry for HttpRegistry {
    async fn create(&self, record: DocumentRecord) -> Result<DocumentRecord, UploadError> {
        let resp = self
            .backend
            .request(Method::POST, &self.documents_path)
            .json(&record)
            .send()
            .await
            .map_err(|e| UploadError::Persistence(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(UploadError::Persistence(format!(
                "document creation failed ({status}): {body}"
            )));
        }

        // The record exists past this point; an unreadable body is still a success
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(key = %record.storage_key, error = %e, "Failed to read document response");
                return Ok(record);
            }
        };

        // Some backends answer 201/204 without echoing the record
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(record);
        }

        match serde_json::from_slice::<DocumentRecord>(&body) {
            Ok(created) => Ok(created),
            Err(e) => {
                let id = serde_json::from_slice::<Value>(&body)
                    .ok()
                    .and_then(|v| backend_id(&v));
                tracing::warn!(
                    key = %record.storage_key,
                    error = %e,
                    "Unrecognized document response, keeping submitted record"
                );
                Ok(DocumentRecord { id, ..record })
            }
        }
    }
}

/// Find the backend id at the top level or inside a `data`/`document` wrapper.
fn backend_id(body: &Value) -> Option<String> {
    [body, &body["data"], &body["document"]]
        .into_iter()
        .flat_map(|v| [&v["id"], &v["_id"]])
        .find_map(id_from_value)
}
