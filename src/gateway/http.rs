use async_trait::async_trait;
use reqwest::{header, Method, Response};
use serde::Deserialize;

use super::StorageGateway;
use crate::backend::BackendClient;
use crate::error::UploadError;
use crate::models::{AllowedType, DeleteResult, PresignedCredential, TransferResult, UploadFile};
use crate::naming::StorageKey;

const UPLOAD_URL_PATH: &str = "/upload/upload-url";
const DELETE_URL_PATH: &str = "/upload/delete-url";

/// Gateway that asks the backend for presigned URLs and talks to the store over HTTP.
pub struct HttpGateway {
    backend: BackendClient,
}

#[derive(Deserialize)]
struct CredentialResponse {
    url: String,
}

impl HttpGateway {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    async fn fetch_credential(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<PresignedCredential, UploadError> {
        let resp = self
            .backend
            .request(Method::GET, path)
            .query(query)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(UploadError::Network(format!(
                "credential request failed ({status}): {body}"
            )));
        }

        let body: CredentialResponse = resp
            .json()
            .await
            .map_err(|e| UploadError::Network(format!("invalid credential response: {e}")))?;

        Ok(PresignedCredential::new(body.url))
    }
}

#[async_trait]
impl StorageGateway for HttpGateway {
    async fn request_write_credential(
        &self,
        key: &StorageKey,
        declared_type: &str,
    ) -> Result<PresignedCredential, UploadError> {
        let content_type: AllowedType = declared_type.parse()?;

        self.fetch_credential(
            UPLOAD_URL_PATH,
            &[("key", key.as_str()), ("contentType", content_type.mime())],
        )
        .await
    }

    async fn transfer_bytes(
        &self,
        file: &UploadFile,
        credential: PresignedCredential,
    ) -> Result<TransferResult, UploadError> {
        let resp = self
            .backend
            .http()
            .put(credential.url())
            .header(header::CONTENT_TYPE, &file.content_type)
            .body(file.data.clone())
            .send()
            .await
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        let resp = store_response(resp, "upload").await?;
        let etag = resp
            .headers()
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        Ok(TransferResult {
            status: resp.status().as_u16(),
            etag,
        })
    }

    async fn request_delete_credential(
        &self,
        key: &StorageKey,
    ) -> Result<PresignedCredential, UploadError> {
        self.fetch_credential(DELETE_URL_PATH, &[("key", key.as_str())])
            .await
    }

    async fn transfer_delete(
        &self,
        credential: PresignedCredential,
    ) -> Result<DeleteResult, UploadError> {
        let resp = self
            .backend
            .http()
            .delete(credential.url())
            .send()
            .await
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        let resp = store_response(resp, "delete").await?;
        Ok(DeleteResult {
            status: resp.status().as_u16(),
        })
    }
}

/// Pass through a successful store response; turn anything else into a transfer error.
async fn store_response(resp: Response, action: &str) -> Result<Response, UploadError> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(UploadError::Transfer(format!(
        "store {action} failed ({status}): {body}"
    )))
}
