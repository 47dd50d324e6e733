use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::UploadError;
use crate::naming::StorageKey;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Content types accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedType {
    Docx,
    Pdf,
}

impl AllowedType {
    pub fn mime(&self) -> &'static str {
        match self {
            AllowedType::Docx => DOCX_MIME,
            AllowedType::Pdf => PDF_MIME,
        }
    }
}

impl FromStr for AllowedType {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PDF_MIME => Ok(AllowedType::Pdf),
            DOCX_MIME => Ok(AllowedType::Docx),
            other => Err(UploadError::Validation(format!(
                "content type '{other}' is not allowed"
            ))),
        }
    }
}

impl fmt::Display for AllowedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// A file handed to the coordinator. `content_type` is whatever the caller
/// declared; it is validated when the write credential is requested.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn byte_size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Short-lived URL authorizing exactly one write or delete against the store.
/// Not `Clone`: the operation that uses it takes it by value.
#[derive(Debug, PartialEq, Eq)]
pub struct PresignedCredential(String);

impl PresignedCredential {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

/// Outcome of a successful byte transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub status: u16,
    pub etag: Option<String>,
}

/// Outcome of a successful delete transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    pub status: u16,
}

/// The durable metadata entry for a completed upload, in the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Backend-assigned identifier, if the backend returns one.
    #[serde(
        default,
        alias = "_id",
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(rename = "filename")]
    pub storage_key: StorageKey,
    #[serde(rename = "s3Url")]
    pub canonical_url: String,
    #[serde(rename = "userEmail")]
    pub owner_identity: String,
    #[serde(rename = "uploadedAt", serialize_with = "iso8601_millis")]
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(
        storage_key: StorageKey,
        canonical_url: String,
        owner_identity: impl Into<String>,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            storage_key,
            canonical_url,
            owner_identity: owner_identity.into(),
            uploaded_at,
        }
    }
}

/// Serialize as `2024-01-02T03:04:05.678Z`, the form the backend stores.
fn iso8601_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Backends hand out string ids (`"65f0c0ffee"`) or numeric ones (`42`).
fn string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

/// Read an identifier out of a JSON value, if it is a string or a number.
pub fn id_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_allowed_type_accepts_pdf_and_docx() {
        assert_eq!(
            "application/pdf".parse::<AllowedType>().unwrap(),
            AllowedType::Pdf
        );
        assert_eq!(
            DOCX_MIME.parse::<AllowedType>().unwrap(),
            AllowedType::Docx
        );
        assert_eq!(AllowedType::Docx.to_string(), DOCX_MIME);
    }

    #[test]
    fn test_allowed_type_rejects_everything_else() {
        for declared in ["image/png", "application/msword", "", "APPLICATION/PDF", "text/plain"] {
            let err = declared.parse::<AllowedType>().unwrap_err();
            assert!(matches!(err, UploadError::Validation(_)), "{declared}");
        }
    }

    #[test]
    fn test_document_record_wire_shape() {
        let record = DocumentRecord::new(
            StorageKey::from_raw("alice@example.com-abc-report.pdf"),
            "https://docs.s3.amazonaws.com/alice@example.com-abc-report.pdf".to_string(),
            "alice@example.com",
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "filename": "alice@example.com-abc-report.pdf",
                "s3Url": "https://docs.s3.amazonaws.com/alice@example.com-abc-report.pdf",
                "userEmail": "alice@example.com",
                "uploadedAt": "2024-03-01T12:30:00.000Z",
            })
        );
    }

    #[test]
    fn test_document_record_accepts_backend_id() {
        let record: DocumentRecord = serde_json::from_value(serde_json::json!({
            "_id": "65f0c0ffee",
            "filename": "k",
            "s3Url": "https://b.s3.amazonaws.com/k",
            "userEmail": "bob@example.com",
            "uploadedAt": "2024-03-01T12:30:00.000Z",
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("65f0c0ffee"));
        assert_eq!(record.storage_key.as_str(), "k");
    }

    #[test]
    fn test_document_record_accepts_numeric_id() {
        let record: DocumentRecord = serde_json::from_value(serde_json::json!({
            "id": 42,
            "filename": "k",
            "s3Url": "https://b.s3.amazonaws.com/k",
            "userEmail": "bob@example.com",
            "uploadedAt": "2024-03-01T12:30:00.000Z",
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("42"));
    }
}
