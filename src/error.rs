use thiserror::Error;

/// Failure of a single upload stage. Every variant is terminal for the
/// invocation in which it occurs; none are retried.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Declared content type is not an allowed type. Detected locally.
    #[error("Validation error: {0}")]
    Validation(String),
    /// Credential request failed in transport or was rejected by the backend.
    #[error("Network error: {0}")]
    Network(String),
    /// Object-store write or delete failed.
    #[error("Transfer error: {0}")]
    Transfer(String),
    /// Document record creation failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}
