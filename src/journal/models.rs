use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::naming::StorageKey;

/// An object whose bytes were stored but whose document record was never created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrphanRecord {
    pub key: StorageKey,
    pub canonical_url: String,
    pub owner_identity: String,
    pub content_type: String,
    pub byte_size: u64,
    pub orphaned_at: DateTime<Utc>,
    /// Diagnostic detail of the failed record creation
    pub reason: String,
}
