//! Storage key and canonical URL derivation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one object in the store: `{owner}-{uuid}-{filename}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Wrap a key that was derived elsewhere (journal entries, delete requests).
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive a fresh key for `original_filename` owned by `owner_identity`.
///
/// Uniqueness comes from the UUID v4 token alone. The filename is used as-is:
/// path separators and other special characters are not stripped.
pub fn make_key(owner_identity: &str, original_filename: &str) -> StorageKey {
    let token = uuid::Uuid::new_v4();
    StorageKey(format!("{owner_identity}-{token}-{original_filename}"))
}

/// Public URL of `key` in `bucket`.
pub fn canonical_url(bucket: &str, key: &StorageKey) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}
