//! Three-phase upload: write credential, direct transfer, record creation.

mod state;

pub use state::{Stage, StatusSnapshot, UploadState, UploadStatus};

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::UploadError;
use crate::gateway::StorageGateway;
use crate::journal::{OrphanJournal, OrphanRecord};
use crate::models::{DocumentRecord, UploadFile};
use crate::naming::{self, StorageKey};
use crate::registry::MetadataRegistry;

/// Drives one file at a time through the upload stages. Shared across
/// concurrent invocations; only the aggregate status is common to them.
pub struct UploadCoordinator {
    bucket: String,
    gateway: Arc<dyn StorageGateway>,
    journal: Option<OrphanJournal>,
    registry: Arc<dyn MetadataRegistry>,
    status: UploadStatus,
}

impl UploadCoordinator {
    pub fn new(
        bucket: impl Into<String>,
        gateway: Arc<dyn StorageGateway>,
        registry: Arc<dyn MetadataRegistry>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            gateway,
            journal: None,
            registry,
            status: UploadStatus::default(),
        }
    }

    /// Record objects orphaned by a failed record creation in `journal`.
    pub fn with_journal(mut self, journal: OrphanJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn gateway(&self) -> &Arc<dyn StorageGateway> {
        &self.gateway
    }

    pub fn in_flight(&self) -> bool {
        self.status.in_flight()
    }

    pub fn errored(&self) -> bool {
        self.status.errored()
    }

    pub fn status(&self) -> StatusSnapshot {
        self.status.snapshot()
    }

    /// Upload `file` on behalf of `owner_identity` and register its record.
    pub async fn upload(
        &self,
        file: UploadFile,
        owner_identity: &str,
    ) -> Result<DocumentRecord, UploadError> {
        let (progress, _) = watch::channel(UploadState::Idle);
        self.upload_tracked(file, owner_identity, &progress).await
    }

    /// Like [`upload`](Self::upload), publishing every state transition to `progress`.
    pub async fn upload_tracked(
        &self,
        file: UploadFile,
        owner_identity: &str,
        progress: &watch::Sender<UploadState>,
    ) -> Result<DocumentRecord, UploadError> {
        let _in_flight = self.status.begin();
        progress.send_replace(UploadState::Idle);

        let key = naming::make_key(owner_identity, &file.name);
        debug!(key = %key, owner = %owner_identity, "Starting upload");

        advance(progress, &key, UploadState::RequestingCredential);
        let credential = self
            .gateway
            .request_write_credential(&key, &file.content_type)
            .await
            .map_err(|e| self.fail(progress, &key, Stage::RequestingCredential, e))?;

        advance(progress, &key, UploadState::Transferring);
        let transfer = self
            .gateway
            .transfer_bytes(&file, credential)
            .await
            .map_err(|e| self.fail(progress, &key, Stage::Transferring, e))?;
        debug!(key = %key, status = transfer.status, etag = ?transfer.etag, "Bytes stored");

        let canonical_url = naming::canonical_url(&self.bucket, &key);

        advance(progress, &key, UploadState::Persisting);
        let record = DocumentRecord::new(
            key.clone(),
            canonical_url.clone(),
            owner_identity,
            Utc::now(),
        );
        let created = match self.registry.create(record).await {
            Ok(created) => created,
            Err(e) => {
                // The object stays in the store without a record. No delete is
                // attempted here; the orphan is journaled for an operator.
                self.journal_orphan(&file, &key, canonical_url, owner_identity, &e);
                return Err(self.fail(progress, &key, Stage::Persisting, e));
            }
        };

        progress.send_replace(UploadState::Done);
        info!(
            key = %key,
            owner = %owner_identity,
            byte_size = file.byte_size(),
            "Document uploaded"
        );
        Ok(created)
    }

    fn fail(
        &self,
        progress: &watch::Sender<UploadState>,
        key: &StorageKey,
        stage: Stage,
        e: UploadError,
    ) -> UploadError {
        self.status.mark_errored();
        progress.send_replace(UploadState::Failed(stage));
        error!(key = %key, stage = %stage, error = %e, "Upload failed");
        e
    }

    fn journal_orphan(
        &self,
        file: &UploadFile,
        key: &StorageKey,
        canonical_url: String,
        owner_identity: &str,
        cause: &UploadError,
    ) {
        warn!(key = %key, "Object stored without a document record");

        let Some(ref journal) = self.journal else {
            return;
        };

        let orphan = OrphanRecord {
            key: key.clone(),
            canonical_url,
            owner_identity: owner_identity.to_string(),
            content_type: file.content_type.clone(),
            byte_size: file.byte_size(),
            orphaned_at: Utc::now(),
            reason: cause.to_string(),
        };
        if let Err(e) = journal.record_orphan(&orphan) {
            error!(key = %key, error = %e, "Failed to journal orphaned object");
        }
    }
}

fn advance(progress: &watch::Sender<UploadState>, key: &StorageKey, state: UploadState) {
    debug!(key = %key, state = ?state, "Upload stage");
    progress.send_replace(state);
}
