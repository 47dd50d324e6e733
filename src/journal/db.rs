use redb::{Database as RedbDatabase, ReadTransaction, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::tables::*;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Commit error: {0}")]
    Commit(Box<redb::CommitError>),
    #[error("Database error: {0}")]
    RedbDatabase(Box<redb::DatabaseError>),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),
    #[error("Storage error: {0}")]
    Storage(Box<redb::StorageError>),
    #[error("Table error: {0}")]
    Table(Box<redb::TableError>),
    #[error("Transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
}

impl From<redb::CommitError> for JournalError {
    fn from(e: redb::CommitError) -> Self {
        JournalError::Commit(Box::new(e))
    }
}

impl From<redb::DatabaseError> for JournalError {
    fn from(e: redb::DatabaseError) -> Self {
        JournalError::RedbDatabase(Box::new(e))
    }
}

impl From<redb::StorageError> for JournalError {
    fn from(e: redb::StorageError) -> Self {
        JournalError::Storage(Box::new(e))
    }
}

impl From<redb::TableError> for JournalError {
    fn from(e: redb::TableError) -> Self {
        JournalError::Table(Box::new(e))
    }
}

impl From<redb::TransactionError> for JournalError {
    fn from(e: redb::TransactionError) -> Self {
        JournalError::Transaction(Box::new(e))
    }
}

/// Local record of objects that reached the store without a document record.
#[derive(Clone)]
pub struct OrphanJournal {
    db: Arc<RedbDatabase>,
}

/// Statistics from a purge operation
#[derive(Debug, Default)]
pub struct PurgeStats {
    pub orphans: u64,
}

impl OrphanJournal {
    /// Open or create the journal in the given directory
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, JournalError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("doc-uploader.redb");
        let db = Arc::new(RedbDatabase::create(db_path)?);

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORPHANS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub(crate) fn begin_read(&self) -> Result<ReadTransaction, JournalError> {
        Ok(self.db.begin_read()?)
    }

    pub(crate) fn begin_write(&self) -> Result<WriteTransaction, JournalError> {
        Ok(self.db.begin_write()?)
    }

    /// Remove every entry - for testing only
    pub fn purge_all(&self) -> Result<PurgeStats, JournalError> {
        let write_txn = self.begin_write()?;
        let mut stats = PurgeStats::default();

        {
            let mut table = write_txn.open_table(ORPHANS)?;
            table.retain(|_, _| {
                stats.orphans += 1;
                false
            })?;
        }

        write_txn.commit()?;
        Ok(stats)
    }
}
