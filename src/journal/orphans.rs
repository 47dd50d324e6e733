use redb::ReadableTable;

use super::db::{JournalError, OrphanJournal};
use super::models::OrphanRecord;
use super::tables::*;
use crate::naming::StorageKey;

impl OrphanJournal {
    // ========================================================================
    // Orphan operations
    // ========================================================================

    /// Record an orphaned object, replacing any entry under the same key
    pub fn record_orphan(&self, orphan: &OrphanRecord) -> Result<(), JournalError> {
        debug_assert!(!orphan.key.as_str().is_empty(), "orphan key must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(ORPHANS)?;
            let data = rmp_serde::to_vec_named(orphan)?;
            table.insert(orphan.key.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_orphan(&self, key: &StorageKey) -> Result<Option<OrphanRecord>, JournalError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ORPHANS)?;

        match table.get(key.as_str())? {
            Some(data) => Ok(Some(rmp_serde::from_slice(data.value())?)),
            None => Ok(None),
        }
    }

    /// All orphans, ordered by key
    pub fn list_orphans(&self) -> Result<Vec<OrphanRecord>, JournalError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(ORPHANS)?;

        let mut orphans = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            orphans.push(rmp_serde::from_slice(value.value())?);
        }

        Ok(orphans)
    }

    /// Forget an orphan. Returns whether an entry existed.
    pub fn remove_orphan(&self, key: &StorageKey) -> Result<bool, JournalError> {
        let write_txn = self.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(ORPHANS)?;
            let existed = table.remove(key.as_str())?.is_some();
            existed
        };
        write_txn.commit()?;
        Ok(removed)
    }
}
