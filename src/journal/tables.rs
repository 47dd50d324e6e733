use redb::TableDefinition;

/// Orphaned objects: storage key -> OrphanRecord (msgpack)
pub const ORPHANS: TableDefinition<&str, &[u8]> = TableDefinition::new("orphans");
