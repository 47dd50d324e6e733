pub mod db;
pub mod models;
mod orphans;
mod tables;

pub use db::{JournalError, OrphanJournal, PurgeStats};
pub use models::OrphanRecord;
pub use tables::*;
