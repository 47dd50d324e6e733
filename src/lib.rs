//! doc-uploader - Presigned document upload coordination
//!
//! This crate uploads PDF and DOCX documents in three phases:
//! - Request a presigned write URL for a freshly derived storage key
//! - PUT the bytes directly to the object store
//! - Register a document record with the backend
//!
//! There is no transaction across the phases. An object whose record could not
//! be created is kept in the store and written to a local redb orphan journal.

pub mod api;
pub mod backend;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod journal;
pub mod models;
pub mod naming;
pub mod registry;
#[cfg(test)]
pub mod testutil;

use config::Config;
use coordinator::UploadCoordinator;
use journal::OrphanJournal;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub coordinator: UploadCoordinator,
    pub journal: OrphanJournal,
}
