//! Port for storing ticket attachments outside the database.

use async_trait::async_trait;

use crate::domain::AttachmentUpload;

use super::define_port_error;

define_port_error! {
    /// Errors raised by attachment store adapters.
    pub enum AttachmentStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } => "attachment storage failed: {message}",
        /// The stored path does not belong to this store.
        InvalidPath { path: String } => "attachment path rejected: {path}",
    }
}

/// File storage for ticket attachments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Persist an upload and return the path recorded on the ticket.
    async fn save(&self, upload: &AttachmentUpload) -> Result<String, AttachmentStoreError>;

    /// Remove a stored attachment. Removing a missing file succeeds.
    async fn remove(&self, path: &str) -> Result<(), AttachmentStoreError>;
}

/// Store that accepts uploads without keeping them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardingAttachmentStore;

#[async_trait]
impl AttachmentStore for DiscardingAttachmentStore {
    async fn save(&self, upload: &AttachmentUpload) -> Result<String, AttachmentStoreError> {
        Ok(format!("discarded.{}", upload.extension()))
    }

    async fn remove(&self, _path: &str) -> Result<(), AttachmentStoreError> {
        Ok(())
    }
}
