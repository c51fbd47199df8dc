//! Driving port for FAQ curation.

use async_trait::async_trait;

use crate::domain::{Error, Faq, FaqId, FaqInput, FaqPatch, Identity};

/// Domain use-case port for admin FAQ changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaqCommand: Send + Sync {
    /// Add a FAQ entry.
    async fn create(&self, identity: &Identity, input: FaqInput) -> Result<Faq, Error>;

    /// Change the supplied fields of a FAQ entry.
    async fn update(&self, identity: &Identity, id: &FaqId, patch: FaqPatch)
    -> Result<Faq, Error>;

    /// Remove a FAQ entry.
    async fn delete(&self, identity: &Identity, id: &FaqId) -> Result<(), Error>;
}
