//! Port for FAQ persistence.

use async_trait::async_trait;

use crate::domain::{Faq, FaqChanges, FaqId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by FAQ repository adapters.
    pub enum FaqRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "faq repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "faq repository query failed: {message}",
        /// Another FAQ already asks the same question.
        DuplicateQuestion { question: String } => "faq question already exists: {question}",
    }
}

/// Storage for FAQ entries. Question uniqueness is case-insensitive.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaqRepository: Send + Sync {
    /// Insert a new FAQ, failing with `DuplicateQuestion` on collision.
    async fn insert(&self, faq: &Faq) -> Result<(), FaqRepositoryError>;

    /// Fetch a FAQ by identifier.
    async fn find_by_id(&self, id: &FaqId) -> Result<Option<Faq>, FaqRepositoryError>;

    /// Every FAQ, newest first.
    async fn list(&self) -> Result<Vec<Faq>, FaqRepositoryError>;

    /// FAQs whose question or answer contains `needle`, ignoring case,
    /// newest first. `needle` is already lower-cased.
    async fn search(&self, needle: &str) -> Result<Vec<Faq>, FaqRepositoryError>;

    /// Write only the columns present in `changes`, failing with
    /// `DuplicateQuestion` on collision. Returns `None` when absent.
    async fn update(
        &self,
        id: &FaqId,
        changes: &FaqChanges,
    ) -> Result<Option<Faq>, FaqRepositoryError>;

    /// Delete a FAQ. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &FaqId) -> Result<bool, FaqRepositoryError>;
}
