//! Driving port for public FAQ reads.

use async_trait::async_trait;

use crate::domain::{Error, Faq, FaqId};

/// Domain use-case port for browsing FAQs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaqQuery: Send + Sync {
    /// Every FAQ, newest first.
    async fn list(&self) -> Result<Vec<Faq>, Error>;

    /// FAQs whose question or answer contains `query`, ignoring case.
    async fn search(&self, query: &str) -> Result<Vec<Faq>, Error>;

    /// A single FAQ.
    async fn get(&self, id: &FaqId) -> Result<Faq, Error>;
}
