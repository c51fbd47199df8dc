//! Driving port for ticket reads.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Ticket, TicketId};

/// Domain use-case port for reading tickets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketQuery: Send + Sync {
    /// Tickets filed by the caller, newest first.
    async fn list_own(&self, identity: &Identity) -> Result<Vec<Ticket>, Error>;

    /// Every ticket, newest first. Admin only.
    async fn list_all(&self, identity: &Identity) -> Result<Vec<Ticket>, Error>;

    /// A single ticket visible to its owner or an admin.
    async fn get(&self, identity: &Identity, id: &TicketId) -> Result<Ticket, Error>;
}
