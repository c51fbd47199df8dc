//! Driving port for ticket mutations.

use async_trait::async_trait;

use crate::domain::{CreateTicketInput, Error, Identity, Ticket, TicketId, TicketPatch};

/// Domain use-case port for creating and changing tickets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketCommand: Send + Sync {
    /// File a new ticket as the calling student.
    async fn create(&self, identity: &Identity, input: CreateTicketInput)
    -> Result<Ticket, Error>;

    /// Apply a role-restricted partial update.
    async fn update(
        &self,
        identity: &Identity,
        id: &TicketId,
        patch: TicketPatch,
    ) -> Result<Ticket, Error>;

    /// Append an admin comment.
    async fn add_comment(
        &self,
        identity: &Identity,
        id: &TicketId,
        comment: String,
    ) -> Result<Ticket, Error>;

    /// Record an admin response and move the ticket to `in-progress`.
    async fn respond(
        &self,
        identity: &Identity,
        id: &TicketId,
        response: String,
    ) -> Result<Ticket, Error>;

    /// Delete a ticket and its attachment.
    async fn delete(&self, identity: &Identity, id: &TicketId) -> Result<(), Error>;
}
