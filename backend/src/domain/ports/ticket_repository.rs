//! Port for ticket persistence.
//!
//! Adapters return fully hydrated [`Ticket`] aggregates: owner and comment
//! author summaries are resolved by the adapter, and comments come back
//! oldest first.

use async_trait::async_trait;

use crate::domain::{NewComment, Ticket, TicketChanges, TicketDraft, TicketId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ticket repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ticket repository query failed: {message}",
    }
}

/// Storage for tickets and their admin comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Store a new ticket and return it hydrated.
    async fn insert(&self, draft: &TicketDraft) -> Result<Ticket, TicketRepositoryError>;

    /// Fetch a ticket by identifier.
    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Tickets owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Every ticket, newest first.
    async fn list_all(&self) -> Result<Vec<Ticket>, TicketRepositoryError>;

    /// Write only the columns present in `changes`.
    ///
    /// Returns `None` when the ticket no longer exists.
    async fn update(
        &self,
        id: &TicketId,
        changes: &TicketChanges,
    ) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Append a comment as its own atomic write so concurrent appends never
    /// overwrite each other. Returns `None` when the ticket no longer exists.
    async fn append_comment(
        &self,
        comment: &NewComment,
    ) -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Delete a ticket and its comments. Returns `false` when nothing was
    /// deleted.
    async fn delete(&self, id: &TicketId) -> Result<bool, TicketRepositoryError>;

    /// Attachment paths referenced by tickets owned by `owner`.
    async fn attachment_paths_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<String>, TicketRepositoryError>;
}
