//! In-memory `TicketRepository`.
//!
//! Tickets keep owner and author ids only; summaries are resolved from the
//! user collection on every read, mirroring the joins of the SQL adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{
    AdminComment, NewComment, Ticket, TicketCategory, TicketChanges, TicketDraft, TicketId,
    TicketPriority, TicketStatus, UserAccount, UserId, UserSummary,
};

use super::{Tickets, Users, find_account, lock};

#[derive(Debug, Clone)]
pub(super) struct StoredComment {
    /// Cleared when the authoring account is deleted.
    pub(super) admin_id: Option<UserId>,
    comment: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(super) struct StoredTicket {
    id: TicketId,
    pub(super) owner_id: UserId,
    title: String,
    description: String,
    category: TicketCategory,
    status: TicketStatus,
    priority: TicketPriority,
    response: Option<String>,
    attachment_path: Option<String>,
    resolved_at: Option<DateTime<Utc>>,
    pub(super) comments: Vec<StoredComment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredTicket {
    fn from_draft(draft: &TicketDraft) -> Self {
        Self {
            id: draft.id,
            owner_id: draft.owner_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            category: draft.category,
            status: TicketStatus::default(),
            priority: draft.priority,
            response: None,
            attachment_path: draft.attachment_path.clone(),
            resolved_at: None,
            comments: Vec::new(),
            created_at: draft.created_at,
            updated_at: draft.created_at,
        }
    }

    fn apply(&mut self, changes: &TicketChanges) {
        if let Some(title) = &changes.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &changes.description {
            self.description.clone_from(description);
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(response) = &changes.response {
            self.response = Some(response.clone());
        }
        if let Some(resolved_at) = changes.resolved_at {
            self.resolved_at = Some(resolved_at);
        }
        self.updated_at = changes.updated_at;
    }

    fn hydrate(&self, users: &[UserAccount]) -> Result<Ticket, TicketRepositoryError> {
        let owner = find_account(users, &self.owner_id)
            .map(|account| UserSummary::from(&account.user))
            .ok_or_else(|| {
                TicketRepositoryError::query(format!("owner of ticket {} is missing", self.id))
            })?;
        let comments = self
            .comments
            .iter()
            .map(|comment| AdminComment {
                comment: comment.comment.clone(),
                admin: comment
                    .admin_id
                    .and_then(|id| find_account(users, &id))
                    .map_or_else(UserSummary::deleted_account, |admin| {
                        UserSummary::from(&admin.user)
                    }),
                created_at: comment.created_at,
            })
            .collect();
        Ok(Ticket {
            id: self.id,
            owner,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            status: self.status,
            priority: self.priority,
            response: self.response.clone(),
            attachment_path: self.attachment_path.clone(),
            resolved_at: self.resolved_at,
            comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Tickets held in process memory.
#[derive(Clone)]
pub struct InMemoryTicketRepository {
    users: Users,
    tickets: Tickets,
}

impl InMemoryTicketRepository {
    pub(super) fn new(users: Users, tickets: Tickets) -> Self {
        Self { users, tickets }
    }

    /// Hydrate the tickets matching `keep`, newest first.
    fn collect(
        &self,
        keep: impl Fn(&StoredTicket) -> bool,
    ) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let users = lock(&self.users);
        let tickets = lock(&self.tickets);
        let mut selected: Vec<&StoredTicket> = tickets.iter().rev().filter(|t| keep(t)).collect();
        selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        selected
            .into_iter()
            .map(|ticket| ticket.hydrate(&users))
            .collect()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn insert(&self, draft: &TicketDraft) -> Result<Ticket, TicketRepositoryError> {
        let users = lock(&self.users);
        if find_account(&users, &draft.owner_id).is_none() {
            return Err(TicketRepositoryError::query(format!(
                "owner {} does not exist",
                draft.owner_id
            )));
        }
        let stored = StoredTicket::from_draft(draft);
        let ticket = stored.hydrate(&users)?;
        lock(&self.tickets).push(stored);
        Ok(ticket)
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let users = lock(&self.users);
        let tickets = lock(&self.tickets);
        tickets
            .iter()
            .find(|ticket| ticket.id == *id)
            .map(|ticket| ticket.hydrate(&users))
            .transpose()
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Ticket>, TicketRepositoryError> {
        self.collect(|ticket| ticket.owner_id == *owner)
    }

    async fn list_all(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        self.collect(|_| true)
    }

    async fn update(
        &self,
        id: &TicketId,
        changes: &TicketChanges,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let users = lock(&self.users);
        let mut tickets = lock(&self.tickets);
        tickets
            .iter_mut()
            .find(|ticket| ticket.id == *id)
            .map(|ticket| {
                ticket.apply(changes);
                ticket.hydrate(&users)
            })
            .transpose()
    }

    async fn append_comment(
        &self,
        comment: &NewComment,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let users = lock(&self.users);
        let mut tickets = lock(&self.tickets);
        tickets
            .iter_mut()
            .find(|ticket| ticket.id == comment.ticket_id)
            .map(|ticket| {
                ticket.comments.push(StoredComment {
                    admin_id: Some(comment.admin_id),
                    comment: comment.comment.clone(),
                    created_at: comment.created_at,
                });
                ticket.updated_at = comment.created_at;
                ticket.hydrate(&users)
            })
            .transpose()
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, TicketRepositoryError> {
        let mut tickets = lock(&self.tickets);
        let before = tickets.len();
        tickets.retain(|ticket| ticket.id != *id);
        Ok(tickets.len() < before)
    }

    async fn attachment_paths_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<String>, TicketRepositoryError> {
        Ok(lock(&self.tickets)
            .iter()
            .filter(|ticket| ticket.owner_id == *owner)
            .filter_map(|ticket| ticket.attachment_path.clone())
            .collect())
    }
}
