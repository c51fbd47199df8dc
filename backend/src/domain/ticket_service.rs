//! Ticket lifecycle domain service.
//!
//! Implements [`TicketCommand`] and [`TicketQuery`]. Authorization runs
//! after the ticket is loaded so callers learn `NotFound` before
//! `Forbidden`. Owners may only edit descriptive fields; anything else in
//! their patch is dropped without error.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AttachmentStore, AttachmentStoreError, TicketCommand, TicketQuery, TicketRepository,
    TicketRepositoryError,
};
use crate::domain::{
    CreateTicketInput, Error, Identity, NewComment, Role, Ticket, TicketCategory, TicketChanges,
    TicketDraft, TicketId, TicketPatch, TicketPriority, TicketStatus, TicketValidationError,
    authorize, authorize_owner_or_admin, validate_description, validate_title,
};

/// Ticket service implementing the ticket driving ports.
#[derive(Clone)]
pub struct TicketService<R, A> {
    tickets: Arc<R>,
    attachments: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<R, A> TicketService<R, A> {
    /// Create a new service with the given adapters.
    pub fn new(tickets: Arc<R>, attachments: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets,
            attachments,
            clock,
        }
    }
}

fn invalid(error: TicketValidationError) -> Error {
    let field = error.field();
    Error::invalid_field(field, &format!("invalid_{field}"), error.to_string())
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, Error> {
    value.ok_or_else(|| Error::missing_field(field))
}

fn non_blank(raw: &str, empty: TicketValidationError) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid(empty));
    }
    Ok(trimmed.to_owned())
}

impl<R, A> TicketService<R, A>
where
    R: TicketRepository,
    A: AttachmentStore,
{
    fn map_repository_error(error: TicketRepositoryError) -> Error {
        match error {
            TicketRepositoryError::Connection { message } => {
                Error::internal(format!("ticket repository unavailable: {message}"))
            }
            TicketRepositoryError::Query { message } => {
                Error::internal(format!("ticket repository error: {message}"))
            }
        }
    }

    fn map_store_error(error: AttachmentStoreError) -> Error {
        Error::internal(format!("attachment could not be stored: {error}"))
    }

    fn not_found(id: &TicketId) -> Error {
        Error::not_found(format!("ticket {id} not found"))
    }

    async fn load(&self, id: &TicketId) -> Result<Ticket, Error> {
        self.tickets
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Remove a stored attachment, logging instead of failing.
    async fn discard_attachment(&self, path: &str) {
        if let Err(error) = self.attachments.remove(path).await {
            warn!(%error, path, "failed to remove ticket attachment");
        }
    }

    fn build_changes(&self, patch: &TicketPatch) -> Result<TicketChanges, Error> {
        let mut changes = TicketChanges::touch(self.clock.utc());
        changes.title = patch
            .title
            .as_deref()
            .map(validate_title)
            .transpose()
            .map_err(invalid)?;
        changes.description = patch
            .description
            .as_deref()
            .map(validate_description)
            .transpose()
            .map_err(invalid)?;
        changes.category = patch
            .category
            .as_deref()
            .map(str::parse::<TicketCategory>)
            .transpose()
            .map_err(invalid)?;
        changes.status = patch
            .status
            .as_deref()
            .map(str::parse::<TicketStatus>)
            .transpose()
            .map_err(invalid)?;
        changes.priority = patch
            .priority
            .as_deref()
            .map(str::parse::<TicketPriority>)
            .transpose()
            .map_err(invalid)?;
        changes.response = patch
            .response
            .as_deref()
            .map(|raw| non_blank(raw, TicketValidationError::EmptyResponse))
            .transpose()?;
        if changes.status == Some(TicketStatus::Resolved) {
            changes.resolved_at = Some(changes.updated_at);
        }
        Ok(changes)
    }

    async fn append(
        &self,
        identity: &Identity,
        id: &TicketId,
        text: String,
    ) -> Result<Ticket, Error> {
        let comment = NewComment {
            ticket_id: *id,
            admin_id: identity.user_id,
            comment: text,
            created_at: self.clock.utc(),
        };
        self.tickets
            .append_comment(&comment)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(id))
    }
}

#[async_trait]
impl<R, A> TicketCommand for TicketService<R, A>
where
    R: TicketRepository,
    A: AttachmentStore,
{
    async fn create(
        &self,
        identity: &Identity,
        input: CreateTicketInput,
    ) -> Result<Ticket, Error> {
        authorize(identity, Role::Student)?;

        let title = validate_title(required(input.title.as_deref(), "title")?).map_err(invalid)?;
        let description =
            validate_description(required(input.description.as_deref(), "description")?)
                .map_err(invalid)?;
        let category = input
            .category
            .as_deref()
            .map(str::parse::<TicketCategory>)
            .transpose()
            .map_err(invalid)?
            .unwrap_or_default();
        let priority = input
            .priority
            .as_deref()
            .map(str::parse::<TicketPriority>)
            .transpose()
            .map_err(invalid)?
            .unwrap_or_default();

        let attachment_path = match input.attachment.as_ref() {
            Some(upload) => Some(
                self.attachments
                    .save(upload)
                    .await
                    .map_err(Self::map_store_error)?,
            ),
            None => None,
        };

        let draft = TicketDraft {
            id: TicketId::random(),
            owner_id: identity.user_id,
            title,
            description,
            category,
            priority,
            attachment_path,
            created_at: self.clock.utc(),
        };
        match self.tickets.insert(&draft).await {
            Ok(ticket) => {
                info!(ticket_id = %ticket.id, owner = %identity.user_id, "ticket created");
                Ok(ticket)
            }
            Err(error) => {
                if let Some(path) = draft.attachment_path.as_deref() {
                    self.discard_attachment(path).await;
                }
                Err(Self::map_repository_error(error))
            }
        }
    }

    async fn update(
        &self,
        identity: &Identity,
        id: &TicketId,
        patch: TicketPatch,
    ) -> Result<Ticket, Error> {
        let ticket = self.load(id).await?;
        authorize_owner_or_admin(identity, &ticket.owner.id)?;

        let patch = if identity.is_admin() {
            patch
        } else {
            patch.restrict_to_owner_fields()
        };
        let changes = self.build_changes(&patch)?;
        let comment = patch
            .admin_comment
            .as_deref()
            .map(|raw| non_blank(raw, TicketValidationError::EmptyComment))
            .transpose()?;

        let mut updated = self
            .tickets
            .update(id, &changes)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(id))?;
        if let Some(text) = comment {
            updated = self.append(identity, id, text).await?;
        }

        info!(ticket_id = %id, by = %identity.user_id, status = %updated.status, "ticket updated");
        Ok(updated)
    }

    async fn add_comment(
        &self,
        identity: &Identity,
        id: &TicketId,
        comment: String,
    ) -> Result<Ticket, Error> {
        authorize(identity, Role::Admin)?;
        let text = non_blank(&comment, TicketValidationError::EmptyComment)?;
        let ticket = self.append(identity, id, text).await?;
        info!(ticket_id = %id, admin = %identity.user_id, "comment added");
        Ok(ticket)
    }

    async fn respond(
        &self,
        identity: &Identity,
        id: &TicketId,
        response: String,
    ) -> Result<Ticket, Error> {
        authorize(identity, Role::Admin)?;
        let text = non_blank(&response, TicketValidationError::EmptyResponse)?;

        let mut changes = TicketChanges::touch(self.clock.utc());
        changes.response = Some(text);
        changes.status = Some(TicketStatus::InProgress);
        let ticket = self
            .tickets
            .update(id, &changes)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(id))?;
        info!(ticket_id = %id, admin = %identity.user_id, "ticket responded");
        Ok(ticket)
    }

    async fn delete(&self, identity: &Identity, id: &TicketId) -> Result<(), Error> {
        let ticket = self.load(id).await?;
        authorize_owner_or_admin(identity, &ticket.owner.id)?;

        let deleted = self
            .tickets
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?;
        if !deleted {
            return Err(Self::not_found(id));
        }
        if let Some(path) = ticket.attachment_path.as_deref() {
            self.discard_attachment(path).await;
        }
        info!(ticket_id = %id, by = %identity.user_id, "ticket deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, A> TicketQuery for TicketService<R, A>
where
    R: TicketRepository,
    A: AttachmentStore,
{
    async fn list_own(&self, identity: &Identity) -> Result<Vec<Ticket>, Error> {
        self.tickets
            .list_by_owner(&identity.user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn list_all(&self, identity: &Identity) -> Result<Vec<Ticket>, Error> {
        authorize(identity, Role::Admin)?;
        self.tickets
            .list_all()
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get(&self, identity: &Identity, id: &TicketId) -> Result<Ticket, Error> {
        let ticket = self.load(id).await?;
        authorize_owner_or_admin(identity, &ticket.owner.id)?;
        Ok(ticket)
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;
