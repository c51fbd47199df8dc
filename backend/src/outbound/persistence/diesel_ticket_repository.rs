//! PostgreSQL-backed `TicketRepository` using Diesel.
//!
//! Tickets are hydrated with two follow-up queries: owner summaries for the
//! page of tickets, and comments left-joined to their authors. Comments live
//! in their own table so appends are single-row inserts, and they survive the
//! deletion of the admin who wrote them.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{
    AdminComment, NewComment, Ticket, TicketChanges, TicketDraft, TicketId, TicketStatus, UserId,
    UserSummary,
};

use super::error_mapping::{is_foreign_key_violation, map_diesel_error, map_pool_error};
use super::models::{
    CommentRow, NewCommentRow, NewTicketRow, TicketRow, TicketUpdate, UserSummaryRow,
};
use super::pool::DbPool;
use super::schema::{ticket_comments, tickets, users};

/// Diesel implementation of the [`TicketRepository`] port.
#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn summary(row: UserSummaryRow) -> UserSummary {
    UserSummary {
        id: UserId::from_uuid(row.id),
        name: row.name,
        email: row.email,
    }
}

/// Parse a stored wire name, falling back to the default on drift.
fn parse_column<T: FromStr + Default>(ticket: Uuid, column: &str, value: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        warn!(ticket_id = %ticket, column, value, "unrecognised ticket column value");
        T::default()
    })
}

fn row_to_ticket(row: TicketRow, owner: UserSummary, comments: Vec<AdminComment>) -> Ticket {
    Ticket {
        id: TicketId::from_uuid(row.id),
        owner,
        category: parse_column(row.id, "category", &row.category),
        status: parse_column(row.id, "status", &row.status),
        priority: parse_column(row.id, "priority", &row.priority),
        title: row.title,
        description: row.description,
        response: row.response,
        attachment_path: row.attachment_path,
        resolved_at: row.resolved_at,
        comments,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<TicketRow>,
) -> Result<Vec<Ticket>, TicketRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let owner_ids: Vec<Uuid> = rows.iter().map(|row| row.owner_id).collect();
    let ticket_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let owners: HashMap<Uuid, UserSummary> = users::table
        .filter(users::id.eq_any(&owner_ids))
        .select(UserSummaryRow::as_select())
        .load::<UserSummaryRow>(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .map(|row| (row.id, summary(row)))
        .collect();

    // Authors may have been deleted; their comments stay with the ticket.
    let comment_rows: Vec<(CommentRow, Option<UserSummaryRow>)> = ticket_comments::table
        .left_join(users::table)
        .filter(ticket_comments::ticket_id.eq_any(&ticket_ids))
        .order((ticket_comments::created_at.asc(), ticket_comments::id.asc()))
        .select((CommentRow::as_select(), Option::<UserSummaryRow>::as_select()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut comments: HashMap<Uuid, Vec<AdminComment>> = HashMap::new();
    for (comment, admin) in comment_rows {
        comments
            .entry(comment.ticket_id)
            .or_default()
            .push(AdminComment {
                comment: comment.comment,
                admin: admin.map_or_else(UserSummary::deleted_account, summary),
                created_at: comment.created_at,
            });
    }

    rows.into_iter()
        .map(|row| {
            let owner = owners.get(&row.owner_id).cloned().ok_or_else(|| {
                TicketRepositoryError::query(format!("owner of ticket {} is missing", row.id))
            })?;
            let thread = comments.remove(&row.id).unwrap_or_default();
            Ok(row_to_ticket(row, owner, thread))
        })
        .collect()
}

async fn load_one(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<Ticket>, TicketRepositoryError> {
    let row: Option<TicketRow> = tickets::table
        .find(id)
        .select(TicketRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    match row {
        Some(row) => Ok(hydrate(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn insert(&self, draft: &TicketDraft) -> Result<Ticket, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTicketRow {
            id: *draft.id.as_uuid(),
            owner_id: *draft.owner_id.as_uuid(),
            title: &draft.title,
            description: &draft.description,
            category: draft.category.as_str(),
            status: TicketStatus::default().as_str(),
            priority: draft.priority.as_str(),
            attachment_path: draft.attachment_path.as_deref(),
            created_at: draft.created_at,
            updated_at: draft.created_at,
        };
        diesel::insert_into(tickets::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        load_one(&mut conn, row.id)
            .await?
            .ok_or_else(|| TicketRepositoryError::query("inserted ticket vanished"))
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_one(&mut conn, *id.as_uuid()).await
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TicketRow> = tickets::table
            .filter(tickets::owner_id.eq(owner.as_uuid()))
            .order(tickets::created_at.desc())
            .select(TicketRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn list_all(&self) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TicketRow> = tickets::table
            .order(tickets::created_at.desc())
            .select(TicketRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn update(
        &self,
        id: &TicketId,
        changes: &TicketChanges,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = TicketUpdate {
            title: changes.title.as_deref(),
            description: changes.description.as_deref(),
            category: changes.category.map(|category| category.as_str()),
            status: changes.status.map(|status| status.as_str()),
            priority: changes.priority.map(|priority| priority.as_str()),
            response: changes.response.as_deref(),
            resolved_at: changes.resolved_at,
            updated_at: changes.updated_at,
        };
        let updated = diesel::update(tickets::table.find(id.as_uuid()))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_one(&mut conn, *id.as_uuid()).await
    }

    async fn append_comment(
        &self,
        comment: &NewComment,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            id: Uuid::new_v4(),
            ticket_id: *comment.ticket_id.as_uuid(),
            admin_id: Some(*comment.admin_id.as_uuid()),
            comment: &comment.comment,
            created_at: comment.created_at,
        };
        match diesel::insert_into(ticket_comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
        {
            Ok(_) => {}
            Err(err) if is_foreign_key_violation(&err) => return Ok(None),
            Err(err) => return Err(map_diesel_error(err)),
        }
        diesel::update(tickets::table.find(row.ticket_id))
            .set(tickets::updated_at.eq(comment.created_at))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        load_one(&mut conn, row.ticket_id).await
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tickets::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn attachment_paths_for_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<String>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let paths: Vec<Option<String>> = tickets::table
            .filter(tickets::owner_id.eq(owner.as_uuid()))
            .filter(tickets::attachment_path.is_not_null())
            .select(tickets::attachment_path)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(paths.into_iter().flatten().collect())
    }
}
