//! Ticket API handlers.
//!
//! ```text
//! GET    /api/v1/tickets                  (admin)
//! GET    /api/v1/tickets/my-tickets
//! POST   /api/v1/tickets                  JSON or multipart with `attachment`
//! GET    /api/v1/tickets/{id}
//! PUT    /api/v1/tickets/{id}
//! DELETE /api/v1/tickets/{id}
//! POST   /api/v1/tickets/{id}/comments    (admin)
//! PATCH  /api/v1/tickets/{id}/response    (admin)
//! ```

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::guard::GuardContext;
use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::domain::{
    ATTACHMENT_MAX_BYTES, AttachmentUpload, AttachmentValidationError, CreateTicketInput, Error,
    TicketPatch,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::identity::CurrentUser;
use crate::inbound::http::schemas::{ErrorSchema, TicketSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_ticket_id;

/// Multipart field carrying the uploaded file.
pub const ATTACHMENT_FIELD: &str = "attachment";
const TEXT_FIELD_MAX_BYTES: usize = 64 * 1024;

/// JSON body for `POST /api/v1/tickets`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// academic, technical, administrative, hostel, library or other.
    pub category: Option<String>,
    /// low, medium (default) or high.
    pub priority: Option<String>,
}

impl From<CreateTicketRequest> for CreateTicketInput {
    fn from(value: CreateTicketRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            category: value.category,
            priority: value.priority,
            attachment: None,
        }
    }
}

/// Multipart form accepted by `POST /api/v1/tickets`.
#[derive(utoipa::ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CreateTicketForm {
    title: String,
    description: String,
    category: Option<String>,
    priority: Option<String>,
    /// jpg, jpeg, png or pdf up to 5 MiB.
    #[schema(value_type = Option<String>, format = Binary)]
    attachment: Option<Vec<u8>>,
}

/// JSON body for `PUT /api/v1/tickets/{id}`.
///
/// Students may change title, description and category; the remaining
/// fields are ignored for them. `resolvedAt` is never accepted.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub response: Option<String>,
    /// Appended to the comment thread rather than overwriting it.
    pub admin_comment: Option<String>,
}

impl From<UpdateTicketRequest> for TicketPatch {
    fn from(value: UpdateTicketRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            category: value.category,
            status: value.status,
            priority: value.priority,
            response: value.response,
            admin_comment: value.admin_comment,
        }
    }
}

/// JSON body for `POST /api/v1/tickets/{id}/comments`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
}

/// JSON body for `PATCH /api/v1/tickets/{id}/response`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RespondRequest {
    #[serde(default)]
    pub response: String,
}

fn map_attachment_error(err: AttachmentValidationError) -> Error {
    let code = match err {
        AttachmentValidationError::Empty => "empty_attachment",
        AttachmentValidationError::TooLarge { .. } => "attachment_too_large",
        AttachmentValidationError::UnsupportedType { .. } => "unsupported_attachment_type",
    };
    Error::invalid_field(ATTACHMENT_FIELD, code, err.to_string())
}

fn malformed_form(err: MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

/// Drain a field, failing once it grows beyond `limit` bytes.
async fn read_field(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed_form)? {
        if bytes.len() + chunk.len() > limit {
            return Ok(None);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(bytes))
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, Error> {
    let too_long = || {
        Error::invalid_field(name, "field_too_large", format!("{name} is too large"))
    };
    let bytes = read_field(field, TEXT_FIELD_MAX_BYTES)
        .await?
        .ok_or_else(too_long)?;
    String::from_utf8(bytes).map_err(|_| {
        Error::invalid_field(name, "invalid_utf8", format!("{name} must be UTF-8 text"))
    })
}

async fn read_attachment(field: &mut Field) -> Result<Option<AttachmentUpload>, Error> {
    let file_name = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .unwrap_or_default()
        .to_owned();
    let Some(bytes) = read_field(field, ATTACHMENT_MAX_BYTES).await? else {
        return Err(map_attachment_error(AttachmentValidationError::TooLarge {
            max: ATTACHMENT_MAX_BYTES,
        }));
    };
    // Browsers send an empty, unnamed part when no file was chosen.
    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    AttachmentUpload::new(&file_name, bytes)
        .map(Some)
        .map_err(map_attachment_error)
}

async fn read_ticket_form(mut form: Multipart) -> Result<CreateTicketInput, Error> {
    let mut input = CreateTicketInput::default();
    while let Some(mut field) = form.try_next().await.map_err(malformed_form)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            ATTACHMENT_FIELD => input.attachment = read_attachment(&mut field).await?,
            "title" => input.title = Some(read_text(&mut field, &name).await?),
            "description" => input.description = Some(read_text(&mut field, &name).await?),
            "category" => input.category = Some(read_text(&mut field, &name).await?),
            "priority" => input.priority = Some(read_text(&mut field, &name).await?),
            _ => {
                read_field(&mut field, TEXT_FIELD_MAX_BYTES).await?;
            }
        }
    }
    Ok(input)
}

fn is_multipart(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// List every ticket with owner and comment author summaries.
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    responses(
        (status = 200, description = "All tickets, newest first", body = [TicketSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listTickets"
)]
#[get("/tickets")]
pub async fn list_tickets(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<HttpResponse> {
    let tickets = state.tickets_query.list_all(user.identity()).await?;
    Ok(envelope::list(tickets))
}

/// List the caller's own tickets.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/my-tickets",
    responses(
        (status = 200, description = "Caller's tickets, newest first", body = [TicketSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "listMyTickets"
)]
#[get("/tickets/my-tickets")]
pub async fn my_tickets(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<HttpResponse> {
    let tickets = state.tickets_query.list_own(user.identity()).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(Envelope::list(tickets)))
}

/// Open a ticket from a JSON body.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body(content(
        (CreateTicketRequest = "application/json"),
        (CreateTicketForm = "multipart/form-data")
    )),
    responses(
        (status = 201, description = "Ticket created", body = TicketSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Student role required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateTicketRequest>,
) -> ApiResult<HttpResponse> {
    let ticket = state
        .tickets
        .create(user.identity(), payload.into_inner().into())
        .await?;
    Ok(envelope::created(ticket))
}

/// Open a ticket from a multipart form, optionally with an attachment.
#[post("/tickets", guard = "is_multipart")]
pub async fn create_ticket_with_attachment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    form: Multipart,
) -> ApiResult<HttpResponse> {
    let input = read_ticket_form(form).await?;
    let ticket = state.tickets.create(user.identity(), input).await?;
    Ok(envelope::created(ticket))
}

/// Fetch one ticket; owners and admins only.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Ticket", body = TicketSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "getTicket"
)]
#[get("/tickets/{id}")]
pub async fn get_ticket(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_ticket_id(&path)?;
    let ticket = state.tickets_query.get(user.identity(), &id).await?;
    Ok(envelope::ok(ticket))
}

/// Update a ticket. Only supplied fields are written.
#[utoipa::path(
    put,
    path = "/api/v1/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = UpdateTicketRequest,
    responses(
        (status = 200, description = "Updated ticket", body = TicketSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "updateTicket"
)]
#[put("/tickets/{id}")]
pub async fn update_ticket(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<UpdateTicketRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_ticket_id(&path)?;
    let ticket = state
        .tickets
        .update(user.identity(), &id, payload.into_inner().into())
        .await?;
    Ok(envelope::ok(ticket))
}

/// Delete a ticket and its attachment.
#[utoipa::path(
    delete,
    path = "/api/v1/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "deleteTicket"
)]
#[delete("/tickets/{id}")]
pub async fn delete_ticket(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_ticket_id(&path)?;
    state.tickets.delete(user.identity(), &id).await?;
    Ok(envelope::empty())
}

/// Append an admin comment.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/{id}/comments",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Ticket with the new comment", body = TicketSchema),
        (status = 400, description = "Blank comment", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "addTicketComment"
)]
#[post("/tickets/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_ticket_id(&path)?;
    let ticket = state
        .tickets
        .add_comment(user.identity(), &id, payload.into_inner().comment)
        .await?;
    Ok(envelope::ok(ticket))
}

/// Set the admin response and move the ticket to `in-progress`.
#[utoipa::path(
    patch,
    path = "/api/v1/tickets/{id}/response",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = RespondRequest,
    responses(
        (status = 200, description = "Ticket with the response", body = TicketSchema),
        (status = 400, description = "Blank response", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "respondToTicket"
)]
#[patch("/tickets/{id}/response")]
pub async fn respond(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<RespondRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_ticket_id(&path)?;
    let ticket = state
        .tickets
        .respond(user.identity(), &id, payload.into_inner().response)
        .await?;
    Ok(envelope::ok(ticket))
}
