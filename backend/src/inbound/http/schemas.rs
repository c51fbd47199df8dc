//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their corresponding
//! domain types but live in the inbound adapter layer where framework concerns
//! belong. Every success body is wrapped as
//! `{"status":"success","data":...}`; list bodies add a `results` count.

#![expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for the failure envelope around [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// `fail` for client errors, `error` for server errors.
    #[schema(example = "fail")]
    status: String,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title must not be empty")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Role)]
pub enum RoleSchema {
    #[schema(rename = "student")]
    Student,
    #[schema(rename = "admin")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[schema(rename_all = "camelCase")]
pub struct UserSchema {
    /// Stable user identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "ada@campus.edu")]
    email: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    role: RoleSchema,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::UserSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserSummary)]
pub struct UserSummarySchema {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    name: String,
    email: String,
}

/// OpenAPI schema for [`crate::domain::AdminComment`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AdminComment)]
#[schema(rename_all = "camelCase")]
pub struct AdminCommentSchema {
    comment: String,
    /// Author summary; named "deleted user" once the admin account is removed.
    admin: UserSummarySchema,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Ticket`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Ticket)]
#[schema(rename_all = "camelCase")]
pub struct TicketSchema {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    owner: UserSummarySchema,
    #[schema(example = "Projector broken in room 204")]
    title: String,
    description: String,
    #[schema(example = "technical")]
    category: String,
    #[schema(example = "open")]
    status: String,
    #[schema(example = "medium")]
    priority: String,
    response: Option<String>,
    /// Stored file name of the uploaded attachment.
    attachment_path: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    resolved_at: Option<String>,
    /// Admin comments, oldest first.
    comments: Vec<AdminCommentSchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::Faq`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Faq)]
#[schema(rename_all = "camelCase")]
pub struct FaqSchema {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "How do I reset my password?")]
    question: String,
    answer: String,
    #[schema(example = "General")]
    category: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::FacultyContact`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FacultyContact)]
pub struct FacultyContactSchema {
    #[schema(example = 1)]
    id: u32,
    name: String,
    department: String,
    email: String,
    phone: String,
    designation: String,
}
