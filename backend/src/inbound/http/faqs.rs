//! FAQ API handlers.
//!
//! Reads are public; mutations require the admin role.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{FaqInput, FaqPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope;
use crate::inbound::http::identity::CurrentUser;
use crate::inbound::http::schemas::{ErrorSchema, FaqSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_faq_id;

/// JSON body for creating or patching an FAQ.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    /// Free text; defaults to `General` on creation.
    pub category: Option<String>,
}

impl From<FaqRequest> for FaqInput {
    fn from(value: FaqRequest) -> Self {
        Self {
            question: value.question,
            answer: value.answer,
            category: value.category,
        }
    }
}

impl From<FaqRequest> for FaqPatch {
    fn from(value: FaqRequest) -> Self {
        Self {
            question: value.question,
            answer: value.answer,
            category: value.category,
        }
    }
}

/// Query string for `GET /api/v1/faqs/search`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchParams {
    /// Case-insensitive text matched against questions and answers.
    #[serde(default)]
    pub q: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/faqs",
    responses(
        (status = 200, description = "All FAQs, newest first", body = [FaqSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["faqs"],
    operation_id = "listFaqs",
    security([])
)]
#[get("/faqs")]
pub async fn list_faqs(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let faqs = state.faqs_query.list().await?;
    Ok(envelope::list(faqs))
}

/// Search questions and answers.
#[utoipa::path(
    get,
    path = "/api/v1/faqs/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching FAQs", body = [FaqSchema]),
        (status = 400, description = "Blank query", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["faqs"],
    operation_id = "searchFaqs",
    security([])
)]
#[get("/faqs/search")]
pub async fn search_faqs(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let faqs = state.faqs_query.search(&params.q).await?;
    Ok(envelope::list(faqs))
}

#[utoipa::path(
    get,
    path = "/api/v1/faqs/{id}",
    params(("id" = String, Path, description = "FAQ identifier")),
    responses(
        (status = 200, description = "FAQ", body = FaqSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["faqs"],
    operation_id = "getFaq",
    security([])
)]
#[get("/faqs/{id}")]
pub async fn get_faq(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_faq_id(&path)?;
    let faq = state.faqs_query.get(&id).await?;
    Ok(envelope::ok(faq))
}

#[utoipa::path(
    post,
    path = "/api/v1/faqs",
    request_body = FaqRequest,
    responses(
        (status = 201, description = "FAQ created", body = FaqSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 409, description = "Question already exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["faqs"],
    operation_id = "createFaq"
)]
#[post("/faqs")]
pub async fn create_faq(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<FaqRequest>,
) -> ApiResult<HttpResponse> {
    let faq = state
        .faqs
        .create(user.identity(), payload.into_inner().into())
        .await?;
    Ok(envelope::created(faq))
}

#[utoipa::path(
    patch,
    path = "/api/v1/faqs/{id}",
    params(("id" = String, Path, description = "FAQ identifier")),
    request_body = FaqRequest,
    responses(
        (status = 200, description = "Updated FAQ", body = FaqSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Question already exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["faqs"],
    operation_id = "updateFaq"
)]
#[patch("/faqs/{id}")]
pub async fn update_faq(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<FaqRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_faq_id(&path)?;
    let faq = state
        .faqs
        .update(user.identity(), &id, payload.into_inner().into())
        .await?;
    Ok(envelope::ok(faq))
}

#[utoipa::path(
    delete,
    path = "/api/v1/faqs/{id}",
    params(("id" = String, Path, description = "FAQ identifier")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["faqs"],
    operation_id = "deleteFaq"
)]
#[delete("/faqs/{id}")]
pub async fn delete_faq(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_faq_id(&path)?;
    state.faqs.delete(user.identity(), &id).await?;
    Ok(envelope::empty())
}
