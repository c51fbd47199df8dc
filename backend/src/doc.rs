//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, tickets,
//!   FAQs, faculty, admin, health)
//! - **Schemas**: domain type wrappers from [`crate::inbound::http::schemas`]
//!   that provide OpenAPI definitions without coupling domain types to the
//!   utoipa framework
//! - **Security**: bearer access tokens and the refresh token cookie
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    AdminCommentSchema, ErrorCodeSchema, ErrorSchema, FacultyContactSchema, FaqSchema,
    RoleSchema, TicketSchema, UserSchema, UserSummarySchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the credential security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token returned by login or refresh."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "RefreshCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "refreshToken",
                "HttpOnly refresh token cookie scoped to /api/v1/auth.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campus helpdesk API",
        description = "Ticketing, FAQ and directory endpoints for the campus helpdesk.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::refresh_token,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::tickets::list_tickets,
        crate::inbound::http::tickets::my_tickets,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::get_ticket,
        crate::inbound::http::tickets::update_ticket,
        crate::inbound::http::tickets::delete_ticket,
        crate::inbound::http::tickets::add_comment,
        crate::inbound::http::tickets::respond,
        crate::inbound::http::faqs::list_faqs,
        crate::inbound::http::faqs::search_faqs,
        crate::inbound::http::faqs::get_faq,
        crate::inbound::http::faqs::create_faq,
        crate::inbound::http::faqs::update_faq,
        crate::inbound::http::faqs::delete_faq,
        crate::inbound::http::faculty::list_faculty,
        crate::inbound::http::faculty::get_faculty,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::update_role,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RoleSchema,
        UserSchema,
        UserSummarySchema,
        AdminCommentSchema,
        TicketSchema,
        FaqSchema,
        FacultyContactSchema,
    )),
    tags(
        (name = "auth", description = "Registration, login and token refresh"),
        (name = "tickets", description = "Support ticket lifecycle"),
        (name = "faqs", description = "Frequently asked questions"),
        (name = "faculty", description = "Static faculty directory"),
        (name = "admin", description = "User administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
