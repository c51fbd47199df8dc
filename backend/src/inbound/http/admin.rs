//! Admin user management handlers.
//!
//! ```text
//! GET    /api/v1/admin/users
//! PATCH  /api/v1/admin/users/{id}/role {"role":"admin"}
//! DELETE /api/v1/admin/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope;
use crate::inbound::http::identity::CurrentUser;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// JSON body for `PATCH /api/v1/admin/users/{id}/role`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RoleRequest {
    /// `student` or `admin`.
    #[serde(default)]
    pub role: String,
}

fn parse_role(raw: &str) -> Result<Role, Error> {
    raw.parse::<Role>().map_err(|_| {
        Error::invalid_field("role", "invalid_role", "role must be one of student, admin")
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "Registered users, newest first", body = [UserSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(state: web::Data<HttpState>, user: CurrentUser) -> ApiResult<HttpResponse> {
    let users = state.users.list_users(user.identity()).await?;
    Ok(envelope::list(users))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/users/{id}/role",
    params(("id" = String, Path, description = "User identifier")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid role or identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "updateUserRole"
)]
#[patch("/admin/users/{id}/role")]
pub async fn update_role(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<RoleRequest>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    let role = parse_role(&payload.role)?;
    let updated = state.users.update_role(user.identity(), &target, role).await?;
    Ok(envelope::ok(updated))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deleted together with their tickets"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Admin role required or self deletion", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    state.users.delete_user(user.identity(), &target).await?;
    Ok(envelope::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestPorts, caller};
    use crate::test_support::sample_user;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn call(ports: TestPorts, request: test::TestRequest) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new().app_data(ports.into_data()).service(
                web::scope("/api/v1")
                    .service(list_users)
                    .service(update_role)
                    .service(delete_user),
            ),
        )
        .await;
        test::call_service(
            &app,
            request
                .insert_header((header::AUTHORIZATION, "Bearer token"))
                .to_request(),
        )
        .await
    }

    #[rstest]
    #[actix_web::test]
    async fn students_are_forbidden() {
        let (_, identity) = caller(Role::Student);
        let mut ports = TestPorts::authenticated_as(identity);
        ports
            .users
            .expect_list_users()
            .return_once(|_| Err(Error::forbidden("admin role required")));

        let response = call(ports, test::TestRequest::get().uri("/api/v1/admin/users")).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[rstest]
    #[actix_web::test]
    async fn role_change_parses_role() {
        let (_, identity) = caller(Role::Admin);
        let promoted = sample_user(Role::Admin);
        let target = promoted.id;
        let mut ports = TestPorts::authenticated_as(identity);
        ports
            .users
            .expect_update_role()
            .withf(move |_, id, role| *id == target && *role == Role::Admin)
            .times(1)
            .return_once(move |_, _, _| Ok(promoted));

        let response = call(
            ports,
            test::TestRequest::patch()
                .uri(&format!("/api/v1/admin/users/{target}/role"))
                .set_json(json!({"role": "admin"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["data"]["role"], "admin");
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_role_is_rejected() {
        let (_, identity) = caller(Role::Admin);
        let mut ports = TestPorts::authenticated_as(identity);
        ports.users.expect_update_role().never();

        let response = call(
            ports,
            test::TestRequest::patch()
                .uri(&format!("/api/v1/admin/users/{}/role", crate::domain::UserId::random()))
                .set_json(json!({"role": "dean"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "role");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_returns_null_data() {
        let (_, identity) = caller(Role::Admin);
        let mut ports = TestPorts::authenticated_as(identity);
        ports.users.expect_delete_user().return_once(|_, _| Ok(()));

        let response = call(
            ports,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/admin/users/{}", crate::domain::UserId::random())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["data"], Value::Null);
    }
}
