//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Ada","email":"ada@campus.edu","password":"..."}
//! POST /api/v1/auth/login {"email":"ada@campus.edu","password":"..."}
//! POST /api/v1/auth/refresh-token   (refreshToken cookie)
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    AuthSession, Error, LoginCredentials, LoginValidationError, Registration,
    RegistrationValidationError, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::{no_store_header, private_no_cache_header};
use crate::inbound::http::envelope::{self, Envelope};
use crate::inbound::http::identity::CurrentUser;
use crate::inbound::http::refresh_cookie;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/auth/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `student` (default) or `admin`.
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = RegistrationValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.email,
            &value.password,
            &value.name,
            value.role.as_deref(),
        )
    }
}

/// Body returned whenever credentials are issued.
///
/// The refresh token is deliberately absent; it travels in the cookie.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[schema(value_type = UserSchema)]
    pub user: User,
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

fn respond_with_session(
    mut builder: HttpResponseBuilder,
    session: AuthSession,
    cookie_secure: bool,
) -> HttpResponse {
    let AuthSession {
        user,
        access_token,
        refresh_token: token,
        expires_in,
    } = session;
    builder
        .cookie(refresh_cookie::issue(token, cookie_secure))
        .insert_header(no_store_header())
        .json(Envelope::single(AuthPayload {
            user,
            access_token,
            expires_in,
        }))
}

fn map_registration_error(err: RegistrationValidationError) -> Error {
    let (field, code) = match &err {
        RegistrationValidationError::InvalidEmail => ("email", "invalid_email"),
        RegistrationValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
        RegistrationValidationError::InvalidName(_) => ("name", "invalid_name"),
        RegistrationValidationError::InvalidRole { .. } => ("role", "invalid_role"),
    };
    Error::invalid_field(field, code, err.to_string())
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register a new account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthPayload,
            headers(("Set-Cookie" = String, description = "Refresh token cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Requested role cannot be self-registered", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_registration_error)?;
    let session = state.auth.register(&registration).await?;
    Ok(respond_with_session(
        HttpResponse::Created(),
        session,
        state.cookie_secure,
    ))
}

/// Exchange email and password for a credential pair.
///
/// Unknown emails and wrong passwords yield the same `401` response.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthPayload,
            headers(("Set-Cookie" = String, description = "Refresh token cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let session = state.auth.login(&credentials).await?;
    Ok(respond_with_session(
        HttpResponse::Ok(),
        session,
        state.cookie_secure,
    ))
}

/// Rotate the credential pair using the refresh token cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    responses(
        (status = 200, description = "New credential pair", body = AuthPayload,
            headers(("Set-Cookie" = String, description = "Rotated refresh token cookie"))),
        (status = 401, description = "Missing, invalid or expired refresh token", body = ErrorSchema),
        (status = 403, description = "Refresh token superseded", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/auth/refresh-token")]
pub async fn refresh_token(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let presented = refresh_cookie::presented(&req);
    let session = state.auth.refresh(&presented).await?;
    Ok(respond_with_session(
        HttpResponse::Ok(),
        session,
        state.cookie_secure,
    ))
}

/// Revoke the active refresh token and clear the cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, user: CurrentUser) -> ApiResult<HttpResponse> {
    state.auth.logout(user.identity()).await?;
    let mut response = envelope::empty();
    response
        .add_cookie(&refresh_cookie::clear(state.cookie_secure))
        .map_err(|err| Error::internal(format!("failed to clear refresh cookie: {err}")))?;
    Ok(response)
}

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(state: web::Data<HttpState>, user: CurrentUser) -> ApiResult<HttpResponse> {
    let profile = state.auth.profile(user.identity()).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(Envelope::single(profile)))
}

#[cfg(test)]
mod tests;
