//! Refresh token cookie handling.
//!
//! The refresh token never appears in a JSON body. It travels in an
//! `HttpOnly`, `SameSite=Strict` cookie scoped to the auth endpoints.

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration};

use crate::domain::REFRESH_TOKEN_TTL_DAYS;

/// Cookie name carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Only the auth endpoints receive the cookie.
pub const REFRESH_COOKIE_PATH: &str = "/api/v1/auth";

/// Build the cookie carrying a freshly issued refresh token.
pub fn issue(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token)
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(Duration::days(REFRESH_TOKEN_TTL_DAYS))
        .finish()
}

/// Build an expired cookie that clears the refresh token client-side.
pub fn clear(secure: bool) -> Cookie<'static> {
    let mut cookie = issue(String::new(), secure);
    cookie.make_removal();
    cookie
}

/// Refresh token presented by the client; empty when the cookie is absent.
pub fn presented(req: &HttpRequest) -> String {
    req.cookie(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .unwrap_or_default()
}
