//! Handler tests for the authentication endpoints.

use super::*;
use crate::domain::ports::MockAuthService;
use crate::domain::Role;
use crate::inbound::http::refresh_cookie::{REFRESH_COOKIE, REFRESH_COOKIE_PATH};
use crate::inbound::http::test_utils::{TestPorts, caller};
use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use rstest::rstest;
use serde_json::Value;

fn session_for(user: User) -> AuthSession {
    AuthSession {
        user,
        access_token: "access-token".to_owned(),
        refresh_token: "refresh-token".to_owned(),
        expires_in: 900,
    }
}

async fn call(ports: TestPorts, request: test::TestRequest) -> actix_web::dev::ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(ports.into_data())
            .service(
                web::scope("/api/v1")
                    .service(register)
                    .service(login)
                    .service(refresh_token)
                    .service(logout)
                    .service(me),
            ),
    )
    .await;
    test::call_service(&app, request.to_request()).await
}

fn refresh_cookie_of(response: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == REFRESH_COOKIE)
        .map(Cookie::into_owned)
        .expect("refresh cookie set")
}

#[rstest]
#[actix_web::test]
async fn register_returns_created_with_cookie_and_no_refresh_token_in_body() {
    let (user, _) = caller(Role::Student);
    let mut auth = MockAuthService::new();
    let session = session_for(user.clone());
    auth.expect_register()
        .withf(|registration| registration.email.as_ref() == "ada@campus.edu")
        .times(1)
        .return_once(move |_| Ok(session));
    let ports = TestPorts {
        auth,
        ..TestPorts::default()
    };

    let response = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(RegisterRequest {
                name: "Ada".to_owned(),
                email: "Ada@Campus.edu".to_owned(),
                password: "correct-horse".to_owned(),
                role: None,
            }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = refresh_cookie_of(&response);
    assert_eq!(cookie.value(), "refresh-token");
    assert_eq!(cookie.path(), Some(REFRESH_COOKIE_PATH));
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("no-store")
    );

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["accessToken"], "access-token");
    assert_eq!(body["data"]["expiresIn"], 900);
    assert_eq!(body["data"]["user"]["role"], "student");
    assert!(body["data"].get("refreshToken").is_none());
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[rstest]
#[case("not-an-email", "correct-horse", "Ada", None, "email")]
#[case("ada@campus.edu", "short", "Ada", None, "password")]
#[case("ada@campus.edu", "correct-horse", "   ", None, "name")]
#[case("ada@campus.edu", "correct-horse", "Ada", Some("dean"), "role")]
#[actix_web::test]
async fn register_rejects_invalid_fields(
    #[case] email: &str,
    #[case] password: &str,
    #[case] name: &str,
    #[case] role: Option<&str>,
    #[case] field: &str,
) {
    let mut auth = MockAuthService::new();
    auth.expect_register().never();
    let ports = TestPorts {
        auth,
        ..TestPorts::default()
    };

    let response = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(RegisterRequest {
                name: name.to_owned(),
                email: email.to_owned(),
                password: password.to_owned(),
                role: role.map(str::to_owned),
            }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["status"], "fail");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn login_failure_is_unauthorised() {
    let mut auth = MockAuthService::new();
    auth.expect_login()
        .return_once(|_| Err(Error::unauthorized("invalid credentials")));
    let ports = TestPorts {
        auth,
        ..TestPorts::default()
    };

    let response = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(LoginRequest {
                email: "ada@campus.edu".to_owned(),
                password: "wrong-password".to_owned(),
            }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["message"], "invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn login_rejects_blank_password_before_service() {
    let mut auth = MockAuthService::new();
    auth.expect_login().never();
    let ports = TestPorts {
        auth,
        ..TestPorts::default()
    };

    let response = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(LoginRequest {
                email: "ada@campus.edu".to_owned(),
                password: String::new(),
            }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "empty_password");
}

#[rstest]
#[actix_web::test]
async fn refresh_passes_cookie_value_to_service() {
    let (user, _) = caller(Role::Student);
    let session = session_for(user);
    let mut auth = MockAuthService::new();
    auth.expect_refresh()
        .withf(|token| token == "old-refresh")
        .times(1)
        .return_once(move |_| Ok(session));
    let ports = TestPorts {
        auth,
        ..TestPorts::default()
    };

    let response = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh-token")
            .cookie(Cookie::new(REFRESH_COOKIE, "old-refresh")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(refresh_cookie_of(&response).value(), "refresh-token");
}

#[rstest]
#[actix_web::test]
async fn refresh_without_cookie_is_unauthorised() {
    let mut auth = MockAuthService::new();
    auth.expect_refresh()
        .withf(|token| token.is_empty())
        .return_once(|_| Err(Error::unauthorized("refresh token required")));
    let ports = TestPorts {
        auth,
        ..TestPorts::default()
    };

    let response = call(
        ports,
        test::TestRequest::post().uri("/api/v1/auth/refresh-token"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn logout_clears_cookie() {
    let (_, identity) = caller(Role::Student);
    let mut ports = TestPorts::authenticated_as(identity);
    ports
        .auth
        .expect_logout()
        .withf(move |who| who.user_id == identity.user_id)
        .times(1)
        .return_once(|_| Ok(()));

    let response = call(
        ports,
        test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header((header::AUTHORIZATION, "Bearer token")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = refresh_cookie_of(&response);
    assert_eq!(cookie.value(), "");
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn me_requires_bearer_token() {
    let response = call(
        TestPorts::default(),
        test::TestRequest::get().uri("/api/v1/auth/me"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn me_returns_profile() {
    let (user, identity) = caller(Role::Admin);
    let mut ports = TestPorts::authenticated_as(identity);
    let profile = user.clone();
    ports
        .auth
        .expect_profile()
        .return_once(move |_| Ok(profile));

    let response = call(
        ports,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header((header::AUTHORIZATION, "Bearer token")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["email"], user.email.to_string());
    assert_eq!(body["data"]["role"], "admin");
}
