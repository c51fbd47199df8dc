//! Shared harness for end-to-end HTTP tests.
//!
//! Assembles the real services over the in-memory repositories, the JWT
//! codec, and a temporary upload directory, then drives requests through
//! `actix_web::test`.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};
use tempfile::TempDir;

use helpdesk::Trace;
use helpdesk::domain::{
    CredentialService, FaqService, RegistrationPolicy, TRACE_ID_HEADER, TicketService,
    TokenLifetimes, UserAdminService,
};
use helpdesk::inbound::http;
use helpdesk::inbound::http::refresh_cookie::REFRESH_COOKIE;
use helpdesk::inbound::http::state::{HttpState, HttpStatePorts};
use helpdesk::outbound::attachments::LocalAttachmentStore;
use helpdesk::outbound::memory::MemoryStore;
use helpdesk::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};

const ACCESS_SECRET: &[u8] = b"integration-access-secret-0123456789abcdef";
const REFRESH_SECRET: &[u8] = b"integration-refresh-secret-0123456789abcdef";

pub const BOUNDARY: &str = "helpdesk-boundary";

/// Application state plus the upload directory it writes into.
pub struct Harness {
    pub state: web::Data<HttpState>,
    pub uploads: TempDir,
}

impl Harness {
    /// Suites register their admins through the public endpoint.
    pub fn new() -> Self {
        Self::with_registration_policy(RegistrationPolicy::AnyRole)
    }

    pub fn with_registration_policy(policy: RegistrationPolicy) -> Self {
        let uploads = tempfile::tempdir().expect("upload dir");
        let store = MemoryStore::new();
        let users = Arc::new(store.user_repository());
        let tickets = Arc::new(store.ticket_repository());
        let faqs = Arc::new(store.faq_repository());
        let attachments =
            Arc::new(LocalAttachmentStore::open(uploads.path()).expect("attachment store"));
        let clock = Arc::new(DefaultClock);

        let auth = Arc::new(
            CredentialService::new(
                users.clone(),
                Arc::new(Argon2PasswordHasher::new()),
                Arc::new(JwtTokenCodec::new(ACCESS_SECRET, REFRESH_SECRET)),
                clock.clone(),
                TokenLifetimes::default(),
            )
            .with_registration_policy(policy),
        );
        let ticket_service = Arc::new(TicketService::new(
            tickets.clone(),
            attachments.clone(),
            clock.clone(),
        ));
        let faq_service = Arc::new(FaqService::new(faqs, clock.clone()));
        let admin = Arc::new(UserAdminService::new(users, tickets, attachments, clock));

        let ports = HttpStatePorts {
            auth,
            tickets: ticket_service.clone(),
            tickets_query: ticket_service,
            faqs: faq_service.clone(),
            faqs_query: faq_service,
            users: admin,
        };
        Self {
            state: web::Data::new(HttpState::new(ports, false)),
            uploads,
        }
    }

    /// Build the application over a clone of the shared state; the returned
    /// factory borrows nothing from the harness.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(http::configure))
    }
}

/// Status, parsed JSON body and headers of interest from one response.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub refresh_cookie: Option<Cookie<'static>>,
    pub trace_id: Option<String>,
}

pub async fn send<S, B>(app: &S, request: test::TestRequest) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let refresh_cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == REFRESH_COOKIE)
        .map(Cookie::into_owned);
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(response).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        body,
        refresh_cookie,
        trace_id,
    }
}

/// Credentials returned by registration.
pub struct Account {
    pub id: String,
    pub access_token: String,
    pub refresh_cookie: Cookie<'static>,
}

pub async fn register<S, B>(app: &S, name: &str, email: &str, role: &str) -> Account
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "name": name,
                "email": email,
                "password": "correct-horse",
                "role": role,
            })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "register: {}", reply.body);
    Account {
        id: reply.body["data"]["user"]["id"]
            .as_str()
            .expect("user id")
            .to_owned(),
        access_token: reply.body["data"]["accessToken"]
            .as_str()
            .expect("access token")
            .to_owned(),
        refresh_cookie: reply.refresh_cookie.expect("refresh cookie"),
    }
}

/// Attach a bearer token to a request.
pub fn bearer(request: test::TestRequest, account: &Account) -> test::TestRequest {
    request.insert_header((
        header::AUTHORIZATION,
        format!("Bearer {}", account.access_token),
    ))
}

/// Encode `multipart/form-data` parts as `(name, file name, content)`.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match file_name {
            Some(file) => format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            ),
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
