//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod auth;
pub mod auth_config;
pub mod cache_control;
pub mod envelope;
pub mod error;
pub mod faculty;
pub mod faqs;
pub mod health;
pub mod identity;
pub mod refresh_cookie;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Mount every `/api/v1` endpoint.
///
/// Literal segments (`my-tickets`, `search`) are registered before their
/// `{id}` siblings, and the multipart ticket route before the JSON one.
/// Extractor failures render in the standard error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use helpdesk::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| error::extractor_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| error::extractor_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| error::extractor_error(err)))
        .service(auth::register)
        .service(auth::login)
        .service(auth::refresh_token)
        .service(auth::logout)
        .service(auth::me)
        .service(tickets::list_tickets)
        .service(tickets::my_tickets)
        .service(tickets::create_ticket_with_attachment)
        .service(tickets::create_ticket)
        .service(tickets::get_ticket)
        .service(tickets::update_ticket)
        .service(tickets::delete_ticket)
        .service(tickets::add_comment)
        .service(tickets::respond)
        .service(faqs::list_faqs)
        .service(faqs::search_faqs)
        .service(faqs::get_faq)
        .service(faqs::create_faq)
        .service(faqs::update_faq)
        .service(faqs::delete_faq)
        .service(admin::list_users)
        .service(admin::update_role)
        .service(admin::delete_user)
        .service(faculty::list_faculty)
        .service(faculty::get_faculty);
}
