//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthService, FaqCommand, FaqQuery, TicketCommand, TicketQuery, UserAdministration,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthService>,
    pub tickets: Arc<dyn TicketCommand>,
    pub tickets_query: Arc<dyn TicketQuery>,
    pub faqs: Arc<dyn FaqCommand>,
    pub faqs_query: Arc<dyn FaqQuery>,
    pub users: Arc<dyn UserAdministration>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub tickets: Arc<dyn TicketCommand>,
    pub tickets_query: Arc<dyn TicketQuery>,
    pub faqs: Arc<dyn FaqCommand>,
    pub faqs_query: Arc<dyn FaqQuery>,
    pub users: Arc<dyn UserAdministration>,
    /// Whether the refresh cookie is marked `Secure`.
    pub cookie_secure: bool,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(ports: HttpStatePorts, cookie_secure: bool) -> Self {
        let HttpStatePorts {
            auth,
            tickets,
            tickets_query,
            faqs,
            faqs_query,
            users,
        } = ports;
        Self {
            auth,
            tickets,
            tickets_query,
            faqs,
            faqs_query,
            users,
            cookie_secure,
        }
    }
}
