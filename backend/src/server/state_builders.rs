//! Builders wiring outbound adapters into the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use helpdesk::domain::ports::{AttachmentStore, FaqRepository, TicketRepository, UserRepository};
use helpdesk::domain::{
    CredentialService, FaqService, RegistrationPolicy, TicketService, TokenLifetimes,
    UserAdminService,
};
use helpdesk::inbound::http::state::{HttpState, HttpStatePorts};
use helpdesk::outbound::attachments::LocalAttachmentStore;
use helpdesk::outbound::memory::MemoryStore;
use helpdesk::outbound::persistence::{
    DieselFaqRepository, DieselTicketRepository, DieselUserRepository,
};
use helpdesk::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};

use super::ServerConfig;

/// Adapters shared by every repository flavour.
struct SharedAdapters<A> {
    attachments: Arc<A>,
    hasher: Arc<Argon2PasswordHasher>,
    tokens: Arc<JwtTokenCodec>,
    clock: Arc<dyn Clock>,
    lifetimes: TokenLifetimes,
    registration: RegistrationPolicy,
}

/// Construct the driving-port services over one set of repositories.
fn wire_ports<U, T, F, A>(
    users: Arc<U>,
    tickets: Arc<T>,
    faqs: Arc<F>,
    shared: SharedAdapters<A>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    T: TicketRepository + 'static,
    F: FaqRepository + 'static,
    A: AttachmentStore + 'static,
{
    let SharedAdapters {
        attachments,
        hasher,
        tokens,
        clock,
        lifetimes,
        registration,
    } = shared;

    let auth = Arc::new(
        CredentialService::new(users.clone(), hasher, tokens, clock.clone(), lifetimes)
            .with_registration_policy(registration),
    );
    let ticket_service = Arc::new(TicketService::new(
        tickets.clone(),
        attachments.clone(),
        clock.clone(),
    ));
    let faq_service = Arc::new(FaqService::new(faqs, clock.clone()));
    let admin = Arc::new(UserAdminService::new(users, tickets, attachments, clock));

    HttpStatePorts {
        auth,
        tickets: ticket_service.clone(),
        tickets_query: ticket_service,
        faqs: faq_service.clone(),
        faqs_query: faq_service,
        users: admin,
    }
}

/// Build the shared HTTP state from configuration.
///
/// Uses Diesel repositories when a pool is configured, otherwise a single
/// [`MemoryStore`] backs all three repositories.
///
/// # Errors
/// Returns [`std::io::Error`] when the upload directory cannot be opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let attachments = LocalAttachmentStore::open(&config.upload_dir)?;
    info!(path = %attachments.root().display(), "attachment storage ready");

    let shared = SharedAdapters {
        attachments: Arc::new(attachments),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens: Arc::new(JwtTokenCodec::new(
            &config.auth.access_secret,
            &config.auth.refresh_secret,
        )),
        clock: Arc::new(DefaultClock),
        lifetimes: TokenLifetimes::with_access_minutes(config.auth.access_ttl_minutes),
        registration: config.registration,
    };

    let ports = match &config.db_pool {
        Some(pool) => wire_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselTicketRepository::new(pool.clone())),
            Arc::new(DieselFaqRepository::new(pool.clone())),
            shared,
        ),
        None => {
            warn!("no database configured; data will not survive a restart");
            let store = MemoryStore::new();
            wire_ports(
                Arc::new(store.user_repository()),
                Arc::new(store.ticket_repository()),
                Arc::new(store.faq_repository()),
                shared,
            )
        }
    };

    Ok(web::Data::new(HttpState::new(
        ports,
        config.auth.cookie_secure,
    )))
}
