//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use helpdesk::domain::RegistrationPolicy;
use helpdesk::inbound::http::auth_config::AuthSettings;
use helpdesk::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) auth: AuthSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origin: String,
    pub(crate) upload_dir: PathBuf,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) registration: RegistrationPolicy,
}

impl ServerConfig {
    /// Construct a server configuration from validated settings.
    #[must_use]
    pub fn new(
        auth: AuthSettings,
        bind_addr: SocketAddr,
        cors_origin: impl Into<String>,
        upload_dir: PathBuf,
    ) -> Self {
        Self {
            auth,
            bind_addr,
            cors_origin: cors_origin.into(),
            upload_dir,
            db_pool: None,
            registration: RegistrationPolicy::default(),
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one, the server runs on in-memory repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Choose which roles public registration may grant.
    #[must_use]
    pub fn with_registration_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.registration = policy;
        self
    }
}
