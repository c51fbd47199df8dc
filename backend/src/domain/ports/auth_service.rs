//! Driving port for credential use-cases.
//!
//! Inbound adapters call this port to register, log in, rotate and revoke
//! credentials, and to resolve a bearer token into an [`Identity`]. Handler
//! tests substitute the generated mock instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, Identity, LoginCredentials, Registration, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and issue its first credential pair.
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error>;

    /// Verify credentials and issue a fresh credential pair.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Exchange the active refresh token for a new credential pair.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, Error>;

    /// Revoke the caller's refresh token. Idempotent.
    async fn logout(&self, identity: &Identity) -> Result<(), Error>;

    /// Resolve an access token into the caller's identity.
    async fn current_identity(&self, access_token: &str) -> Result<Identity, Error>;

    /// Public profile of the caller.
    async fn profile(&self, identity: &Identity) -> Result<User, Error>;
}
