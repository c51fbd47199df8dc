//! Credential domain service.
//!
//! Implements [`AuthService`] on top of the user repository, a password
//! hasher and a token codec. Each user holds at most one active refresh
//! token: its SHA-256 fingerprint is stored on the account and replaced on
//! every login or refresh, so presenting an older token is rejected.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuthService, PasswordHashError, PasswordHasher, TokenClaims, TokenCodec, TokenCodecError,
    TokenKind, UserPersistenceError, UserRepository,
};
use crate::domain::{
    ACCESS_TOKEN_TTL_MINUTES, AuthSession, Email, Error, Identity, LoginCredentials,
    REFRESH_TOKEN_TTL_DAYS, Registration, RegistrationPolicy, User, UserAccount, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Lifetimes applied to newly issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    access: Duration,
    refresh: Duration,
}

impl TokenLifetimes {
    /// Access tokens live `access_minutes`; refresh tokens keep the fixed
    /// cookie lifetime.
    #[must_use]
    pub fn with_access_minutes(access_minutes: i64) -> Self {
        Self {
            access: Duration::minutes(access_minutes),
            refresh: Duration::days(REFRESH_TOKEN_TTL_DAYS),
        }
    }

    /// Access token lifetime.
    #[must_use]
    pub const fn access(&self) -> Duration {
        self.access
    }

    const fn for_kind(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access,
            TokenKind::Refresh => self.refresh,
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self::with_access_minutes(ACCESS_TOKEN_TTL_MINUTES)
    }
}

/// SHA-256 hex fingerprint stored in place of the refresh token itself.
#[must_use]
pub fn refresh_fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Credential service implementing the [`AuthService`] driving port.
#[derive(Clone)]
pub struct CredentialService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
    lifetimes: TokenLifetimes,
    registration: RegistrationPolicy,
}

impl<U, H, T> CredentialService<U, H, T> {
    /// Create a new service with the given adapters.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
        lifetimes: TokenLifetimes,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            lifetimes,
            registration: RegistrationPolicy::default(),
        }
    }

    /// Replace the default student-only registration policy.
    #[must_use]
    pub fn with_registration_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.registration = policy;
        self
    }
}

/// Pair of signed tokens plus the fingerprint to persist.
struct IssuedTokens {
    access_token: String,
    refresh_token: String,
    fingerprint: String,
}

impl<U, H, T> CredentialService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenCodec,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::internal(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { .. } => {
                Error::conflict("email already registered")
            }
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(format!("password hashing failed: {error}"))
    }

    fn map_encode_error(error: TokenCodecError) -> Error {
        Error::internal(format!("token issuance failed: {error}"))
    }

    async fn hash_password(&self, password: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(Self::map_hash_error)
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(Self::map_hash_error)
    }

    fn claims_for(&self, user: &User, kind: TokenKind, now: DateTime<Utc>) -> TokenClaims {
        TokenClaims {
            subject: user.id,
            role: user.role,
            kind,
            issued_at: now,
            expires_at: now + self.lifetimes.for_kind(kind),
            jti: Uuid::new_v4(),
        }
    }

    fn issue_tokens(&self, user: &User) -> Result<IssuedTokens, Error> {
        let now = self.clock.utc();
        let access_token = self
            .tokens
            .encode(&self.claims_for(user, TokenKind::Access, now))
            .map_err(Self::map_encode_error)?;
        let refresh_token = self
            .tokens
            .encode(&self.claims_for(user, TokenKind::Refresh, now))
            .map_err(Self::map_encode_error)?;
        let fingerprint = refresh_fingerprint(&refresh_token);
        Ok(IssuedTokens {
            access_token,
            refresh_token,
            fingerprint,
        })
    }

    fn session(&self, user: User, tokens: IssuedTokens) -> AuthSession {
        AuthSession {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: self.lifetimes.access().num_seconds(),
        }
    }

    /// Issue a pair for an existing account and make its refresh token the
    /// only active one.
    async fn rotate(&self, user: User) -> Result<AuthSession, Error> {
        let tokens = self.issue_tokens(&user)?;
        let stored = self
            .users
            .set_refresh_fingerprint(&user.id, Some(tokens.fingerprint.clone()))
            .await
            .map_err(Self::map_user_error)?;
        if !stored {
            return Err(Error::unauthorized("user no longer exists"));
        }
        Ok(self.session(user, tokens))
    }

    /// Decode a token of `kind` and reject it if expired.
    fn verified_claims(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, Error> {
        if token.trim().is_empty() {
            return Err(Error::unauthorized(format!("{} token missing", kind.as_str())));
        }
        let claims = self.tokens.decode(kind, token).map_err(|err| {
            debug!(error = %err, kind = kind.as_str(), "token rejected");
            Error::unauthorized(format!("invalid {} token", kind.as_str()))
        })?;
        if claims.is_expired_at(self.clock.utc()) {
            return Err(Error::unauthorized(format!("{} token expired", kind.as_str())));
        }
        Ok(claims)
    }

    async fn account(&self, id: &UserId) -> Result<Option<UserAccount>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::map_user_error)
    }
}

#[async_trait]
impl<U, H, T> AuthService for CredentialService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenCodec,
{
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error> {
        if !self.registration.permits(registration.role) {
            return Err(Error::forbidden(format!(
                "{} accounts cannot be self-registered",
                registration.role
            )));
        }
        if self
            .users
            .find_by_email(&registration.email)
            .await
            .map_err(Self::map_user_error)?
            .is_some()
        {
            return Err(Error::conflict("email already registered"));
        }

        let password_hash = self.hash_password(registration.password()).await?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            email: registration.email.clone(),
            name: registration.name.clone(),
            role: registration.role,
            created_at: now,
            updated_at: now,
        };
        let tokens = self.issue_tokens(&user)?;
        let account = UserAccount {
            user: user.clone(),
            password_hash,
            refresh_token_fingerprint: Some(tokens.fingerprint.clone()),
        };
        self.users
            .insert(&account)
            .await
            .map_err(Self::map_user_error)?;

        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(self.session(user, tokens))
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let Ok(email) = Email::new(credentials.email()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(account) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(Self::map_user_error)?
        else {
            debug!("login for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .verify_password(credentials.password(), &account.password_hash)
            .await?
        {
            debug!(user_id = %account.user.id, "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let session = self.rotate(account.user).await?;
        info!(user_id = %session.user.id, "user logged in");
        Ok(session)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, Error> {
        let claims = self.verified_claims(TokenKind::Refresh, refresh_token)?;
        let Some(account) = self.account(&claims.subject).await? else {
            return Err(Error::unauthorized("user no longer exists"));
        };

        let presented = refresh_fingerprint(refresh_token);
        if account.refresh_token_fingerprint.as_deref() != Some(presented.as_str()) {
            warn!(user_id = %account.user.id, "stale refresh token presented");
            return Err(Error::forbidden("refresh token has been revoked"));
        }

        self.rotate(account.user).await
    }

    async fn logout(&self, identity: &Identity) -> Result<(), Error> {
        let cleared = self
            .users
            .set_refresh_fingerprint(&identity.user_id, None)
            .await
            .map_err(Self::map_user_error)?;
        if cleared {
            info!(user_id = %identity.user_id, "user logged out");
        }
        Ok(())
    }

    async fn current_identity(&self, access_token: &str) -> Result<Identity, Error> {
        let claims = self.verified_claims(TokenKind::Access, access_token)?;
        let Some(account) = self.account(&claims.subject).await? else {
            return Err(Error::unauthorized("user no longer exists"));
        };
        Ok(Identity::new(account.user.id, account.user.role))
    }

    async fn profile(&self, identity: &Identity) -> Result<User, Error> {
        self.account(&identity.user_id)
            .await?
            .map(|account| account.user)
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[cfg(test)]
#[path = "credential_service_tests.rs"]
mod tests;
