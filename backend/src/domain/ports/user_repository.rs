//! Port abstraction for user account persistence adapters and their errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, Role, User, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for user accounts and their credential material.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, failing with `DuplicateEmail` on collision.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch an account by normalised email.
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// List every user, newest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Replace the stored refresh token fingerprint. Returns `false` when the
    /// user no longer exists.
    async fn set_refresh_fingerprint(
        &self,
        id: &UserId,
        fingerprint: Option<String>,
    ) -> Result<bool, UserPersistenceError>;

    /// Change a user's role, returning the updated user if present.
    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Delete a user and, by cascade, their tickets. Returns `false` when
    /// nothing was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
