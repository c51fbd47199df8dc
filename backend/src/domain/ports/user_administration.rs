//! Driving port for admin user management.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Role, User, UserId};

/// Domain use-case port for managing accounts. Every operation is admin only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdministration: Send + Sync {
    /// Every account, newest first.
    async fn list_users(&self, identity: &Identity) -> Result<Vec<User>, Error>;

    /// Change an account's role.
    async fn update_role(
        &self,
        identity: &Identity,
        user_id: &UserId,
        role: Role,
    ) -> Result<User, Error>;

    /// Delete an account with its tickets and attachments.
    async fn delete_user(&self, identity: &Identity, user_id: &UserId) -> Result<(), Error>;
}
