//! Admin user management implementing [`UserAdministration`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AttachmentStore, TicketRepository, TicketRepositoryError, UserAdministration,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Error, Identity, Role, User, UserId, authorize};

/// User administration service.
#[derive(Clone)]
pub struct UserAdminService<U, T, A> {
    users: Arc<U>,
    tickets: Arc<T>,
    attachments: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<U, T, A> UserAdminService<U, T, A> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<U>, tickets: Arc<T>, attachments: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            tickets,
            attachments,
            clock,
        }
    }
}

impl<U, T, A> UserAdminService<U, T, A>
where
    U: UserRepository,
    T: TicketRepository,
    A: AttachmentStore,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        Error::internal(format!("user repository error: {error}"))
    }

    fn map_ticket_error(error: TicketRepositoryError) -> Error {
        Error::internal(format!("ticket repository error: {error}"))
    }

    fn not_found(id: &UserId) -> Error {
        Error::not_found(format!("user {id} not found"))
    }
}

#[async_trait]
impl<U, T, A> UserAdministration for UserAdminService<U, T, A>
where
    U: UserRepository,
    T: TicketRepository,
    A: AttachmentStore,
{
    async fn list_users(&self, identity: &Identity) -> Result<Vec<User>, Error> {
        authorize(identity, Role::Admin)?;
        self.users.list().await.map_err(Self::map_user_error)
    }

    async fn update_role(
        &self,
        identity: &Identity,
        user_id: &UserId,
        role: Role,
    ) -> Result<User, Error> {
        authorize(identity, Role::Admin)?;
        let user = self
            .users
            .update_role(user_id, role, self.clock.utc())
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Self::not_found(user_id))?;
        info!(user_id = %user_id, %role, admin = %identity.user_id, "user role changed");
        Ok(user)
    }

    async fn delete_user(&self, identity: &Identity, user_id: &UserId) -> Result<(), Error> {
        authorize(identity, Role::Admin)?;
        if identity.user_id == *user_id {
            return Err(Error::forbidden("admins cannot delete their own account"));
        }
        if self
            .users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .is_none()
        {
            return Err(Self::not_found(user_id));
        }

        let paths = self
            .tickets
            .attachment_paths_for_owner(user_id)
            .await
            .map_err(Self::map_ticket_error)?;
        if !self
            .users
            .delete(user_id)
            .await
            .map_err(Self::map_user_error)?
        {
            return Err(Self::not_found(user_id));
        }
        for path in &paths {
            if let Err(error) = self.attachments.remove(path).await {
                warn!(%error, path = %path, "failed to remove attachment of deleted user");
            }
        }
        info!(user_id = %user_id, admin = %identity.user_id, "user deleted");
        Ok(())
    }
}
