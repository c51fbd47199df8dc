//! In-memory `UserRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, Role, User, UserAccount, UserId};

use super::{Tickets, Users, find_account, lock};

/// Users held in process memory.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    users: Users,
    tickets: Tickets,
}

impl InMemoryUserRepository {
    pub(super) fn new(users: Users, tickets: Tickets) -> Self {
        Self { users, tickets }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users);
        if users
            .iter()
            .any(|existing| existing.user.email == account.user.email)
        {
            return Err(UserPersistenceError::duplicate_email(
                account.user.email.to_string(),
            ));
        }
        users.push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(find_account(&lock(&self.users), id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(lock(&self.users)
            .iter()
            .find(|account| account.user.email == *email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut users: Vec<User> = lock(&self.users)
            .iter()
            .rev()
            .map(|account| account.user.clone())
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn set_refresh_fingerprint(
        &self,
        id: &UserId,
        fingerprint: Option<String>,
    ) -> Result<bool, UserPersistenceError> {
        let mut users = lock(&self.users);
        Ok(users
            .iter_mut()
            .find(|account| account.user.id == *id)
            .map(|account| account.refresh_token_fingerprint = fingerprint)
            .is_some())
    }

    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut users = lock(&self.users);
        Ok(users
            .iter_mut()
            .find(|account| account.user.id == *id)
            .map(|account| {
                account.user.role = role;
                account.user.updated_at = updated_at;
                account.user.clone()
            }))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut users = lock(&self.users);
        let before = users.len();
        users.retain(|account| account.user.id != *id);
        if users.len() == before {
            return Ok(false);
        }
        let mut tickets = lock(&self.tickets);
        tickets.retain(|ticket| ticket.owner_id != *id);
        for comment in tickets.iter_mut().flat_map(|ticket| ticket.comments.iter_mut()) {
            if comment.admin_id == Some(*id) {
                comment.admin_id = None;
            }
        }
        Ok(true)
    }
}
