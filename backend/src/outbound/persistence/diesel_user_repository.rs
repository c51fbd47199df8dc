//! PostgreSQL-backed `UserRepository` using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, Email, Role, User, UserAccount, UserId};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let corrupt = |err: &dyn std::fmt::Display| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    let role = row.role.parse::<Role>().unwrap_or_else(|_| {
        warn!(user_id = %row.id, value = %row.role, "unrecognised role, defaulting to student");
        Role::Student
    });
    Ok(User {
        id: UserId::from_uuid(row.id),
        email: Email::new(&row.email).map_err(|err| corrupt(&err))?,
        name: DisplayName::new(&row.name).map_err(|err| corrupt(&err))?,
        role,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let user = row_to_user(&row)?;
    Ok(UserAccount {
        user,
        password_hash: row.password_hash,
        refresh_token_fingerprint: row.refresh_token_fingerprint,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = &account.user;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            password_hash: &account.password_hash,
            name: user.name.as_ref(),
            role: user.role.as_str(),
            refresh_token_fingerprint: account.refresh_token_fingerprint.as_deref(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_email(user.email.to_string())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_account)
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_account)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::created_at.desc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.iter().map(row_to_user).collect()
    }

    async fn set_refresh_fingerprint(
        &self,
        id: &UserId,
        fingerprint: Option<String>,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(id.as_uuid()))
            .set(users::refresh_token_fingerprint.eq(fingerprint))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn update_role(
        &self,
        id: &UserId,
        role: Role,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(id.as_uuid()))
            .set((
                users::role.eq(role.as_str()),
                users::updated_at.eq(updated_at),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .as_ref()
            .map(row_to_user)
            .transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
