//! Translation of pool and Diesel failures into port errors.
//!
//! Each repository error type implements [`RepositoryFailure`] so the
//! adapters share one mapping. Constraint violations that carry domain
//! meaning (duplicate email, duplicate question) are detected by the
//! adapters before falling back to [`map_diesel_error`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{FaqRepositoryError, TicketRepositoryError, UserPersistenceError};

use super::pool::PoolError;

/// Connection and query constructors shared by repository errors.
pub(super) trait RepositoryFailure {
    fn connection_failure(message: String) -> Self;
    fn query_failure(message: String) -> Self;
}

macro_rules! repository_failure {
    ($($error:ty),+ $(,)?) => {
        $(
            impl RepositoryFailure for $error {
                fn connection_failure(message: String) -> Self {
                    Self::connection(message)
                }

                fn query_failure(message: String) -> Self {
                    Self::query(message)
                }
            }
        )+
    };
}

repository_failure!(UserPersistenceError, TicketRepositoryError, FaqRepositoryError);

pub(super) fn map_pool_error<E: RepositoryFailure>(error: PoolError) -> E {
    E::connection_failure(error.message().to_owned())
}

pub(super) fn map_diesel_error<E: RepositoryFailure>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection_failure("database connection error".to_owned())
        }
        DieselError::NotFound => E::query_failure("record not found".to_owned()),
        _ => E::query_failure("database error".to_owned()),
    }
}

pub(super) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

pub(super) fn is_foreign_key_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}
