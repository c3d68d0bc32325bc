//! Translation of pool and Diesel failures into account persistence errors.
//!
//! Detail from the database is logged at debug level and replaced with a
//! fixed message so constraint or column names never reach callers.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::AccountPersistenceError;

use super::pool::PoolError;

pub(super) fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccountPersistenceError::connection(message)
        }
    }
}

pub(super) fn map_diesel_error(error: DieselError) -> AccountPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error = %error,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AccountPersistenceError::duplicate("unique constraint violated")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => AccountPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => AccountPersistenceError::query("database query error"),
        _ => AccountPersistenceError::query("database error"),
    }
}
