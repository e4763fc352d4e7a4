use std::fmt;

use sea_orm::{sqlx, DbErr, RuntimeErr, SqlErr, TransactionError};
use serde::Serialize;
use thiserror::Error;

/// Which table an operation was working on, so failures can name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Venue,
    Artist,
    Show,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Venue => write!(f, "Venue"),
            Self::Artist => write!(f, "Artist"),
            Self::Show => write!(f, "Show"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i32 },

    /// A show pointed at an artist or venue that does not exist.
    #[error("Show references missing {entity} {id}")]
    ReferenceError { entity: EntityKind, id: i32 },

    #[error("{entity} rejected by the database: {message}")]
    ConstraintViolation { entity: EntityKind, message: String },

    #[error("{entity} could not be stored: {message}")]
    TransientStoreFailure { entity: EntityKind, message: String },
}

impl StoreError {
    pub fn entity(&self) -> EntityKind {
        match self {
            Self::NotFound { entity, .. }
            | Self::ReferenceError { entity, .. }
            | Self::ConstraintViolation { entity, .. }
            | Self::TransientStoreFailure { entity, .. } => *entity,
        }
    }

    /// Translate a raw database error raised while working on `entity`.
    ///
    /// Only statements the database itself refused become
    /// `ConstraintViolation`; driver, I/O and pool failures are transient.
    pub fn from_db(err: DbErr, entity: EntityKind) -> Self {
        if !is_rejection(&err) {
            return Self::TransientStoreFailure {
                entity,
                message: err.to_string(),
            };
        }

        let message = match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                format!("unique constraint violated: {msg}")
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                format!("foreign key constraint violated: {msg}")
            }
            _ => err.to_string(),
        };
        Self::ConstraintViolation { entity, message }
    }

    /// Flatten the result of `TransactionTrait::transaction`.
    pub fn from_txn(err: TransactionError<StoreError>, entity: EntityKind) -> Self {
        match err {
            TransactionError::Connection(db_err) => Self::from_db(db_err, entity),
            TransactionError::Transaction(store_err) => store_err,
        }
    }
}

fn is_rejection(err: &DbErr) -> bool {
    match err {
        DbErr::RecordNotInserted => true,
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(_)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(_))) => true,
        _ => err.sql_err().is_some(),
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_connection_errors_are_transient() {
        let err = StoreError::from_db(
            DbErr::Conn(RuntimeErr::Internal("pool closed".to_string())),
            EntityKind::Venue,
        );
        assert!(matches!(
            err,
            StoreError::TransientStoreFailure { entity: EntityKind::Venue, .. }
        ));
    }

    #[test]
    fn test_record_not_inserted_is_a_constraint_violation() {
        let err = StoreError::from_db(DbErr::RecordNotInserted, EntityKind::Venue);
        assert!(matches!(
            err,
            StoreError::ConstraintViolation { entity: EntityKind::Venue, .. }
        ));
    }

    #[test]
    fn test_driver_errors_during_statements_are_transient() {
        let cases = [
            DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::PoolClosed)),
            DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Protocol(
                "unexpected message".to_string(),
            ))),
            DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )))),
            DbErr::Exec(RuntimeErr::Internal("driver hiccup".to_string())),
        ];

        for db_err in cases {
            let err = StoreError::from_db(db_err, EntityKind::Artist);
            assert!(
                matches!(
                    err,
                    StoreError::TransientStoreFailure { entity: EntityKind::Artist, .. }
                ),
                "{err:?}"
            );
        }
    }

    #[test]
    fn test_failed_begin_is_transient() {
        let err = StoreError::from_txn(
            TransactionError::Connection(DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Io(
                io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"),
            )))),
            EntityKind::Show,
        );
        assert!(matches!(
            err,
            StoreError::TransientStoreFailure { entity: EntityKind::Show, .. }
        ));
    }

    #[test]
    fn test_transaction_errors_pass_through() {
        let inner = StoreError::NotFound { entity: EntityKind::Artist, id: 7 };
        let err = StoreError::from_txn(TransactionError::Transaction(inner), EntityKind::Show);
        assert!(matches!(
            err,
            StoreError::NotFound { entity: EntityKind::Artist, id: 7 }
        ));
        assert_eq!(err.to_string(), "Artist 7 not found");
    }
}
