//! Storage-specific error types for SQLite operations.
//!
//! Diesel and r2d2 errors are wrapped here and converted to the
//! database-agnostic errors of `catalog_core` at the crate boundary.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use catalog_core::errors::{DatabaseError, Error};

/// Storage-specific errors that wrap Diesel and r2d2 types.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Writer unavailable: {0}")]
    WriterUnavailable(String),

    /// A domain error raised inside a write job. It aborts the transaction
    /// and reaches the caller unchanged.
    #[error(transparent)]
    Core(Error),
}

impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Core(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => Error::Database(DatabaseError::UniqueViolation(info.message().to_string())),
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                info,
            )) => Error::Database(DatabaseError::ForeignKeyViolation(
                info.message().to_string(),
            )),
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::MigrationFailed(e) => Error::Database(DatabaseError::MigrationFailed(e)),
            StorageError::WriterUnavailable(e) => Error::Database(DatabaseError::Internal(e)),
            StorageError::Core(e) => e,
        }
    }
}

/// Extension trait for converting Diesel and r2d2 results into core results.
///
/// The orphan rule prevents `From<DieselError> for catalog_core::Error`, so the
/// conversion goes through [`StorageError`].
pub trait IntoCore<T> {
    fn into_core(self) -> catalog_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> catalog_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> catalog_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}
