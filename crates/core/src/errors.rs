//! Core error types for the catalog.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the catalog.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Category operation failed: {0}")]
    Category(#[from] CategoryError),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Image storage failed: {0}")]
    Image(#[from] ImageError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by the category hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// Unknown category id or slug.
    #[error("Category not found: {0}")]
    NotFound(String),

    /// A category was asked to become its own parent.
    #[error("Category {0} cannot be its own parent")]
    InvalidHierarchy(String),

    /// The requested parent is a descendant of the category.
    #[error("Setting parent {parent_id} on category {category_id} would create a cycle")]
    CyclicHierarchy {
        category_id: String,
        parent_id: String,
    },

    #[error("Category {0} has subcategories and cannot be deleted")]
    HasChildren(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Slug '{0}' is already in use")]
    DuplicateSlug(String),

    /// Stored data violates the forest invariant (a parent cycle was found).
    #[error("Category hierarchy is inconsistent: {0}")]
    InternalConsistency(String),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate slug).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Errors reported by an image store.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image is empty")]
    Empty,

    #[error("Image too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("Unsupported image format '{0}'")]
    UnsupportedFormat(String),

    #[error("Image storage I/O failed: {0}")]
    Io(String),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Image(ImageError::Io(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
