//! SQLite storage implementation for the product catalog.
//!
//! This crate is the only place where Diesel dependencies exist. It implements
//! the repository traits defined in `catalog-core` and contains:
//! - Database connection pooling and PRAGMA setup
//! - Embedded Diesel migrations
//! - The single-writer actor that serialises every mutation
//! - Repository implementations and their Diesel model types
//!
//! ```text
//!   catalog-core (domain, traits)
//!            │
//!            ▼
//!   storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod categories;
pub mod db;
pub mod errors;
pub mod schema;

pub use categories::CategoryRepository;
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};
pub use errors::{IntoCore, StorageError};

pub use catalog_core::errors::{DatabaseError, Error, Result};
