//! Catalog Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the product catalog's
//! category hierarchy. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate and by the server's image store.

pub mod categories;
pub mod constants;
pub mod errors;
pub mod images;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
