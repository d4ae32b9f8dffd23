//! # storage-adapters
//!
//! Repository implementations for the YCBN site. The in-memory store is always
//! compiled; the PostgreSQL store sits behind the `db-postgres` feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;
