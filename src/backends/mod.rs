//! Database backend implementations
//!
//! This module contains concrete implementations of the Connection trait
//! for the supported database engines.

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnection;

#[cfg(feature = "postgres")]
pub use postgres::PostgresConnection;
