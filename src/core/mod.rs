//! Core command types and traits
//!
//! This module provides the fundamental building blocks of the command
//! layer: error types, the value system, the connection trait, named
//! parameter binding, the fluent command itself, event hooks, and the
//! transaction guard.

pub mod bind;
pub mod command;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod events;
pub mod result_set;
pub mod transaction;
pub mod value;

// Re-export commonly used types
pub use bind::{Parameter, ParameterValue};
pub use command::DatabaseCommand;
pub use connection::Connection;
pub use dialect::SqlDialect;
pub use error::{DatabaseError, Result};
pub use events::{CommandEvent, EventRegistry};
pub use result_set::{DataSet, ResultSet, Row};
pub use transaction::TransactionGuard;
pub use value::{FromValue, SqlValue};
