//! # sqlcraft
//!
//! A fluent convenience layer over SQL database access. A single
//! [`DatabaseCommand`] accumulates SQL text and named parameters, executes
//! in the shape you ask for (rows affected, a scalar, mapped structs, JSON
//! objects, or whole result sets), and manages the connection lifecycle
//! around each execution.
//!
//! ## Features
//!
//! - **Fluent commands**: chainable builders for text, parameters, and flags
//! - **Named parameters**: `@name` placeholders with IN-clause list expansion
//! - **Typed mapping**: rows deserialize into any `serde::Deserialize` struct
//! - **SQL generation**: dialect-aware INSERT/UPDATE from any `Serialize`
//!   entity, with last-insert-id retrieval per engine
//! - **Event hooks**: pre-execute, post-execute, and error handlers
//! - **Transactions**: RAII guard with rollback on drop
//!
//! ## Supported Dialects
//!
//! SQL text generation covers SQL Server, MySQL, PostgreSQL, and SQLite;
//! live backends are provided for SQLite (`sqlite` feature, bundled) and
//! PostgreSQL (`postgres` feature).
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! sqlcraft = { version = "0.1", features = ["sqlite"] }
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sqlcraft::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let connection: Arc<dyn Connection> = Arc::new(SqliteConnection::new("app.db"));
//!
//!     DatabaseCommand::new(Arc::clone(&connection))
//!         .set_command_text("CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY, name TEXT)")
//!         .execute_non_query()
//!         .await?;
//!
//!     let count: Option<i64> = DatabaseCommand::new(Arc::clone(&connection))
//!         .set_command_text("SELECT COUNT(*) FROM users WHERE name = @name")
//!         .add_parameter("name", "Alice")
//!         .execute_scalar()
//!         .await?;
//!     println!("matches: {}", count.unwrap_or(0));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Generated Statements
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use serde::Serialize;
//! use sqlcraft::prelude::*;
//!
//! #[derive(Serialize)]
//! struct Customer {
//!     customer_id: Option<i64>,
//!     first_name: String,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let connection: Arc<dyn Connection> = Arc::new(SqliteConnection::new("app.db"));
//! let customer = Customer { customer_id: None, first_name: "Clark".into() };
//!
//! // INSERT plus the dialect's last-insert-id SELECT in one command
//! let id: Option<i64> = DatabaseCommand::new(connection)
//!     .generate_insert(&customer, Some("Customer"))?
//!     .execute_scalar()
//!     .await?;
//! # Ok(())
//! # }
//! ```

/// Core command types and traits
pub mod core;

/// Database backend implementations
pub mod backends;

/// Dialect-aware SQL generation
pub mod sqlgen;

/// Prelude for convenient imports
///
/// ```rust
/// use sqlcraft::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let conn = SqliteConnection::in_memory();
///     conn.open().await?;
///     Ok(())
/// }
/// ```
pub mod prelude {
    pub use crate::core::{
        CommandEvent, Connection, DataSet, DatabaseCommand, DatabaseError, EventRegistry,
        FromValue, Parameter, ParameterValue, Result, ResultSet, Row, SqlDialect, SqlValue,
        TransactionGuard,
    };
    pub use crate::sqlgen::GeneratedSql;

    #[cfg(feature = "sqlite")]
    pub use crate::backends::SqliteConnection;

    #[cfg(feature = "postgres")]
    pub use crate::backends::PostgresConnection;
}

// Re-export at root level for convenience
pub use crate::core::{
    CommandEvent, Connection, DataSet, DatabaseCommand, DatabaseError, EventRegistry, FromValue,
    Parameter, ParameterValue, Result, ResultSet, Row, SqlDialect, SqlValue, TransactionGuard,
};
pub use crate::sqlgen::GeneratedSql;

#[cfg(feature = "sqlite")]
pub use crate::backends::SqliteConnection;

#[cfg(feature = "postgres")]
pub use crate::backends::PostgresConnection;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let dialect = SqlDialect::Sqlite;
        assert_eq!(dialect.to_str(), "sqlite");
    }

    #[test]
    fn test_value_conversions() {
        use prelude::*;

        let val: SqlValue = 42.into();
        assert_eq!(val.as_int(), Some(42));

        let val: SqlValue = "test".into();
        assert_eq!(val.as_str(), Some("test"));

        let val: SqlValue = true.into();
        assert_eq!(val.as_bool(), Some(true));
    }
}
