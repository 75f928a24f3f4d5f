//! Error types for the command layer
//!
//! This module defines all error types that can occur while binding,
//! generating, and executing database commands.

/// Result type alias for command-layer operations
pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Error types for command-layer operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Connection timeout
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout { timeout_ms: u64 },

    /// Query execution error
    #[error("Query execution error: {0}")]
    QueryError(String),

    /// Query timeout
    #[error("Query timeout after {timeout_ms}ms")]
    QueryTimeout { timeout_ms: u64 },

    /// Type conversion error
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A placeholder appears in the SQL text with no bound parameter
    #[error("Missing parameter: no value bound for placeholder '@{0}'")]
    MissingParameter(String),

    /// Invalid parameter usage (empty IN-list, mismatched counts, ...)
    #[error("Parameter error: {0}")]
    ParameterError(String),

    /// The entity type cannot name its own table
    #[error("A table name must be provided when the entity type is '{0}'")]
    TableNameRequired(String),

    /// A WHERE key column was not found on the entity
    #[error("Key column not found on entity: {0}")]
    KeyColumnNotFound(String),

    /// Column not found in a result set
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Transaction error
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// Row or entity mapping error
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// JSON (de)serialization error from the mapping layer
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// PostgreSQL error
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    PostgresError(#[from] tokio_postgres::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl DatabaseError {
    /// Create a new connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        DatabaseError::ConnectionError(msg.into())
    }

    /// Create a connection timeout error
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        DatabaseError::ConnectionTimeout { timeout_ms }
    }

    /// Create a new query error
    pub fn query<S: Into<String>>(msg: S) -> Self {
        DatabaseError::QueryError(msg.into())
    }

    /// Create a query timeout error
    pub fn query_timeout(timeout_ms: u64) -> Self {
        DatabaseError::QueryTimeout { timeout_ms }
    }

    /// Create a new type mismatch error
    pub fn type_mismatch(expected: &str, actual: &str) -> Self {
        DatabaseError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a new parameter error
    pub fn parameter<S: Into<String>>(msg: S) -> Self {
        DatabaseError::ParameterError(msg.into())
    }

    /// Create a new transaction error
    pub fn transaction<S: Into<String>>(msg: S) -> Self {
        DatabaseError::TransactionError(msg.into())
    }

    /// Create a new mapping error
    pub fn mapping<S: Into<String>>(msg: S) -> Self {
        DatabaseError::MappingError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        DatabaseError::Other(msg.into())
    }
}
