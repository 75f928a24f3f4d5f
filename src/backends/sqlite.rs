//! SQLite backend
//!
//! Wraps a `rusqlite` connection behind the [`Connection`] trait. rusqlite
//! is synchronous, so every operation is offloaded to the blocking thread
//! pool and raced against a timeout.
//!
//! SQLite statements take one statement at a time, while command text is
//! frequently a script (an INSERT followed by the identity SELECT, or a
//! whole CREATE/INSERT/SELECT batch). The backend splits the script on
//! statement boundaries and distributes the positional parameters by each
//! statement's own parameter count.

#[cfg(feature = "sqlite")]
use rusqlite::params_from_iter;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::connection::Connection;
use crate::core::dialect::SqlDialect;
use crate::core::error::{DatabaseError, Result};
use crate::core::result_set::ResultSet;
use crate::core::value::SqlValue;

/// Default timeout for database operations (30 seconds)
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// SQLite implementation of [`Connection`]
///
/// The target is fixed at construction so the command layer can close and
/// re-open the connection freely. Note that an in-memory target loses all
/// state on close; commands against `:memory:` should keep the connection
/// open.
#[cfg(feature = "sqlite")]
pub struct SqliteConnection {
    target: String,
    connection: Arc<Mutex<Option<rusqlite::Connection>>>,
    in_transaction: Arc<Mutex<bool>>,
}

#[cfg(feature = "sqlite")]
impl SqliteConnection {
    /// Create a connection to a database file path or URI
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            connection: Arc::new(Mutex::new(None)),
            in_transaction: Arc::new(Mutex::new(false)),
        }
    }

    /// Create a connection to a private in-memory database
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    /// Convert a value to a rusqlite parameter
    fn value_to_param(value: &SqlValue) -> Box<dyn rusqlite::ToSql> {
        match value {
            SqlValue::Null => Box::new(None::<i64>),
            SqlValue::Bool(v) => Box::new(*v),
            SqlValue::Int(v) => Box::new(*v),
            SqlValue::Long(v) => Box::new(*v),
            SqlValue::Float(v) => Box::new(*v),
            SqlValue::Double(v) => Box::new(*v),
            SqlValue::String(v) => Box::new(v.clone()),
            SqlValue::Bytes(v) => Box::new(v.clone()),
            SqlValue::Timestamp(v) => Box::new(*v),
        }
    }

    /// Run a statement script, distributing `params` across statements
    ///
    /// Returns total rows affected and one result set per statement that
    /// produced columns.
    fn run_script(
        conn: &rusqlite::Connection,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<(u64, Vec<ResultSet>)> {
        let mut affected = 0u64;
        let mut sets = Vec::new();
        let mut remaining = params;

        for statement_text in split_statements(sql) {
            let mut stmt = conn.prepare(&statement_text)?;
            let count = stmt.parameter_count();
            if remaining.len() < count {
                return Err(DatabaseError::parameter(format!(
                    "statement expects {count} parameters but only {} remain",
                    remaining.len()
                )));
            }
            let (mine, rest) = remaining.split_at(count);
            remaining = rest;

            let rusqlite_params: Vec<Box<dyn rusqlite::ToSql>> =
                mine.iter().map(Self::value_to_param).collect();

            if stmt.column_count() > 0 {
                let columns: Vec<String> =
                    stmt.column_names().iter().map(|c| c.to_string()).collect();
                let mut set = ResultSet::new(columns.clone());
                let mut rows = stmt.query(params_from_iter(rusqlite_params.iter()))?;
                while let Some(row) = rows.next()? {
                    let mut values = Vec::with_capacity(columns.len());
                    for i in 0..columns.len() {
                        values.push(match row.get_ref(i)? {
                            rusqlite::types::ValueRef::Null => SqlValue::Null,
                            rusqlite::types::ValueRef::Integer(v) => SqlValue::Long(v),
                            rusqlite::types::ValueRef::Real(v) => SqlValue::Double(v),
                            rusqlite::types::ValueRef::Text(v) => {
                                SqlValue::String(String::from_utf8_lossy(v).to_string())
                            }
                            rusqlite::types::ValueRef::Blob(v) => SqlValue::Bytes(v.to_vec()),
                        });
                    }
                    set.push_row(values);
                }
                sets.push(set);
            } else {
                affected += stmt.execute(params_from_iter(rusqlite_params.iter()))? as u64;
            }
        }

        if !remaining.is_empty() {
            return Err(DatabaseError::parameter(format!(
                "{} positional parameters were not consumed by the script",
                remaining.len()
            )));
        }
        Ok((affected, sets))
    }

    /// Offload a blocking operation on the live connection, with timeout
    async fn run_blocking<T>(
        &self,
        f: impl FnOnce(&rusqlite::Connection) -> Result<T> + Send + 'static,
    ) -> Result<T>
    where
        T: Send + 'static,
    {
        let connection_arc = Arc::clone(&self.connection);
        let mut task = tokio::task::spawn_blocking(move || -> Result<T> {
            let connection = connection_arc.blocking_lock();
            let conn = connection
                .as_ref()
                .ok_or_else(|| DatabaseError::connection("Not connected to database"))?;
            f(conn)
        });

        tokio::select! {
            result = &mut task => {
                result.map_err(|e| DatabaseError::other(format!("Task join error: {}", e)))?
            }
            _ = tokio::time::sleep(DEFAULT_OPERATION_TIMEOUT) => {
                task.abort();
                Err(DatabaseError::query_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64))
            }
        }
    }
}

/// Split a script into individual statements
///
/// Splits on `;` outside single-quoted strings, double-quoted and bracketed
/// identifiers, and `--`/`/* */` comments. Empty fragments are dropped.
#[cfg(feature = "sqlite")]
fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                current.push(c);
                for q in chars.by_ref() {
                    current.push(q);
                    if q == c {
                        break;
                    }
                }
            }
            '[' => {
                current.push(c);
                for q in chars.by_ref() {
                    current.push(q);
                    if q == ']' {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                current.push(c);
                for q in chars.by_ref() {
                    current.push(q);
                    if q == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                current.push(c);
                let mut prev = '\0';
                for q in chars.by_ref() {
                    current.push(q);
                    if prev == '*' && q == '/' {
                        break;
                    }
                    prev = q;
                }
            }
            ';' => {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    statements.push(trimmed.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
    statements
}

#[cfg(feature = "sqlite")]
#[async_trait]
impl Connection for SqliteConnection {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    async fn open(&self) -> Result<()> {
        // Clean up any existing connection first
        {
            let mut connection = self.connection.lock().await;
            *connection = None;
        }

        // Reset transaction flag to handle failed/aborted attempts
        {
            let mut in_transaction = self.in_transaction.lock().await;
            *in_transaction = false;
        }

        let target = self.target.clone();
        let connection_arc = Arc::clone(&self.connection);

        let mut task = tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = rusqlite::Connection::open(&target)?;

            // Enable foreign keys
            conn.execute("PRAGMA foreign_keys = ON", [])?;

            let mut connection = connection_arc.blocking_lock();
            *connection = Some(conn);

            Ok(())
        });

        tokio::select! {
            result = &mut task => {
                result.map_err(|e| DatabaseError::other(format!("Task join error: {}", e)))??
            }
            _ = tokio::time::sleep(DEFAULT_OPERATION_TIMEOUT) => {
                task.abort();
                return Err(DatabaseError::connection_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64));
            }
        }

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.connection
            .try_lock()
            .map(|conn| conn.is_some())
            .unwrap_or(false)
    }

    async fn close(&self) -> Result<()> {
        // Clear transaction flag to prevent stale state after reconnect
        {
            let mut in_transaction = self.in_transaction.lock().await;
            *in_transaction = false;
        }

        let mut connection = self.connection.lock().await;
        *connection = None;
        Ok(())
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        let sql = sql.to_string();
        let params = params.to_vec();
        self.run_blocking(move |conn| {
            let (affected, _) = Self::run_script(conn, &sql, &params)?;
            Ok(affected)
        })
        .await
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<ResultSet> {
        let sql = sql.to_string();
        let params = params.to_vec();
        self.run_blocking(move |conn| {
            let (_, mut sets) = Self::run_script(conn, &sql, &params)?;
            Ok(sets.pop().unwrap_or_else(|| ResultSet::new(Vec::new())))
        })
        .await
    }

    async fn query_multi(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<ResultSet>> {
        let sql = sql.to_string();
        let params = params.to_vec();
        self.run_blocking(move |conn| {
            let (_, sets) = Self::run_script(conn, &sql, &params)?;
            Ok(sets)
        })
        .await
    }

    async fn begin_transaction(&self) -> Result<()> {
        let connection_arc = Arc::clone(&self.connection);
        let in_transaction_arc = Arc::clone(&self.in_transaction);

        let mut task = tokio::task::spawn_blocking(move || -> Result<()> {
            // Acquire both locks atomically to prevent race conditions
            let mut in_transaction = in_transaction_arc.blocking_lock();
            let connection = connection_arc.blocking_lock();

            let conn = connection
                .as_ref()
                .ok_or_else(|| DatabaseError::connection("Not connected to database"))?;

            if *in_transaction {
                return Err(DatabaseError::transaction(
                    "Already in a transaction".to_string(),
                ));
            }

            // Execute SQL first, only set flag on success
            conn.execute("BEGIN TRANSACTION", [])?;
            *in_transaction = true;

            Ok(())
        });

        tokio::select! {
            result = &mut task => {
                result.map_err(|e| DatabaseError::other(format!("Task join error: {}", e)))?
            }
            _ = tokio::time::sleep(DEFAULT_OPERATION_TIMEOUT) => {
                task.abort();
                Err(DatabaseError::query_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64))
            }
        }
    }

    async fn commit(&self) -> Result<()> {
        let connection_arc = Arc::clone(&self.connection);
        let in_transaction_arc = Arc::clone(&self.in_transaction);

        let mut task = tokio::task::spawn_blocking(move || -> Result<()> {
            let mut in_transaction = in_transaction_arc.blocking_lock();
            let connection = connection_arc.blocking_lock();

            let conn = connection
                .as_ref()
                .ok_or_else(|| DatabaseError::connection("Not connected to database"))?;

            if !*in_transaction {
                return Err(DatabaseError::transaction(
                    "Not in a transaction".to_string(),
                ));
            }

            // Execute SQL first, only clear flag on success
            conn.execute("COMMIT", [])?;
            *in_transaction = false;

            Ok(())
        });

        tokio::select! {
            result = &mut task => {
                result.map_err(|e| DatabaseError::other(format!("Task join error: {}", e)))?
            }
            _ = tokio::time::sleep(DEFAULT_OPERATION_TIMEOUT) => {
                task.abort();
                Err(DatabaseError::query_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64))
            }
        }
    }

    async fn rollback(&self) -> Result<()> {
        let connection_arc = Arc::clone(&self.connection);
        let in_transaction_arc = Arc::clone(&self.in_transaction);

        let mut task = tokio::task::spawn_blocking(move || -> Result<()> {
            let mut in_transaction = in_transaction_arc.blocking_lock();
            let connection = connection_arc.blocking_lock();

            let conn = connection
                .as_ref()
                .ok_or_else(|| DatabaseError::connection("Not connected to database"))?;

            if !*in_transaction {
                return Err(DatabaseError::transaction(
                    "Not in a transaction".to_string(),
                ));
            }

            conn.execute("ROLLBACK", [])?;
            *in_transaction = false;

            Ok(())
        });

        tokio::select! {
            result = &mut task => {
                result.map_err(|e| DatabaseError::other(format!("Task join error: {}", e)))?
            }
            _ = tokio::time::sleep(DEFAULT_OPERATION_TIMEOUT) => {
                task.abort();
                Err(DatabaseError::query_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64))
            }
        }
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
            .try_lock()
            .map(|guard| *guard)
            .unwrap_or(false)
    }
}

#[cfg(feature = "sqlite")]
impl Drop for SqliteConnection {
    fn drop(&mut self) {
        // Best-effort rollback of any open transaction; Drop cannot be async
        if let Ok(in_trans) = self.in_transaction.try_lock() {
            if *in_trans {
                if let Ok(connection) = self.connection.try_lock() {
                    if let Some(conn) = connection.as_ref() {
                        let _ = conn.execute("ROLLBACK", []);
                    }
                }
            }
        }
    }
}
