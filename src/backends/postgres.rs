//! PostgreSQL backend
//!
//! Wraps a `tokio-postgres` client behind the [`Connection`] trait. The
//! driver is natively async, so operations run directly under a timeout
//! instead of the blocking thread pool.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls, Row};
use tracing::error;

use crate::core::connection::Connection;
use crate::core::dialect::SqlDialect;
use crate::core::error::{DatabaseError, Result};
use crate::core::result_set::ResultSet;
use crate::core::value::SqlValue;

/// Default timeout for database operations (30 seconds)
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// PostgreSQL implementation of [`Connection`]
pub struct PostgresConnection {
    url: String,
    client: Arc<Mutex<Option<Client>>>,
    in_transaction: Arc<Mutex<bool>>,
}

impl PostgresConnection {
    /// Create a connection to the given PostgreSQL URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Arc::new(Mutex::new(None)),
            in_transaction: Arc::new(Mutex::new(false)),
        }
    }

    /// Convert a driver row into value cells, keyed by the column metadata
    fn row_values(row: &Row) -> Vec<SqlValue> {
        row.columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| match column.type_().name() {
                "bool" => row
                    .get::<_, Option<bool>>(idx)
                    .map(SqlValue::Bool)
                    .unwrap_or(SqlValue::Null),
                "int2" | "int4" => row
                    .get::<_, Option<i32>>(idx)
                    .map(SqlValue::Int)
                    .unwrap_or(SqlValue::Null),
                "int8" => row
                    .get::<_, Option<i64>>(idx)
                    .map(SqlValue::Long)
                    .unwrap_or(SqlValue::Null),
                "float4" => row
                    .get::<_, Option<f32>>(idx)
                    .map(SqlValue::Float)
                    .unwrap_or(SqlValue::Null),
                "float8" => row
                    .get::<_, Option<f64>>(idx)
                    .map(SqlValue::Double)
                    .unwrap_or(SqlValue::Null),
                "text" | "varchar" | "char" | "bpchar" => row
                    .get::<_, Option<String>>(idx)
                    .map(SqlValue::String)
                    .unwrap_or(SqlValue::Null),
                "bytea" => row
                    .get::<_, Option<Vec<u8>>>(idx)
                    .map(SqlValue::Bytes)
                    .unwrap_or(SqlValue::Null),
                "timestamp" | "timestamptz" => row
                    .get::<_, Option<i64>>(idx)
                    .map(SqlValue::Timestamp)
                    .unwrap_or(SqlValue::Null),
                _ => {
                    // Try to get as string for unknown types
                    row.get::<_, Option<String>>(idx)
                        .map(SqlValue::String)
                        .unwrap_or(SqlValue::Null)
                }
            })
            .collect()
    }

    fn rows_to_result_set(rows: &[Row]) -> ResultSet {
        let columns: Vec<String> = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let mut set = ResultSet::new(columns);
        for row in rows {
            set.push_row(Self::row_values(row));
        }
        set
    }

    /// Convert a value to a postgres parameter
    fn value_to_param(value: &SqlValue) -> Box<dyn tokio_postgres::types::ToSql + Sync + Send> {
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
}

#[async_trait]
impl Connection for PostgresConnection {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    async fn open(&self) -> Result<()> {
        // Clean up any existing client first
        {
            let mut client = self.client.lock().await;
            *client = None;
        }

        // Reset transaction flag
        {
            let mut in_transaction = self.in_transaction.lock().await;
            *in_transaction = false;
        }

        let url = self.url.clone();
        let client_arc = Arc::clone(&self.client);

        let connect_future = async move {
            let (client, connection) = tokio_postgres::connect(&url, NoTls)
                .await
                .map_err(|e| DatabaseError::connection(e.to_string()))?;

            // Drive the connection in the background
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    error!("PostgreSQL connection error: {}", e);
                }
            });

            let mut client_guard = client_arc.lock().await;
            *client_guard = Some(client);

            Ok::<(), DatabaseError>(())
        };

        tokio::time::timeout(DEFAULT_OPERATION_TIMEOUT, connect_future)
            .await
            .map_err(|_| {
                DatabaseError::connection_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64)
            })??;

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.client
            .try_lock()
            .map(|client| match *client {
                Some(ref c) => !c.is_closed(),
                None => false,
            })
            .unwrap_or(false)
    }

    async fn close(&self) -> Result<()> {
        // Clear transaction flag
        {
            let mut in_transaction = self.in_transaction.lock().await;
            *in_transaction = false;
        }

        let mut client = self.client.lock().await;
        *client = None;
        Ok(())
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        let client = self.client.lock().await;
        let client = client
            .as_ref()
            .ok_or_else(|| DatabaseError::connection("Not connected to database"))?;

        let postgres_params: Vec<Box<dyn tokio_postgres::types::ToSql + Sync + Send>> =
            params.iter().map(Self::value_to_param).collect();
        let param_refs: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = postgres_params
            .iter()
            .map(|p| p.as_ref() as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect();

        let execute_future = client.execute(sql, &param_refs);

        let affected = tokio::time::timeout(DEFAULT_OPERATION_TIMEOUT, execute_future)
            .await
            .map_err(|_| {
                DatabaseError::query_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64)
            })?
            .map_err(|e| DatabaseError::query(e.to_string()))?;

        Ok(affected)
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<ResultSet> {
        let client = self.client.lock().await;
        let client = client
            .as_ref()
            .ok_or_else(|| DatabaseError::connection("Not connected to database"))?;

        let postgres_params: Vec<Box<dyn tokio_postgres::types::ToSql + Sync + Send>> =
            params.iter().map(Self::value_to_param).collect();
        let param_refs: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = postgres_params
            .iter()
            .map(|p| p.as_ref() as &(dyn tokio_postgres::types::ToSql + Sync))
            .collect();

        let query_future = client.query(sql, &param_refs);

        let rows = tokio::time::timeout(DEFAULT_OPERATION_TIMEOUT, query_future)
            .await
            .map_err(|_| {
                DatabaseError::query_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64)
            })?
            .map_err(|e| DatabaseError::query(e.to_string()))?;

        Ok(Self::rows_to_result_set(&rows))
    }

    async fn begin_transaction(&self) -> Result<()> {
        let mut in_transaction = self.in_transaction.lock().await;

        if *in_transaction {
            return Err(DatabaseError::transaction(
                "Already in a transaction".to_string(),
            ));
        }

        let client = self.client.lock().await;
        let client = client
            .as_ref()
            .ok_or_else(|| DatabaseError::connection("Not connected to database"))?;

        let begin_future = client.execute("BEGIN", &[]);

        tokio::time::timeout(DEFAULT_OPERATION_TIMEOUT, begin_future)
            .await
            .map_err(|_| {
                DatabaseError::query_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64)
            })?
            .map_err(|e| DatabaseError::transaction(e.to_string()))?;

        *in_transaction = true;

        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let mut in_transaction = self.in_transaction.lock().await;

        if !*in_transaction {
            return Err(DatabaseError::transaction(
                "Not in a transaction".to_string(),
            ));
        }

        let client = self.client.lock().await;
        let client = client
            .as_ref()
            .ok_or_else(|| DatabaseError::connection("Not connected to database"))?;

        let commit_future = client.execute("COMMIT", &[]);

        tokio::time::timeout(DEFAULT_OPERATION_TIMEOUT, commit_future)
            .await
            .map_err(|_| {
                DatabaseError::query_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64)
            })?
            .map_err(|e| DatabaseError::transaction(e.to_string()))?;

        *in_transaction = false;

        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let mut in_transaction = self.in_transaction.lock().await;

        if !*in_transaction {
            return Err(DatabaseError::transaction(
                "Not in a transaction".to_string(),
            ));
        }

        let client = self.client.lock().await;
        let client = client
            .as_ref()
            .ok_or_else(|| DatabaseError::connection("Not connected to database"))?;

        let rollback_future = client.execute("ROLLBACK", &[]);

        tokio::time::timeout(DEFAULT_OPERATION_TIMEOUT, rollback_future)
            .await
            .map_err(|_| {
                DatabaseError::query_timeout(DEFAULT_OPERATION_TIMEOUT.as_millis() as u64)
            })?
            .map_err(|e| DatabaseError::transaction(e.to_string()))?;

        *in_transaction = false;

        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
            .try_lock()
            .map(|guard| *guard)
            .unwrap_or(false)
    }
}
