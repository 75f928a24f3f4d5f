//! Connection trait
//!
//! This module defines the seam between the command layer and a concrete
//! database driver. The trait is object-safe so commands can hold an
//! `Arc<dyn Connection>` regardless of the backend.

use async_trait::async_trait;

use super::dialect::SqlDialect;
use super::error::Result;
use super::result_set::ResultSet;
use super::value::SqlValue;

/// Driver seam implemented by each database backend
///
/// A connection is constructed with its target (file path or URL) and
/// `open`/`close` drive the live handle, which lets the command layer
/// auto-open before execution and auto-close afterwards.
///
/// # Thread Safety
/// All methods take `&self`; implementations use interior mutability and are
/// safe to call from multiple tasks, serializing operations internally.
#[async_trait]
pub trait Connection: Send + Sync {
    /// The SQL dialect spoken by this backend
    fn dialect(&self) -> SqlDialect;

    /// Open the underlying driver connection
    async fn open(&self) -> Result<()>;

    /// Check whether the connection is open
    fn is_open(&self) -> bool;

    /// Close the underlying driver connection
    async fn close(&self) -> Result<()>;

    /// Execute a statement (or statement batch) that returns no rows
    ///
    /// Parameters are positional, in the dialect's placeholder form, as
    /// produced by [`crate::core::bind::render`]. Returns rows affected.
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64>;

    /// Execute and return the last result set produced
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<ResultSet>;

    /// Execute and return every result set produced
    ///
    /// Backends without batch support return the single result set.
    async fn query_multi(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<ResultSet>> {
        Ok(vec![self.query(sql, params).await?])
    }

    /// Begin a transaction
    ///
    /// Only one transaction can be active at a time per connection.
    async fn begin_transaction(&self) -> Result<()>;

    /// Commit the current transaction
    async fn commit(&self) -> Result<()>;

    /// Rollback the current transaction
    async fn rollback(&self) -> Result<()>;

    /// Check if currently in a transaction
    fn in_transaction(&self) -> bool;
}
