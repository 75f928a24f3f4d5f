//! Fluent database command
//!
//! [`DatabaseCommand`] wraps a connection together with accumulated SQL
//! text, named parameters, and lifecycle flags. Builder methods consume and
//! return the command so calls chain; execution methods consume the command
//! for good, render the parameters into the driver's positional form, run
//! the statement, and map the result into the requested shape.
//!
//! Each execution auto-opens a closed connection first and closes it again
//! afterwards unless the keep-open flag is set or a transaction is active.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::bind::{self, Parameter};
use super::connection::Connection;
use super::dialect::SqlDialect;
use super::error::{DatabaseError, Result};
use super::events::{CommandEvent, EventRegistry};
use super::result_set::{DataSet, ResultSet, Row};
use super::value::{FromValue, SqlValue};
use crate::sqlgen::{self, GeneratedSql};

/// Fluent wrapper binding SQL text, parameters, and lifecycle state to a
/// connection
pub struct DatabaseCommand {
    connection: Arc<dyn Connection>,
    text: String,
    parameters: Vec<Parameter>,
    keep_open: bool,
    timeout: Option<Duration>,
    events: Arc<EventRegistry>,
}

impl DatabaseCommand {
    /// Create a new command on the given connection
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            text: String::new(),
            parameters: Vec::new(),
            keep_open: false,
            timeout: None,
            events: Arc::new(EventRegistry::new()),
        }
    }

    /// Replace the command text
    #[must_use]
    pub fn set_command_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append to the command text
    #[must_use]
    pub fn append_command_text(mut self, text: impl AsRef<str>) -> Self {
        self.text.push_str(text.as_ref());
        self
    }

    /// Bind a scalar parameter
    ///
    /// The name matches `@name` placeholders in the text; a leading `@` is
    /// accepted and stripped.
    #[must_use]
    pub fn add_parameter(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.parameters.push(Parameter::single(name, value));
        self
    }

    /// Bind a list parameter that expands into an IN-clause placeholder group
    #[must_use]
    pub fn add_parameter_list<V: Into<SqlValue>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.parameters.push(Parameter::list(name, values));
        self
    }

    /// Bind several scalar parameters from name/value pairs
    ///
    /// Accepts any iterable of pairs, including maps.
    #[must_use]
    pub fn add_parameters<N, V>(mut self, parameters: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<SqlValue>,
    {
        for (name, value) in parameters {
            self.parameters.push(Parameter::single(name, value));
        }
        self
    }

    /// Keep the connection open after this command completes
    #[must_use]
    pub fn keep_connection_open(mut self) -> Self {
        self.keep_open = true;
        self
    }

    /// Fail the execution if it takes longer than `timeout`
    #[must_use]
    pub fn set_command_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach an event registry fired around this command's execution
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventRegistry>) -> Self {
        self.events = events;
        self
    }

    /// The accumulated command text
    pub fn command_text(&self) -> &str {
        &self.text
    }

    /// The parameters bound so far
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The dialect of the underlying connection
    pub fn dialect(&self) -> SqlDialect {
        self.connection.dialect()
    }

    /// The underlying connection
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    // ------------------------------------------------------------------
    // Statement generation
    // ------------------------------------------------------------------

    /// Append a generated INSERT for `entity`, with the dialect's
    /// last-insert-id retrieval attached
    ///
    /// The table name defaults to the entity's type name; map-like entities
    /// must pass it explicitly.
    pub fn generate_insert<T: Serialize>(self, entity: &T, table: Option<&str>) -> Result<Self> {
        let generated = sqlgen::generate_insert(self.dialect(), entity, table)?;
        Ok(self.apply_generated(generated))
    }

    /// Append generated INSERTs for a batch of entities
    pub fn generate_inserts<T: Serialize>(
        self,
        entities: &[T],
        table: Option<&str>,
    ) -> Result<Self> {
        let generated = sqlgen::generate_inserts(self.dialect(), entities, table)?;
        Ok(self.apply_generated(generated))
    }

    /// Append a generated UPDATE for `entity`, keyed on `key_columns`
    pub fn generate_update<T: Serialize>(
        self,
        entity: &T,
        key_columns: &[&str],
        table: Option<&str>,
    ) -> Result<Self> {
        let generated = sqlgen::generate_update(self.dialect(), entity, key_columns, table)?;
        Ok(self.apply_generated(generated))
    }

    fn apply_generated(mut self, generated: GeneratedSql) -> Self {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(&generated.text);
        for (name, value) in generated.parameters {
            self.parameters.push(Parameter::single(name, value));
        }
        self
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// Execute without reading rows; returns rows affected
    pub async fn execute_non_query(self) -> Result<u64> {
        self.run_execute().await
    }

    /// Execute and read the first cell of the first row, converted to `T`
    ///
    /// Returns `None` for an empty result set or a NULL cell; a cell that
    /// cannot convert to `T` is a `TypeMismatch` error.
    pub async fn execute_scalar<T: FromValue>(self) -> Result<Option<T>> {
        match self.execute_scalar_value().await? {
            None | Some(SqlValue::Null) => Ok(None),
            Some(value) => match T::from_value(&value) {
                Some(converted) => Ok(Some(converted)),
                None => Err(DatabaseError::type_mismatch(
                    std::any::type_name::<T>(),
                    value.type_name(),
                )),
            },
        }
    }

    /// Execute and read the first cell of the first row as a raw value
    pub async fn execute_scalar_value(self) -> Result<Option<SqlValue>> {
        let set = self.run_query().await?;
        Ok(set.scalar().cloned())
    }

    /// Execute and invoke `f` once per row of the result set
    pub async fn execute_reader(self, mut f: impl FnMut(Row<'_>)) -> Result<()> {
        let set = self.run_query().await?;
        for row in set.rows() {
            f(row);
        }
        Ok(())
    }

    /// Execute and map each row through `f`, collecting the results
    pub async fn execute_to_map<T>(self, mut f: impl FnMut(Row<'_>) -> T) -> Result<Vec<T>> {
        let set = self.run_query().await?;
        Ok(set.rows().map(&mut f).collect())
    }

    /// Execute and deserialize every row into `T`
    pub async fn execute_to_list<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let set = self.run_query().await?;
        set.rows()
            .map(|row| serde_json::from_value(row.to_json()).map_err(DatabaseError::from))
            .collect()
    }

    /// Execute and deserialize the first row into `T`, if any
    pub async fn execute_to_object<T: DeserializeOwned>(self) -> Result<Option<T>> {
        let set = self.run_query().await?;
        set.first()
            .map(|row| serde_json::from_value(row.to_json()).map_err(DatabaseError::from))
            .transpose()
    }

    /// Execute and return every row as a JSON object
    pub async fn execute_to_dynamic_list(self) -> Result<Vec<serde_json::Value>> {
        let set = self.run_query().await?;
        Ok(set.rows().map(|row| row.to_json()).collect())
    }

    /// Execute and return the first row as a JSON object, if any
    pub async fn execute_to_dynamic_object(self) -> Result<Option<serde_json::Value>> {
        let set = self.run_query().await?;
        Ok(set.first().map(|row| row.to_json()))
    }

    /// Execute and return the last result set produced
    pub async fn execute_reader_set(self) -> Result<ResultSet> {
        self.run_query().await
    }

    /// Execute a batch and return one result set per result-producing
    /// statement
    pub async fn execute_to_data_set(self) -> Result<DataSet> {
        self.run_query_multi().await
    }

    async fn run_execute(&self) -> Result<u64> {
        let result = self
            .dispatch(|sql, values| async move {
                self.with_timeout(self.connection.execute(&sql, &values)).await
            })
            .await;
        self.finish(result).await
    }

    async fn run_query_multi(&self) -> Result<DataSet> {
        let result = self
            .dispatch(|sql, values| async move {
                self.with_timeout(self.connection.query_multi(&sql, &values)).await
            })
            .await;
        self.finish(result).await
    }

    async fn run_query(&self) -> Result<ResultSet> {
        let result = self
            .dispatch(|sql, values| async move {
                self.with_timeout(self.connection.query(&sql, &values)).await
            })
            .await;
        self.finish(result).await
    }

    /// Open the connection if needed and render the final SQL
    async fn prepare(&self) -> Result<(String, Vec<SqlValue>)> {
        if !self.connection.is_open() {
            self.connection.open().await?;
        }
        bind::render(&self.text, &self.parameters, self.dialect())
    }

    /// Fire the event hooks around the whole attempt
    ///
    /// Open/render failures take the error path too, so the caller's
    /// `finish` always runs and error handlers see every failure.
    async fn dispatch<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce(String, Vec<SqlValue>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let event = CommandEvent {
            text: &self.text,
            parameters: &self.parameters,
        };
        self.events.fire_pre_execute(&event);

        let result = match self.prepare().await {
            Ok((sql, values)) => {
                debug!(dialect = %self.dialect(), sql = %sql, "executing command");
                op(sql, values).await
            }
            Err(error) => Err(error),
        };
        match &result {
            Ok(_) => self.events.fire_post_execute(&event),
            Err(error) => self.events.fire_error(error, &event),
        }
        result
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T>> + Send,
    ) -> Result<T> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .map_err(|_| DatabaseError::query_timeout(timeout.as_millis() as u64))?,
            None => fut.await,
        }
    }

    /// Close the connection unless told otherwise, then surface the result
    async fn finish<T>(&self, result: Result<T>) -> Result<T> {
        if !self.keep_open && !self.connection.in_transaction() {
            let closed = self.connection.close().await;
            if let Err(close_error) = closed {
                return match result {
                    // The execution error is the interesting one
                    Err(error) => Err(error),
                    Ok(_) => Err(close_error),
                };
            }
        }
        result
    }
}

impl std::fmt::Debug for DatabaseCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseCommand")
            .field("dialect", &self.dialect())
            .field("text", &self.text)
            .field("parameters", &self.parameters.len())
            .field("keep_open", &self.keep_open)
            .field("timeout", &self.timeout)
            .finish()
    }
}
