//! Transaction guard
//!
//! [`TransactionGuard`] scopes a transaction on a connection. Commands
//! created through the guard keep the connection open, so several commands
//! can run inside the same transaction. Dropping a guard that was never
//! committed rolls the transaction back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, warn};

use super::command::DatabaseCommand;
use super::connection::Connection;
use super::error::Result;

/// RAII guard over a connection-level transaction
pub struct TransactionGuard {
    connection: Arc<dyn Connection>,
    committed: AtomicBool,
    rolled_back: AtomicBool,
}

impl TransactionGuard {
    /// Begin a transaction on the connection, opening it first if needed
    pub async fn begin(connection: Arc<dyn Connection>) -> Result<Self> {
        if !connection.is_open() {
            connection.open().await?;
        }
        connection.begin_transaction().await?;
        Ok(Self {
            connection,
            committed: AtomicBool::new(false),
            rolled_back: AtomicBool::new(false),
        })
    }

    /// Create a command enlisted in this transaction
    ///
    /// The command keeps the connection open so the transaction survives
    /// across executions.
    pub fn command(&self) -> DatabaseCommand {
        DatabaseCommand::new(Arc::clone(&self.connection)).keep_connection_open()
    }

    /// Commit the transaction
    pub async fn commit(self) -> Result<()> {
        self.connection.commit().await?;
        self.committed.store(true, Ordering::Release);
        Ok(())
    }

    /// Roll the transaction back explicitly
    pub async fn rollback(self) -> Result<()> {
        self.connection.rollback().await?;
        self.rolled_back.store(true, Ordering::Release);
        Ok(())
    }

    /// Whether `commit` completed
    pub fn is_committed(&self) -> bool {
        self.committed.load(Ordering::Acquire)
    }

    /// Whether `rollback` completed
    pub fn is_rolled_back(&self) -> bool {
        self.rolled_back.load(Ordering::Acquire)
    }

    /// The connection this guard drives
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }
}

impl Drop for TransactionGuard {
    fn drop(&mut self) {
        if self.committed.load(Ordering::Acquire) || self.rolled_back.load(Ordering::Acquire) {
            return;
        }
        self.rolled_back.store(true, Ordering::Release);
        let connection = Arc::clone(&self.connection);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("transaction guard dropped without commit, rolling back");
                handle.spawn(async move {
                    if let Err(e) = connection.rollback().await {
                        error!("rollback on drop failed: {}", e);
                    }
                });
            }
            Err(_) => {
                warn!("transaction guard dropped outside a runtime; rollback deferred to connection close");
            }
        }
    }
}

impl std::fmt::Debug for TransactionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionGuard")
            .field("committed", &self.is_committed())
            .field("rolled_back", &self.is_rolled_back())
            .finish()
    }
}
