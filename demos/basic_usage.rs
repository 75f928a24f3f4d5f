//! Basic usage of the fluent command layer against SQLite
//!
//! Run with: cargo run --example basic_usage

use std::sync::Arc;

use serde::Deserialize;
use sqlcraft::prelude::*;

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
    name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // In-memory database, so the connection must stay open between commands
    let connection: Arc<dyn Connection> = Arc::new(SqliteConnection::in_memory());

    DatabaseCommand::new(Arc::clone(&connection))
        .set_command_text(
            "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)",
        )
        .keep_connection_open()
        .execute_non_query()
        .await?;

    let inserted = DatabaseCommand::new(Arc::clone(&connection))
        .set_command_text("INSERT INTO users (name) VALUES (@name)")
        .add_parameter("name", "Alice")
        .keep_connection_open()
        .execute_non_query()
        .await?;
    println!("inserted {inserted} row(s)");

    // Typed scalar
    let count: Option<i64> = DatabaseCommand::new(Arc::clone(&connection))
        .set_command_text("SELECT COUNT(*) FROM users")
        .keep_connection_open()
        .execute_scalar()
        .await?;
    println!("user count: {}", count.unwrap_or(0));

    // Typed rows
    let users: Vec<User> = DatabaseCommand::new(Arc::clone(&connection))
        .set_command_text("SELECT id, name FROM users WHERE id IN (@ids)")
        .add_parameter_list("ids", vec![1, 2, 3])
        .keep_connection_open()
        .execute_to_list()
        .await?;
    for user in &users {
        println!("user {}: {}", user.id, user.name);
    }

    // Event hooks observe every execution on a command
    let events = Arc::new(EventRegistry::new().on_post_execute(|event| {
        println!("executed: {}", event.text);
    }));
    DatabaseCommand::new(Arc::clone(&connection))
        .with_events(events)
        .set_command_text("SELECT name FROM users")
        .keep_connection_open()
        .execute_non_query()
        .await?;

    // Transactions through the RAII guard
    let tx = TransactionGuard::begin(Arc::clone(&connection)).await?;
    tx.command()
        .set_command_text("INSERT INTO users (name) VALUES (@name)")
        .add_parameter("name", "Bob")
        .execute_non_query()
        .await?;
    tx.commit().await?;

    connection.close().await?;
    Ok(())
}
