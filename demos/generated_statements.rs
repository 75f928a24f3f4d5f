//! Generated INSERT/UPDATE statements from Serialize entities
//!
//! Run with: cargo run --example generated_statements

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlcraft::prelude::*;
use sqlcraft::sqlgen;

#[derive(Debug, Serialize, Deserialize)]
struct Customer {
    customer_id: Option<i64>,
    first_name: String,
    last_name: String,
    age: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let connection: Arc<dyn Connection> = Arc::new(SqliteConnection::in_memory());

    DatabaseCommand::new(Arc::clone(&connection))
        .set_command_text(
            "CREATE TABLE Customer (\
                customer_id INTEGER PRIMARY KEY AUTOINCREMENT,\
                first_name TEXT NOT NULL,\
                last_name TEXT NOT NULL,\
                age INTEGER NOT NULL)",
        )
        .keep_connection_open()
        .execute_non_query()
        .await?;

    // The None id serializes to null and stays out of the column list,
    // so the engine assigns it and the trailing SELECT reads it back.
    let customer = Customer {
        customer_id: None,
        first_name: "Clark".to_string(),
        last_name: "Kent".to_string(),
        age: 28,
    };
    let id: Option<i64> = DatabaseCommand::new(Arc::clone(&connection))
        .generate_insert(&customer, None)?
        .keep_connection_open()
        .execute_scalar()
        .await?;
    println!("new customer id: {:?}", id);

    // Batch insert
    let batch = vec![
        Customer {
            customer_id: None,
            first_name: "Bruce".to_string(),
            last_name: "Wayne".to_string(),
            age: 32,
        },
        Customer {
            customer_id: None,
            first_name: "Diana".to_string(),
            last_name: "Prince".to_string(),
            age: 500,
        },
    ];
    let last_id: Option<i64> = DatabaseCommand::new(Arc::clone(&connection))
        .generate_inserts(&batch, None)?
        .keep_connection_open()
        .execute_scalar()
        .await?;
    println!("last inserted id: {:?}", last_id);

    // Update keyed on the primary key column
    let updated = Customer {
        customer_id: id,
        first_name: "Clark".to_string(),
        last_name: "Kent".to_string(),
        age: 29,
    };
    DatabaseCommand::new(Arc::clone(&connection))
        .generate_update(&updated, &["customer_id"], None)?
        .keep_connection_open()
        .execute_non_query()
        .await?;

    let customers: Vec<Customer> = DatabaseCommand::new(Arc::clone(&connection))
        .set_command_text("SELECT * FROM Customer ORDER BY customer_id")
        .keep_connection_open()
        .execute_to_list()
        .await?;
    for customer in &customers {
        println!("{:?}", customer);
    }

    // The same generators target other engines without executing
    let pg = sqlgen::generate_insert(SqlDialect::Postgres, &customer, None)?;
    println!("postgres: {}", pg.text);
    let mssql = sqlgen::generate_insert(SqlDialect::SqlServer, &customer, None)?;
    println!("sqlserver: {}", mssql.text);

    connection.close().await?;
    Ok(())
}
