//! INSERT generation

use serde::Serialize;

use crate::core::dialect::SqlDialect;
use crate::core::error::{DatabaseError, Result};

use super::{entity_columns, parameter_name, resolve_table, GeneratedSql};

/// Generate an INSERT for one entity, with identity retrieval attached
///
/// PostgreSQL gets an inline `RETURNING *`; the other dialects get their
/// trailing last-insert-id SELECT, so `execute_scalar` on the generated
/// command reads back the new row id either way.
pub fn generate_insert<T: Serialize>(
    dialect: SqlDialect,
    entity: &T,
    table: Option<&str>,
) -> Result<GeneratedSql> {
    let table = resolve_table::<T>(table)?;
    let mut generated = GeneratedSql {
        text: String::new(),
        parameters: Vec::new(),
    };
    push_insert(&mut generated, dialect, &table, entity, None)?;
    if !dialect.uses_inline_returning() {
        generated.text.push('\n');
        generated.text.push_str(dialect.last_insert_id_clause());
    }
    Ok(generated)
}

/// Generate INSERTs for a batch of entities
///
/// Parameter names carry a per-row suffix so rows never collide. Dialects
/// with a trailing identity SELECT get one, after the last INSERT.
pub fn generate_inserts<T: Serialize>(
    dialect: SqlDialect,
    entities: &[T],
    table: Option<&str>,
) -> Result<GeneratedSql> {
    if entities.is_empty() {
        return Err(DatabaseError::parameter(
            "cannot generate an INSERT for an empty entity slice",
        ));
    }
    let table = resolve_table::<T>(table)?;
    let mut generated = GeneratedSql {
        text: String::new(),
        parameters: Vec::new(),
    };
    for (row, entity) in entities.iter().enumerate() {
        if row > 0 {
            generated.text.push('\n');
        }
        push_insert(&mut generated, dialect, &table, entity, Some(row))?;
    }
    if !dialect.uses_inline_returning() {
        generated.text.push('\n');
        generated.text.push_str(dialect.last_insert_id_clause());
    }
    Ok(generated)
}

fn push_insert<T: Serialize>(
    generated: &mut GeneratedSql,
    dialect: SqlDialect,
    table: &str,
    entity: &T,
    row: Option<usize>,
) -> Result<()> {
    let columns = entity_columns(entity)?;
    if columns.is_empty() {
        return Err(DatabaseError::parameter(
            "entity has no non-null columns to insert",
        ));
    }

    let mut column_list = String::new();
    let mut value_list = String::new();
    for (i, (column, value)) in columns.into_iter().enumerate() {
        if i > 0 {
            column_list.push_str(", ");
            value_list.push_str(", ");
        }
        column_list.push_str(&dialect.quote(&column));

        let mut param = parameter_name(&column);
        if let Some(row) = row {
            param.push_str(&format!("_r{row}"));
        }
        value_list.push('@');
        value_list.push_str(&param);
        generated.parameters.push((param, value));
    }

    generated.text.push_str(&format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote(table),
        column_list,
        value_list
    ));
    if dialect.uses_inline_returning() {
        generated.text.push_str(" RETURNING *");
    }
    generated.text.push(';');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::SqlValue;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Customer {
        customer_id: Option<i64>,
        first_name: String,
        age: i32,
    }

    fn clark() -> Customer {
        Customer {
            customer_id: None,
            first_name: "Clark".to_string(),
            age: 28,
        }
    }

    #[test]
    fn test_sqlite_insert_with_rowid_select() {
        let generated = generate_insert(SqlDialect::Sqlite, &clark(), None).unwrap();
        assert_eq!(
            generated.text,
            "INSERT INTO [Customer] ([first_name], [age]) VALUES (@first_name, @age);\n\
             SELECT last_insert_rowid() AS [LastInsertedId];"
        );
        assert_eq!(generated.parameters.len(), 2);
        assert_eq!(generated.parameters[1].1, SqlValue::Long(28));
    }

    #[test]
    fn test_postgres_insert_uses_returning() {
        let generated = generate_insert(SqlDialect::Postgres, &clark(), None).unwrap();
        assert_eq!(
            generated.text,
            "INSERT INTO \"Customer\" (\"first_name\", \"age\") VALUES (@first_name, @age) RETURNING *;"
        );
    }

    #[test]
    fn test_mysql_insert_quoting_and_clause() {
        let generated = generate_insert(SqlDialect::Mysql, &clark(), None).unwrap();
        assert!(generated.text.starts_with("INSERT INTO `Customer` (`first_name`, `age`)"));
        assert!(generated
            .text
            .ends_with("SELECT LAST_INSERT_ID() AS LastInsertedId;"));
    }

    #[test]
    fn test_sqlserver_insert_scope_identity() {
        let generated = generate_insert(SqlDialect::SqlServer, &clark(), None).unwrap();
        assert!(generated
            .text
            .ends_with("SELECT SCOPE_IDENTITY() AS [LastInsertedId];"));
    }

    #[test]
    fn test_identity_column_skipped() {
        let generated = generate_insert(SqlDialect::Sqlite, &clark(), None).unwrap();
        assert!(!generated.text.contains("customer_id"));
    }

    #[test]
    fn test_explicit_prequoted_table_passes_through() {
        let generated =
            generate_insert(SqlDialect::Sqlite, &clark(), Some("[Person]")).unwrap();
        assert!(generated.text.starts_with("INSERT INTO [Person] "));
    }

    #[test]
    fn test_batch_suffixes_rows_and_single_trailing_select() {
        let rows = vec![clark(), clark(), clark()];
        let generated = generate_inserts(SqlDialect::Sqlite, &rows, None).unwrap();

        assert_eq!(generated.text.matches("INSERT INTO").count(), 3);
        assert_eq!(generated.text.matches("last_insert_rowid").count(), 1);
        assert!(generated.text.contains("@first_name_r0"));
        assert!(generated.text.contains("@first_name_r2"));
        assert_eq!(generated.parameters.len(), 6);
    }

    #[test]
    fn test_batch_postgres_returns_per_statement() {
        let rows = vec![clark(), clark()];
        let generated = generate_inserts(SqlDialect::Postgres, &rows, None).unwrap();
        assert_eq!(generated.text.matches("RETURNING *").count(), 2);
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        let rows: Vec<Customer> = Vec::new();
        assert!(generate_inserts(SqlDialect::Sqlite, &rows, None).is_err());
    }
}
