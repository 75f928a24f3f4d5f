//! UPDATE generation

use serde::Serialize;

use crate::core::dialect::SqlDialect;
use crate::core::error::{DatabaseError, Result};

use super::{entity_columns, parameter_name, resolve_table, GeneratedSql};

/// Generate an UPDATE for one entity, keyed on `key_columns`
///
/// Key columns feed the WHERE clause and stay out of the SET list; their
/// values come from the entity itself. Column matching is case-insensitive.
pub fn generate_update<T: Serialize>(
    dialect: SqlDialect,
    entity: &T,
    key_columns: &[&str],
    table: Option<&str>,
) -> Result<GeneratedSql> {
    if key_columns.is_empty() {
        return Err(DatabaseError::parameter(
            "generate_update requires at least one key column",
        ));
    }
    let table = resolve_table::<T>(table)?;
    let columns = entity_columns(entity)?;

    let is_key =
        |column: &str| key_columns.iter().any(|k| k.eq_ignore_ascii_case(column));

    let mut generated = GeneratedSql {
        text: String::new(),
        parameters: Vec::new(),
    };

    let mut set_list = String::new();
    for (column, value) in columns.iter().filter(|(c, _)| !is_key(c)) {
        if !set_list.is_empty() {
            set_list.push_str(", ");
        }
        let param = parameter_name(column);
        set_list.push_str(&format!("{} = @{}", dialect.quote(column), param));
        generated.parameters.push((param, value.clone()));
    }
    if set_list.is_empty() {
        return Err(DatabaseError::parameter(
            "entity has no non-key columns to update",
        ));
    }

    let mut where_list = String::new();
    for key in key_columns {
        let (column, value) = columns
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(key))
            .ok_or_else(|| DatabaseError::KeyColumnNotFound((*key).to_string()))?;
        if !where_list.is_empty() {
            where_list.push_str(" AND ");
        }
        let param = format!("{}_key", parameter_name(column));
        where_list.push_str(&format!("{} = @{}", dialect.quote(column), param));
        generated.parameters.push((param, value.clone()));
    }

    generated.text = format!(
        "UPDATE {} SET {} WHERE {};",
        dialect.quote(&table),
        set_list,
        where_list
    );
    Ok(generated)
}
