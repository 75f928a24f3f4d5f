//! Dialect-aware SQL generation
//!
//! Builds INSERT and UPDATE statements from any `Serialize` entity. The
//! entity is serialized to a JSON object whose keys become column names and
//! whose values become bound parameters; `None` fields serialize to JSON
//! null and are skipped, which is how identity columns stay out of the
//! generated column list.
//!
//! Generated text carries `@name` placeholders like hand-written command
//! text, so the binding layer treats both the same way.

mod insert;
mod update;

pub use insert::{generate_insert, generate_inserts};
pub use update::generate_update;

use serde::Serialize;

use crate::core::error::{DatabaseError, Result};
use crate::core::value::SqlValue;

/// SQL text plus the named parameters it references
#[derive(Debug, Clone)]
pub struct GeneratedSql {
    pub text: String,
    pub parameters: Vec<(String, SqlValue)>,
}

/// Extract column name/value pairs from an entity
///
/// Null fields are skipped. Field order follows declaration order.
pub(crate) fn entity_columns<T: Serialize>(entity: &T) -> Result<Vec<(String, SqlValue)>> {
    let json = serde_json::to_value(entity)?;
    let object = match json {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(DatabaseError::mapping(format!(
                "entity must serialize to an object, got {other:?}"
            )))
        }
    };

    let mut columns = Vec::with_capacity(object.len());
    for (name, value) in object {
        if value.is_null() {
            continue;
        }
        let converted = SqlValue::from_json(&value).map_err(|e| {
            DatabaseError::mapping(format!("column '{name}': {e}"))
        })?;
        columns.push((name, converted));
    }
    Ok(columns)
}

/// Resolve the target table name
///
/// An explicit name always wins. Otherwise the name is derived from the
/// entity's type name. Generic container types carry no usable name and
/// are an error, matching the rule that anonymous entities must state
/// their table; they are recognized by their full type path so user
/// structs with container-like names stay usable.
pub(crate) fn resolve_table<T>(explicit: Option<&str>) -> Result<String> {
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    if base.starts_with("std::collections::")
        || base.starts_with("alloc::collections::")
        || base.starts_with("serde_json::")
    {
        return Err(DatabaseError::TableNameRequired(full.to_string()));
    }
    let name = base.rsplit("::").next().unwrap_or(base);
    if name.is_empty() {
        return Err(DatabaseError::TableNameRequired(full.to_string()));
    }
    Ok(name.to_string())
}

/// Sanitize a column name into a placeholder-safe parameter name
pub(crate) fn parameter_name(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
