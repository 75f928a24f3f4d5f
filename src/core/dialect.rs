//! SQL dialect definitions
//!
//! This module captures the per-engine differences the command layer cares
//! about: identifier quoting, positional placeholder syntax, and the idiom
//! used to read back the last inserted identity value.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SqlDialect {
    /// Microsoft SQL Server
    SqlServer,
    /// MySQL/MariaDB
    Mysql,
    /// PostgreSQL
    Postgres,
    /// SQLite
    #[default]
    Sqlite,
}

impl SqlDialect {
    /// Convert dialect to string representation
    pub fn to_str(&self) -> &'static str {
        match self {
            SqlDialect::SqlServer => "sqlserver",
            SqlDialect::Mysql => "mysql",
            SqlDialect::Postgres => "postgres",
            SqlDialect::Sqlite => "sqlite",
        }
    }

    /// Quote an identifier for this dialect
    ///
    /// Identifiers already wrapped in the dialect's quote characters are
    /// passed through untouched, so callers may supply pre-quoted names
    /// such as `[Person]` or `"public"."Customer"`.
    pub fn quote(&self, identifier: &str) -> String {
        let (open, close) = self.quote_chars();
        if identifier.starts_with(open) && identifier.ends_with(close) {
            return identifier.to_string();
        }
        let escaped = identifier.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    fn quote_chars(&self) -> (char, char) {
        match self {
            SqlDialect::SqlServer | SqlDialect::Sqlite => ('[', ']'),
            SqlDialect::Mysql => ('`', '`'),
            SqlDialect::Postgres => ('"', '"'),
        }
    }

    /// Positional placeholder text for the given zero-based ordinal
    pub fn placeholder(&self, ordinal: usize) -> String {
        match self {
            SqlDialect::Sqlite | SqlDialect::Mysql => "?".to_string(),
            SqlDialect::Postgres => format!("${}", ordinal + 1),
            SqlDialect::SqlServer => format!("@p{}", ordinal + 1),
        }
    }

    /// SQL fragment that reads back the last inserted identity value
    ///
    /// For every dialect except PostgreSQL this is a trailing statement
    /// appended after the INSERT; PostgreSQL instead uses an inline
    /// `RETURNING` clause (see [`SqlDialect::uses_inline_returning`]).
    pub fn last_insert_id_clause(&self) -> &'static str {
        match self {
            SqlDialect::SqlServer => "SELECT SCOPE_IDENTITY() AS [LastInsertedId];",
            SqlDialect::Mysql => "SELECT LAST_INSERT_ID() AS LastInsertedId;",
            SqlDialect::Postgres => "RETURNING *",
            SqlDialect::Sqlite => "SELECT last_insert_rowid() AS [LastInsertedId];",
        }
    }

    /// Whether identity retrieval rides on the INSERT itself
    pub fn uses_inline_returning(&self) -> bool {
        matches!(self, SqlDialect::Postgres)
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(SqlDialect::SqlServer),
            "mysql" | "mariadb" => Ok(SqlDialect::Mysql),
            "postgres" | "postgresql" => Ok(SqlDialect::Postgres),
            "sqlite" | "sqlite3" => Ok(SqlDialect::Sqlite),
            _ => Err(format!("Invalid SQL dialect: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_per_dialect() {
        assert_eq!(SqlDialect::SqlServer.quote("Customer"), "[Customer]");
        assert_eq!(SqlDialect::Sqlite.quote("Customer"), "[Customer]");
        assert_eq!(SqlDialect::Mysql.quote("Customer"), "`Customer`");
        assert_eq!(SqlDialect::Postgres.quote("Customer"), "\"Customer\"");
    }

    #[test]
    fn test_quote_passthrough() {
        assert_eq!(SqlDialect::Sqlite.quote("[Person]"), "[Person]");
        assert_eq!(SqlDialect::Mysql.quote("`Person`"), "`Person`");
        assert_eq!(
            SqlDialect::Postgres.quote("\"public\".\"Customer\""),
            "\"public\".\"Customer\""
        );
    }

    #[test]
    fn test_quote_escapes_close_char() {
        assert_eq!(SqlDialect::Sqlite.quote("we]ird"), "[we]]ird]");
        assert_eq!(SqlDialect::Mysql.quote("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(SqlDialect::Sqlite.placeholder(0), "?");
        assert_eq!(SqlDialect::Mysql.placeholder(3), "?");
        assert_eq!(SqlDialect::Postgres.placeholder(0), "$1");
        assert_eq!(SqlDialect::Postgres.placeholder(2), "$3");
        assert_eq!(SqlDialect::SqlServer.placeholder(0), "@p1");
    }

    #[test]
    fn test_last_insert_id_clauses() {
        assert_eq!(
            SqlDialect::SqlServer.last_insert_id_clause(),
            "SELECT SCOPE_IDENTITY() AS [LastInsertedId];"
        );
        assert_eq!(
            SqlDialect::Mysql.last_insert_id_clause(),
            "SELECT LAST_INSERT_ID() AS LastInsertedId;"
        );
        assert_eq!(
            SqlDialect::Sqlite.last_insert_id_clause(),
            "SELECT last_insert_rowid() AS [LastInsertedId];"
        );
        assert!(SqlDialect::Postgres.uses_inline_returning());
        assert!(!SqlDialect::Sqlite.uses_inline_returning());
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("postgresql".parse::<SqlDialect>(), Ok(SqlDialect::Postgres));
        assert_eq!("mssql".parse::<SqlDialect>(), Ok(SqlDialect::SqlServer));
        assert_eq!("sqlite3".parse::<SqlDialect>(), Ok(SqlDialect::Sqlite));
        assert!("oracle".parse::<SqlDialect>().is_err());
    }
}
