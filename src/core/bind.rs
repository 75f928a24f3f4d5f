//! Named parameter binding
//!
//! Command text uses `@name` placeholders. Before execution the text is
//! rendered into the driver's positional form: each placeholder occurrence
//! becomes a positional marker and its value is pushed onto the parameter
//! vector, so values never appear in the SQL text. List parameters expand
//! into a comma-joined placeholder group for IN clauses.
//!
//! The scanner skips single-quoted strings, `--` line comments, and
//! `/* */` block comments; `@@` passes through for server variables.

use super::dialect::SqlDialect;
use super::error::{DatabaseError, Result};
use super::value::SqlValue;

/// A named parameter accumulated on a command
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: ParameterValue,
}

/// Scalar or expandable list value of a parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// One placeholder, one value
    Single(SqlValue),
    /// Expands to one placeholder per element (IN-clause expansion)
    List(Vec<SqlValue>),
}

impl Parameter {
    /// Create a scalar parameter
    ///
    /// A leading `@` on the name is accepted and stripped.
    pub fn single(name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self {
            name: strip_prefix(name.into()),
            value: ParameterValue::Single(value.into()),
        }
    }

    /// Create a list parameter
    pub fn list<V: Into<SqlValue>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            name: strip_prefix(name.into()),
            value: ParameterValue::List(values.into_iter().map(Into::into).collect()),
        }
    }
}

fn strip_prefix(name: String) -> String {
    match name.strip_prefix('@') {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Render `@name` placeholders into the dialect's positional form
///
/// Returns the rewritten SQL and the positional values in occurrence order.
/// A parameter referenced more than once is pushed once per occurrence;
/// bound parameters that are never referenced are ignored.
pub fn render(
    text: &str,
    parameters: &[Parameter],
    dialect: SqlDialect,
) -> Result<(String, Vec<SqlValue>)> {
    let mut out = String::with_capacity(text.len());
    let mut values = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                out.push(c);
                for q in chars.by_ref() {
                    out.push(q);
                    if q == '\'' {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(c);
                for q in chars.by_ref() {
                    out.push(q);
                    if q == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push(c);
                let mut prev = '\0';
                for q in chars.by_ref() {
                    out.push(q);
                    if prev == '*' && q == '/' {
                        break;
                    }
                    prev = q;
                }
            }
            '@' => {
                if chars.peek() == Some(&'@') {
                    chars.next();
                    out.push_str("@@");
                    continue;
                }
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    out.push('@');
                    continue;
                }
                let parameter = parameters
                    .iter()
                    .find(|p| p.name == name)
                    .ok_or_else(|| DatabaseError::MissingParameter(name.clone()))?;
                match &parameter.value {
                    ParameterValue::Single(value) => {
                        out.push_str(&dialect.placeholder(values.len()));
                        values.push(value.clone());
                    }
                    ParameterValue::List(list) => {
                        if list.is_empty() {
                            return Err(DatabaseError::parameter(format!(
                                "parameter list '@{name}' is empty"
                            )));
                        }
                        for (i, value) in list.iter().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            out.push_str(&dialect.placeholder(values.len()));
                            values.push(value.clone());
                        }
                    }
                }
            }
            _ => out.push(c),
        }
    }

    Ok((out, values))
}
