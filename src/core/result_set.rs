//! Result set types
//!
//! Query results keep their column order so rows can be read by ordinal as
//! well as by name, which the reader and data-set execution modes rely on.

use super::value::SqlValue;

/// An ordered set of rows returned by a single statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

/// Multiple result sets, one per result-producing statement in a batch
pub type DataSet = Vec<ResultSet>;

impl ResultSet {
    /// Create an empty result set with the given column names
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row of values
    ///
    /// The row must have one value per column.
    pub fn push_row(&mut self, row: Vec<SqlValue>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Column names in result order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the result set has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow a row by index
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Borrow the first row
    pub fn first(&self) -> Option<Row<'_>> {
        self.row(0)
    }

    /// Iterate over the rows
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// First cell of the first row, if any
    pub fn scalar(&self) -> Option<&SqlValue> {
        self.rows.first().and_then(|row| row.first())
    }
}

/// Borrowed view of one row in a [`ResultSet`]
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [SqlValue],
}

impl<'a> Row<'a> {
    /// Look up a value by column name
    ///
    /// Tries an exact match first and falls back to a case-insensitive scan,
    /// since engines disagree about the casing of returned column names.
    pub fn get(&self, name: &str) -> Option<&'a SqlValue> {
        if let Some(index) = self.columns.iter().position(|c| c == name) {
            return self.values.get(index);
        }
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|index| self.values.get(index))
    }

    /// Look up a value by ordinal
    pub fn get_index(&self, index: usize) -> Option<&'a SqlValue> {
        self.values.get(index)
    }

    /// Column names in result order
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the row has no columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert the row into a JSON object preserving column order
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (column, value) in self.columns.iter().zip(self.values.iter()) {
            map.insert(column.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}
