//! Parameterized SQL text and query results.

use rusqlite::types::Value;

/// SQL text together with its positional (`?`) parameters.
///
/// Values are always bound, never spliced into the text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlQuery {
    sql: String,
    params: Vec<Value>,
}

impl SqlQuery {
    /// Creates a query with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// `SELECT * FROM "table"`.
    pub fn select_all(table: &str) -> Self {
        Self::new(format!("SELECT * FROM {}", quote_ident(table)))
    }

    /// Adds a bound parameter for the next `?` in the text.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Appends raw SQL text.
    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Appends a `?` placeholder and its value.
    pub fn push_param(&mut self, value: impl Into<Value>) {
        self.sql.push('?');
        self.params.push(value.into());
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Quotes an identifier for SQLite, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A page of rows plus the number of rows the query matches overall.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub data: Vec<T>,
    pub total: u64,
}
