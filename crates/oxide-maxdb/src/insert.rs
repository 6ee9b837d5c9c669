//! INSERT statement rendering.
//!
//! Inserts reach the adapter either as SQL text with `?` placeholders plus
//! binds, or as a structured [`InsertQuery`] that the adapter compiles itself.

use crate::dialect::SchemaStatements;
use crate::error::{AdapterError, Result};
use crate::value::Value;

/// A structured single-row INSERT.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
}

impl InsertQuery {
    /// Creates an INSERT into `table` with no columns yet.
    #[must_use]
    pub fn into_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Adds a column and its value.
    #[must_use]
    pub fn value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    /// Returns the target table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns true when `column` already has a value.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns the value given for `column`, if any.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|pos| &self.values[pos])
    }

    /// Puts `column` first with `value`, replacing an existing entry.
    pub fn set_leading(&mut self, column: &str, value: Value) {
        if let Some(pos) = self.columns.iter().position(|c| c == column) {
            self.columns.remove(pos);
            self.values.remove(pos);
        }
        self.columns.insert(0, column.to_string());
        self.values.insert(0, value);
    }

    fn head<D: SchemaStatements + ?Sized>(&self, dialect: &D) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| dialect.quote_identifier(c))
            .collect();
        format!(
            "INSERT INTO {} ({})",
            dialect.quote_identifier(&self.table),
            columns.join(", ")
        )
    }

    /// Compiles to SQL with `?` placeholders, returning the binds in order.
    #[must_use]
    pub fn to_prepared_sql<D: SchemaStatements + ?Sized>(&self, dialect: &D) -> (String, Vec<Value>) {
        let placeholders = vec!["?"; self.values.len()].join(", ");
        (
            format!("{} VALUES ({placeholders})", self.head(dialect)),
            self.values.clone(),
        )
    }

    /// Compiles to SQL with every value quoted inline.
    #[must_use]
    pub fn to_literal_sql<D: SchemaStatements + ?Sized>(&self, dialect: &D) -> String {
        let values: Vec<String> = self.values.iter().map(|v| dialect.quote(v, None)).collect();
        format!("{} VALUES ({})", self.head(dialect), values.join(", "))
    }
}

/// An INSERT as handed to the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertStatement {
    /// SQL text, possibly with `?` placeholders.
    Sql(String),
    /// A structured query to compile.
    Query(InsertQuery),
}

impl From<&str> for InsertStatement {
    fn from(sql: &str) -> Self {
        Self::Sql(sql.to_string())
    }
}

impl From<String> for InsertStatement {
    fn from(sql: String) -> Self {
        Self::Sql(sql)
    }
}

impl From<InsertQuery> for InsertStatement {
    fn from(query: InsertQuery) -> Self {
        Self::Query(query)
    }
}

/// Replaces each `?` placeholder outside string literals with the quoted
/// bind at the same position.
pub fn substitute_binds(
    sql: &str,
    binds: &[Value],
    quote: impl Fn(&Value) -> String,
) -> Result<String> {
    let mut out = String::with_capacity(sql.len());
    let mut in_literal = false;
    let mut next = binds.iter();
    let mut used = 0;
    for c in sql.chars() {
        match c {
            '\'' => {
                in_literal = !in_literal;
                out.push(c);
            }
            '?' if !in_literal => {
                used += 1;
                match next.next() {
                    Some(value) => out.push_str(&quote(value)),
                    None => continue,
                }
            }
            _ => out.push(c),
        }
    }
    if used != binds.len() {
        return Err(AdapterError::BindCount {
            expected: used,
            actual: binds.len(),
        });
    }
    Ok(out)
}
