//! The low-level connection the adapter delegates to.
//!
//! The native driver owns the wire protocol; the adapter only needs a way to
//! run a statement, run an update with binds, and ask the catalog about
//! tables and columns.

mod memory;

use std::collections::BTreeMap;

pub use memory::{ExecutedStatement, MemoryConnection};

use crate::schema::ColumnMetadata;
use crate::value::Value;

/// A result row, keyed by lower-case column label.
pub type Row = BTreeMap<String, Value>;

/// Broad classification of driver failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverErrorKind {
    /// The statement referenced a table, column or sequence that does not exist.
    UnknownObject,
    /// The statement tried to create something that already exists.
    DuplicateObject,
    /// The server rejected the statement text.
    Syntax,
    /// Anything else (network, authorization, constraint violations...).
    Other,
}

/// A failure reported by the native driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
    /// Failure classification.
    pub kind: DriverErrorKind,
    /// Driver message.
    pub message: String,
}

impl DriverError {
    /// Creates a driver error.
    #[must_use]
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates an unknown-object error.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::UnknownObject, message)
    }

    /// Creates a duplicate-object error.
    #[must_use]
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::DuplicateObject, message)
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Syntax, message)
    }

    /// Creates an unclassified error.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Other, message)
    }

    /// Returns true when the failure is about a missing object.
    #[must_use]
    pub fn is_unknown_object(&self) -> bool {
        self.kind == DriverErrorKind::UnknownObject
    }
}

/// Statement execution and catalog access provided by the native driver.
///
/// Every call blocks until the server answers.
pub trait Connection {
    /// Runs a statement and returns its rows (empty for DDL).
    fn execute(&mut self, sql: &str) -> Result<Vec<Row>, DriverError>;

    /// Runs a data-changing statement with bound parameters, returning the
    /// number of affected rows. `binds` is empty for literal statements.
    fn execute_update(&mut self, sql: &str, binds: &[Value]) -> Result<u64, DriverError>;

    /// Lists the columns of `table`, restricted to `schema` when given.
    fn columns_internal(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnMetadata>, DriverError>;

    /// Lists table names, restricted to `catalog` and `schema` when given.
    fn tables(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> Result<Vec<String>, DriverError>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn execute(&mut self, sql: &str) -> Result<Vec<Row>, DriverError> {
        (**self).execute(sql)
    }

    fn execute_update(&mut self, sql: &str, binds: &[Value]) -> Result<u64, DriverError> {
        (**self).execute_update(sql, binds)
    }

    fn columns_internal(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnMetadata>, DriverError> {
        (**self).columns_internal(table, schema)
    }

    fn tables(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> Result<Vec<String>, DriverError> {
        (**self).tables(catalog, schema)
    }
}
