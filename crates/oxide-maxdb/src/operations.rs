//! Schema operations.
//!
//! The inbound schema-change calls as data, so a migration runner can hand
//! the adapter a list of operations (or a JSON file of them) instead of
//! calling each method itself.

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnDefinition, ColumnOptions, ColumnType, IndexOptions, TableDefinition};
use crate::value::Value;

/// A single schema operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SchemaOperation {
    /// Create a table and its sequence.
    CreateTable {
        /// Table definition.
        table: TableDefinition,
    },

    /// Drop a table and its sequence.
    DropTable {
        /// Table name.
        name: String,
    },

    /// Rename a table, moving its sequence.
    RenameTable {
        /// Old table name.
        old_name: String,
        /// New table name.
        new_name: String,
    },

    /// Add a column to a table.
    AddColumn {
        /// Table name.
        table: String,
        /// Column definition.
        column: ColumnDefinition,
    },

    /// Change a column's type (and default).
    ChangeColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// New column type.
        column_type: ColumnType,
        /// Options (limit, default...).
        #[serde(default)]
        options: ColumnOptions,
    },

    /// Change a column's default, keeping its type.
    ChangeColumnDefault {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// New default; absent or null removes it.
        #[serde(default)]
        default: Option<Value>,
    },

    /// Change a column's nullability.
    ChangeColumnNull {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Whether NULL is allowed afterwards.
        null: bool,
    },

    /// Drop a column.
    RemoveColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Create an index.
    AddIndex {
        /// Table name.
        table: String,
        /// Indexed columns, in order.
        columns: Vec<String>,
        /// Index options.
        #[serde(default)]
        options: IndexOptions,
    },
}

impl SchemaOperation {
    /// Creates a CreateTable operation.
    #[must_use]
    pub fn create_table(table: TableDefinition) -> Self {
        Self::CreateTable { table }
    }

    /// Creates a DropTable operation.
    #[must_use]
    pub fn drop_table(name: impl Into<String>) -> Self {
        Self::DropTable { name: name.into() }
    }

    /// Creates a RenameTable operation.
    #[must_use]
    pub fn rename_table(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self::RenameTable {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    /// Creates an AddColumn operation.
    #[must_use]
    pub fn add_column(table: impl Into<String>, column: ColumnDefinition) -> Self {
        Self::AddColumn {
            table: table.into(),
            column,
        }
    }

    /// Creates a RemoveColumn operation.
    #[must_use]
    pub fn remove_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::RemoveColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates an AddIndex operation.
    #[must_use]
    pub fn add_index(table: impl Into<String>, columns: &[&str], unique: bool) -> Self {
        Self::AddIndex {
            table: table.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            options: IndexOptions { unique },
        }
    }

    /// Returns a short description for logging.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::CreateTable { table } => format!("create table {}", table.name),
            Self::DropTable { name } => format!("drop table {name}"),
            Self::RenameTable { old_name, new_name } => {
                format!("rename table {old_name} to {new_name}")
            }
            Self::AddColumn { table, column } => format!("add column {table}.{}", column.name),
            Self::ChangeColumn { table, column, .. } => format!("change column {table}.{column}"),
            Self::ChangeColumnDefault { table, column, .. } => {
                format!("change default of {table}.{column}")
            }
            Self::ChangeColumnNull { table, column, .. } => {
                format!("change nullability of {table}.{column}")
            }
            Self::RemoveColumn { table, column } => format!("remove column {table}.{column}"),
            Self::AddIndex { table, columns, .. } => {
                format!("add index on {table}({})", columns.join(", "))
            }
        }
    }
}

/// Parses a JSON array of operations.
pub fn parse_operations(json: &str) -> crate::error::Result<Vec<SchemaOperation>> {
    Ok(serde_json::from_str(json)?)
}
