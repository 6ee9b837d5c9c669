//! Schema representation types.
//!
//! These types describe tables and columns on their way into the adapter
//! (definitions and options) and on their way out of the driver's metadata
//! queries (descriptors).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Marker MaxDB reports as the default of a sequence-fed key column.
pub const GENERATED_DEFAULT_MARKER: &str = "DEFAULT SERIAL";

/// Abstract column kinds understood by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Surrogate primary key.
    PrimaryKey,
    /// Short string.
    String,
    /// Long text.
    Text,
    /// Integer.
    Integer,
    /// Floating point.
    Float,
    /// Exact numeric.
    Decimal,
    /// Date and time.
    #[serde(rename = "datetime")]
    DateTime,
    /// Timestamp.
    Timestamp,
    /// Time only.
    Time,
    /// Date only.
    Date,
    /// Binary data.
    Binary,
    /// Boolean.
    Boolean,
    /// A literal SQL type, emitted as-is.
    Custom(String),
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PrimaryKey => "primary_key",
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Time => "time",
            Self::Date => "date",
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::Custom(sql) => sql,
        };
        f.write_str(name)
    }
}

/// How an abstract column kind is spelled in a dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NativeType {
    /// A complete column definition fragment, used verbatim.
    Raw(String),
    /// A type name with an optional default limit.
    Named {
        /// SQL type name.
        name: String,
        /// Default length limit, if any.
        limit: Option<u32>,
    },
}

impl NativeType {
    /// Creates a named type with a default limit.
    #[must_use]
    pub fn limited(name: impl Into<String>, limit: u32) -> Self {
        Self::Named {
            name: name.into(),
            limit: Some(limit),
        }
    }

    /// Creates a named type without a limit.
    #[must_use]
    pub fn unlimited(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            limit: None,
        }
    }

    /// Returns the type name (the whole fragment for raw types).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Raw(sql) => sql,
            Self::Named { name, .. } => name,
        }
    }

    /// Returns the default limit.
    #[must_use]
    pub fn limit(&self) -> Option<u32> {
        match self {
            Self::Raw(_) => None,
            Self::Named { limit, .. } => *limit,
        }
    }
}

/// Mapping from abstract column kinds to dialect types.
pub type TypeMap = BTreeMap<ColumnType, NativeType>;

/// Options attached to a column definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    /// Length limit, overriding the type's default.
    pub limit: Option<u32>,
    /// Numeric precision.
    pub precision: Option<u32>,
    /// Numeric scale.
    pub scale: Option<u32>,
    /// Default value. `None` and `Some(Value::Null)` both mean "no default".
    pub default: Option<Value>,
    /// Nullability; `Some(false)` adds NOT NULL.
    pub null: Option<bool>,
}

impl ColumnOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the length limit.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets precision and scale.
    #[must_use]
    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.null = Some(false);
        self
    }

    /// Returns the default that should be rendered, if any.
    #[must_use]
    pub fn effective_default(&self) -> Option<&Value> {
        self.default.as_ref().filter(|v| !matches!(v, Value::Null))
    }
}

/// A column to be created or added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Abstract column type.
    pub column_type: ColumnType,
    /// Column options.
    #[serde(default)]
    pub options: ColumnOptions,
}

impl ColumnDefinition {
    /// Creates a new column definition.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            options: ColumnOptions::default(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn options(mut self, options: ColumnOptions) -> Self {
        self.options = options;
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.options.null = Some(false);
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.options.default = Some(value.into());
        self
    }

    /// Sets the length limit.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.options.limit = Some(limit);
        self
    }
}

fn default_primary_key() -> Option<String> {
    Some(String::from("id"))
}

/// A table to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name.
    pub name: String,
    /// Name of the implicit primary key column, or `None` for no key.
    #[serde(default = "default_primary_key")]
    pub primary_key: Option<String>,
    /// Column definitions, in order.
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    /// Trailing table options appended after the column list.
    #[serde(default)]
    pub options: Option<String>,
}

impl TableDefinition {
    /// Creates a table definition with an `id` primary key.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: default_primary_key(),
            columns: Vec::new(),
            options: None,
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Renames the implicit primary key column.
    #[must_use]
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = Some(name.into());
        self
    }

    /// Creates the table without an implicit primary key.
    #[must_use]
    pub fn without_primary_key(mut self) -> Self {
        self.primary_key = None;
        self
    }

    /// Sets trailing table options.
    #[must_use]
    pub fn table_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }
}

/// Options for a new index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

impl IndexOptions {
    /// Options for a unique index.
    #[must_use]
    pub fn unique() -> Self {
        Self { unique: true }
    }
}

/// Column metadata as the driver reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Declared SQL type, e.g. `VARCHAR(255)`.
    pub sql_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Raw default as reported by the catalog.
    pub default: Option<String>,
    /// Whether the column is part of the primary key.
    pub primary: bool,
}

/// A column of an existing table, as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Declared SQL type.
    pub sql_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Default value; never the generated-default marker.
    pub default: Option<String>,
    /// Whether the column is part of the primary key.
    pub primary: bool,
}

impl ColumnDescriptor {
    /// Creates a descriptor for a plain nullable column.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: true,
            default: None,
            primary: false,
        }
    }

    /// Marks the column as primary key.
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.nullable = false;
        self
    }

    /// Returns true when values of this column are strings.
    #[must_use]
    pub fn is_textual(&self) -> bool {
        let upper = self.sql_type.to_ascii_uppercase();
        if upper.starts_with("LONG") {
            return !upper.contains("BYTE");
        }
        ["CHAR", "VARCHAR", "TEXT", "CLOB"]
            .iter()
            .any(|t| upper.starts_with(t))
    }
}

impl From<ColumnMetadata> for ColumnDescriptor {
    fn from(meta: ColumnMetadata) -> Self {
        let default = meta
            .default
            .filter(|raw| !raw.contains(GENERATED_DEFAULT_MARKER));
        Self {
            name: meta.name,
            sql_type: meta.sql_type,
            nullable: meta.nullable,
            default,
            primary: meta.primary,
        }
    }
}
