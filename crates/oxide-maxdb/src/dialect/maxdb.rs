//! MaxDB dialect.
//!
//! MaxDB has no auto-increment columns: every table gets a companion
//! sequence named `<table>_seq`, created and dropped with it. ALTER TABLE
//! clauses are wrapped in parentheses, identifiers are left unquoted so the
//! engine folds them to upper case, and identifiers are capped at
//! [`MAX_IDENTIFIER_LENGTH`] characters.

use crate::schema::{
    ColumnDefinition, ColumnDescriptor, ColumnOptions, ColumnType, IndexOptions, NativeType,
    TableDefinition, TypeMap,
};
use crate::value::Value;

use super::{GenericDialect, SchemaStatements};

/// Longest identifier MaxDB accepts for index names.
pub const MAX_IDENTIFIER_LENGTH: usize = 31;

/// MaxDB SQL dialect, layered over [`GenericDialect`].
#[derive(Debug, Clone)]
pub struct MaxDbDialect {
    base: GenericDialect,
    types: TypeMap,
}

impl MaxDbDialect {
    /// Creates a new MaxDB dialect.
    #[must_use]
    pub fn new() -> Self {
        let base = GenericDialect::new();
        let mut types = base.native_types().clone();
        types.insert(
            ColumnType::PrimaryKey,
            NativeType::Raw(String::from("INTEGER NOT NULL PRIMARY KEY")),
        );
        types.insert(ColumnType::String, NativeType::limited("VARCHAR", 255));
        types.insert(ColumnType::Text, NativeType::limited("VARCHAR", 5000));
        types.insert(ColumnType::Integer, NativeType::unlimited("INTEGER"));
        types.insert(ColumnType::Boolean, NativeType::unlimited("TINYINT"));
        Self { base, types }
    }

    /// Returns the name of the sequence backing `table`.
    #[must_use]
    pub fn default_sequence_name(&self, table: &str) -> String {
        format!("{table}_seq")
    }

    /// Generates SQL creating a sequence that starts at `start`.
    #[must_use]
    pub fn create_sequence_sql(&self, sequence: &str, start: i64) -> String {
        format!("CREATE SEQUENCE {sequence} START WITH {start} INCREMENT BY 1")
    }

    /// Generates SQL dropping a sequence.
    #[must_use]
    pub fn drop_sequence_sql(&self, sequence: &str) -> String {
        format!("DROP SEQUENCE {sequence}")
    }

    /// Generates SQL reading the next value of a sequence. Reading advances it.
    #[must_use]
    pub fn next_value_sql(&self, sequence: &str) -> String {
        format!("SELECT {sequence}.NEXTVAL id FROM DUMMY")
    }
}

impl Default for MaxDbDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaStatements for MaxDbDialect {
    fn name(&self) -> &'static str {
        "maxdb"
    }

    fn native_types(&self) -> &TypeMap {
        &self.types
    }

    fn quote_identifier(&self, name: &str) -> String {
        name.to_string()
    }

    fn quote(&self, value: &Value, column: Option<&ColumnDescriptor>) -> String {
        if let Value::Quoted { quoted_id } = value {
            return quoted_id.clone();
        }
        // Primary keys travel as bare integers.
        if column.is_some_and(|c| c.primary && !c.is_textual()) && *value != Value::Null {
            return value.to_integer_literal();
        }
        match value {
            Value::Bool(true) => String::from("1"),
            Value::Bool(false) => String::from("0"),
            other => self.base.quote(other, column),
        }
    }

    fn create_table_statements(&self, table: &TableDefinition) -> Vec<String> {
        vec![
            self.create_table_sql(table),
            self.create_sequence_sql(&self.default_sequence_name(&table.name), 1),
        ]
    }

    fn drop_table_statements(&self, name: &str) -> Vec<String> {
        vec![
            self.drop_table_sql(name),
            self.drop_sequence_sql(&self.default_sequence_name(name)),
        ]
    }

    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!("RENAME TABLE {old_name} TO {new_name}")
    }

    fn add_column_sql(&self, table: &str, column: &ColumnDefinition) -> String {
        format!("ALTER TABLE {table} ADD ({})", self.column_definition(column))
    }

    fn change_column_sql(
        &self,
        table: &str,
        column: &str,
        column_type: &ColumnType,
        options: &ColumnOptions,
    ) -> String {
        format!(
            "ALTER TABLE {table} ALTER ({column} {}{})",
            self.type_to_sql(column_type, options),
            self.column_options_sql(options)
        )
    }

    fn change_column_null_sql(&self, table: &str, column: &str, null: bool) -> String {
        let clause = if null { "NULL" } else { "NOT NULL" };
        format!("ALTER TABLE {table} ALTER ({column} {clause})")
    }

    fn remove_column_sql(&self, table: &str, column: &str) -> String {
        format!("ALTER TABLE {table} DROP ({column})")
    }

    /// `idx_<table>_<columns>`, cut to the identifier limit. Cutting can make
    /// two long names collide; the engine reports that on creation.
    fn index_name(&self, table: &str, columns: &[String]) -> String {
        format!("idx_{table}_{}", columns.join("_"))
            .chars()
            .take(MAX_IDENTIFIER_LENGTH)
            .collect()
    }

    fn add_index_sql(&self, table: &str, columns: &[String], options: &IndexOptions) -> String {
        let unique = if options.unique { "UNIQUE " } else { "" };
        format!(
            "CREATE {unique}INDEX {} ON {table}({})",
            self.index_name(table, columns),
            columns.join(", ")
        )
    }
}
