//! Database dialect implementations.
//!
//! [`SchemaStatements`] is the base SQL-generation interface: its provided
//! methods are the generic behaviour every dialect starts from. A dialect
//! supplies its type table and overrides the statements whose syntax differs.

mod generic;
mod maxdb;

pub use generic::GenericDialect;
pub use maxdb::{MAX_IDENTIFIER_LENGTH, MaxDbDialect};

use crate::schema::{
    ColumnDefinition, ColumnDescriptor, ColumnOptions, ColumnType, IndexOptions, NativeType,
    TableDefinition, TypeMap,
};
use crate::value::Value;

/// Trait for database-specific SQL generation.
pub trait SchemaStatements: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the mapping from abstract column kinds to native types.
    fn native_types(&self) -> &TypeMap;

    /// Quote an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{name}\"")
    }

    /// Renders the SQL type for a column kind, honouring limit and precision.
    fn type_to_sql(&self, column_type: &ColumnType, options: &ColumnOptions) -> String {
        if let ColumnType::Custom(sql) = column_type {
            return sql.clone();
        }
        let Some(native) = self.native_types().get(column_type) else {
            return column_type.to_string().to_ascii_uppercase();
        };
        match native {
            NativeType::Raw(sql) => sql.clone(),
            NativeType::Named { name, limit } => {
                if let Some(precision) = options.precision {
                    return match options.scale {
                        Some(scale) => format!("{name}({precision},{scale})"),
                        None => format!("{name}({precision})"),
                    };
                }
                match options.limit.or(*limit) {
                    Some(limit) => format!("{name}({limit})"),
                    None => name.clone(),
                }
            }
        }
    }

    /// Quotes a value for inline use. `column` describes where the value is
    /// going, when known.
    fn quote(&self, value: &Value, _column: Option<&ColumnDescriptor>) -> String {
        value.to_sql_inline()
    }

    /// Renders the trailing DEFAULT / NOT NULL clauses of a column.
    ///
    /// A missing or NULL default renders nothing.
    fn column_options_sql(&self, options: &ColumnOptions) -> String {
        let mut sql = String::new();
        if let Some(default) = options.effective_default() {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.quote(default, None));
        }
        if options.null == Some(false) {
            sql.push_str(" NOT NULL");
        }
        sql
    }

    /// Generates column definition SQL.
    fn column_definition(&self, column: &ColumnDefinition) -> String {
        format!(
            "{} {}{}",
            self.quote_identifier(&column.name),
            self.type_to_sql(&column.column_type, &column.options),
            self.column_options_sql(&column.options)
        )
    }

    /// Generates SQL for creating a table.
    fn create_table_sql(&self, table: &TableDefinition) -> String {
        let mut defs = Vec::with_capacity(table.columns.len() + 1);
        if let Some(pk) = &table.primary_key {
            defs.push(format!(
                "{} {}",
                self.quote_identifier(pk),
                self.type_to_sql(&ColumnType::PrimaryKey, &ColumnOptions::default())
            ));
        }
        defs.extend(table.columns.iter().map(|c| self.column_definition(c)));

        let mut sql = format!(
            "CREATE TABLE {} ({})",
            self.quote_identifier(&table.name),
            defs.join(", ")
        );
        if let Some(options) = &table.options {
            sql.push(' ');
            sql.push_str(options);
        }
        sql
    }

    /// Generates the statements that create a table and anything tied to it.
    fn create_table_statements(&self, table: &TableDefinition) -> Vec<String> {
        vec![self.create_table_sql(table)]
    }

    /// Generates SQL for dropping a table.
    fn drop_table_sql(&self, name: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(name))
    }

    /// Generates the statements that drop a table and anything tied to it.
    fn drop_table_statements(&self, name: &str) -> Vec<String> {
        vec![self.drop_table_sql(name)]
    }

    /// Generates SQL for renaming a table.
    fn rename_table_sql(&self, old_name: &str, new_name: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.quote_identifier(old_name),
            self.quote_identifier(new_name)
        )
    }

    /// Generates SQL for adding a column.
    fn add_column_sql(&self, table: &str, column: &ColumnDefinition) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_identifier(table),
            self.column_definition(column)
        )
    }

    /// Generates SQL for changing a column's type and default.
    fn change_column_sql(
        &self,
        table: &str,
        column: &str,
        column_type: &ColumnType,
        options: &ColumnOptions,
    ) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {}{}",
            self.quote_identifier(table),
            self.quote_identifier(column),
            self.type_to_sql(column_type, options),
            self.column_options_sql(options)
        )
    }

    /// Generates SQL for changing a column's nullability.
    fn change_column_null_sql(&self, table: &str, column: &str, null: bool) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} {} NOT NULL",
            self.quote_identifier(table),
            self.quote_identifier(column),
            if null { "DROP" } else { "SET" }
        )
    }

    /// Generates SQL for dropping a column.
    fn remove_column_sql(&self, table: &str, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    /// Derives the name of an index over `columns`.
    fn index_name(&self, table: &str, columns: &[String]) -> String {
        format!("index_{table}_on_{}", columns.join("_and_"))
    }

    /// Generates SQL for creating an index.
    fn add_index_sql(&self, table: &str, columns: &[String], options: &IndexOptions) -> String {
        let mut sql = String::from("CREATE ");
        if options.unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX ");
        sql.push_str(&self.quote_identifier(&self.index_name(table, columns)));
        sql.push_str(" ON ");
        sql.push_str(&self.quote_identifier(table));
        sql.push_str(" (");
        let quoted: Vec<String> = columns.iter().map(|c| self.quote_identifier(c)).collect();
        sql.push_str(&quoted.join(", "));
        sql.push(')');
        sql
    }
}
