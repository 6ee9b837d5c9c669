//! Generic SQL dialect.

use crate::schema::{ColumnType, NativeType, TypeMap};

use super::SchemaStatements;

/// A generic SQL dialect using ANSI SQL types and syntax.
#[derive(Debug, Clone)]
pub struct GenericDialect {
    types: TypeMap,
}

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub fn new() -> Self {
        let types = TypeMap::from([
            (
                ColumnType::PrimaryKey,
                NativeType::Raw(String::from(
                    "INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY",
                )),
            ),
            (ColumnType::String, NativeType::limited("VARCHAR", 255)),
            (ColumnType::Text, NativeType::unlimited("CLOB")),
            (ColumnType::Integer, NativeType::unlimited("INTEGER")),
            (ColumnType::Float, NativeType::unlimited("FLOAT")),
            (ColumnType::Decimal, NativeType::unlimited("DECIMAL")),
            (ColumnType::DateTime, NativeType::unlimited("TIMESTAMP")),
            (ColumnType::Timestamp, NativeType::unlimited("TIMESTAMP")),
            (ColumnType::Time, NativeType::unlimited("TIME")),
            (ColumnType::Date, NativeType::unlimited("DATE")),
            (ColumnType::Binary, NativeType::unlimited("BLOB")),
            (ColumnType::Boolean, NativeType::unlimited("BOOLEAN")),
        ]);
        Self { types }
    }
}

impl Default for GenericDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaStatements for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn native_types(&self) -> &TypeMap {
        &self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, ColumnOptions, IndexOptions, TableDefinition};
    use crate::value::Value;

    fn dialect() -> GenericDialect {
        GenericDialect::new()
    }

    #[test]
    fn test_create_table() {
        let table = TableDefinition::new("users")
            .column(ColumnDefinition::new("name", ColumnType::String).not_null());
        assert_eq!(
            dialect().create_table_sql(&table),
            "CREATE TABLE \"users\" (\"id\" INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY, \
             \"name\" VARCHAR(255) NOT NULL)"
        );
    }

    #[test]
    fn test_type_to_sql() {
        let d = dialect();
        assert_eq!(
            d.type_to_sql(&ColumnType::String, &ColumnOptions::new().limit(40)),
            "VARCHAR(40)"
        );
        assert_eq!(
            d.type_to_sql(&ColumnType::Decimal, &ColumnOptions::new().precision(10, 2)),
            "DECIMAL(10,2)"
        );
        assert_eq!(
            d.type_to_sql(&ColumnType::Custom("LONG BYTE".into()), &ColumnOptions::new()),
            "LONG BYTE"
        );
    }

    #[test]
    fn test_base_quoting() {
        let d = dialect();
        assert_eq!(d.quote(&Value::Bool(true), None), "'t'");
        assert_eq!(d.quote(&Value::from("it's"), None), "'it''s'");
    }

    #[test]
    fn test_rename_and_alter() {
        let d = dialect();
        assert_eq!(
            d.rename_table_sql("users", "accounts"),
            "ALTER TABLE \"users\" RENAME TO \"accounts\""
        );
        assert_eq!(
            d.remove_column_sql("users", "email"),
            "ALTER TABLE \"users\" DROP COLUMN \"email\""
        );
        assert_eq!(
            d.change_column_null_sql("users", "email", false),
            "ALTER TABLE \"users\" ALTER COLUMN \"email\" SET NOT NULL"
        );
    }

    #[test]
    fn test_add_index() {
        let sql = dialect().add_index_sql(
            "users",
            &["email".to_string()],
            &IndexOptions::unique(),
        );
        assert_eq!(
            sql,
            "CREATE UNIQUE INDEX \"index_users_on_email\" ON \"users\" (\"email\")"
        );
    }
}
