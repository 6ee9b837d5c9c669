#![allow(dead_code)]

use oxide_maxdb::prelude::*;

pub const SCHEMA: &str = "SHOP";

pub fn adapter() -> MaxDbAdapter<MemoryConnection> {
    adapter_with(MemoryConnection::new(SCHEMA))
}

pub fn adapter_with(conn: MemoryConnection) -> MaxDbAdapter<MemoryConnection> {
    MaxDbAdapter::new(conn, AdapterConfig::new().username(SCHEMA))
}

pub fn orders() -> TableDefinition {
    TableDefinition::new("orders")
        .column(ColumnDefinition::new("customer_id", ColumnType::Integer).not_null())
        .column(ColumnDefinition::new("created_at", ColumnType::DateTime))
}

pub fn adapter_with_orders() -> MaxDbAdapter<MemoryConnection> {
    let mut adapter = adapter();
    adapter
        .create_table(&orders())
        .unwrap_or_else(|e| panic!("Failed to create orders: {e}"));
    adapter.connection_mut().clear_log();
    adapter
}

pub fn column(name: &str, sql_type: &str) -> ColumnMetadata {
    ColumnMetadata {
        name: name.to_string(),
        sql_type: sql_type.to_string(),
        nullable: true,
        default: None,
        primary: false,
    }
}

/// A connection that answers every query with one fixed row.
pub struct ScriptedConnection {
    pub row: Row,
    pub statements: Vec<String>,
}

impl ScriptedConnection {
    pub fn returning(id: Value) -> Self {
        Self {
            row: Row::from([("id".to_string(), id)]),
            statements: Vec::new(),
        }
    }
}

impl Connection for ScriptedConnection {
    fn execute(&mut self, sql: &str) -> std::result::Result<Vec<Row>, DriverError> {
        self.statements.push(sql.to_string());
        Ok(vec![self.row.clone()])
    }

    fn execute_update(
        &mut self,
        sql: &str,
        _binds: &[Value],
    ) -> std::result::Result<u64, DriverError> {
        self.statements.push(sql.to_string());
        Ok(1)
    }

    fn columns_internal(
        &mut self,
        _table: &str,
        _schema: Option<&str>,
    ) -> std::result::Result<Vec<ColumnMetadata>, DriverError> {
        Ok(Vec::new())
    }

    fn tables(
        &mut self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
    ) -> std::result::Result<Vec<String>, DriverError> {
        Ok(Vec::new())
    }
}
