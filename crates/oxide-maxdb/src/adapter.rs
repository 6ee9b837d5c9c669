//! The MaxDB adapter.
//!
//! [`MaxDbAdapter`] takes the framework's schema and insert calls, turns them
//! into MaxDB statements through [`MaxDbDialect`] and runs them on the
//! injected [`Connection`]. Every call blocks on the connection; nothing is
//! retried and nothing is wrapped in a transaction.

use tracing::{debug, info, warn};

use crate::config::AdapterConfig;
use crate::connection::{Connection, Row};
use crate::dialect::{MaxDbDialect, SchemaStatements};
use crate::error::{AdapterError, Result};
use crate::insert::{InsertQuery, InsertStatement, substitute_binds};
use crate::operations::SchemaOperation;
use crate::rename::{RenameProgress, RenameReport, RenameStep};
use crate::schema::{
    ColumnDefinition, ColumnDescriptor, ColumnOptions, ColumnType, IndexOptions, TableDefinition,
    TypeMap,
};
use crate::value::Value;

/// Adapts a MaxDB connection to the ORM's schema and query contract.
pub struct MaxDbAdapter<C: Connection> {
    connection: C,
    dialect: MaxDbDialect,
    config: AdapterConfig,
    schema: Option<String>,
}

impl<C: Connection> MaxDbAdapter<C> {
    /// Creates an adapter over `connection`.
    ///
    /// The metadata schema is resolved from `config` here, once.
    pub fn new(connection: C, config: AdapterConfig) -> Self {
        let schema = config.resolved_schema().map(str::to_string);
        Self {
            connection,
            dialect: MaxDbDialect::new(),
            config,
            schema,
        }
    }

    /// Returns the adapter name.
    #[must_use]
    pub fn adapter_name(&self) -> &'static str {
        self.dialect.name()
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &MaxDbDialect {
        &self.dialect
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Returns the schema metadata queries are restricted to.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Returns the connection.
    #[must_use]
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Returns the connection mutably.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Consumes the adapter, returning the connection.
    pub fn into_inner(self) -> C {
        self.connection
    }

    /// Runs one statement.
    pub fn execute(&mut self, sql: &str) -> Result<Vec<Row>> {
        debug!(sql = %sql, "Executing SQL");
        Ok(self.connection.execute(sql)?)
    }

    fn execute_all(&mut self, statements: &[String]) -> Result<()> {
        for sql in statements {
            self.execute(sql)?;
        }
        Ok(())
    }

    /// Creates a table and its `<table>_seq` sequence.
    ///
    /// If the sequence cannot be created the table stays; atomicity is up to
    /// the caller's transaction.
    pub fn create_table(&mut self, table: &TableDefinition) -> Result<()> {
        let statements = self.dialect.create_table_statements(table);
        self.execute_all(&statements)?;
        info!(
            table = %table.name,
            sequence = %self.dialect.default_sequence_name(&table.name),
            "Created table"
        );
        Ok(())
    }

    /// Drops a table and its sequence.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        let statements = self.dialect.drop_table_statements(name);
        self.execute_all(&statements)?;
        info!(table = %name, "Dropped table");
        Ok(())
    }

    /// Renames a table and moves its sequence.
    ///
    /// The old sequence is read with `NEXTVAL`, which advances it; the new
    /// sequence starts at the value read, so no key is ever handed out twice.
    /// The four steps are not atomic. On failure the error carries the
    /// [`RenameProgress`] reached.
    pub fn rename_table(&mut self, old_name: &str, new_name: &str) -> Result<RenameReport> {
        let mut progress = RenameProgress::new(old_name, new_name);
        let old_seq = self.dialect.default_sequence_name(old_name);
        let new_seq = self.dialect.default_sequence_name(new_name);

        for step in RenameStep::ALL {
            let outcome = match step {
                RenameStep::RenameTable => {
                    let sql = self.dialect.rename_table_sql(old_name, new_name);
                    self.execute(&sql).map(drop)
                }
                RenameStep::ReadSequence => self
                    .next_sequence_value(&old_seq)
                    .map(|value| progress.sequence_start = Some(value)),
                RenameStep::CreateSequence => {
                    let start = progress.sequence_start.unwrap_or(1);
                    let sql = self.dialect.create_sequence_sql(&new_seq, start);
                    self.execute(&sql).map(drop)
                }
                RenameStep::DropSequence => {
                    let sql = self.dialect.drop_sequence_sql(&old_seq);
                    self.execute(&sql).map(drop)
                }
            };

            if let Err(source) = outcome {
                warn!(
                    old = %old_name,
                    new = %new_name,
                    failed = %step,
                    completed = progress.completed.len(),
                    "Table rename stopped part-way"
                );
                return Err(AdapterError::PartialRename {
                    failed: step,
                    progress,
                    source: Box::new(source),
                });
            }
            progress.complete(step);
        }

        info!(old = %old_name, new = %new_name, "Renamed table");
        Ok(RenameReport {
            old_name: progress.old_name,
            new_name: progress.new_name,
            completed: progress.completed,
            sequence_start: progress.sequence_start.unwrap_or(1),
        })
    }

    /// Returns the name of the sequence backing `table`.
    #[must_use]
    pub fn default_sequence_name(&self, table: &str) -> String {
        self.dialect.default_sequence_name(table)
    }

    /// Reads the next value of `sequence`. The read advances the sequence.
    pub fn next_sequence_value(&mut self, sequence: &str) -> Result<i64> {
        let sql = self.dialect.next_value_sql(sequence);
        let rows = self.execute(&sql).map_err(|err| match err {
            AdapterError::Driver(driver) if driver.is_unknown_object() => {
                AdapterError::SequenceNotFound(sequence.to_string())
            }
            other => other,
        })?;

        let value = rows
            .into_iter()
            .next()
            .and_then(|mut row| row.remove("id"))
            .ok_or_else(|| AdapterError::SequenceNotFound(sequence.to_string()))?;
        value.as_integer().ok_or_else(|| AdapterError::SequenceValue {
            sequence: sequence.to_string(),
            value: value.to_string(),
        })
    }

    /// Returns the type mapping.
    #[must_use]
    pub fn native_types(&self) -> &TypeMap {
        self.dialect.native_types()
    }

    /// Renders the SQL type of a column kind.
    #[must_use]
    pub fn type_to_sql(&self, column_type: &ColumnType, options: &ColumnOptions) -> String {
        self.dialect.type_to_sql(column_type, options)
    }

    /// Adds a column.
    pub fn add_column(&mut self, table: &str, column: &ColumnDefinition) -> Result<()> {
        let sql = self.dialect.add_column_sql(table, column);
        self.execute(&sql).map(drop)
    }

    /// Changes a column's type. A default in `options` is applied too; a
    /// missing or NULL default leaves no DEFAULT clause.
    pub fn change_column(
        &mut self,
        table: &str,
        column: &str,
        column_type: &ColumnType,
        options: &ColumnOptions,
    ) -> Result<()> {
        let sql = self
            .dialect
            .change_column_sql(table, column, column_type, options);
        self.execute(&sql).map(drop)
    }

    /// Changes a column's default, keeping its current SQL type.
    pub fn change_column_default(
        &mut self,
        table: &str,
        column: &str,
        default: Option<Value>,
    ) -> Result<()> {
        let existing = self.column_for(table, column)?;
        let options = ColumnOptions {
            default,
            ..ColumnOptions::default()
        };
        self.change_column(
            table,
            column,
            &ColumnType::Custom(existing.sql_type),
            &options,
        )
    }

    /// Changes a column's nullability.
    pub fn change_column_null(&mut self, table: &str, column: &str, null: bool) -> Result<()> {
        let sql = self.dialect.change_column_null_sql(table, column, null);
        self.execute(&sql).map(drop)
    }

    /// Drops a column.
    pub fn remove_column(&mut self, table: &str, column: &str) -> Result<()> {
        let sql = self.dialect.remove_column_sql(table, column);
        self.execute(&sql).map(drop)
    }

    /// Quotes a value for `column` (if known).
    #[must_use]
    pub fn quote(&self, value: &Value, column: Option<&ColumnDescriptor>) -> String {
        self.dialect.quote(value, column)
    }

    /// Creates an index named `idx_<table>_<columns>` (cut to 31 characters).
    pub fn add_index(
        &mut self,
        table: &str,
        columns: &[String],
        options: &IndexOptions,
    ) -> Result<()> {
        let sql = self.dialect.add_index_sql(table, columns, options);
        self.execute(&sql).map(drop)
    }

    /// Lists the tables in the adapter's schema.
    pub fn tables(&mut self) -> Result<Vec<String>> {
        Ok(self.connection.tables(None, self.schema.as_deref())?)
    }

    /// Lists the columns of `table` in the adapter's schema.
    ///
    /// Pinning the schema keeps same-named system tables (such as
    /// `DOMAIN.USERS`) out of the result.
    pub fn columns(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let metadata = self
            .connection
            .columns_internal(table, self.schema.as_deref())?;
        Ok(metadata.into_iter().map(ColumnDescriptor::from).collect())
    }

    fn column_for(&mut self, table: &str, column: &str) -> Result<ColumnDescriptor> {
        self.columns(table)?
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(column))
            .ok_or_else(|| AdapterError::ColumnNotFound {
                table: table.to_string(),
                column: column.to_string(),
            })
    }

    /// Whether keys must be fetched before INSERT. Always true: MaxDB does
    /// not return generated keys from INSERT.
    #[must_use]
    pub fn prefetch_primary_key(&self, _table: Option<&str>) -> bool {
        true
    }

    /// Executes an INSERT, returning the affected row count.
    ///
    /// Structured queries are compiled first and carry their own binds, so
    /// `binds` must be empty for them. With prepared statements disabled,
    /// raw SQL gets its binds substituted inline.
    pub fn exec_insert(
        &mut self,
        statement: impl Into<InsertStatement>,
        binds: &[Value],
    ) -> Result<u64> {
        let prepared = self.config.prepared_statements;
        let (sql, binds) = match statement.into() {
            InsertStatement::Query(_) if !binds.is_empty() => {
                return Err(AdapterError::BindCount {
                    expected: 0,
                    actual: binds.len(),
                });
            }
            InsertStatement::Query(query) if prepared => query.to_prepared_sql(&self.dialect),
            InsertStatement::Query(query) => (query.to_literal_sql(&self.dialect), Vec::new()),
            InsertStatement::Sql(sql) if prepared => (sql, binds.to_vec()),
            InsertStatement::Sql(sql) => {
                let dialect = &self.dialect;
                (substitute_binds(&sql, binds, |v| dialect.quote(v, None))?, Vec::new())
            }
        };

        debug!(sql = %sql, binds = binds.len(), "Executing insert");
        Ok(self.connection.execute_update(&sql, &binds)?)
    }

    /// Inserts a row, prefetching its key from the table's sequence.
    ///
    /// A non-NULL key already present in the query is kept and no sequence
    /// is read. Returns the key.
    pub fn insert(&mut self, mut query: InsertQuery, primary_key: &str) -> Result<i64> {
        let id = match query.get(primary_key) {
            Some(value) if *value != Value::Null => value.to_integer_lossy(),
            _ => {
                let sequence = self.default_sequence_name(query.table());
                let id = self.next_sequence_value(&sequence)?;
                query.set_leading(primary_key, Value::Int(id));
                id
            }
        };
        self.exec_insert(query, &[])?;
        Ok(id)
    }

    /// Applies a schema operation.
    pub fn apply(&mut self, operation: &SchemaOperation) -> Result<()> {
        debug!(operation = %operation.describe(), "Applying schema operation");
        match operation {
            SchemaOperation::CreateTable { table } => self.create_table(table),
            SchemaOperation::DropTable { name } => self.drop_table(name),
            SchemaOperation::RenameTable { old_name, new_name } => {
                self.rename_table(old_name, new_name).map(drop)
            }
            SchemaOperation::AddColumn { table, column } => self.add_column(table, column),
            SchemaOperation::ChangeColumn {
                table,
                column,
                column_type,
                options,
            } => self.change_column(table, column, column_type, options),
            SchemaOperation::ChangeColumnDefault {
                table,
                column,
                default,
            } => self.change_column_default(table, column, default.clone()),
            SchemaOperation::ChangeColumnNull {
                table,
                column,
                null,
            } => self.change_column_null(table, column, *null),
            SchemaOperation::RemoveColumn { table, column } => self.remove_column(table, column),
            SchemaOperation::AddIndex {
                table,
                columns,
                options,
            } => self.add_index(table, columns, options),
        }
    }

    /// Applies operations in order, stopping at the first failure.
    pub fn apply_all(&mut self, operations: &[SchemaOperation]) -> Result<()> {
        for operation in operations {
            self.apply(operation)?;
        }
        Ok(())
    }
}
