//! MaxDB dialect adapter.
//!
//! `oxide-maxdb` translates an ORM's generic schema and insert calls into
//! MaxDB SQL and runs them on an injected connection, where:
//! - Every table is backed by a `<table>_seq` sequence that lives and dies with it
//! - Renames move the sequence, continuing the key counter
//! - ALTER TABLE uses MaxDB's parenthesised clauses
//! - Index names are `idx_<table>_<columns>`, cut to 31 characters
//! - Metadata queries are pinned to the user schema
//!
//! # Architecture
//!
//! - **Dialect** - Pure SQL generation ([`dialect::MaxDbDialect`] over [`dialect::GenericDialect`])
//! - **Adapter** - Runs the generated statements ([`adapter::MaxDbAdapter`])
//! - **Connection** - The driver seam ([`connection::Connection`]), with an in-memory session for tests and dry runs
//! - **Operations** - Schema changes as data, loadable from JSON
//!
//! # Example
//!
//! ```rust
//! use oxide_maxdb::prelude::*;
//!
//! let mut adapter = MaxDbAdapter::new(
//!     MemoryConnection::new("SHOP"),
//!     AdapterConfig::new().username("SHOP"),
//! );
//!
//! adapter
//!     .create_table(
//!         &TableDefinition::new("orders")
//!             .column(ColumnDefinition::new("customer_id", ColumnType::Integer).not_null()),
//!     )
//!     .unwrap();
//!
//! assert_eq!(adapter.next_sequence_value("orders_seq").unwrap(), 1);
//! assert_eq!(adapter.quote(&Value::Bool(true), None), "1");
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Print the MaxDB statements for a JSON list of operations
//! oxide-maxdb sql operations.json
//!
//! # Show the type mapping
//! oxide-maxdb types
//!
//! # Show the index name for a column list
//! oxide-maxdb index-name --table orders customer_id created_at
//! ```

pub mod adapter;
pub mod config;
pub mod connection;
pub mod dialect;
pub mod error;
pub mod insert;
pub mod operations;
pub mod rename;
pub mod schema;
pub mod value;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::adapter::MaxDbAdapter;
    pub use crate::config::AdapterConfig;
    pub use crate::connection::{
        Connection, DriverError, DriverErrorKind, ExecutedStatement, MemoryConnection, Row,
    };
    pub use crate::dialect::{GenericDialect, MAX_IDENTIFIER_LENGTH, MaxDbDialect, SchemaStatements};
    pub use crate::error::{AdapterError, Result};
    pub use crate::insert::{InsertQuery, InsertStatement};
    pub use crate::operations::{SchemaOperation, parse_operations};
    pub use crate::rename::{RenameProgress, RenameReport, RenameStep};
    pub use crate::schema::{
        ColumnDefinition, ColumnDescriptor, ColumnMetadata, ColumnOptions, ColumnType,
        IndexOptions, NativeType, TableDefinition, TypeMap,
    };
    pub use crate::value::Value;
}
