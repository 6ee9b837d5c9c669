mod common;

use std::io::Write;

use common::*;
use oxide_maxdb::prelude::*;

#[test]
fn test_create_table_then_nextval_counts_from_one() {
    let mut adapter = adapter_with_orders();
    assert_eq!(adapter.next_sequence_value("orders_seq").unwrap(), 1);
    assert_eq!(adapter.next_sequence_value("orders_seq").unwrap(), 2);
    assert_eq!(
        adapter.connection().statements(),
        vec![
            "SELECT orders_seq.NEXTVAL id FROM DUMMY",
            "SELECT orders_seq.NEXTVAL id FROM DUMMY",
        ]
    );
}

#[test]
fn test_drop_table_removes_sequence() {
    let mut adapter = adapter_with_orders();
    adapter.drop_table("orders").unwrap();

    assert_eq!(
        adapter.connection().statements(),
        vec!["DROP TABLE orders", "DROP SEQUENCE orders_seq"]
    );
    let err = adapter.next_sequence_value("orders_seq").unwrap_err();
    assert!(matches!(err, AdapterError::SequenceNotFound(name) if name == "orders_seq"));
}

#[test]
fn test_rename_continues_counter() {
    let mut adapter = adapter_with_orders();
    assert_eq!(adapter.next_sequence_value("orders_seq").unwrap(), 1);
    assert_eq!(adapter.next_sequence_value("orders_seq").unwrap(), 2);
    adapter.connection_mut().clear_log();

    let report = adapter.rename_table("orders", "purchases").unwrap();
    assert_eq!(report.sequence_start, 3);
    assert_eq!(report.completed, RenameStep::ALL.to_vec());
    assert_eq!(
        adapter.connection().statements(),
        vec![
            "RENAME TABLE orders TO purchases",
            "SELECT orders_seq.NEXTVAL id FROM DUMMY",
            "CREATE SEQUENCE purchases_seq START WITH 3 INCREMENT BY 1",
            "DROP SEQUENCE orders_seq",
        ]
    );

    assert_eq!(adapter.next_sequence_value("purchases_seq").unwrap(), 3);
    assert!(matches!(
        adapter.next_sequence_value("orders_seq"),
        Err(AdapterError::SequenceNotFound(_))
    ));
    assert!(adapter.connection().has_table("purchases"));
    assert!(!adapter.connection().has_table("orders"));
}

#[test]
fn test_rename_reports_partial_progress() {
    let conn = MemoryConnection::new(SCHEMA).fail_on("CREATE SEQUENCE purchases_seq");
    let mut adapter = adapter_with(conn);
    adapter.create_table(&orders()).unwrap();

    let err = adapter.rename_table("orders", "purchases").unwrap_err();
    match err {
        AdapterError::PartialRename {
            failed,
            progress,
            source,
        } => {
            assert_eq!(failed, RenameStep::CreateSequence);
            assert_eq!(
                progress.completed,
                vec![RenameStep::RenameTable, RenameStep::ReadSequence]
            );
            assert_eq!(progress.sequence_start, Some(1));
            assert_eq!(
                progress.remaining(),
                vec![RenameStep::CreateSequence, RenameStep::DropSequence]
            );
            assert!(matches!(*source, AdapterError::Driver(_)));
        }
        other => panic!("Expected PartialRename, got {other:?}"),
    }

    // The table moved but the old sequence is still there, already advanced.
    let conn = adapter.connection();
    assert!(conn.has_table("purchases"));
    assert!(conn.has_sequence("orders_seq"));
    assert!(!conn.has_sequence("purchases_seq"));
}

#[test]
fn test_rename_of_unknown_table_fails_first_step() {
    let mut adapter = adapter();
    let err = adapter.rename_table("ghost", "spirit").unwrap_err();
    assert!(matches!(
        err,
        AdapterError::PartialRename {
            failed: RenameStep::RenameTable,
            ..
        }
    ));
    assert_eq!(adapter.connection().statements().len(), 1);
}

#[test]
fn test_quote_booleans_as_digits() {
    let adapter = adapter();
    assert_eq!(adapter.quote(&Value::Bool(true), None), "1");
    assert_eq!(adapter.quote(&Value::Bool(false), None), "0");
}

#[test]
fn test_quote_primary_key_from_metadata() {
    let mut adapter = adapter_with_orders();
    let columns = adapter.columns("orders").unwrap();
    let id = columns.iter().find(|c| c.name == "id").unwrap();
    assert!(id.primary);
    assert_eq!(adapter.quote(&Value::from("12abc"), Some(id)), "12");

    let customer = columns.iter().find(|c| c.name == "customer_id").unwrap();
    assert_eq!(adapter.quote(&Value::from("12abc"), Some(customer)), "'12abc'");
}

#[test]
fn test_composite_index() {
    let mut adapter = adapter_with_orders();
    adapter
        .add_index(
            "orders",
            &["customer_id".to_string(), "created_at".to_string()],
            &IndexOptions::default(),
        )
        .unwrap();

    let statements = adapter.connection().statements();
    assert_eq!(
        statements,
        vec!["CREATE INDEX idx_orders_customer_id_created_ ON orders(customer_id, created_at)"]
    );
    let name = adapter
        .dialect()
        .index_name("orders", &["customer_id".to_string(), "created_at".to_string()]);
    assert!(name.chars().count() <= MAX_IDENTIFIER_LENGTH);
    assert!(adapter.connection().has_index(&name));
}

#[test]
fn test_truncated_index_names_collide_in_the_engine() {
    let mut adapter = adapter();
    adapter
        .create_table(
            &TableDefinition::new("customer_addresses")
                .column(ColumnDefinition::new("postal_code", ColumnType::String))
                .column(ColumnDefinition::new("city", ColumnType::String)),
        )
        .unwrap();

    adapter
        .add_index(
            "customer_addresses",
            &["postal_code".to_string()],
            &IndexOptions::default(),
        )
        .unwrap();
    let err = adapter
        .add_index(
            "customer_addresses",
            &["postal_code".to_string(), "city".to_string()],
            &IndexOptions::default(),
        )
        .unwrap_err();
    match err {
        AdapterError::Driver(driver) => assert_eq!(driver.kind, DriverErrorKind::DuplicateObject),
        other => panic!("Expected driver error, got {other:?}"),
    }
}

#[test]
fn test_boolean_maps_to_tinyint() {
    let adapter = adapter();
    let boolean = &adapter.native_types()[&ColumnType::Boolean];
    assert_eq!(boolean.name(), "TINYINT");
    assert_eq!(boolean.limit(), None);
    assert_eq!(
        adapter.type_to_sql(&ColumnType::Boolean, &ColumnOptions::default()),
        "TINYINT"
    );
}

#[test]
fn test_change_column_with_null_default() {
    let mut adapter = adapter_with_orders();
    adapter
        .change_column(
            "orders",
            "customer_id",
            &ColumnType::Integer,
            &ColumnOptions::new().default_value(Value::Null),
        )
        .unwrap();
    let statements = adapter.connection().statements();
    assert_eq!(statements, vec!["ALTER TABLE orders ALTER (customer_id INTEGER)"]);
    assert!(!statements[0].contains("DEFAULT"));
}

#[test]
fn test_column_changes_use_parenthesised_clauses() {
    let mut adapter = adapter_with_orders();
    adapter
        .add_column(
            "orders",
            &ColumnDefinition::new("paid", ColumnType::Boolean).default_value(false),
        )
        .unwrap();
    adapter.change_column_null("orders", "paid", false).unwrap();
    adapter.remove_column("orders", "paid").unwrap();

    assert_eq!(
        adapter.connection().statements(),
        vec![
            "ALTER TABLE orders ADD (paid TINYINT DEFAULT 0)",
            "ALTER TABLE orders ALTER (paid NOT NULL)",
            "ALTER TABLE orders DROP (paid)",
        ]
    );
    assert!(adapter
        .columns("orders")
        .unwrap()
        .iter()
        .all(|c| c.name != "paid"));
}

#[test]
fn test_columns_are_pinned_to_schema() {
    let conn = MemoryConnection::new(SCHEMA)
        .with_table("DOMAIN", "USERS", vec![column("SCHEMANAME", "CHAR(32)")])
        .with_table(SCHEMA, "USERS", vec![column("login", "VARCHAR(40)")]);
    let mut adapter = adapter_with(conn);

    let columns = adapter.columns("USERS").unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["login"]);
    assert_eq!(adapter.tables().unwrap(), vec!["USERS"]);
}

#[test]
fn test_columns_without_schema_are_unrestricted() {
    let conn = MemoryConnection::new(SCHEMA)
        .with_table("DOMAIN", "USERS", vec![column("SCHEMANAME", "CHAR(32)")])
        .with_table(SCHEMA, "USERS", vec![column("login", "VARCHAR(40)")]);
    let mut adapter = MaxDbAdapter::new(conn, AdapterConfig::new());

    assert_eq!(adapter.schema(), None);
    assert_eq!(adapter.columns("USERS").unwrap().len(), 2);
}

#[test]
fn test_serial_default_is_hidden() {
    let mut id = column("id", "INTEGER");
    id.default = Some("DEFAULT SERIAL (1)".to_string());
    id.primary = true;
    let mut status = column("status", "VARCHAR(10)");
    status.default = Some("'new'".to_string());

    let conn = MemoryConnection::new(SCHEMA).with_table(SCHEMA, "items", vec![id, status]);
    let mut adapter = adapter_with(conn);

    let columns = adapter.columns("items").unwrap();
    assert_eq!(columns[0].default, None);
    assert_eq!(columns[1].default.as_deref(), Some("'new'"));
}

#[test]
fn test_sequence_value_must_be_integer() {
    let mut adapter = MaxDbAdapter::new(
        ScriptedConnection::returning(Value::from("not-a-number")),
        AdapterConfig::new(),
    );
    let err = adapter.next_sequence_value("orders_seq").unwrap_err();
    assert!(matches!(
        err,
        AdapterError::SequenceValue { ref sequence, .. } if sequence == "orders_seq"
    ));

    let mut adapter = MaxDbAdapter::new(
        ScriptedConnection::returning(Value::from("41")),
        AdapterConfig::new(),
    );
    assert_eq!(adapter.next_sequence_value("orders_seq").unwrap(), 41);
}

#[test]
fn test_exec_insert_prepared_query() {
    let mut adapter = adapter_with_orders();
    let query = InsertQuery::into_table("orders")
        .value("id", 1)
        .value("customer_id", 7);
    assert_eq!(adapter.exec_insert(query, &[]).unwrap(), 1);

    let executed = &adapter.connection().executed()[0];
    assert_eq!(
        executed.sql,
        "INSERT INTO orders (id, customer_id) VALUES (?, ?)"
    );
    assert_eq!(executed.binds, vec![Value::Int(1), Value::Int(7)]);
}

#[test]
fn test_exec_insert_literal_query() {
    let conn = MemoryConnection::new(SCHEMA);
    let mut adapter = MaxDbAdapter::new(
        conn,
        AdapterConfig::new().username(SCHEMA).prepared_statements(false),
    );
    adapter.create_table(&orders()).unwrap();
    adapter.connection_mut().clear_log();

    let query = InsertQuery::into_table("orders")
        .value("id", 1)
        .value("created_at", "2024-01-01 10:00:00");
    adapter.exec_insert(query, &[]).unwrap();

    let executed = &adapter.connection().executed()[0];
    assert_eq!(
        executed.sql,
        "INSERT INTO orders (id, created_at) VALUES (1, '2024-01-01 10:00:00')"
    );
    assert!(executed.binds.is_empty());
}

#[test]
fn test_insert_keeps_explicit_key() {
    let mut adapter = adapter_with_orders();
    let id = adapter
        .insert(
            InsertQuery::into_table("orders")
                .value("id", 40)
                .value("customer_id", 1),
            "id",
        )
        .unwrap();
    assert_eq!(id, 40);
    // No sequence read when the key is given.
    assert_eq!(adapter.connection().statements().len(), 1);
}

#[test]
fn test_insert_with_null_key_reads_sequence() {
    let mut adapter = adapter_with_orders();
    let id = adapter
        .insert(
            InsertQuery::into_table("orders")
                .value("id", Value::Null)
                .value("customer_id", 1),
            "id",
        )
        .unwrap();
    assert_eq!(id, 1);

    let executed = adapter.connection().executed();
    assert_eq!(executed.len(), 2);
    assert_eq!(executed[0].sql, "SELECT orders_seq.NEXTVAL id FROM DUMMY");
    assert_eq!(executed[1].binds, vec![Value::Int(1), Value::Int(1)]);
}

#[test]
fn test_apply_operations_from_json() {
    let ops = parse_operations(
        r#"[
            {"op": "create_table", "table": {"name": "users", "columns": [
                {"name": "email", "column_type": "string", "options": {"limit": 120, "null": false}},
                {"name": "active", "column_type": "boolean", "options": {"default": true}}
            ]}},
            {"op": "add_index", "table": "users", "columns": ["email"], "options": {"unique": true}},
            {"op": "rename_table", "old_name": "users", "new_name": "accounts"},
            {"op": "change_column_default", "table": "accounts", "column": "email", "default": "none"}
        ]"#,
    )
    .unwrap();

    let mut adapter = adapter();
    adapter.apply_all(&ops).unwrap();

    assert_eq!(
        adapter.connection().statements(),
        vec![
            "CREATE TABLE users (id INTEGER NOT NULL PRIMARY KEY, email VARCHAR(120) NOT NULL, active TINYINT DEFAULT 1)",
            "CREATE SEQUENCE users_seq START WITH 1 INCREMENT BY 1",
            "CREATE UNIQUE INDEX idx_users_email ON users(email)",
            "RENAME TABLE users TO accounts",
            "SELECT users_seq.NEXTVAL id FROM DUMMY",
            "CREATE SEQUENCE accounts_seq START WITH 1 INCREMENT BY 1",
            "DROP SEQUENCE users_seq",
            "ALTER TABLE accounts ALTER (email VARCHAR(120) DEFAULT 'none')",
        ]
    );
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"username": "SHOP", "schema": "SALES", "prepared_statements": false}}"#
    )
    .unwrap();

    let config = AdapterConfig::from_path(file.path()).unwrap();
    let adapter = MaxDbAdapter::new(MemoryConnection::new("SALES"), config);
    assert_eq!(adapter.schema(), Some("SALES"));
    assert!(!adapter.config().prepared_statements);
}
