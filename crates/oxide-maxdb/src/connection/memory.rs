//! In-memory stand-in for a MaxDB session.
//!
//! Understands the statements this crate emits: tables, columns, indexes and
//! sequences are tracked, `NEXTVAL` reads advance their sequence, and every
//! statement is recorded. Other statements are recorded and answered with an
//! empty result.

use std::collections::BTreeMap;

use tracing::trace;

use super::{Connection, DriverError, Row};
use crate::schema::{ColumnMetadata, GENERATED_DEFAULT_MARKER};
use crate::value::Value;

/// A statement the connection received.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    /// SQL text.
    pub sql: String,
    /// Bound parameters (empty for literal statements).
    pub binds: Vec<Value>,
}

#[derive(Debug, Clone)]
struct MemoryTable {
    schema: String,
    name: String,
    columns: Vec<ColumnMetadata>,
    rows: u64,
}

/// A MaxDB session kept entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryConnection {
    schema: String,
    tables: Vec<MemoryTable>,
    sequences: BTreeMap<String, i64>,
    indexes: BTreeMap<String, String>,
    executed: Vec<ExecutedStatement>,
    failures: Vec<String>,
}

impl MemoryConnection {
    /// Creates an empty session whose objects live in `schema`.
    #[must_use]
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            tables: Vec::new(),
            sequences: BTreeMap::new(),
            indexes: BTreeMap::new(),
            executed: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Adds a pre-existing table, possibly in another schema.
    #[must_use]
    pub fn with_table(
        mut self,
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<ColumnMetadata>,
    ) -> Self {
        self.tables.push(MemoryTable {
            schema: schema.into(),
            name: name.into(),
            columns,
            rows: 0,
        });
        self
    }

    /// Makes every statement starting with `prefix` fail.
    #[must_use]
    pub fn fail_on(mut self, prefix: impl Into<String>) -> Self {
        self.failures.push(prefix.into());
        self
    }

    /// Returns the session schema.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Returns every statement received, in order.
    #[must_use]
    pub fn executed(&self) -> &[ExecutedStatement] {
        &self.executed
    }

    /// Returns the SQL of every statement received, in order.
    #[must_use]
    pub fn statements(&self) -> Vec<&str> {
        self.executed.iter().map(|s| s.sql.as_str()).collect()
    }

    /// Forgets the statements received so far.
    pub fn clear_log(&mut self) {
        self.executed.clear();
    }

    /// Returns true when the session schema has a table called `name`.
    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.find_table(name).is_some()
    }

    /// Returns true when a sequence called `name` exists.
    #[must_use]
    pub fn has_sequence(&self, name: &str) -> bool {
        self.sequences.contains_key(name)
    }

    /// Returns true when an index called `name` exists.
    #[must_use]
    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    /// Returns the number of rows inserted into `table`.
    #[must_use]
    pub fn row_count(&self, table: &str) -> u64 {
        self.find_table(table).map_or(0, |t| t.rows)
    }

    fn find_table(&self, name: &str) -> Option<&MemoryTable> {
        self.tables
            .iter()
            .find(|t| t.schema == self.schema && t.name == name)
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemoryTable, DriverError> {
        let schema = &self.schema;
        self.tables
            .iter_mut()
            .find(|t| &t.schema == schema && t.name == name)
            .ok_or_else(|| DriverError::unknown(format!("Unknown table name: {name}")))
    }

    fn record(&mut self, sql: &str, binds: &[Value]) -> Result<(), DriverError> {
        trace!(sql = %sql, "Memory connection received statement");
        self.executed.push(ExecutedStatement {
            sql: sql.to_string(),
            binds: binds.to_vec(),
        });
        match self.failures.iter().find(|p| sql.starts_with(p.as_str())) {
            Some(prefix) => Err(DriverError::other(format!(
                "Injected failure for statements starting with '{prefix}'"
            ))),
            None => Ok(()),
        }
    }

    fn run(&mut self, sql: &str) -> Result<Vec<Row>, DriverError> {
        let words: Vec<&str> = sql.split_whitespace().collect();
        match words.as_slice() {
            ["CREATE", "TABLE", ..] => self.create_table(sql),
            ["DROP", "TABLE", name, ..] => {
                let name = ident(name);
                let before = self.tables.len();
                let schema = self.schema.clone();
                self.tables
                    .retain(|t| !(t.schema == schema && t.name == name));
                if self.tables.len() == before {
                    return Err(DriverError::unknown(format!("Unknown table name: {name}")));
                }
                self.indexes.retain(|_, table| *table != name);
                Ok(Vec::new())
            }
            ["RENAME", "TABLE", old, "TO", new] => {
                let (old, new) = (ident(old), ident(new));
                if self.find_table(&new).is_some() {
                    return Err(DriverError::duplicate(format!("Duplicate table name: {new}")));
                }
                self.table_mut(&old)?.name.clone_from(&new);
                for table in self.indexes.values_mut() {
                    if *table == old {
                        table.clone_from(&new);
                    }
                }
                Ok(Vec::new())
            }
            ["ALTER", "TABLE", table, action, ..] => {
                let table = ident(table);
                self.alter_table(&table, action, sql)
            }
            ["CREATE", "UNIQUE", "INDEX", name, "ON", ..] | ["CREATE", "INDEX", name, "ON", ..] => {
                self.create_index(&ident(name), sql)
            }
            ["CREATE", "SEQUENCE", name, "START", "WITH", start, ..] => {
                let name = ident(name);
                let start: i64 = start
                    .parse()
                    .map_err(|_| DriverError::syntax(format!("Invalid start value: {start}")))?;
                if self.sequences.contains_key(&name) {
                    return Err(DriverError::duplicate(format!(
                        "Duplicate sequence name: {name}"
                    )));
                }
                self.sequences.insert(name, start);
                Ok(Vec::new())
            }
            ["DROP", "SEQUENCE", name] => {
                let name = ident(name);
                self.sequences
                    .remove(&name)
                    .map(|_| Vec::new())
                    .ok_or_else(|| DriverError::unknown(format!("Unknown sequence name: {name}")))
            }
            ["SELECT", target, "id", "FROM", "DUMMY"] if target.ends_with(".NEXTVAL") => {
                let name = ident(target.trim_end_matches(".NEXTVAL"));
                let next = self
                    .sequences
                    .get_mut(&name)
                    .ok_or_else(|| DriverError::unknown(format!("Unknown sequence name: {name}")))?;
                let value = *next;
                *next += 1;
                Ok(vec![Row::from([(String::from("id"), Value::Int(value))])])
            }
            ["INSERT", "INTO", target, ..] => {
                let name = ident(target.split('(').next().unwrap_or_default());
                self.table_mut(&name)?.rows += 1;
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn create_table(&mut self, sql: &str) -> Result<Vec<Row>, DriverError> {
        let rest = sql.split_once("TABLE").map_or("", |(_, r)| r).trim_start();
        let name_end = rest
            .find(|c: char| c == '(' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = ident(&rest[..name_end]);
        if self.find_table(&name).is_some() {
            return Err(DriverError::duplicate(format!("Duplicate table name: {name}")));
        }
        let body = paren_body(sql)
            .ok_or_else(|| DriverError::syntax(format!("Missing column list: {sql}")))?;
        let columns = split_top_level(body)
            .into_iter()
            .filter(|def| {
                let first = def.split_whitespace().next().unwrap_or_default();
                !matches!(
                    first.to_ascii_uppercase().as_str(),
                    "PRIMARY" | "CONSTRAINT" | "UNIQUE" | "FOREIGN" | "CHECK" | ""
                )
            })
            .map(parse_column)
            .collect();
        self.tables.push(MemoryTable {
            schema: self.schema.clone(),
            name,
            columns,
            rows: 0,
        });
        Ok(Vec::new())
    }

    fn alter_table(&mut self, table: &str, action: &str, sql: &str) -> Result<Vec<Row>, DriverError> {
        let body = sql
            .split_once(&format!(" {action} "))
            .map(|(_, clause)| clause.trim_start())
            .filter(|clause| clause.starts_with('('))
            .and_then(paren_body)
            .ok_or_else(|| DriverError::syntax(format!("Expected parenthesised clause: {sql}")))?;
        let target = self.table_mut(table)?;
        match action {
            "ADD" => {
                let column = parse_column(body);
                if target.columns.iter().any(|c| c.name == column.name) {
                    return Err(DriverError::duplicate(format!(
                        "Duplicate column name: {}",
                        column.name
                    )));
                }
                target.columns.push(column);
            }
            "DROP" => {
                let name = ident(body.trim());
                let before = target.columns.len();
                target.columns.retain(|c| c.name != name);
                if target.columns.len() == before {
                    return Err(DriverError::unknown(format!("Unknown column name: {name}")));
                }
            }
            "ALTER" => {
                let changed = parse_column(body);
                let column = target
                    .columns
                    .iter_mut()
                    .find(|c| c.name == changed.name)
                    .ok_or_else(|| {
                        DriverError::unknown(format!("Unknown column name: {}", changed.name))
                    })?;
                match changed.sql_type.to_ascii_uppercase().as_str() {
                    "" if body.to_ascii_uppercase().ends_with("NOT NULL") => column.nullable = false,
                    "" => column.nullable = true,
                    _ => {
                        column.sql_type = changed.sql_type;
                        column.default = changed.default;
                        if !changed.nullable {
                            column.nullable = false;
                        }
                    }
                }
            }
            other => {
                return Err(DriverError::syntax(format!("Unsupported ALTER action: {other}")));
            }
        }
        Ok(Vec::new())
    }

    fn create_index(&mut self, name: &str, sql: &str) -> Result<Vec<Row>, DriverError> {
        let table = sql
            .split_once(" ON ")
            .and_then(|(_, rest)| rest.split('(').next())
            .map(|t| ident(t.trim()))
            .ok_or_else(|| DriverError::syntax(format!("Missing table in: {sql}")))?;
        self.table_mut(&table)?;
        if self.indexes.contains_key(name) {
            return Err(DriverError::duplicate(format!("Duplicate index name: {name}")));
        }
        self.indexes.insert(name.to_string(), table);
        Ok(Vec::new())
    }
}

impl Connection for MemoryConnection {
    fn execute(&mut self, sql: &str) -> Result<Vec<Row>, DriverError> {
        self.record(sql, &[])?;
        self.run(sql)
    }

    fn execute_update(&mut self, sql: &str, binds: &[Value]) -> Result<u64, DriverError> {
        self.record(sql, binds)?;
        let is_insert = sql.trim_start().starts_with("INSERT");
        self.run(sql)?;
        Ok(u64::from(is_insert))
    }

    fn columns_internal(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ColumnMetadata>, DriverError> {
        Ok(self
            .tables
            .iter()
            .filter(|t| t.name == table && schema.is_none_or(|s| t.schema == s))
            .flat_map(|t| t.columns.iter().cloned())
            .collect())
    }

    fn tables(
        &mut self,
        _catalog: Option<&str>,
        schema: Option<&str>,
    ) -> Result<Vec<String>, DriverError> {
        Ok(self
            .tables
            .iter()
            .filter(|t| schema.is_none_or(|s| t.schema == s))
            .map(|t| t.name.clone())
            .collect())
    }
}

fn ident(raw: &str) -> String {
    raw.trim_matches('"').to_string()
}

fn paren_body(sql: &str) -> Option<&str> {
    let start = sql.find('(')?;
    let end = sql.rfind(')')?;
    (end > start).then(|| &sql[start + 1..end])
}

fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(body[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(body[start..].trim());
    parts
}

const CLAUSE_KEYWORDS: [&str; 5] = ["NOT NULL", "NULL", "PRIMARY KEY", "DEFAULT", "UNIQUE"];

fn parse_column(def: &str) -> ColumnMetadata {
    let def = def.trim();
    let (name, rest) = def.split_once(char::is_whitespace).unwrap_or((def, ""));
    let rest = rest.trim();
    let upper = rest.to_ascii_uppercase();

    let type_end = CLAUSE_KEYWORDS
        .iter()
        .filter_map(|kw| upper.find(kw))
        .min()
        .unwrap_or(rest.len());
    let primary = upper.contains("PRIMARY KEY");

    let default = upper.find("DEFAULT ").map(|at| {
        let value = &rest[at + "DEFAULT ".len()..];
        let value_upper = &upper[at + "DEFAULT ".len()..];
        let end = [" NOT NULL", " NULL", " PRIMARY KEY", " UNIQUE"]
            .iter()
            .filter_map(|kw| value_upper.find(kw))
            .min()
            .unwrap_or(value.len());
        let value = value[..end].trim();
        if value_upper.starts_with("SERIAL") {
            format!("{GENERATED_DEFAULT_MARKER}{}", &value["SERIAL".len()..])
        } else {
            value.to_string()
        }
    });

    ColumnMetadata {
        name: ident(name),
        sql_type: rest[..type_end].trim().to_string(),
        nullable: !primary && !upper.contains("NOT NULL"),
        default,
        primary,
    }
}
