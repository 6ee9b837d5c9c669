//! oxide-maxdb CLI
//!
//! Command-line tool for inspecting the SQL the MaxDB adapter generates.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use oxide_maxdb::prelude::*;

/// Schema name used for dry runs when none is configured.
const DRY_RUN_SCHEMA: &str = "DBA";

/// MaxDB dialect adapter tools.
#[derive(Parser)]
#[command(name = "oxide-maxdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Adapter configuration file (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Schema metadata queries are pinned to.
    #[arg(short, long, env = "MAXDB_SCHEMA")]
    schema: Option<String>,

    /// Login user; used as the schema when no schema is given.
    #[arg(short, long, env = "MAXDB_USERNAME")]
    username: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statements for a JSON list of schema operations (dry run).
    Sql {
        /// File holding the operations.
        operations: PathBuf,
    },

    /// Show the MaxDB type for every column kind.
    Types,

    /// Show the index name and statement for a column list.
    IndexName {
        /// Table name.
        #[arg(short, long)]
        table: String,

        /// Create a unique index.
        #[arg(long)]
        unique: bool,

        /// Indexed columns, in order.
        #[arg(required = true)]
        columns: Vec<String>,
    },
}

fn load_config(cli: &Cli) -> Result<AdapterConfig> {
    let mut config = match &cli.config {
        Some(path) => AdapterConfig::from_path(path)?,
        None => AdapterConfig::new(),
    };
    if let Some(schema) = &cli.schema {
        config = config.schema(schema.clone());
    }
    if let Some(username) = &cli.username {
        config = config.username(username.clone());
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;
    debug!(schema = ?config.resolved_schema(), "Loaded configuration");

    match cli.command {
        Commands::Sql { operations } => {
            let json = std::fs::read_to_string(&operations)?;
            let ops = parse_operations(&json)?;
            info!(
                "Dry run of {} operation(s) from {}",
                ops.len(),
                operations.display()
            );

            let schema = config
                .resolved_schema()
                .unwrap_or(DRY_RUN_SCHEMA)
                .to_string();
            let mut adapter = MaxDbAdapter::new(MemoryConnection::new(schema), config);
            let outcome = adapter.apply_all(&ops);

            for sql in adapter.connection().statements() {
                println!("{sql};");
            }
            outcome?;
        }

        Commands::Types => {
            let dialect = MaxDbDialect::new();
            let options = ColumnOptions::default();
            for column_type in dialect.native_types().keys() {
                println!(
                    "{:<12} {}",
                    column_type.to_string(),
                    dialect.type_to_sql(column_type, &options)
                );
            }
        }

        Commands::IndexName {
            table,
            unique,
            columns,
        } => {
            let dialect = MaxDbDialect::new();
            let options = IndexOptions { unique };
            println!("{}", dialect.index_name(&table, &columns));
            println!("{};", dialect.add_index_sql(&table, &columns, &options));
        }
    }

    Ok(())
}
