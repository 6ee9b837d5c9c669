//! Error types for the MaxDB adapter.

use crate::connection::DriverError;
use crate::rename::{RenameProgress, RenameStep};

/// Errors that can occur while translating or executing adapter operations.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// A statement failed in the driver. Propagated as-is.
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// The sequence backing a table does not exist.
    #[error("Sequence not found: {0}")]
    SequenceNotFound(String),

    /// The sequence returned something that is not an integer.
    #[error("Sequence '{sequence}' returned a non-integer value: {value}")]
    SequenceValue {
        /// Sequence that was read.
        sequence: String,
        /// The value as the driver returned it.
        value: String,
    },

    /// A column lookup found nothing.
    #[error("Column not found: {table}.{column}")]
    ColumnNotFound {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// A table rename stopped part-way through.
    #[error("Rename of '{}' to '{}' failed at step '{failed}' after {} completed step(s): {source}", progress.old_name, progress.new_name, progress.completed.len())]
    PartialRename {
        /// The step that failed.
        failed: RenameStep,
        /// Steps that completed before the failure.
        progress: RenameProgress,
        /// The underlying failure.
        #[source]
        source: Box<AdapterError>,
    },

    /// Legacy bind substitution found a different number of placeholders than binds.
    #[error("Statement has {expected} placeholder(s) but {actual} bind value(s) were given")]
    BindCount {
        /// Placeholders found in the SQL.
        expected: usize,
        /// Bind values supplied.
        actual: usize,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (reading configuration or operation files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
