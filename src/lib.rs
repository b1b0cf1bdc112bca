//! # Tabular ETL - small data moves between SQLite, CSV and JSON
//!
//! Tabular ETL provides:
//! - First-row schema inference (INTEGER, REAL, TEXT) for CSV and JSON sources
//! - `CREATE TABLE` / `INSERT` statement generation from an inferred schema
//! - Query export to CSV text or pretty-printed JSON (flat list or keyed map)
//! - Drop-and-recreate imports of CSV files and keyed JSON documents
//!
//! Every path-level operation opens its own SQLite connection and closes it
//! before returning.

pub mod schema;
pub mod record;
pub mod storage;
pub mod export;
pub mod import;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use schema::{Column, ColumnType, TableSchema};
pub use record::Record;
pub use storage::{Database, ResultSet};
pub use export::{sql_to_csv, sql_to_json, JsonMode};
pub use import::{csv_to_sql, json_to_sql};

/// Result type alias for Tabular ETL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Tabular ETL operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Schema mismatch in record {row}: expected {expected} fields, found {found}")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Format error: {0}")]
    Format(String),
}
