//! Statement generation from a sample record

use super::{infer, quote_identifier, Column};
use crate::record::{value_text, Record};
use crate::Result;
use serde::Serialize;

/// Ordered columns of one import target, inferred from its sample record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// Infer one column per field of the sample record, in header order
    pub fn infer(table: impl Into<String>, sample: &Record) -> Self {
        let columns = sample
            .fields()
            .map(|(name, value)| Column::new(name, infer(&value_text(value))))
            .collect();

        Self {
            table: table.into(),
            columns,
        }
    }

    /// `DROP TABLE IF EXISTS <table>`
    pub fn drop_statement(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_identifier(&self.table))
    }

    /// `CREATE TABLE <table> (<col> <TYPE>, ...)`
    pub fn create_statement(&self) -> String {
        let definitions: Vec<String> = self.columns.iter().map(Column::definition).collect();
        format!(
            "CREATE TABLE {} ({})",
            quote_identifier(&self.table),
            definitions.join(", ")
        )
    }

    /// `INSERT INTO <table> VALUES (?, ...)` with one placeholder per column
    pub fn insert_statement(&self) -> String {
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        format!(
            "INSERT INTO {} VALUES ({})",
            quote_identifier(&self.table),
            placeholders
        )
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Build the create and insert statements for `table` from a header list and
/// its first data row.
///
/// Fails with `SchemaMismatch` when the sample row and the headers differ in length.
pub fn emit<H, S>(headers: &[H], sample: &[S], table: &str) -> Result<(String, String)>
where
    H: AsRef<str>,
    S: AsRef<str>,
{
    let record = Record::from_text(
        1,
        headers.iter().map(|h| h.as_ref().to_string()),
        sample.iter().map(|s| s.as_ref().to_string()),
    )?;
    let schema = TableSchema::infer(table, &record);
    Ok((schema.create_statement(), schema.insert_statement()))
}
