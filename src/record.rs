//! Records - ordered (column name, value) pairs
//!
//! Values stay attached to their column name from the moment a source row is
//! read, so positional drift between headers and values cannot happen.

use crate::{Error, Result};
use rusqlite::types::Value;

/// One row of data aligned with its header
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Pair a header list with one row of values.
    ///
    /// `row` is the 1-based data row number, used only for error reporting.
    pub fn pair<H, V>(row: usize, headers: H, values: V) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        V: IntoIterator<Item = Value>,
    {
        let names: Vec<String> = headers.into_iter().map(Into::into).collect();
        let values: Vec<Value> = values.into_iter().collect();

        if names.len() != values.len() {
            return Err(Error::SchemaMismatch {
                row,
                expected: names.len(),
                found: values.len(),
            });
        }

        Ok(Self {
            fields: names.into_iter().zip(values).collect(),
        })
    }

    /// Build a record of text values, as read from a CSV row
    pub fn from_text<H, S>(row: usize, headers: H, values: impl IntoIterator<Item = S>) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        S: Into<String>,
    {
        Self::pair(row, headers, values.into_iter().map(|v| Value::Text(v.into())))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over (name, value) pairs in header order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    /// Look up a value by column name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// Textual form of a SQLite value, as written to CSV and fed to type inference
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => format_real(*f),
        Value::Text(s) => s.clone(),
        Value::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Shortest round-trip form of a float that still reads as a REAL (`3.0`, not `3`)
pub fn format_real(value: f64) -> String {
    format!("{:?}", value)
}
