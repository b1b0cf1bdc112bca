//! Export - render query results as CSV or JSON text
//!
//! JSON comes in two shapes:
//! - `Flat`: an array of records, in result order
//! - `Keyed`: an object keyed by one column's value, each entry holding the
//!   remaining columns of that record

use std::path::Path;
use std::str::FromStr;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use crate::record::{value_text, Record};
use crate::storage::Database;
use crate::{Error, Result};

/// Shape of a JSON export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonMode {
    /// List of records
    #[default]
    Flat,
    /// Map of records keyed by a primary key column
    Keyed,
}

impl JsonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonMode::Flat => "flat",
            JsonMode::Keyed => "keyed",
        }
    }

    /// Check the mode / primary key combination before touching the database
    fn validate(&self, primary_key: Option<&str>) -> Result<()> {
        match (self, primary_key) {
            (JsonMode::Flat, Some(key)) => Err(Error::InvalidArgument(format!(
                "primary key '{}' must not be given for flat export",
                key
            ))),
            (JsonMode::Keyed, None) => Err(Error::InvalidArgument(
                "an existing column must be given as the primary key for keyed export".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl FromStr for JsonMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "flat" | "lod" | "list" => Ok(JsonMode::Flat),
            "keyed" | "dod" | "map" => Ok(JsonMode::Keyed),
            _ => Err(Error::InvalidArgument(format!("Unknown JSON mode: {}", s))),
        }
    }
}

impl std::fmt::Display for JsonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Database {
    /// Run `query` and render the header plus every row as CSV
    pub fn export_csv(&self, query: &str) -> Result<String> {
        let result = self.query(query)?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(&result.columns)?;
        for row in &result.rows {
            writer.write_record(row.iter().map(value_text))?;
        }

        let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        tracing::info!("Exported {} rows as CSV", result.len());
        String::from_utf8(bytes).map_err(|e| Error::Format(e.to_string()))
    }

    /// Run `query` and render the rows as pretty-printed JSON.
    ///
    /// `primary_key` must be `None` for `Flat` and name a result column for `Keyed`.
    pub fn export_json(&self, query: &str, mode: JsonMode, primary_key: Option<&str>) -> Result<String> {
        mode.validate(primary_key)?;

        if let Some(key) = primary_key {
            let columns = self.column_names(query)?;
            if !columns.iter().any(|c| c == key) {
                return Err(Error::InvalidArgument(format!(
                    "primary key '{}' is not a column of the query (columns: {})",
                    key,
                    columns.join(", ")
                )));
            }
        }

        let records = self.query(query)?.records()?;
        let document = match primary_key {
            None => JsonValue::Array(records.iter().map(|r| JsonValue::Object(json_record(r, None))).collect()),
            Some(key) => JsonValue::Object(keyed_records(&records, key)),
        };

        tracing::info!("Exported {} rows as {} JSON", records.len(), mode);
        to_pretty_json(&document)
    }
}

/// Export a query from the database at `db_path` as CSV
pub fn sql_to_csv(query: &str, db_path: &Path) -> Result<String> {
    let db = Database::open(db_path)?;
    let csv = db.export_csv(query)?;
    db.close()?;
    Ok(csv)
}

/// Export a query from the database at `db_path` as JSON
pub fn sql_to_json(query: &str, db_path: &Path, mode: JsonMode, primary_key: Option<&str>) -> Result<String> {
    mode.validate(primary_key)?;
    let db = Database::open(db_path)?;
    let json = db.export_json(query, mode, primary_key)?;
    db.close()?;
    Ok(json)
}

fn keyed_records(records: &[Record], key: &str) -> Map<String, JsonValue> {
    let mut keyed = Map::new();
    for record in records {
        let outer = record.get(key).map(key_text).unwrap_or_else(|| "null".to_string());
        let inner = JsonValue::Object(json_record(record, Some(key)));
        // Last write wins; the key keeps the position of its first occurrence
        if keyed.insert(outer.clone(), inner).is_some() {
            tracing::warn!("Duplicate primary key value '{}' in column {}; keeping the last record", outer, key);
        }
    }
    keyed
}

fn json_record(record: &Record, skip: Option<&str>) -> Map<String, JsonValue> {
    record
        .fields()
        .filter(|(name, _)| Some(*name) != skip)
        .map(|(name, value)| (name.to_string(), json_value(value)))
        .collect()
}

fn key_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => value_text(other),
    }
}

/// Convert a SQLite value into its JSON counterpart
pub fn json_value(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Integer(i) => JsonValue::Number((*i).into()),
        Value::Real(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Blob(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn to_pretty_json(document: &JsonValue) -> Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    document.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| Error::Format(e.to_string()))
}
