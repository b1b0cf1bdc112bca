//! Import - load CSV and keyed JSON sources into a fresh table
//!
//! Both sources go through the same drop / create / insert sequence in
//! `Database::replace_table`. The column types come from the first record only.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use rusqlite::types::Value;
use serde_json::Value as JsonValue;
use crate::record::Record;
use crate::storage::Database;
use crate::{Error, Result};

impl Database {
    /// Load CSV text (header line first) into `table`, replacing any existing table.
    ///
    /// Returns the number of rows inserted.
    pub fn import_csv<R: Read>(&mut self, reader: R, table: &str) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        let records = reader.records().enumerate().map(|(i, row)| {
            let row = row?;
            Record::from_text(i + 1, headers.iter().cloned(), row.iter())
        });

        let inserted = self.load(table, records)?;
        tracing::info!("Imported {} CSV rows into {}", inserted, table);
        Ok(inserted)
    }

    /// Load a JSON object of objects into `table`, replacing any existing table.
    ///
    /// Headers come from the first inner object. Every later object must carry
    /// exactly the same keys; values are matched by key, not by position.
    pub fn import_keyed_json<R: Read>(&mut self, reader: R, table: &str) -> Result<usize> {
        let document: JsonValue = serde_json::from_reader(reader)?;
        let JsonValue::Object(outer) = document else {
            return Err(Error::Format("expected a JSON object of objects at the top level".to_string()));
        };

        let headers: Vec<String> = match outer.values().next() {
            Some(JsonValue::Object(first)) => first.keys().cloned().collect(),
            Some(_) => return Err(Error::Format("expected every value of the JSON object to be an object".to_string())),
            None => Vec::new(),
        };

        let records = outer
            .iter()
            .enumerate()
            .map(|(i, (key, inner))| json_record(i + 1, key, inner, &headers));

        let inserted = self.load(table, records)?;
        tracing::info!("Imported {} JSON records into {}", inserted, table);
        Ok(inserted)
    }

    fn load<I>(&mut self, table: &str, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        Ok(self
            .replace_table(table, records)?
            .map(|(_, inserted)| inserted)
            .unwrap_or(0))
    }
}

/// Load the CSV file at `csv_path` into `table` of the database at `db_path`
pub fn csv_to_sql(csv_path: &Path, db_path: &Path, table: &str) -> Result<()> {
    let file = File::open(csv_path)?;
    let mut db = Database::open(db_path)?;
    db.import_csv(BufReader::new(file), table)?;
    db.close()
}

/// Load the keyed JSON file at `json_path` into `table` of the database at `db_path`
pub fn json_to_sql(json_path: &Path, db_path: &Path, table: &str) -> Result<()> {
    let file = File::open(json_path)?;
    let mut db = Database::open(db_path)?;
    db.import_keyed_json(BufReader::new(file), table)?;
    db.close()
}

fn json_record(row: usize, key: &str, inner: &JsonValue, headers: &[String]) -> Result<Record> {
    let JsonValue::Object(fields) = inner else {
        return Err(Error::Format(format!("value for key '{}' is not a JSON object", key)));
    };

    let present = headers.iter().filter(|h| fields.contains_key(h.as_str())).count();
    if present != headers.len() || fields.len() != headers.len() {
        return Err(Error::SchemaMismatch {
            row,
            expected: headers.len(),
            found: if present == headers.len() { fields.len() } else { present },
        });
    }

    let values = headers
        .iter()
        .map(|h| sql_value(key, &fields[h.as_str()]))
        .collect::<Result<Vec<Value>>>()?;
    Record::pair(row, headers.iter().cloned(), values)
}

fn sql_value(key: &str, value: &JsonValue) -> Result<Value> {
    Ok(match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Text(b.to_string()),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            return Err(Error::Format(format!(
                "record '{}' holds a nested value; only flat records can be imported",
                key
            )));
        }
    })
}
