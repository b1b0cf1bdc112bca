//! Schema layer - column types and table statements
//!
//! A schema is derived once from the first data record of an import and
//! fixed for the rest of that import:
//! - `inference`: sample value -> INTEGER / REAL / TEXT
//! - `emitter`: headers + sample record -> CREATE / INSERT statements

pub mod inference;
pub mod emitter;

pub use emitter::{emit, TableSchema};
pub use inference::infer;

use crate::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use std::sync::OnceLock;

/// Storage types a column can be inferred as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// SQL type name used in `CREATE TABLE`
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "INTEGER" | "INT" => Ok(ColumnType::Integer),
            "REAL" | "FLOAT" => Ok(ColumnType::Real),
            "TEXT" => Ok(ColumnType::Text),
            _ => Err(Error::InvalidArgument(format!("Unknown column type: {}", s))),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named column with its inferred storage type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// Column definition as it appears inside `CREATE TABLE (...)`
    pub fn definition(&self) -> String {
        format!("{} {}", quote_identifier(&self.name), self.column_type)
    }
}

fn plain_identifier() -> &'static Regex {
    static PLAIN: OnceLock<Regex> = OnceLock::new();
    PLAIN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"))
}

/// Emit an identifier bare when it is a plain name, double-quoted otherwise
pub fn quote_identifier(name: &str) -> String {
    if plain_identifier().is_match(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}
