//! Storage Layer - SQLite connection wrapper
//!
//! A `Database` owns exactly one connection. Export and import operations
//! are implemented on it in `crate::export` and `crate::import`.

pub mod sqlite;

pub use sqlite::{Database, ResultSet};
