//! File-backed round trips through the path-level API

use std::fs;
use std::path::Path;
use tabular_etl::{csv_to_sql, json_to_sql, sql_to_csv, sql_to_json, Database, Error, JsonMode};
use tempfile::TempDir;

fn seed(db_path: &Path) {
    let db = Database::open(db_path).unwrap();
    db.connection()
        .execute_batch(
            "CREATE TABLE items (id INTEGER, name TEXT, price REAL);
             INSERT INTO items VALUES (1, 'pen', 1.5), (2, 'ink, blue', 2.25), (3, 'pad \"A4\"', 3.0);",
        )
        .unwrap();
    db.close().unwrap();
}

#[test]
fn test_csv_round_trip() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("shop.db");
    let csv_path = dir.path().join("items.csv");
    seed(&db_path);

    let original = sql_to_csv("SELECT * FROM items ORDER BY id", &db_path).unwrap();
    fs::write(&csv_path, &original).unwrap();
    csv_to_sql(&csv_path, &db_path, "items_copy").unwrap();

    let copied = sql_to_csv("SELECT * FROM items_copy ORDER BY id", &db_path).unwrap();
    assert_eq!(copied, original);

    let db = Database::open(&db_path).unwrap();
    let sql: String = db
        .connection()
        .query_row("SELECT sql FROM sqlite_master WHERE name = 'items_copy'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(sql, "CREATE TABLE items_copy (id INTEGER, name TEXT, price REAL)");
}

#[test]
fn test_csv_reimport_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("people.db");
    let csv_path = dir.path().join("people.csv");
    fs::write(&csv_path, "name,age\nAlice,30\nBob,25\n").unwrap();

    csv_to_sql(&csv_path, &db_path, "t").unwrap();
    let first = sql_to_csv("SELECT * FROM t", &db_path).unwrap();
    csv_to_sql(&csv_path, &db_path, "t").unwrap();
    let second = sql_to_csv("SELECT * FROM t", &db_path).unwrap();

    assert_eq!(first, "name,age\nAlice,30\nBob,25\n");
    assert_eq!(second, first);
}

#[test]
fn test_keyed_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("shop.db");
    let json_path = dir.path().join("items.json");
    seed(&db_path);

    let json = sql_to_json("SELECT * FROM items ORDER BY id", &db_path, JsonMode::Keyed, Some("id")).unwrap();
    assert!(json.starts_with("{\n    \"1\": {\n        \"name\": \"pen\""));
    fs::write(&json_path, &json).unwrap();
    json_to_sql(&json_path, &db_path, "items_by_id").unwrap();

    let expected = sql_to_csv("SELECT name, price FROM items ORDER BY id", &db_path).unwrap();
    let loaded = sql_to_csv("SELECT * FROM items_by_id ORDER BY rowid", &db_path).unwrap();
    assert_eq!(loaded, expected);
}

#[test]
fn test_flat_json_matches_csv_row_count() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("shop.db");
    seed(&db_path);

    let query = "SELECT name FROM items";
    let csv = sql_to_csv(query, &db_path).unwrap();
    let json = sql_to_json(query, &db_path, JsonMode::Flat, None).unwrap();

    let csv_rows = csv::Reader::from_reader(csv.as_bytes()).records().count();
    let records: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(records.len(), csv_rows);
}

#[test]
fn test_keyed_export_needs_existing_column() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("shop.db");
    seed(&db_path);

    let err = sql_to_json("SELECT * FROM items", &db_path, JsonMode::Keyed, Some("sku")).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_missing_source_file() {
    let dir = TempDir::new().unwrap();
    let err = csv_to_sql(&dir.path().join("absent.csv"), &dir.path().join("x.db"), "t").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
