//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params_from_iter};
use rusqlite::types::Value;
use crate::{Error, Result};
use crate::record::Record;
use crate::schema::{quote_identifier, TableSchema};

/// Column names and rows produced by one query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows paired with their column names, in result order
    pub fn records(&self) -> Result<Vec<Record>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| Record::pair(i + 1, self.columns.iter().cloned(), row.iter().cloned()))
            .collect()
    }
}

/// A single SQLite connection
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening database {}", path.display());
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Wrap a connection the caller already holds
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Close the connection, surfacing any error SQLite reports on close
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Storage(e))
    }

    /// Column names of a query, without stepping through its rows
    pub fn column_names(&self, sql: &str) -> Result<Vec<String>> {
        let stmt = self.conn.prepare(sql)?;
        Ok(stmt.column_names().into_iter().map(String::from).collect())
    }

    /// Run a query and collect every row
    pub fn query(&self, sql: &str) -> Result<ResultSet> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Vec<Value>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Query returned {} rows across {} columns", rows.len(), width);
        Ok(ResultSet { columns, rows })
    }

    /// Check whether a table exists
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ========== Bulk Operations ==========

    /// Drop `table`, recreate it from the first record and insert every record.
    ///
    /// Runs inside a savepoint: it nests within a caller's open transaction and
    /// is rolled back if any statement fails. Returns the schema that was
    /// created, or `None` when there were no records (the table is only dropped).
    pub fn replace_table<I>(&mut self, table: &str, records: I) -> Result<Option<(TableSchema, usize)>>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let sp = self.conn.savepoint()?;
        sp.execute(&format!("DROP TABLE IF EXISTS {}", quote_identifier(table)), [])?;

        let mut records = records.into_iter();
        let first = match records.next() {
            Some(record) => record?,
            None => {
                sp.commit()?;
                tracing::info!("No records for {}; table dropped and not recreated", table);
                return Ok(None);
            }
        };

        let schema = TableSchema::infer(table, &first);
        let create = schema.create_statement();
        let insert_sql = schema.insert_statement();
        tracing::debug!("{}", create);
        tracing::debug!("{}", insert_sql);
        sp.execute(&create, [])?;

        let mut inserted = 0;
        {
            let mut insert = sp.prepare(&insert_sql)?;
            insert.execute(params_from_iter(first.values()))?;
            inserted += 1;

            for record in records {
                let record = record?;
                if record.len() != schema.columns.len() {
                    return Err(Error::SchemaMismatch {
                        row: inserted + 1,
                        expected: schema.columns.len(),
                        found: record.len(),
                    });
                }
                insert.execute(params_from_iter(record.values()))?;
                inserted += 1;
            }
        }

        sp.commit()?;
        Ok(Some((schema, inserted)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_record(row: usize, headers: &[&str], values: &[&str]) -> Result<Record> {
        Record::from_text(row, headers.iter().copied(), values.iter().copied())
    }

    #[test]
    fn test_query_result_set() {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch("CREATE TABLE t (a INTEGER, b TEXT); INSERT INTO t VALUES (1, 'x'), (2, NULL);")
            .unwrap();

        let result = db.query("SELECT a, b FROM t ORDER BY a").unwrap();
        assert_eq!(result.columns, vec!["a", "b"]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[1], vec![Value::Integer(2), Value::Null]);

        let records = result.records().unwrap();
        assert_eq!(records[0].get("b"), Some(&Value::Text("x".into())));
    }

    #[test]
    fn test_column_names_without_rows() {
        let db = Database::open_in_memory().unwrap();
        db.connection().execute("CREATE TABLE t (id INTEGER, name TEXT)", []).unwrap();
        assert_eq!(db.column_names("SELECT * FROM t").unwrap(), vec!["id", "name"]);
        assert!(db.query("SELECT * FROM t").unwrap().is_empty());
    }

    #[test]
    fn test_replace_table() {
        let mut db = Database::open_in_memory().unwrap();
        let headers = ["name", "age"];
        let records = vec![
            text_record(1, &headers, &["Alice", "30"]),
            text_record(2, &headers, &["Bob", "25"]),
        ];

        let (schema, inserted) = db.replace_table("people", records).unwrap().unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(schema.create_statement(), "CREATE TABLE people (name TEXT, age INTEGER)");

        let result = db.query("SELECT name, age FROM people").unwrap();
        assert_eq!(result.rows[0], vec![Value::Text("Alice".into()), Value::Integer(30)]);
    }

    #[test]
    fn test_replace_table_without_records_drops() {
        let mut db = Database::open_in_memory().unwrap();
        db.connection().execute("CREATE TABLE gone (x TEXT)", []).unwrap();

        assert!(db.replace_table("gone", Vec::new()).unwrap().is_none());
        assert!(!db.table_exists("gone").unwrap());
    }

    #[test]
    fn test_import_nests_in_caller_transaction() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("BEGIN").unwrap();

        let mut db = Database::from_connection(conn);
        db.import_csv("name,age\nAlice,30\n".as_bytes(), "t").unwrap();
        assert!(db.table_exists("t").unwrap());

        let conn = db.into_connection();
        conn.execute_batch("ROLLBACK").unwrap();
        assert!(!Database::from_connection(conn).table_exists("t").unwrap());
    }

    #[test]
    fn test_replace_table_rolls_back_on_error() {
        let mut db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch("CREATE TABLE keep (x TEXT); INSERT INTO keep VALUES ('old');")
            .unwrap();

        let records = vec![
            text_record(1, &["x"], &["new"]),
            text_record(2, &["x", "y"], &["a"]),
        ];
        assert!(db.replace_table("keep", records).is_err());

        let result = db.query("SELECT x FROM keep").unwrap();
        assert_eq!(result.rows, vec![vec![Value::Text("old".into())]]);
    }
}
