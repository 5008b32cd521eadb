//! SQLite output backend (feature `sqlite`).
//!
//! Creates `output.db` in the configured output directory with one table per
//! data point (`source_id`, `timestamp`, `value`), where `value` is `REAL` or
//! `TEXT` depending on the data point, plus a `metadata` table.

use std::collections::BTreeSet;
use std::path::Path;

use rusqlite::{Connection, params};

use crate::writer::OutputWriter;
use crate::{Metadata, OutputResult, RecordRow, Value, ValueKind};

/// Writes simulation results to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    tables:   BTreeSet<String>,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and create the metadata table.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS metadata (
                 key   TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );",
        )?;

        Ok(Self { conn, tables: BTreeSet::new(), finished: false })
    }

    fn ensure_table(&mut self, data_point: &str, kind: ValueKind) -> OutputResult<()> {
        if self.tables.contains(data_point) {
            return Ok(());
        }
        let column = match kind {
            ValueKind::Float => "REAL",
            ValueKind::Text => "TEXT",
        };
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 source_id INTEGER NOT NULL,
                 timestamp INTEGER NOT NULL,
                 value     {column} NOT NULL
             );",
            quote_ident(data_point)
        ))?;
        self.tables.insert(data_point.to_owned());
        Ok(())
    }
}

/// Quote an identifier for use in SQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl OutputWriter for SqliteWriter {
    fn write_records(&mut self, rows: &[RecordRow]) -> OutputResult<()> {
        for row in rows {
            self.ensure_table(&row.data_point, row.value.kind())?;
        }
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        for row in rows {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT INTO {} (source_id, timestamp, value) VALUES (?1, ?2, ?3)",
                quote_ident(&row.data_point)
            ))?;
            match &row.value {
                Value::Float(v) => stmt.execute(params![row.source_id, row.unix_secs, v])?,
                Value::Text(s) => stmt.execute(params![row.source_id, row.unix_secs, s])?,
            };
        }
        tx.commit()?;
        Ok(())
    }

    fn write_metadata(&mut self, metadata: &Metadata) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)")?;
            for (key, value) in metadata {
                stmt.execute([key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
