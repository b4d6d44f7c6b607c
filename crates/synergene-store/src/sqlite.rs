// SPDX-License-Identifier: Apache-2.0

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use synergene_model::DrugCombination;
use tracing::{debug, info};

use crate::{CombinationStore, StoreError};

pub const SQLITE_SCHEMA_VERSION: i64 = 1;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// `drug_combination` table in a SQLite file. Every insert commits on its own.
pub struct SqliteCombinationStore {
    path: PathBuf,
    conn: Connection,
}

impl SqliteCombinationStore {
    /// Opens (creating if needed) the database and ensures the schema exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = open_connection(path)?;
        ensure_schema(&conn)?;
        info!(path = %path.display(), "combination store opened");
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }
}

impl CombinationStore for SqliteCombinationStore {
    fn ping(&mut self) -> Result<(), StoreError> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    fn reconnect(&mut self) -> Result<(), StoreError> {
        debug!(path = %self.path.display(), "reopening sqlite connection");
        self.conn = open_connection(&self.path)?;
        Ok(())
    }

    fn delete_all(&mut self) -> Result<u64, StoreError> {
        let removed = self.conn.execute("DELETE FROM drug_combination", [])?;
        Ok(removed as u64)
    }

    fn insert(&mut self, record: &DrugCombination) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO drug_combination (
              drug_a, drug_b, cell_line, min_conc_a, max_conc_a, min_conc_b, max_conc_b
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        stmt.execute(params![
            record.drug_a,
            record.drug_b,
            record.cell_line,
            record.min_conc_a,
            record.max_conc_a,
            record.min_conc_b,
            record.max_conc_b
        ])?;
        Ok(())
    }
}

fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode=WAL;
        CREATE TABLE IF NOT EXISTS drug_combination (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          drug_a TEXT NOT NULL,
          drug_b TEXT NOT NULL,
          cell_line TEXT NOT NULL,
          min_conc_a REAL NOT NULL,
          max_conc_a REAL NOT NULL,
          min_conc_b REAL NOT NULL,
          max_conc_b REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_drug_combination_pair
          ON drug_combination(drug_a, drug_b, cell_line);
        CREATE INDEX IF NOT EXISTS idx_drug_combination_drug_b
          ON drug_combination(drug_b);
        ",
    )?;
    conn.execute_batch(&format!("PRAGMA user_version={SQLITE_SCHEMA_VERSION};"))?;
    Ok(())
}
