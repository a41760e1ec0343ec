//! SQLite backend (feature `sqlite`): one `results.db` per output
//! directory.
//!
//! | Table          | Key          | One row per                         |
//! |----------------|--------------|-------------------------------------|
//! | `reports`      |              | report variable per boundary        |
//! | `spikes`       |              | outlet firing, time-sorted          |
//! | `firing_rates` | `population` | population (rewritten on re-runs)   |

use std::path::Path;

use rusqlite::{Connection, Params};

use crate::writer::OutputWriter;
use crate::{OutputResult, RateRow, SampleRow, SpikeRow};

const SCHEMA: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous  = NORMAL;
    CREATE TABLE IF NOT EXISTS reports (
        time     REAL NOT NULL,
        variable TEXT NOT NULL,
        value    REAL NOT NULL
    );
    CREATE TABLE IF NOT EXISTS spikes (
        time       REAL    NOT NULL,
        neuron     INTEGER NOT NULL,
        population INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS firing_rates (
        population TEXT PRIMARY KEY,
        neurons    INTEGER NOT NULL,
        spikes     INTEGER NOT NULL,
        rate_hz    REAL    NOT NULL
    );";

pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("results.db"))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, finished: false })
    }

    /// Run `sql` once per row inside a single transaction.
    fn insert<T, P: Params>(&self, sql: &str, rows: &[T], bind: impl Fn(&T) -> P) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            for row in rows {
                stmt.execute(bind(row))?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl OutputWriter for SqliteWriter {
    fn write_samples(&mut self, rows: &[SampleRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO reports (time, variable, value) VALUES (?1, ?2, ?3)",
            rows,
            |r| (r.time, r.variable.clone(), r.value),
        )
    }

    fn write_spikes(&mut self, rows: &[SpikeRow]) -> OutputResult<()> {
        self.insert(
            "INSERT INTO spikes (time, neuron, population) VALUES (?1, ?2, ?3)",
            rows,
            |r| (r.time, r.neuron, r.population),
        )
    }

    fn write_rates(&mut self, rows: &[RateRow]) -> OutputResult<()> {
        self.insert(
            "INSERT OR REPLACE INTO firing_rates (population, neurons, spikes, rate_hz) \
             VALUES (?1, ?2, ?3, ?4)",
            rows,
            |r| (r.population.clone(), r.neurons as i64, r.spikes as i64, r.rate),
        )
    }

    fn finish(&mut self) -> OutputResult<()> {
        if !self.finished {
            self.finished = true;
            self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        }
        Ok(())
    }
}
