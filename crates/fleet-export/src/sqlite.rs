//! SQLite roster backend (feature `sqlite`).
//!
//! Creates a single `roster.db` file in the configured output directory with
//! two tables: `assignments` and `seats`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::RosterWriter;
use crate::{AssignmentRow, ExportResult, SeatRow};

/// Writes the roster to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `roster.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> ExportResult<Self> {
        let conn = Connection::open(dir.join("roster.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS assignments (
                 assignment_id  INTEGER PRIMARY KEY,
                 vehicle_id     INTEGER NOT NULL,
                 trip_id        INTEGER NOT NULL,
                 route_id       INTEGER NOT NULL,
                 departure_date TEXT    NOT NULL,
                 window_start   TEXT    NOT NULL,
                 window_end     TEXT    NOT NULL,
                 status         TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS seats (
                 vehicle_id INTEGER NOT NULL,
                 seat_id    INTEGER NOT NULL,
                 label      TEXT    NOT NULL,
                 tier_id    INTEGER NOT NULL,
                 status     TEXT    NOT NULL
             );",
        )?;

        Ok(Self {
            conn,
            finished: false,
        })
    }
}

impl RosterWriter for SqliteWriter {
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> ExportResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO assignments \
                 (assignment_id, vehicle_id, trip_id, route_id, departure_date, \
                  window_start, window_end, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.assignment_id,
                    row.vehicle_id,
                    row.trip_id,
                    row.route_id,
                    row.departure_date,
                    row.window_start,
                    row.window_end,
                    row.status,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_seats(&mut self, rows: &[SeatRow]) -> ExportResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO seats (vehicle_id, seat_id, label, tier_id, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.vehicle_id,
                    row.seat_id,
                    row.label,
                    row.tier_id,
                    row.status,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
