//! SQLite assignment store (feature `sqlite`).
//!
//! One `assignments` table, indexed by `(vehicle_id, start_unix)` so the
//! overlap probe stays a range scan on one vehicle.  Windows are stored as
//! Unix seconds.
//!
//! The per-vehicle critical section of the memory store becomes a
//! `BEGIN IMMEDIATE` transaction here: the overlap `SELECT` and the
//! `INSERT` commit or fail together.  A busy/locked answer from SQLite maps
//! to [`StoreFault::Serialization`], which the allocator retries.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDateTime};
use rusqlite::{Connection, TransactionBehavior};

use fleet_core::{AssignmentId, TimeWindow, TripId, VehicleId};

use crate::assignment::{AssignmentStatus, VehicleAssignment};
use crate::store::{AssignmentStore, CancelOutcome, StoreFault};

const STATUS_ACTIVE: i64 = 0;
const STATUS_CANCELLED: i64 = 1;

/// Assignment store backed by a SQLite file.
///
/// The connection sits behind a `Mutex` (rusqlite connections are not
/// `Sync`); cross-process writers are fenced by SQLite itself.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) `assignments.db` in `dir` and initialise the schema.
    pub fn open(dir: &Path) -> Result<Self, StoreFault> {
        let conn = Connection::open(dir.join("assignments.db"))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS assignments (
                 id         INTEGER PRIMARY KEY,
                 vehicle_id INTEGER NOT NULL,
                 trip_id    INTEGER NOT NULL,
                 start_unix INTEGER NOT NULL,
                 end_unix   INTEGER NOT NULL,
                 status     INTEGER NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_assignments_vehicle_start
                 ON assignments (vehicle_id, start_unix);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl AssignmentStore for SqliteStore {
    fn find_overlap(
        &self,
        vehicle: VehicleId,
        window: &TimeWindow,
    ) -> Result<Option<VehicleAssignment>, StoreFault> {
        let conn = self.conn.lock().map_err(|_| StoreFault::Poisoned)?;
        first_overlap(&conn, vehicle, window)
    }

    fn try_commit(
        &self,
        vehicle: VehicleId,
        trip: TripId,
        window: TimeWindow,
    ) -> Result<VehicleAssignment, StoreFault> {
        let mut conn = self.conn.lock().map_err(|_| StoreFault::Poisoned)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Some(existing) = first_overlap(&tx, vehicle, &window)? {
            return Err(StoreFault::Overlap { existing });
        }
        tx.execute(
            "INSERT INTO assignments (vehicle_id, trip_id, start_unix, end_unix, status) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                vehicle.0,
                trip.0,
                to_unix(window.start()),
                to_unix(window.end()),
                STATUS_ACTIVE,
            ],
        )?;
        let id = AssignmentId(tx.last_insert_rowid() as u32);
        tx.commit()?;
        Ok(VehicleAssignment {
            id,
            vehicle,
            trip,
            window,
            status: AssignmentStatus::Active,
        })
    }

    fn cancel(&self, id: AssignmentId) -> Result<CancelOutcome, StoreFault> {
        let mut conn = self.conn.lock().map_err(|_| StoreFault::Poisoned)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing = get_by_id(&tx, id)?.ok_or(StoreFault::UnknownAssignment(id))?;
        if existing.status == AssignmentStatus::Cancelled {
            return Ok(CancelOutcome::AlreadyCancelled(existing));
        }
        tx.execute(
            "UPDATE assignments SET status = ?1 WHERE id = ?2",
            rusqlite::params![STATUS_CANCELLED, id.0],
        )?;
        tx.commit()?;
        Ok(CancelOutcome::Cancelled(VehicleAssignment {
            status: AssignmentStatus::Cancelled,
            ..existing
        }))
    }

    fn get(&self, id: AssignmentId) -> Result<Option<VehicleAssignment>, StoreFault> {
        let conn = self.conn.lock().map_err(|_| StoreFault::Poisoned)?;
        get_by_id(&conn, id)
    }

    fn active_for(&self, vehicle: VehicleId) -> Result<Vec<VehicleAssignment>, StoreFault> {
        let conn = self.conn.lock().map_err(|_| StoreFault::Poisoned)?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, vehicle_id, trip_id, start_unix, end_unix, status \
             FROM assignments WHERE vehicle_id = ?1 AND status = ?2 \
             ORDER BY start_unix",
        )?;
        let rows = stmt.query_map(rusqlite::params![vehicle.0, STATUS_ACTIVE], row_parts)?;
        collect_assignments(rows)
    }

    fn snapshot(&self) -> Result<Vec<VehicleAssignment>, StoreFault> {
        let conn = self.conn.lock().map_err(|_| StoreFault::Poisoned)?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, vehicle_id, trip_id, start_unix, end_unix, status \
             FROM assignments ORDER BY vehicle_id, start_unix, id",
        )?;
        let rows = stmt.query_map([], row_parts)?;
        collect_assignments(rows)
    }
}

// ── Row plumbing ──────────────────────────────────────────────────────────────

type RowParts = (u32, u32, u32, i64, i64, i64);

fn row_parts(row: &rusqlite::Row<'_>) -> rusqlite::Result<RowParts> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn first_overlap(
    conn: &Connection,
    vehicle: VehicleId,
    window: &TimeWindow,
) -> Result<Option<VehicleAssignment>, StoreFault> {
    let mut stmt = conn.prepare_cached(
        // Half-open overlap: existing.start < probe.end AND probe.start < existing.end.
        "SELECT id, vehicle_id, trip_id, start_unix, end_unix, status \
         FROM assignments \
         WHERE vehicle_id = ?1 AND status = ?2 AND start_unix < ?3 AND ?4 < end_unix \
         ORDER BY start_unix LIMIT 1",
    )?;
    let mut rows = stmt.query_map(
        rusqlite::params![
            vehicle.0,
            STATUS_ACTIVE,
            to_unix(window.end()),
            to_unix(window.start()),
        ],
        row_parts,
    )?;
    match rows.next() {
        None => Ok(None),
        Some(parts) => Ok(Some(assignment_from_parts(parts?)?)),
    }
}

fn get_by_id(conn: &Connection, id: AssignmentId) -> Result<Option<VehicleAssignment>, StoreFault> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, vehicle_id, trip_id, start_unix, end_unix, status \
         FROM assignments WHERE id = ?1",
    )?;
    let mut rows = stmt.query_map(rusqlite::params![id.0], row_parts)?;
    match rows.next() {
        None => Ok(None),
        Some(parts) => Ok(Some(assignment_from_parts(parts?)?)),
    }
}

fn collect_assignments(
    rows: impl Iterator<Item = rusqlite::Result<RowParts>>,
) -> Result<Vec<VehicleAssignment>, StoreFault> {
    let mut out = Vec::new();
    for parts in rows {
        out.push(assignment_from_parts(parts?)?);
    }
    Ok(out)
}

fn assignment_from_parts(parts: RowParts) -> Result<VehicleAssignment, StoreFault> {
    let (id, vehicle, trip, start, end, status) = parts;
    let window = TimeWindow::new(from_unix(start)?, from_unix(end)?)
        .map_err(|e| StoreFault::Backend(format!("corrupt window in row {id}: {e}")))?;
    let status = match status {
        STATUS_ACTIVE => AssignmentStatus::Active,
        STATUS_CANCELLED => AssignmentStatus::Cancelled,
        other => {
            return Err(StoreFault::Backend(format!(
                "corrupt status {other} in row {id}"
            )))
        }
    };
    Ok(VehicleAssignment {
        id: AssignmentId(id),
        vehicle: VehicleId(vehicle),
        trip: TripId(trip),
        window,
        status,
    })
}

fn to_unix(t: NaiveDateTime) -> i64 {
    t.and_utc().timestamp()
}

fn from_unix(secs: i64) -> Result<NaiveDateTime, StoreFault> {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| StoreFault::Backend(format!("timestamp {secs} out of range")))
}

impl From<rusqlite::Error> for StoreFault {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(f, _) = &e {
            if matches!(
                f.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) {
                return StoreFault::Serialization;
            }
        }
        StoreFault::Backend(e.to_string())
    }
}
