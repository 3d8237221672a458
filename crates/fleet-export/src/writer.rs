//! The `RosterWriter` trait implemented by all backend writers.

use crate::{AssignmentRow, ExportResult, SeatRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
pub trait RosterWriter {
    /// Write a batch of assignment rows.
    fn write_assignments(&mut self, rows: &[AssignmentRow]) -> ExportResult<()>;

    /// Write a batch of seat rows.
    fn write_seats(&mut self, rows: &[SeatRow]) -> ExportResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> ExportResult<()>;
}
